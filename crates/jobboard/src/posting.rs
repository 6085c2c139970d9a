//! Related functions for job postings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tracing::debug;

use crate::changeset::{ColumnMap, FieldMap, set_clause};
use crate::client::GenericClient;
use crate::error::{Error, Result};
use crate::filter::{Criterion, FilterCriteria, FilterSchema, Predicate, where_clause};
use crate::row::{FromRow, RowExt};

/// Criteria accepted by [`Posting::find_all`].
///
/// `hasEquity` is a switch, not a bound value: it compiles to `equity <> 0`
/// without consuming a placeholder.
pub const POSTING_FILTERS: FilterSchema = FilterSchema {
    criteria: &[
        Criterion {
            key: "title",
            column: "title",
            predicate: Predicate::Contains,
        },
        Criterion {
            key: "minSalary",
            column: "salary",
            predicate: Predicate::GreaterThan,
        },
        Criterion {
            key: "hasEquity",
            column: "equity",
            predicate: Predicate::NonZero,
        },
    ],
    bounds: None,
};

/// Posting patch fields already match their column names.
pub const POSTING_COLUMNS: ColumnMap = &[];

const COLUMNS: &str = "id, title, salary, equity, org_handle";

/// A job posting record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub org_handle: String,
}

impl FromRow for Posting {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            org_handle: row.try_get_column("org_handle")?,
        })
    }
}

/// Input for [`Posting::create`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosting {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub org_handle: String,
}

/// Partial update payload; the owning organization cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingPatch {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl PostingPatch {
    /// The application-level field map, in declaration order.
    pub fn field_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(title) = &self.title {
            fields = fields.set("title", title.clone());
        }
        if let Some(salary) = self.salary {
            fields = fields.set("salary", salary);
        }
        if let Some(equity) = self.equity {
            fields = fields.set("equity", equity);
        }
        fields
    }
}

impl Posting {
    /// Create a posting; fails with [`Error::Duplicate`] when a posting with
    /// the same title exists.
    pub async fn create(conn: &impl GenericClient, input: &NewPosting) -> Result<Posting> {
        let duplicate = conn
            .query_opt("SELECT title FROM postings WHERE title = $1", &[&input.title])
            .await?;
        if duplicate.is_some() {
            return Err(Error::Duplicate(format!(
                "posting '{}' already exists",
                input.title
            )));
        }

        let row = conn
            .query_one(
                "INSERT INTO postings (title, salary, equity, org_handle) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, title, salary, equity, org_handle",
                &[&input.title, &input.salary, &input.equity, &input.org_handle],
            )
            .await?;
        Posting::from_row(&row)
    }

    /// List postings, optionally filtered, ordered by title.
    pub async fn find_all(
        conn: &impl GenericClient,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Posting>> {
        let filter = where_clause(criteria, &POSTING_FILTERS)?;

        let mut sql = format!("SELECT {COLUMNS} FROM postings");
        if !filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(filter.sql());
        }
        sql.push_str(" ORDER BY title");
        debug!(sql = %sql, params = filter.param_count(), "listing postings");

        let rows = conn.query(&sql, &filter.params_ref()).await?;
        rows.iter().map(Posting::from_row).collect()
    }

    /// Fetch one posting by id.
    pub async fn get(conn: &impl GenericClient, id: i32) -> Result<Posting> {
        let row = conn
            .query_opt(
                "SELECT id, title, salary, equity, org_handle FROM postings WHERE id = $1",
                &[&id],
            )
            .await?
            .ok_or_else(|| Error::not_found(format!("no posting {id}")))?;
        Posting::from_row(&row)
    }

    /// Apply a partial update and return the new record.
    pub async fn update(
        conn: &impl GenericClient,
        id: i32,
        patch: &PostingPatch,
    ) -> Result<Posting> {
        let set = set_clause(patch.field_map(), POSTING_COLUMNS)?;
        let sql = format!(
            "UPDATE postings SET {} WHERE id = ${} RETURNING {COLUMNS}",
            set.sql(),
            set.next_placeholder(),
        );
        debug!(sql = %sql, "updating posting");

        let mut params = set.params_ref();
        params.push(&id);
        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| Error::not_found(format!("no posting {id}")))?;
        Posting::from_row(&row)
    }

    /// Delete a posting by id.
    pub async fn delete(conn: &impl GenericClient, id: i32) -> Result<()> {
        conn.query_opt("DELETE FROM postings WHERE id = $1 RETURNING id", &[&id])
            .await?
            .ok_or_else(|| Error::not_found(format!("no posting {id}")))?;
        Ok(())
    }
}
