//! Related functions for organizations.

use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tracing::debug;

use crate::changeset::{ColumnMap, FieldMap, set_clause};
use crate::client::GenericClient;
use crate::error::{Error, Result};
use crate::filter::{Criterion, FilterCriteria, FilterSchema, Predicate, where_clause};
use crate::row::{FromRow, RowExt};

/// Criteria accepted by [`Organization::find_all`].
pub const ORGANIZATION_FILTERS: FilterSchema = FilterSchema {
    criteria: &[
        Criterion {
            key: "nameLike",
            column: "name",
            predicate: Predicate::Contains,
        },
        Criterion {
            key: "minEmployees",
            column: "num_employees",
            predicate: Predicate::GreaterThan,
        },
        Criterion {
            key: "maxEmployees",
            column: "num_employees",
            predicate: Predicate::LessThan,
        },
    ],
    bounds: Some(("minEmployees", "maxEmployees")),
};

/// Application-name → column translations for organization updates.
pub const ORGANIZATION_COLUMNS: ColumnMap = &[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
];

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// An organization record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Organization {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Input for [`Organization::create`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Partial update payload; only populated fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl OrganizationPatch {
    /// The application-level field map, in declaration order.
    pub fn field_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(name) = &self.name {
            fields = fields.set("name", name.clone());
        }
        if let Some(description) = &self.description {
            fields = fields.set("description", description.clone());
        }
        if let Some(num_employees) = self.num_employees {
            fields = fields.set("numEmployees", num_employees);
        }
        if let Some(logo_url) = &self.logo_url {
            fields = fields.set("logoUrl", logo_url.clone());
        }
        fields
    }
}

impl Organization {
    /// Create an organization; fails with [`Error::Duplicate`] when the
    /// handle is taken.
    pub async fn create(
        conn: &impl GenericClient,
        input: &NewOrganization,
    ) -> Result<Organization> {
        let duplicate = conn
            .query_opt(
                "SELECT handle FROM organizations WHERE handle = $1",
                &[&input.handle],
            )
            .await?;
        if duplicate.is_some() {
            return Err(Error::Duplicate(format!(
                "organization '{}' already exists",
                input.handle
            )));
        }

        let row = conn
            .query_one(
                "INSERT INTO organizations (handle, name, description, num_employees, logo_url) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING handle, name, description, num_employees, logo_url",
                &[
                    &input.handle,
                    &input.name,
                    &input.description,
                    &input.num_employees,
                    &input.logo_url,
                ],
            )
            .await?;
        Organization::from_row(&row)
    }

    /// List organizations, optionally filtered, ordered by name.
    pub async fn find_all(
        conn: &impl GenericClient,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Organization>> {
        let filter = where_clause(criteria, &ORGANIZATION_FILTERS)?;

        let mut sql = format!("SELECT {COLUMNS} FROM organizations");
        if !filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(filter.sql());
        }
        sql.push_str(" ORDER BY name");
        debug!(sql = %sql, params = filter.param_count(), "listing organizations");

        let rows = conn.query(&sql, &filter.params_ref()).await?;
        rows.iter().map(Organization::from_row).collect()
    }

    /// Fetch one organization by handle.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> Result<Organization> {
        let row = conn
            .query_opt(
                "SELECT handle, name, description, num_employees, logo_url \
                 FROM organizations WHERE handle = $1",
                &[&handle],
            )
            .await?
            .ok_or_else(|| Error::not_found(format!("no organization '{handle}'")))?;
        Organization::from_row(&row)
    }

    /// Apply a partial update and return the new record.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        patch: &OrganizationPatch,
    ) -> Result<Organization> {
        let set = set_clause(patch.field_map(), ORGANIZATION_COLUMNS)?;
        let sql = format!(
            "UPDATE organizations SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            set.sql(),
            set.next_placeholder(),
        );
        debug!(sql = %sql, "updating organization");

        let mut params = set.params_ref();
        params.push(&handle);
        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| Error::not_found(format!("no organization '{handle}'")))?;
        Organization::from_row(&row)
    }

    /// Delete an organization by handle.
    pub async fn delete(conn: &impl GenericClient, handle: &str) -> Result<()> {
        conn.query_opt(
            "DELETE FROM organizations WHERE handle = $1 RETURNING handle",
            &[&handle],
        )
        .await?
        .ok_or_else(|| Error::not_found(format!("no organization '{handle}'")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_filter_wraps_wildcards() {
        let criteria = FilterCriteria::new().add("nameLike", "net");
        let frag = where_clause(&criteria, &ORGANIZATION_FILTERS).unwrap();
        assert_eq!(frag.sql(), "name ILIKE $1");
        assert_eq!(format!("{:?}", frag.params_ref()), "[\"%net%\"]");
    }

    #[test]
    fn employee_bounds_are_strict_inequalities() {
        let criteria = FilterCriteria::new()
            .add("minEmployees", 10)
            .add("maxEmployees", 50);
        let frag = where_clause(&criteria, &ORGANIZATION_FILTERS).unwrap();
        assert_eq!(frag.sql(), "num_employees > $1 AND num_employees < $2");
    }

    #[test]
    fn inverted_employee_bounds_fail() {
        let criteria = FilterCriteria::new()
            .add("minEmployees", 50)
            .add("maxEmployees", 10);
        let err = where_clause(&criteria, &ORGANIZATION_FILTERS).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { min: 50, max: 10 }));
    }

    #[test]
    fn unknown_criterion_is_rejected() {
        let criteria = FilterCriteria::new().add("minSalary", 1);
        let err = where_clause(&criteria, &ORGANIZATION_FILTERS).unwrap_err();
        assert!(matches!(err, Error::InvalidFilterKey(_)));
    }

    #[test]
    fn patch_compiles_with_column_translation() {
        let patch = OrganizationPatch {
            name: Some("Acme Ltd".into()),
            num_employees: Some(42),
            ..Default::default()
        };
        let frag = set_clause(patch.field_map(), ORGANIZATION_COLUMNS).unwrap();
        assert_eq!(frag.sql(), "\"name\"=$1, \"num_employees\"=$2");
        assert_eq!(frag.next_placeholder(), 3);
    }

    #[test]
    fn empty_patch_is_a_client_error() {
        let patch = OrganizationPatch::default();
        let err = set_clause(patch.field_map(), ORGANIZATION_COLUMNS).unwrap_err();
        assert!(matches!(err, Error::NoUpdatableFields));
    }

    #[test]
    fn patch_deserializes_camel_case() {
        let patch: OrganizationPatch =
            serde_json::from_str(r#"{"numEmployees": 7, "logoUrl": "/l.png"}"#).unwrap();
        let frag = set_clause(patch.field_map(), ORGANIZATION_COLUMNS).unwrap();
        assert_eq!(frag.sql(), "\"num_employees\"=$1, \"logo_url\"=$2");
    }
}
