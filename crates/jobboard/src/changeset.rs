//! Partial-update (`SET` clause) compilation.
//!
//! An update payload arrives as an insertion-ordered set of application-level
//! field names with new values. [`set_clause`] turns it into
//! `"column"=$1, "column"=$2, ...` plus the bind values in matching order;
//! the caller appends its own key predicate at
//! [`Fragment::next_placeholder`](crate::Fragment::next_placeholder).

use std::sync::Arc;

use tokio_postgres::types::ToSql;

use crate::error::{Error, Result};
use crate::fragment::Fragment;

/// Static application-name → column-name translation entries.
///
/// Field names missing from the map are used verbatim as the column name
/// (they still have to pass identifier validation).
pub type ColumnMap = &'static [(&'static str, &'static str)];

/// Insertion-ordered update payload: field name → new value.
///
/// Insertion order determines placeholder numbering, so the caller controls
/// the shape of the generated clause.
#[derive(Debug, Default)]
pub struct FieldMap {
    entries: Vec<(String, Arc<dyn ToSql + Send + Sync>)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field with its new value.
    pub fn set<T>(mut self, field: impl Into<String>, value: T) -> Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.entries.push((field.into(), Arc::new(value)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Compile a partial-update payload into a `SET` clause fragment.
///
/// Each field resolves to its store column via `columns`, falling back to the
/// field name itself, and is emitted as `"column"=$i` with `i` the 1-based
/// insertion position. Values come back in the same order, so binding
/// `values[i-1]` to `$i` is always correct.
///
/// Fails with [`Error::NoUpdatableFields`] when `fields` is empty, and with
/// [`Error::Validation`] when a resolved column name is not a safe SQL
/// identifier.
pub fn set_clause(fields: FieldMap, columns: ColumnMap) -> Result<Fragment> {
    if fields.is_empty() {
        return Err(Error::NoUpdatableFields);
    }

    let mut assignments = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());

    for (idx, (field, value)) in fields.entries.into_iter().enumerate() {
        let column: &str = match columns.iter().find(|(app, _)| *app == field.as_str()) {
            Some(&(_, col)) => col,
            None => field.as_str(),
        };
        check_ident(column)?;
        assignments.push(format!("\"{}\"=${}", column, idx + 1));
        params.push(value);
    }

    Ok(Fragment::new(assignments.join(", "), params))
}

/// Validate a column name before splicing it into SQL as a quoted identifier.
///
/// Identifiers are never parameterizable, so anything outside
/// `[A-Za-z_][A-Za-z0-9_$]*` is rejected rather than quoted.
fn check_ident(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
    if !first_ok || !chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric()) {
        return Err(Error::validation(format!("unsafe column name '{name}'")));
    }
    Ok(())
}
