//! Row mapping traits and utilities

use tokio_postgres::Row;

use crate::error::Result;

/// Trait for converting a database row into a model struct
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> Result<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning [`Error::Decode`](crate::Error::Decode) on failure
    fn try_get_column<T>(&self, column: &str) -> Result<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> Result<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| crate::error::Error::decode(column, e.to_string()))
    }
}
