//! Compiled query fragments.
//!
//! A [`Fragment`] is a partial clause (`SET` assignments or `WHERE`
//! predicates) together with the bind values its placeholders refer to. The
//! text and the values travel as one unit so placeholder numbering and value
//! order cannot drift apart.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A parameterized clause fragment with positionally aligned bind values.
///
/// Placeholders are 1-based: `$i` binds the value at position `i - 1`.
/// Invariant: the number of placeholders in [`Fragment::sql`] equals
/// [`Fragment::param_count`].
#[derive(Debug, Clone)]
pub struct Fragment {
    sql: String,
    params: Vec<Arc<dyn ToSql + Send + Sync>>,
}

impl Fragment {
    /// An empty fragment: no clause text, no bind values.
    pub fn empty() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    pub(crate) fn new(sql: String, params: Vec<Arc<dyn ToSql + Send + Sync>>) -> Self {
        Self { sql, params }
    }

    /// The clause text with `$1, $2, ...` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Whether this fragment contributes no clause text.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Number of bind values (and therefore of placeholders).
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// The placeholder index a caller should use for the next bind value it
    /// appends itself (e.g. the key predicate of an `UPDATE`).
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fragment_has_no_text_or_params() {
        let f = Fragment::empty();
        assert!(f.is_empty());
        assert_eq!(f.sql(), "");
        assert_eq!(f.param_count(), 0);
        assert_eq!(f.next_placeholder(), 1);
    }

    #[test]
    fn next_placeholder_follows_params() {
        let params: Vec<Arc<dyn ToSql + Send + Sync>> = vec![Arc::new(1_i64)];
        let f = Fragment::new("a = $1".to_string(), params);
        assert_eq!(f.next_placeholder(), 2);
        assert_eq!(f.params_ref().len(), 1);
    }
}
