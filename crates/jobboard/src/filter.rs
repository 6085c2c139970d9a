//! Filter-criteria (`WHERE` clause) compilation.
//!
//! Callers pass list-endpoint criteria exactly as received, in insertion
//! order. Each entity declares a static [`FilterSchema`] naming the criteria
//! it recognizes; anything outside that set is rejected outright rather than
//! silently ignored.

use std::sync::Arc;

use tokio_postgres::types::ToSql;

use crate::error::{Error, Result};
use crate::fragment::Fragment;

/// A caller-supplied filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl FilterValue {
    /// Integer view; `Text` is accepted when it parses, since criteria
    /// usually arrive as query-string text.
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
            Self::Bool(_) => None,
        }
    }

    fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// How a recognized criterion translates into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match (`ILIKE`); the value is wrapped in
    /// `%` wildcards on both sides.
    Contains,
    /// Strict `>` against an integer value.
    GreaterThan,
    /// Strict `<` against an integer value.
    LessThan,
    /// Fixed `<> 0` switch. Binds no value and consumes no placeholder.
    NonZero,
}

/// One recognized criterion for an entity.
#[derive(Debug, Clone, Copy)]
pub struct Criterion {
    /// The application-level criterion name callers use.
    pub key: &'static str,
    /// The store column the predicate applies to.
    pub column: &'static str,
    pub predicate: Predicate,
}

/// The fixed set of criteria an entity accepts.
///
/// `bounds` optionally names a `(lower, upper)` criterion pair whose values
/// must be consistent when both are present.
#[derive(Debug, Clone, Copy)]
pub struct FilterSchema {
    pub criteria: &'static [Criterion],
    pub bounds: Option<(&'static str, &'static str)>,
}

impl FilterSchema {
    fn criterion(&self, key: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.key == key)
    }
}

/// Insertion-ordered filter criteria as received from the caller.
#[derive(Debug, Default)]
pub struct FilterCriteria {
    entries: Vec<(String, FilterValue)>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a criterion. Order of insertion is preserved in the output.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }
}

/// Compile filter criteria into a `WHERE` clause body.
///
/// Empty criteria compile to an empty fragment (the "no filtering" case);
/// otherwise predicates are emitted in insertion order and joined with
/// `" AND "`. The caller splices the result after its own `WHERE` keyword.
///
/// Fails with [`Error::InvalidFilterKey`] on the first unrecognized key, with
/// [`Error::Validation`] when a numeric predicate gets a non-numeric value,
/// and with [`Error::InvalidRange`] when the schema's bound pair is present
/// and inverted. The range check runs after every key has been validated and
/// before any fragment is returned.
pub fn where_clause(criteria: &FilterCriteria, schema: &FilterSchema) -> Result<Fragment> {
    if criteria.is_empty() {
        return Ok(Fragment::empty());
    }

    let mut predicates = Vec::with_capacity(criteria.len());
    let mut params: Vec<Arc<dyn ToSql + Send + Sync>> = Vec::with_capacity(criteria.len());

    for (key, value) in &criteria.entries {
        let Some(spec) = schema.criterion(key) else {
            return Err(Error::InvalidFilterKey(key.clone()));
        };
        match spec.predicate {
            Predicate::Contains => {
                predicates.push(format!("{} ILIKE ${}", spec.column, params.len() + 1));
                params.push(Arc::new(format!("%{}%", value.to_text())));
            }
            Predicate::GreaterThan => {
                predicates.push(format!("{} > ${}", spec.column, params.len() + 1));
                params.push(Arc::new(int_value(key, value)?));
            }
            Predicate::LessThan => {
                predicates.push(format!("{} < ${}", spec.column, params.len() + 1));
                params.push(Arc::new(int_value(key, value)?));
            }
            // No placeholder consumed: later criteria keep their numbering.
            Predicate::NonZero => predicates.push(format!("{} <> 0", spec.column)),
        }
    }

    if let Some((lower_key, upper_key)) = schema.bounds {
        let lower = criteria.get(lower_key).and_then(FilterValue::as_i64);
        let upper = criteria.get(upper_key).and_then(FilterValue::as_i64);
        if let (Some(min), Some(max)) = (lower, upper) {
            if max < min {
                return Err(Error::InvalidRange { min, max });
            }
        }
    }

    Ok(Fragment::new(predicates.join(" AND "), params))
}

fn int_value(key: &str, value: &FilterValue) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Error::validation(format!("filter '{key}' expects a numeric value")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: FilterSchema = FilterSchema {
        criteria: &[
            Criterion {
                key: "nameLike",
                column: "name",
                predicate: Predicate::Contains,
            },
            Criterion {
                key: "minSize",
                column: "size",
                predicate: Predicate::GreaterThan,
            },
            Criterion {
                key: "maxSize",
                column: "size",
                predicate: Predicate::LessThan,
            },
            Criterion {
                key: "hasStock",
                column: "stock",
                predicate: Predicate::NonZero,
            },
        ],
        bounds: Some(("minSize", "maxSize")),
    };

    #[test]
    fn no_criteria_means_no_clause() {
        let frag = where_clause(&FilterCriteria::new(), &SCHEMA).unwrap();
        assert!(frag.is_empty());
        assert_eq!(frag.param_count(), 0);
    }

    #[test]
    fn unknown_key_is_rejected_by_name() {
        let criteria = FilterCriteria::new().add("color", "red");
        let err = where_clause(&criteria, &SCHEMA).unwrap_err();
        match err {
            Error::InvalidFilterKey(key) => assert_eq!(key, "color"),
            other => panic!("expected InvalidFilterKey, got {other:?}"),
        }
    }

    #[test]
    fn predicates_join_in_insertion_order() {
        let criteria = FilterCriteria::new().add("nameLike", "bolt").add("minSize", 4);
        let frag = where_clause(&criteria, &SCHEMA).unwrap();
        assert_eq!(frag.sql(), "name ILIKE $1 AND size > $2");
        assert_eq!(format!("{:?}", frag.params_ref()), "[\"%bolt%\", 4]");
    }

    #[test]
    fn switch_predicate_consumes_no_placeholder() {
        let criteria = FilterCriteria::new()
            .add("nameLike", "bolt")
            .add("hasStock", true)
            .add("minSize", 4);
        let frag = where_clause(&criteria, &SCHEMA).unwrap();
        assert_eq!(frag.sql(), "name ILIKE $1 AND stock <> 0 AND size > $2");
        assert_eq!(frag.param_count(), 2);
    }

    #[test]
    fn switch_predicate_alone_binds_nothing() {
        let criteria = FilterCriteria::new().add("hasStock", true);
        let frag = where_clause(&criteria, &SCHEMA).unwrap();
        assert_eq!(frag.sql(), "stock <> 0");
        assert_eq!(frag.param_count(), 0);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let criteria = FilterCriteria::new().add("minSize", 50).add("maxSize", 10);
        let err = where_clause(&criteria, &SCHEMA).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { min: 50, max: 10 }));
    }

    #[test]
    fn consistent_bounds_pass() {
        let criteria = FilterCriteria::new().add("minSize", 10).add("maxSize", 50);
        let frag = where_clause(&criteria, &SCHEMA).unwrap();
        assert_eq!(frag.sql(), "size > $1 AND size < $2");
    }

    #[test]
    fn numeric_text_is_accepted_for_inequalities() {
        // Query-string values arrive as text.
        let criteria = FilterCriteria::new().add("minSize", "7");
        let frag = where_clause(&criteria, &SCHEMA).unwrap();
        assert_eq!(frag.sql(), "size > $1");
        assert_eq!(format!("{:?}", frag.params_ref()), "[7]");
    }

    #[test]
    fn non_numeric_value_for_inequality_fails() {
        let criteria = FilterCriteria::new().add("minSize", "lots");
        let err = where_clause(&criteria, &SCHEMA).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let build = || {
            let criteria = FilterCriteria::new()
                .add("nameLike", "bolt")
                .add("minSize", 1)
                .add("maxSize", 9);
            where_clause(&criteria, &SCHEMA).unwrap()
        };
        let (a, b) = (build(), build());
        assert_eq!(a.sql(), b.sql());
        assert_eq!(
            format!("{:?}", a.params_ref()),
            format!("{:?}", b.params_ref())
        );
    }
}
