//! Generic query parameters and their translation into the store's
//! native query shape.
//!
//! `QueryParams` is what callers build from request input; `StoreQuery` is
//! the flat offset/limit/order/conditions form the repositories consume.
//! The translation is a pure mapping: apart from pagination defaults and the
//! page-size cap, values pass through untouched. Field names are not checked
//! here; a repository rejects names it cannot resolve to a column.

use serde::Deserialize;

use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Sort direction for an ordering clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Comparison operator for a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Substring match; only meaningful for string values
    Contains,
}

/// A filter value as supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::String(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::String(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v as i64)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Float(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

/// A single filter condition: field, operator, value
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Comparison,
    pub value: FilterValue,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Comparison, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Generic pagination, ordering, and filter parameters.
///
/// Built per request and consumed by the translation into [`StoreQuery`];
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    /// Number of records to skip (offset)
    pub skip: Option<u64>,
    /// Page size; capped at the maximum during translation
    pub take: Option<u64>,
    /// Ordered sequence of (field, direction) pairs
    pub order_by: Vec<(String, SortDirection)>,
    /// Equality/comparison conditions, combined with AND
    pub filters: Vec<Condition>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    pub fn filter(
        mut self,
        field: impl Into<String>,
        op: Comparison,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.filters.push(Condition::new(field, op, value));
        self
    }
}

/// The store's native query shape: resolved offset/limit plus pass-through
/// ordering and conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    pub offset: u64,
    pub limit: u64,
    pub order: Vec<(String, SortDirection)>,
    pub conditions: Vec<Condition>,
}

impl From<QueryParams> for StoreQuery {
    fn from(params: QueryParams) -> Self {
        Self {
            offset: params.skip.unwrap_or(0),
            limit: params.take.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
            order: params.order_by,
            conditions: params.filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let query = StoreQuery::from(QueryParams::new());

        assert_eq!(query.offset, 0);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
        assert!(query.order.is_empty());
        assert!(query.conditions.is_empty());
    }

    #[test]
    fn test_skip_and_take_pass_through() {
        let query = StoreQuery::from(QueryParams::new().skip(40).take(10));

        assert_eq!(query.offset, 40);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_take_capped_at_maximum() {
        let query = StoreQuery::from(QueryParams::new().take(10_000));

        assert_eq!(query.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_order_preserves_sequence() {
        let query = StoreQuery::from(
            QueryParams::new()
                .order_by("price", SortDirection::Desc)
                .order_by("name", SortDirection::Asc),
        );

        assert_eq!(
            query.order,
            vec![
                ("price".to_string(), SortDirection::Desc),
                ("name".to_string(), SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn test_filters_pass_through_unvalidated() {
        // Unknown fields are not rejected here; the store decides.
        let query = StoreQuery::from(QueryParams::new().filter(
            "no_such_field",
            Comparison::Eq,
            "value",
        ));

        assert_eq!(query.conditions.len(), 1);
        assert_eq!(query.conditions[0].field, "no_such_field");
        assert_eq!(query.conditions[0].value, FilterValue::String("value".into()));
    }
}
