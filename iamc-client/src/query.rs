//! Sparse filter records and collection queries
//!
//! Only keys with a concrete, non-empty value ever reach the URL. The same
//! filter record can be evaluated locally against a serialized row for views
//! that page on the client.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Date(NaiveDate),
}

impl FilterValue {
    /// Query-string rendering; `None` for values that must not be sent
    pub fn to_param(&self) -> Option<String> {
        match self {
            Self::Text(s) if s.trim().is_empty() => None,
            Self::Text(s) => Some(s.trim().to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Equality against a field of a serialized row. Text compares
    /// case-insensitively; dates match on the date part of the field.
    pub fn matches(&self, field: &Value) -> bool {
        match (self, field) {
            (Self::Text(expected), Value::String(actual)) => {
                actual.trim().eq_ignore_ascii_case(expected.trim())
            }
            (Self::Text(expected), Value::Number(n)) => n.to_string() == expected.trim(),
            (Self::Integer(expected), Value::Number(n)) => n.as_i64() == Some(*expected),
            (Self::Integer(expected), Value::String(s)) => s.trim().parse::<i64>().ok() == Some(*expected),
            (Self::Bool(expected), Value::Bool(b)) => b == expected,
            (Self::Date(expected), Value::String(s)) => {
                shared::util::parse_date(s) == Some(*expected)
            }
            _ => false,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

/// Structured filter record keyed by canonical field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    values: BTreeMap<String, FilterValue>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Filters::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Set or clear a key depending on whether a value is given
    pub fn set_opt<V: Into<FilterValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        let key = key.into();
        match value {
            Some(v) => {
                self.values.insert(key, v.into());
            }
            None => {
                self.values.remove(&key);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// No key carries a sendable value
    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.to_param().is_none())
    }

    /// URL parameters, omitting keys with empty values
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter_map(|(k, v)| v.to_param().map(|p| (k.clone(), p)))
            .collect()
    }

    /// Local evaluation against a serialized row. Empty values are ignored
    /// the same way they are left out of the URL.
    pub fn matches(&self, row: &Value) -> bool {
        self.values
            .iter()
            .filter(|(_, v)| v.to_param().is_some())
            .all(|(k, v)| row.get(k).is_some_and(|field| v.matches(field)))
    }
}

/// Everything a list endpoint needs to produce one response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionQuery {
    pub filters: Filters,
    pub search: Option<String>,
    /// 1-based page, as the backend counts
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl CollectionQuery {
    pub fn new(filters: Filters) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: u32, per_page: u32) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = self.filters.to_query();
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            params.push(("search".to_string(), term.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".to_string(), per_page.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values_are_omitted() {
        let mut filters = Filters::new()
            .with("estado", "Ativo")
            .with("nome", "")
            .with("departamento_id", 3_i64);
        filters.set_opt::<i64>("cargo_id", None);
        filters.set("bi", "   ");

        let query = filters.to_query();
        assert_eq!(
            query,
            vec![
                ("departamento_id".to_string(), "3".to_string()),
                ("estado".to_string(), "Ativo".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_opt_none_clears() {
        let mut filters = Filters::new().with("cargo_id", 2_i64);
        filters.set_opt::<i64>("cargo_id", None);
        assert!(filters.is_empty());
        assert!(filters.get("cargo_id").is_none());
    }

    #[test]
    fn test_local_matching() {
        let row = json!({"estado": "Ativo", "departamento_id": 2, "data_admissao": "2020-03-10"});
        assert!(Filters::new().matches(&row));
        assert!(Filters::new().with("estado", "ativo").matches(&row));
        assert!(Filters::new().with("departamento_id", 2_i64).matches(&row));
        assert!(!Filters::new().with("departamento_id", 3_i64).matches(&row));
        assert!(!Filters::new().with("cargo_id", 1_i64).matches(&row));
        let date = NaiveDate::from_ymd_opt(2020, 3, 10).unwrap();
        assert!(Filters::new().with("data_admissao", date).matches(&row));
        // empty text behaves as "no filter"
        assert!(Filters::new().with("nome", "").matches(&row));
    }

    #[test]
    fn test_collection_query_params() {
        let query = CollectionQuery::new(Filters::new().with("estado", "Ativo"))
            .with_search("  ")
            .paginate(2, 20);
        let params = query.to_query();
        assert!(params.contains(&("page".to_string(), "2".to_string())));
        assert!(params.contains(&("per_page".to_string(), "20".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "search"));
    }
}
