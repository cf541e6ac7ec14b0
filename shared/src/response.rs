//! API Response types
//!
//! Envelopes used by the IAMC backend.
//!
//! Single entity:
//! ```json
//! { "success": true, "data": { ... }, "message": "Funcionario criado" }
//! ```
//!
//! Paginated list:
//! ```json
//! { "success": true, "data": [ ... ], "total": 25, "page": 1, "per_page": 10, "pages": 3 }
//! ```

use serde::{Deserialize, Serialize};

/// Single-entity response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(message.into()),
        }
    }

    /// Best human-readable reason for a failed response
    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Total matching records on the server, across all pages
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> PageResponse<T> {
    pub fn failure_reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// One decoded page of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Server-reported total; equals `items.len()` for unpaginated endpoints
    pub total: u64,
    /// 1-based page number as reported by the server
    pub page: u32,
    pub per_page: u32,
    pub pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, per_page: u32) -> Self {
        let pages = if per_page > 0 {
            total.div_ceil(u64::from(per_page)) as u32
        } else {
            1
        };
        Self {
            items,
            total,
            page,
            per_page,
            pages,
        }
    }

    /// Whole collection in one page (endpoint did not paginate)
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            total,
            page: 1,
            per_page: total as u32,
            pages: 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            pages: self.pages,
        }
    }
}

/// Body of the bulk QR endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_envelope_defaults() {
        let resp: PageResponse<i64> = serde_json::from_value(json!({"data": [1, 2]})).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data, vec![1, 2]);
        assert!(resp.total.is_none());
    }

    #[test]
    fn test_failure_reason_prefers_error() {
        let resp: ApiResponse<()> = serde_json::from_value(json!({
            "success": false,
            "message": "generic",
            "error": "Funcionario nao encontrado"
        }))
        .unwrap();
        assert_eq!(resp.failure_reason(), "Funcionario nao encontrado");
    }

    #[test]
    fn test_page_count() {
        let page = Page::new(vec!["a"; 10], 25, 1, 10);
        assert_eq!(page.pages, 3);
        let single = Page::single(vec![1, 2, 3]);
        assert_eq!(single.total, 3);
        assert_eq!(single.pages, 1);
    }
}
