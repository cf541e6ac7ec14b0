//! Backend seam of the badge workflow

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{Funcionario, QrKind};

use crate::error::ClientResult;

/// What the backend said about a generate call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateReport {
    #[serde(default)]
    pub message: Option<String>,
}

/// Summary of an employee import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    #[serde(default, alias = "importados", alias = "total")]
    pub imported: Option<u64>,
    #[serde(default, alias = "erros")]
    pub errors: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of a bulk badge call, judged from the partitions re-fetched after it
/// and, for deletes, from the per-id backend answers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub succeeded: Vec<i64>,
    pub failed: Vec<i64>,
    /// Failure reported by the backend, if the call itself failed
    pub backend_error: Option<String>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.backend_error.is_none()
    }
}

/// Badge endpoints
#[async_trait]
pub trait QrBackend: Send + Sync {
    /// Employees that currently hold a badge
    async fn list_with_badge(&self) -> ClientResult<Vec<Funcionario>>;

    /// Employees without a badge
    async fn list_without_badge(&self) -> ClientResult<Vec<Funcionario>>;

    async fn generate(&self, ids: &[i64], kind: QrKind) -> ClientResult<GenerateReport>;

    async fn delete_badge(&self, id: i64) -> ClientResult<()>;

    /// PNG bytes of one badge
    async fn badge_image(&self, id: i64) -> ClientResult<Vec<u8>>;

    /// ZIP archive holding the badges of `ids`
    async fn badge_archive(&self, ids: &[i64]) -> ClientResult<Vec<u8>>;

    async fn import_employees(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<ImportReport>;
}
