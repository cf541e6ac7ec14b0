//! Dashboard metrics and service status (`/api/iamc/dashboard/metrics`, `/api/iamc/status`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardMetrics {
    pub total_funcionarios: u64,
    pub funcionarios_ativos: u64,
    pub total_departamentos: u64,
    pub total_cargos: u64,
    pub licencas_pendentes: u64,
    pub presencas_hoje: u64,
    pub funcionarios_com_qr: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "ok" | "online" | "running")
    }
}
