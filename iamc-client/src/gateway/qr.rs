//! Badge endpoints (`/qr/*`)

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use shared::models::{Funcionario, QrKind};
use shared::{Entity, IdsRequest};

use super::{RemoteGateway, decode_page, unwrap_envelope};
use crate::error::ClientResult;
use crate::qr::{GenerateReport, ImportReport, QrBackend};

const WITH_BADGE: &str = "/qr/funcionarios";
const WITHOUT_BADGE: &str = "/qr/funcionarios-sin-qr";
const GENERATE_DYNAMIC: &str = "/qr/generar";
const GENERATE_STATIC: &str = "/qr/generar-estatico";
const DOWNLOAD_MANY: &str = "/qr/descargar-multiples";
const IMPORT: &str = "/qr/importar-funcionarios";

fn ids_body(ids: &[i64]) -> ClientResult<Value> {
    Ok(serde_json::to_value(IdsRequest { ids: ids.to_vec() })?)
}

impl RemoteGateway {
    async fn list_badge_partition(&self, path: &str) -> ClientResult<Vec<Funcionario>> {
        let body = self.http().get_json(path, &[]).await?;
        Ok(decode_page::<Funcionario>(Funcionario::KIND, body)?.items)
    }
}

#[async_trait]
impl QrBackend for RemoteGateway {
    async fn list_with_badge(&self) -> ClientResult<Vec<Funcionario>> {
        self.list_badge_partition(WITH_BADGE).await
    }

    async fn list_without_badge(&self) -> ClientResult<Vec<Funcionario>> {
        self.list_badge_partition(WITHOUT_BADGE).await
    }

    async fn generate(&self, ids: &[i64], kind: QrKind) -> ClientResult<GenerateReport> {
        let path = match kind {
            QrKind::Static => GENERATE_STATIC,
            QrKind::Dynamic => GENERATE_DYNAMIC,
        };
        let response = self.http().send_json(Method::POST, path, Some(ids_body(ids)?)).await?;
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        unwrap_envelope(response)?;
        Ok(GenerateReport { message })
    }

    async fn delete_badge(&self, id: i64) -> ClientResult<()> {
        let response = self
            .http()
            .send_json(Method::DELETE, &format!("/qr/eliminar/{id}"), None)
            .await?;
        unwrap_envelope(response)?;
        Ok(())
    }

    async fn badge_image(&self, id: i64) -> ClientResult<Vec<u8>> {
        self.http().get_bytes(&format!("/qr/descargar/{id}")).await
    }

    async fn badge_archive(&self, ids: &[i64]) -> ClientResult<Vec<u8>> {
        self.http().post_for_bytes(DOWNLOAD_MANY, ids_body(ids)?).await
    }

    async fn import_employees(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<ImportReport> {
        let mime = if file_name.to_ascii_lowercase().ends_with(".csv") {
            "text/csv"
        } else {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        };
        let response = self.http().post_file(IMPORT, "file", file_name, mime, bytes).await?;
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let mut report = match unwrap_envelope(response)? {
            Some(data) if data.is_object() => serde_json::from_value(data)?,
            _ => ImportReport::default(),
        };
        if report.message.is_none() {
            report.message = message;
        }
        Ok(report)
    }
}
