//! Remote data gateway
//!
//! Typed access to the IAMC backend. Everything that comes back goes through
//! [`shared::normalize`] before it is decoded, so callers only ever see the
//! canonical field set.

mod admin;
mod qr;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use shared::models::{Licenca, LicencaDecision, LeaveState};
use shared::normalize::{normalize_all, normalize_into};
use shared::{ApiResponse, CrudAction, Entity, EntityKind, Page, PageResponse, Payload};

use crate::collection::CollectionSource;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, RemoteError};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::query::{CollectionQuery, Filters};

const ENTITY_PREFIX: &str = "/api/iamc";

pub(crate) fn collection_path(kind: EntityKind) -> String {
    format!("{ENTITY_PREFIX}/{}", kind.path())
}

pub(crate) fn item_path(kind: EntityKind, id: i64) -> String {
    format!("{ENTITY_PREFIX}/{}/{id}", kind.path())
}

/// Gateway to the IAMC backend
#[derive(Clone)]
pub struct RemoteGateway {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for RemoteGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteGateway").finish_non_exhaustive()
    }
}

impl RemoteGateway {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(config)?;
        tracing::debug!(base_url = %http.base_url(), "gateway created");
        Ok(Self::with_http(Arc::new(http)))
    }

    /// Use a custom transport
    pub fn with_http(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    pub(crate) fn http(&self) -> &dyn HttpClient {
        self.http.as_ref()
    }

    // ========== Entities ==========

    /// List one entity kind. Only filters with a concrete value are sent.
    pub async fn fetch_collection<T: Entity>(&self, query: &CollectionQuery) -> ClientResult<Page<T>> {
        let path = collection_path(T::KIND);
        let params = query.to_query();
        tracing::debug!(kind = %T::KIND, params = params.len(), "fetching collection");
        let body = self.http.get_json(&path, &params).await?;
        decode_page(T::KIND, body)
    }

    /// Whole collection with structured filters only
    pub async fn fetch_all<T: Entity>(&self, filters: Filters) -> ClientResult<Vec<T>> {
        Ok(self.fetch_collection::<T>(&CollectionQuery::new(filters)).await?.items)
    }

    pub async fn get<T: Entity>(&self, id: i64) -> ClientResult<T> {
        let body = self.http.get_json(&item_path(T::KIND, id), &[]).await?;
        match unwrap_envelope(body)? {
            Some(data) => Ok(normalize_into(T::KIND, &data)?),
            None => Err(ClientError::InvalidResponse(format!(
                "{} {id}: response carried no record",
                T::KIND.label()
            ))),
        }
    }

    /// Create, update or delete one record.
    ///
    /// Create and update return the record as the backend stored it, after
    /// normalization. Delete returns `None`. The payload is checked first and
    /// nothing is sent when it is invalid.
    pub async fn mutate<T, B>(&self, action: CrudAction<B>) -> ClientResult<Option<T>>
    where
        T: Entity,
        B: Payload,
    {
        if let Some(payload) = action.payload() {
            payload.check()?;
        }
        let op = action.name();
        let is_delete = matches!(action, CrudAction::Delete { .. });
        let (method, path, body) = match action {
            CrudAction::Create(data) => (Method::POST, collection_path(T::KIND), Some(serde_json::to_value(data)?)),
            CrudAction::Update { id, data } => (Method::PUT, item_path(T::KIND, id), Some(serde_json::to_value(data)?)),
            CrudAction::Delete { id } => (Method::DELETE, item_path(T::KIND, id), None),
        };

        let response = self.http.send_json(method, &path, body).await.inspect_err(|e| {
            tracing::warn!(kind = %T::KIND, op, error = %e, "mutation failed");
        })?;
        let data = unwrap_envelope(response)?;
        tracing::info!(kind = %T::KIND, op, "mutation applied");

        if is_delete {
            return Ok(None);
        }
        match data {
            Some(data) => Ok(Some(normalize_into(T::KIND, &data)?)),
            None => Err(ClientError::InvalidResponse(format!(
                "{op} {}: response carried no record",
                T::KIND.label()
            ))),
        }
    }

    pub async fn create<T: Entity, B: Payload>(&self, data: B) -> ClientResult<T> {
        self.mutate::<T, B>(CrudAction::Create(data))
            .await?
            .ok_or_else(|| ClientError::InvalidResponse("create returned nothing".into()))
    }

    pub async fn update<T: Entity, B: Payload>(&self, id: i64, data: B) -> ClientResult<T> {
        self.mutate::<T, B>(CrudAction::Update { id, data })
            .await?
            .ok_or_else(|| ClientError::InvalidResponse("update returned nothing".into()))
    }

    pub async fn delete<T: Entity>(&self, id: i64) -> ClientResult<()> {
        self.mutate::<T, Value>(CrudAction::Delete { id }).await?;
        Ok(())
    }

    /// Approve or reject a pending leave request.
    ///
    /// The transition is checked locally against the record's current state;
    /// decided requests are refused before anything is sent.
    pub async fn decide_leave(&self, current: &Licenca, decision: LeaveState) -> ClientResult<Licenca> {
        let estado = current.estado.transition(decision)?;
        self.update::<Licenca, _>(current.id, LicencaDecision { estado }).await
    }
}

#[async_trait]
impl<T: Entity> CollectionSource<T> for RemoteGateway {
    async fn fetch(&self, query: &CollectionQuery) -> ClientResult<Page<T>> {
        self.fetch_collection::<T>(query).await
    }
}

// ========== Envelope decoding ==========

/// A 2xx body with `success: false` is a backend failure
fn refused(reason: String) -> ClientError {
    RemoteError::new(StatusCode::OK, reason).into()
}

/// List bodies: a paginated envelope or a bare array
pub(crate) fn decode_page<T: Entity>(kind: EntityKind, body: Value) -> ClientResult<Page<T>> {
    match body {
        Value::Array(items) => Ok(Page::single(normalize_all(kind, &items)?)),
        Value::Object(_) => {
            let envelope: PageResponse<Value> = serde_json::from_value(body)?;
            if !envelope.success {
                return Err(refused(envelope.failure_reason()));
            }
            let items: Vec<T> = normalize_all(kind, &envelope.data)?;
            let count = items.len();
            let mut page = Page::new(
                items,
                envelope.total.unwrap_or(count as u64),
                envelope.page.unwrap_or(1),
                envelope.per_page.unwrap_or(count as u32),
            );
            if let Some(pages) = envelope.pages {
                page.pages = pages;
            }
            Ok(page)
        }
        other => Err(ClientError::InvalidResponse(format!(
            "{}: expected a list, got {other}",
            kind.label()
        ))),
    }
}

/// Single-record bodies: `{success, data, ...}` or the bare record
pub(crate) fn unwrap_envelope(body: Value) -> ClientResult<Option<Value>> {
    let is_envelope = body.as_object().is_some_and(|map| {
        map.contains_key("success") || (map.contains_key("data") && !map.contains_key("id"))
    });
    if !is_envelope {
        return Ok(match body {
            Value::Null => None,
            other => Some(other),
        });
    }
    let envelope: ApiResponse<Value> = serde_json::from_value(body)?;
    if !envelope.success {
        return Err(refused(envelope.failure_reason()));
    }
    Ok(envelope.data.filter(|d| !d.is_null()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::{Departamento, DepartamentoInput, Funcionario, LeaveType};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway(server: &MockServer) -> RemoteGateway {
        ClientConfig::new(server.uri()).with_token("t0k3n").build_gateway().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_collection_normalizes_and_reports_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/iamc/funcionarios"))
            .and(query_param("estado", "Ativo"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {"ID": 1, "Nome": "Ana", "Sobrenome": "Silva", "BI": "001", "Sexo": "F", "Data_Admissao": "2020-01-01"},
                    {"id": 2, "nome": "Rui", "sobrenome": "Vaz", "bi": "002", "sexo": "M", "data_admissao": "2021-05-03T00:00:00"}
                ],
                "total": 37, "page": 1, "per_page": 2, "pages": 19
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = CollectionQuery::new(Filters::new().with("estado", "Ativo").with("nome", ""))
            .paginate(1, 2);
        let page: Page<Funcionario> = gateway(&server).await.fetch_collection(&query).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].nome, "Ana");
        assert_eq!(page.items[1].nome, "Rui");
        assert_eq!(page.total, 37);
        assert_eq!(page.pages, 19);

        let requests = server.received_requests().await.unwrap();
        let url = requests[0].url.as_str();
        assert!(!url.contains("nome="));
        assert_eq!(
            requests[0].headers.get("authorization").unwrap().to_str().unwrap(),
            "Bearer t0k3n"
        );
    }

    #[tokio::test]
    async fn test_bare_array_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/iamc/departamentos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"Id": 4, "Nome": "Financas"}
            ])))
            .mount(&server)
            .await;

        let deps: Vec<Departamento> = gateway(&server).await.fetch_all(Filters::new()).await.unwrap();
        assert_eq!(deps[0].id, 4);
        assert_eq!(deps[0].nome, "Financas");
    }

    #[tokio::test]
    async fn test_non_2xx_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .await
            .fetch_collection::<Departamento>(&CollectionQuery::default())
            .await
            .unwrap_err();
        match err {
            ClientError::Remote(e) => {
                assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(e.message, "db down");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_false_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false, "message": "Sem permissao"
            })))
            .mount(&server)
            .await;

        let err = gateway(&server).await.get::<Departamento>(1).await.unwrap_err();
        assert!(matches!(err, ClientError::Remote(ref e) if e.message == "Sem permissao"));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Nothing listens on the discard port
        let gw = ClientConfig::new("http://127.0.0.1:9").with_timeout(2).build_gateway().unwrap();
        let err = gw.fetch_collection::<Departamento>(&CollectionQuery::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_create_renormalizes_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/iamc/departamentos"))
            .and(body_json(json!({"nome": "Tecnologia"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": {"ID": 9, "Nome": "Tecnologia"},
                "message": "Departamento criado"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let input = DepartamentoInput {
            nome: "Tecnologia".into(),
            descricao: None,
        };
        let created: Departamento = gateway(&server).await.create(input).await.unwrap();
        assert_eq!(created.id, 9);
        assert_eq!(created.nome, "Tecnologia");
    }

    #[tokio::test]
    async fn test_invalid_payload_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

        let err = gateway(&server)
            .await
            .create::<Departamento, _>(DepartamentoInput::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_delete_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/iamc/cargos/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let out = gateway(&server)
            .await
            .mutate::<shared::models::Cargo, Value>(CrudAction::Delete { id: 3 })
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_decided_leave_is_refused_locally() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/iamc/licencas/5"))
            .and(body_json(json!({"estado": "Aprovada"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": 5, "funcionario_id": 1, "tipo": "Ferias", "data_inicio": "2024-07-01", "data_fim": "2024-07-10", "estado": "Aprovada"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        let mut leave = Licenca {
            id: 5,
            funcionario_id: 1,
            tipo: LeaveType::Vacation,
            data_inicio: chrono::NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            data_fim: chrono::NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            motivo: None,
            estado: LeaveState::Pending,
        };
        let approved = gw.decide_leave(&leave, LeaveState::Approved).await.unwrap();
        assert_eq!(approved.estado, LeaveState::Approved);

        leave.estado = LeaveState::Approved;
        let err = gw.decide_leave(&leave, LeaveState::Rejected).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_unwrap_envelope_shapes() {
        assert_eq!(unwrap_envelope(Value::Null).unwrap(), None);
        let bare = json!({"id": 1, "data": "2024-01-01"});
        assert_eq!(unwrap_envelope(bare.clone()).unwrap(), Some(bare));
        let wrapped = json!({"success": true, "data": {"id": 2}});
        assert_eq!(unwrap_envelope(wrapped).unwrap(), Some(json!({"id": 2})));
    }
}
