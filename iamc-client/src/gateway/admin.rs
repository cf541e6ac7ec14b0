//! Console administration: users, server settings, dashboard

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::Payload;
use shared::models::{
    DashboardMetrics, ServerSettings, ServerState, ServiceStatus, User, UserCreate, UserUpdate,
};

use super::{RemoteGateway, unwrap_envelope};
use crate::error::{ClientError, ClientResult};

const USERS: &str = "/users";
const SETTINGS: &str = "/settings";

fn decode<T: DeserializeOwned>(what: &str, body: Value) -> ClientResult<T> {
    match unwrap_envelope(body)? {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Err(ClientError::InvalidResponse(format!("{what}: empty response"))),
    }
}

fn decode_list<T: DeserializeOwned>(body: Value) -> ClientResult<Vec<T>> {
    match body {
        Value::Array(_) => Ok(serde_json::from_value(body)?),
        other => match unwrap_envelope(other)? {
            Some(data) => Ok(serde_json::from_value(data)?),
            None => Ok(Vec::new()),
        },
    }
}

impl RemoteGateway {
    // ========== Users ==========

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        decode_list(self.http().get_json(USERS, &[]).await?)
    }

    pub async fn create_user(&self, data: &UserCreate) -> ClientResult<User> {
        data.check()?;
        let body = self
            .http()
            .send_json(Method::POST, USERS, Some(serde_json::to_value(data)?))
            .await?;
        let user: User = decode("create user", body)?;
        tracing::info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    pub async fn update_user(&self, id: i64, data: &UserUpdate) -> ClientResult<User> {
        data.check()?;
        let body = self
            .http()
            .send_json(Method::PUT, &format!("{USERS}/{id}"), Some(serde_json::to_value(data)?))
            .await?;
        decode("update user", body)
    }

    pub async fn delete_user(&self, id: i64) -> ClientResult<()> {
        let body = self
            .http()
            .send_json(Method::DELETE, &format!("{USERS}/{id}"), None)
            .await?;
        unwrap_envelope(body)?;
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }

    // ========== Settings ==========

    pub async fn get_settings(&self) -> ClientResult<ServerSettings> {
        decode("settings", self.http().get_json(SETTINGS, &[]).await?)
    }

    /// Save settings; unknown keys read earlier are sent back untouched
    pub async fn save_settings(&self, settings: &ServerSettings) -> ClientResult<ServerSettings> {
        if settings.host.trim().is_empty() {
            return Err(ClientError::validation("host must not be empty"));
        }
        if settings.port == 0 {
            return Err(ClientError::validation("port must be positive"));
        }
        let sent = serde_json::to_value(settings)?;
        let body = self.http().send_json(Method::PUT, SETTINGS, Some(sent)).await?;
        // Some backends only acknowledge the save
        match unwrap_envelope(body)? {
            Some(data) if data.is_object() => Ok(serde_json::from_value(data)?),
            _ => Ok(settings.clone()),
        }
    }

    pub async fn start_server(&self) -> ClientResult<ServerState> {
        self.server_command("start", true).await
    }

    pub async fn stop_server(&self) -> ClientResult<ServerState> {
        self.server_command("stop", false).await
    }

    async fn server_command(&self, command: &str, running: bool) -> ClientResult<ServerState> {
        let body = self
            .http()
            .send_json(Method::POST, &format!("{SETTINGS}/server/{command}"), None)
            .await?;
        let message = body.get("message").and_then(Value::as_str).map(str::to_string);
        let state = match unwrap_envelope(body)? {
            Some(data) if data.get("running").is_some() => serde_json::from_value(data)?,
            _ => ServerState { running, message },
        };
        tracing::info!(command, running = state.running, "server command applied");
        Ok(state)
    }

    // ========== Dashboard ==========

    pub async fn dashboard_metrics(&self) -> ClientResult<DashboardMetrics> {
        decode("dashboard metrics", self.http().get_json("/api/iamc/dashboard/metrics", &[]).await?)
    }

    pub async fn status(&self) -> ClientResult<ServiceStatus> {
        decode("status", self.http().get_json("/api/iamc/status", &[]).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ClientConfig;
    use crate::gateway::RemoteGateway;
    use serde_json::json;
    use shared::models::{UserCreate, UserUpdate};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway(server: &MockServer) -> RemoteGateway {
        ClientConfig::new(server.uri()).build_gateway().unwrap()
    }

    #[tokio::test]
    async fn test_user_crud() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "username": "admin", "role": "admin"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true, "data": {"id": 2, "username": "rh", "role": "operator"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/users/2"))
            .and(body_json(json!({"active": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2, "username": "rh", "role": "operator", "active": false
            })))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        let users = gw.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].active);

        let created = gw
            .create_user(&UserCreate {
                username: "rh".into(),
                password: "segredo".into(),
                email: None,
                role: "operator".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 2);

        let updated = gw
            .update_user(2, &UserUpdate { active: Some(false), ..Default::default() })
            .await
            .unwrap();
        assert!(!updated.active);
    }

    #[tokio::test]
    async fn test_invalid_user_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(201)).expect(0).mount(&server).await;

        let err = gateway(&server)
            .await
            .create_user(&UserCreate {
                username: "rh".into(),
                password: "x".into(),
                email: Some("not-an-email".into()),
                role: "operator".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_settings_and_server_commands() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "data": {"host": "0.0.0.0", "port": 5000, "smtp": {"on": false}}
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/settings"))
            .and(body_json(json!({"host": "0.0.0.0", "port": 8080, "auto_start": false, "smtp": {"on": false}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Guardado"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/settings/server/start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Servidor iniciado"})))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        let mut settings = gw.get_settings().await.unwrap();
        settings.port = 8080;
        let saved = gw.save_settings(&settings).await.unwrap();
        assert_eq!(saved.port, 8080);

        let state = gw.start_server().await.unwrap();
        assert!(state.running);
        assert_eq!(state.message.as_deref(), Some("Servidor iniciado"));

        settings.port = 0;
        assert!(gw.save_settings(&settings).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_dashboard_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/iamc/dashboard/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "data": {"total_funcionarios": 25, "funcionarios_com_qr": 9}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/iamc/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "online", "version": "1.4"})))
            .mount(&server)
            .await;

        let gw = gateway(&server).await;
        let metrics = gw.dashboard_metrics().await.unwrap();
        assert_eq!(metrics.total_funcionarios, 25);
        assert_eq!(metrics.licencas_pendentes, 0);
        assert!(gw.status().await.unwrap().is_online());
    }
}
