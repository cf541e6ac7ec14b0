//! HTTP transport for the IAMC backend
//!
//! Bodies cross this layer as `serde_json::Value`: every entity has to go
//! through casing normalization before it can be typed, so decoding happens
//! in the gateway, not here.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, RemoteError};

/// Error body shapes the backend uses on failure
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET with URL query parameters
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> ClientResult<Value>;

    /// Request with an optional JSON body
    async fn send_json(&self, method: Method, path: &str, body: Option<Value>)
    -> ClientResult<Value>;

    /// Binary download (images, archives)
    async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>>;

    /// Binary download that needs a JSON request body
    async fn post_for_bytes(&self, path: &str, body: Value) -> ClientResult<Vec<u8>>;

    /// Multipart upload of a single file field
    async fn post_file(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<Value>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        req
    }

    async fn error_from(status: StatusCode, response: reqwest::Response) -> ClientError {
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return e.into(),
        };
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });
        tracing::debug!(status = %status, message = %message, "backend returned error");
        RemoteError::new(status, message).into()
    }

    async fn handle_json(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status, response).await);
        }
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn handle_bytes(response: reqwest::Response) -> ClientResult<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(status, response).await);
        }
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));
        let bytes = response.bytes().await?.to_vec();
        if is_json {
            // Binary endpoints answer failures with a JSON envelope and a 2xx status
            let body: ErrorBody = serde_json::from_slice(&bytes)?;
            let message = body
                .error
                .or(body.message)
                .unwrap_or_else(|| "expected binary content".to_string());
            return Err(RemoteError::new(status, message).into());
        }
        Ok(bytes)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> ClientResult<Value> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::handle_json(response).await
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let mut req = self.request(method, path);
        if let Some(body) = &body {
            req = req.json(body);
        }
        let response = req.send().await?;
        Self::handle_json(response).await
    }

    async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        let response = self.request(Method::GET, path).send().await?;
        Self::handle_bytes(response).await
    }

    async fn post_for_bytes(&self, path: &str, body: Value) -> ClientResult<Vec<u8>> {
        let response = self.request(Method::POST, path).json(&body).send().await?;
        Self::handle_bytes(response).await
    }

    async fn post_file(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<Value> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);
        let response = self.request(Method::POST, path).multipart(form).send().await?;
        Self::handle_json(response).await
    }
}
