//! `reqwest` implementation of the transport contract

use crate::config::{ClientConfig, ConfigError};
use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder, Response};
use roster_core::rest::{FileUpload, RestClient, RestError, RestResult};
use serde_json::Value;
use tracing::{Instrument, Span};

/// REST backend client
#[derive(Debug, Clone)]
pub struct HttpRestClient {
    client: Client,
    base_url: String,
}

impl HttpRestClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails validation
    /// or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from `ROSTER_API_URL` / `ROSTER_API_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Backend root all paths are joined onto
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn span(method: &'static str, path: &str) -> Span {
        tracing::debug_span!("rest_request", method, path)
    }

    fn url(&self, path: &str) -> RestResult<String> {
        if path.starts_with('/') {
            Ok(format!("{}{path}", self.base_url))
        } else {
            Err(RestError::InvalidPath(path.to_string()))
        }
    }

    async fn execute(request: RequestBuilder) -> RestResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| RestError::Request(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode(response: Response) -> RestResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "Backend returned error status");
            return Err(RestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RestError::Request(e.to_string()))?;

        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| RestError::Decode(e.to_string()))
    }
}

impl RestClient for HttpRestClient {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, RestResult<Value>> {
        Box::pin(async move {
            let url = self.url(path)?;
            Self::execute(self.client.get(url)).await
        }
        .instrument(Self::span("GET", path)))
    }

    fn post<'a>(&'a self, path: &'a str, body: Value) -> BoxFuture<'a, RestResult<Value>> {
        Box::pin(async move {
            let url = self.url(path)?;
            Self::execute(self.client.post(url).json(&body)).await
        }
        .instrument(Self::span("POST", path)))
    }

    fn put<'a>(&'a self, path: &'a str, body: Value) -> BoxFuture<'a, RestResult<Value>> {
        Box::pin(async move {
            let url = self.url(path)?;
            Self::execute(self.client.put(url).json(&body)).await
        }
        .instrument(Self::span("PUT", path)))
    }

    fn delete<'a>(&'a self, path: &'a str) -> BoxFuture<'a, RestResult<bool>> {
        Box::pin(async move {
            let url = self.url(path)?;
            match Self::execute(self.client.delete(url)).await? {
                Value::Bool(deleted) => Ok(deleted),
                other => Err(RestError::Decode(format!(
                    "expected a boolean deletion result, got {other}"
                ))),
            }
        }
        .instrument(Self::span("DELETE", path)))
    }

    fn upload_file<'a>(
        &'a self,
        path: &'a str,
        file: FileUpload,
    ) -> BoxFuture<'a, RestResult<Value>> {
        Box::pin(async move {
            tracing::debug!(path, file_name = %file.file_name, size = file.bytes.len(), "Uploading file");
            let url = self.url(path)?;

            let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = file.content_type {
                part = part
                    .mime_str(&content_type)
                    .map_err(|e| RestError::Request(e.to_string()))?;
            }
            let form = reqwest::multipart::Form::new().part("file", part);

            Self::execute(self.client.post(url).multipart(form)).await
        }
        .instrument(Self::span("UPLOAD", path)))
    }
}
