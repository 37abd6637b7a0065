//! HTTP transport for the POS REST API

use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::ApiErrorBody;
use std::time::Duration;

/// Header carrying the client-generated idempotency key
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T>;
    /// POST with an `Idempotency-Key` header
    async fn post_idempotent<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        idempotency_key: &str,
        body: &B,
    ) -> ClientResult<T>;
    fn token(&self) -> Option<&str>;
}

/// Network HTTP client (reqwest)
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(req).send().await?;
        handle_response(response).await
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let url = response.url().path().to_string();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::debug!(%status, path = %url, "API request failed");
        return Err(error_from_body(status, &text));
    }

    // 204 / empty bodies deserialize as JSON null
    let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(payload)
        .map_err(|e| ClientError::InvalidResponse(format!("{} ({})", e, url)))
}

/// Build a `ClientError` from a non-success status and raw body
pub(crate) fn error_from_body(status: StatusCode, text: &str) -> ClientError {
    let body: ApiErrorBody = serde_json::from_str(text).unwrap_or_default();
    let message = body.message().unwrap_or_else(|| {
        if text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            text.trim().to_string()
        }
    });

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Api {
            status,
            code: body.code(),
            message,
        },
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(self.client.get(self.url(path))).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        self.execute(self.client.get(self.url(path)).query(query)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.execute(self.client.post(self.url(path)).json(body)).await
    }

    async fn post_idempotent<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        idempotency_key: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self
            .client
            .post(self.url(path))
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(body);
        self.execute(req).await
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
