use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::ports::{RepositoryError, RepositoryResult};

pub struct TodoClient {
    client: Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &Url, timeout: Duration) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("todo-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RepositoryError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<T> {
        let request = self.client.get(self.endpoint(path));
        let (status, body) = self.send(request).await?;
        require_body(decode_body(status, &body)?, path)
    }

    pub async fn post<T: DeserializeOwned, R: Serialize>(
        &self,
        path: &str,
        body: &R,
    ) -> RepositoryResult<T> {
        let request = self.client.post(self.endpoint(path)).json(body);
        let (status, text) = self.send(request).await?;
        require_body(decode_body(status, &text)?, path)
    }

    pub async fn put<T: DeserializeOwned, R: Serialize>(
        &self,
        path: &str,
        body: &R,
    ) -> RepositoryResult<Option<T>> {
        let request = self.client.put(self.endpoint(path)).json(body);
        let (status, text) = self.send(request).await?;
        decode_body(status, &text)
    }

    pub async fn delete(&self, path: &str) -> RepositoryResult<()> {
        let request = self.client.delete(self.endpoint(path));
        let (status, text) = self.send(request).await?;
        check_status(status, &text)
    }

    async fn send(&self, request: RequestBuilder) -> RepositoryResult<(StatusCode, String)> {
        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::Network(e.to_string()))?;

        tracing::debug!("API Response ({}): {}", status, body);
        Ok((status, body))
    }
}

fn check_status(status: StatusCode, body: &str) -> RepositoryResult<()> {
    if status.is_success() {
        return Ok(());
    }

    match status {
        StatusCode::NOT_FOUND => Err(RepositoryError::NotFound("Resource not found".to_string())),
        _ => {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body.trim().to_string()
            };
            Err(RepositoryError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Success with an empty body decodes to `None`.
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> RepositoryResult<Option<T>> {
    check_status(status, body)?;

    if body.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(body).map(Some).map_err(|e| {
        RepositoryError::Serialization(format!(
            "Failed to parse response: {e}. Response was: {body}"
        ))
    })
}

fn require_body<T>(value: Option<T>, path: &str) -> RepositoryResult<T> {
    value.ok_or_else(|| RepositoryError::Serialization(format!("Empty response body from {path}")))
}
