//! HTTP client for the remote check services.
//!
//! # Responsibilities
//! - Build GET requests with query parameters and POST requests with JSON bodies
//! - Attach the service token to every request
//! - Separate transport failures from non-2xx statuses
//!
//! Exactly one request is sent per call. There is no retry and no deadline
//! handling here; stewards race calls against the batch deadline.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use std::time::Duration;

use crate::config::{AuthConfig, HttpConfig};
use crate::remote::types::{ClientError, ClientResult, RemoteResponse};

/// Shared client for all remote checks of a run.
#[derive(Clone)]
pub struct RemoteCheckClient {
    http: reqwest::Client,
}

impl RemoteCheckClient {
    /// Build the process-wide client.
    pub fn new(http: &HttpConfig, auth: &AuthConfig) -> ClientResult<Self> {
        let header = HeaderName::from_bytes(auth.header.trim().as_bytes())
            .map_err(|e| ClientError::InvalidRequest(format!("auth header name: {}", e)))?;
        let mut token = HeaderValue::from_str(auth.token.trim())
            .map_err(|e| ClientError::InvalidRequest(format!("auth token: {}", e)))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header, token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(http.user_agent.clone())
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .build()?;

        Ok(Self { http })
    }

    /// Issue a GET with the given query parameters.
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> ClientResult<RemoteResponse> {
        let request = self.http.get(url).query(query);
        Self::send(request).await
    }

    /// Issue a POST carrying `body` as JSON.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> ClientResult<RemoteResponse> {
        let request = self.http.post(url).json(body);
        Self::send(request).await
    }

    async fn send(request: reqwest::RequestBuilder) -> ClientResult<RemoteResponse> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %body, "Remote call returned non-success status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(RemoteResponse {
            status: status.as_u16(),
            body,
        })
    }
}
