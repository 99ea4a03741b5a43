// SPDX-License-Identifier: PMPL-1.0-or-later
// HTTP client for the backend under test
//
// Thin wrapper over reqwest that records status, Retry-After and raw body
// for each exchange so checks can judge status codes themselves.

use crate::error::{CheckError, Result};
use crate::models::ItemId;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Characters of a response body kept in error messages.
const BODY_EXCERPT_CHARS: usize = 200;

/// One completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is(&self, status: u16) -> bool {
        self.status == status
    }

    /// Fail with [`CheckError::UnexpectedStatus`] unless the status matches.
    pub fn expect(&self, status: u16) -> Result<&Self> {
        if self.is(status) {
            Ok(self)
        } else {
            Err(CheckError::UnexpectedStatus {
                url: self.url.clone(),
                status: self.status,
                body: self.excerpt(),
            })
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| CheckError::InvalidBody {
            url: self.url.clone(),
            source,
        })
    }

    /// The `error` message of a JSON error body, if any.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_str::<crate::models::ErrorResponse>(&self.body)
            .ok()
            .and_then(|e| e.error)
    }

    /// Case-insensitive substring search in the body.
    pub fn body_contains(&self, marker: &str) -> bool {
        self.body.to_lowercase().contains(&marker.to_lowercase())
    }

    /// Leading part of the body, for diagnostics.
    pub fn excerpt(&self) -> String {
        self.body.chars().take(BODY_EXCERPT_CHARS).collect()
    }
}

/// Backend API client
pub struct BackendClient {
    base_url: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl BackendClient {
    /// Create new backend client
    pub fn new(base_url: &str, timeout: Duration) -> std::result::Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            client: reqwest::Client::new(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build the URL for a path below the base URL, keeping any base prefix.
    pub fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        if !segments.is_empty() {
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty().extend(segments);
            }
        }
        url.to_string()
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<ApiResponse> {
        self.get(&["health"], self.timeout).await
    }

    /// `GET /`
    pub async fn info(&self) -> Result<ApiResponse> {
        self.get(&[], self.timeout).await
    }

    /// `POST /api/auth/request-code`
    pub async fn request_code(&self, email: &str) -> Result<ApiResponse> {
        self.post_json(
            &["api", "auth", "request-code"],
            serde_json::json!({ "email": email }),
        )
        .await
    }

    /// `POST /api/auth/verify-code`
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<ApiResponse> {
        self.post_json(
            &["api", "auth", "verify-code"],
            serde_json::json!({ "email": email, "code": code }),
        )
        .await
    }

    /// `GET /api/items`
    pub async fn list_items(&self) -> Result<ApiResponse> {
        self.get(&["api", "items"], self.timeout).await
    }

    /// `GET /api/items` with a caller-chosen timeout
    pub async fn list_items_within(&self, timeout: Duration) -> Result<ApiResponse> {
        self.get(&["api", "items"], timeout).await
    }

    /// `POST /api/likes/{id}`
    pub async fn like(&self, id: &ItemId) -> Result<ApiResponse> {
        let id = id.to_string();
        let url = self.endpoint(&["api", "likes", &id]);
        let request = self.client.post(&url).timeout(self.timeout);
        self.send("POST", url, request).await
    }

    async fn get(&self, segments: &[&str], timeout: Duration) -> Result<ApiResponse> {
        let url = self.endpoint(segments);
        let request = self.client.get(&url).timeout(timeout);
        self.send("GET", url, request).await
    }

    async fn post_json(&self, segments: &[&str], body: serde_json::Value) -> Result<ApiResponse> {
        let url = self.endpoint(segments);
        let request = self.client.post(&url).json(&body).timeout(self.timeout);
        self.send("POST", url, request).await
    }

    async fn send(
        &self,
        method: &'static str,
        url: String,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| CheckError::from_transport(&url, e))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| CheckError::from_transport(&url, e))?;

        debug!(method, url = %url, status, "Backend exchange");

        Ok(ApiResponse {
            url,
            status,
            retry_after,
            body,
        })
    }
}
