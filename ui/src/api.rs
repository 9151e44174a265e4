//! API client for the RetailCloud backend

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::session::Session;

const API_BASE: &str = "/api";

/// Category field schema of the session's tenant
pub const CATEGORY_FIELDS_PATH: &str = "/industry/category-fields/";

pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Failure of an API call, by category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Not authorized (HTTP {0})")]
    Unauthorized(u16),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, url: &str, body: &str) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized(status),
            404 => ApiError::NotFound(url.to_string()),
            _ => ApiError::Server {
                status,
                message: if body.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.trim().to_string()
                },
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Fetch the tenant's category field schema; `None` when it has none
    pub async fn get_category_fields(
        &self,
        session: &Session,
    ) -> Result<Option<crate::components::category_fields::SchemaResponse>, ApiError> {
        self.get_json(CATEGORY_FIELDS_PATH, session).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, session: &Session) -> Result<T, ApiError> {
        let url = self.url(path);
        let response = Request::get(&url)
            .header("Authorization", &format!("Bearer {}", session.access_token))
            .header(TENANT_HEADER, &session.tenant_id)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ApiError::from_status(status, &url, &body));
        }

        decode_body(&body)
    }
}

/// Decode a JSON body; an empty body reads as `null`
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
