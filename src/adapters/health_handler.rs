use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::domain::SharedRegistry;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub categories: usize,
    pub tenants: usize,
}

pub struct HealthHandler {
    registry: SharedRegistry,
    start_time: Instant,
}

impl HealthHandler {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            start_time: Instant::now(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let registry = self.registry.read().await;
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            checks: HealthChecks {
                categories: registry.category_count(),
                tenants: registry.tenant_count(),
            },
        };

        (StatusCode::OK, Json(status))
    }

    /// Ready once at least one category definition is loaded
    pub async fn ready(&self) -> impl IntoResponse {
        if self.registry.read().await.is_empty() {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not_ready",
                    "message": "No category definitions loaded"
                })),
            )
        } else {
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "ready",
                    "message": "Server is ready to accept requests"
                })),
            )
        }
    }

    pub async fn live(&self) -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "alive",
                "message": "Server is alive"
            })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::tests::{definition, field};
    use crate::domain::CategoryRegistry;

    #[tokio::test]
    async fn test_health_endpoint() {
        let handler = HealthHandler::new(CategoryRegistry::default().shared());

        let response = handler.health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_without_definitions() {
        let handler = HealthHandler::new(CategoryRegistry::default().shared());

        let response = handler.ready().await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ready_with_definitions() {
        let registry = CategoryRegistry::build(
            &[definition("pharmacy", &["acme"], vec![field("strength", "text", "general")])],
            None,
        )
        .unwrap();
        let handler = HealthHandler::new(registry.shared());

        let response = handler.ready().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_live_endpoint() {
        let handler = HealthHandler::new(CategoryRegistry::default().shared());

        let response = handler.live().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
