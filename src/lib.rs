//! RetailCloud admin host
//!
//! Serves the admin UI bundle and the tenant category field schemas it
//! renders on the product form. Category definitions live in
//! `config/categories/` and are reloaded when they change.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use crate::adapters::ui_handler::UIHandler;
use crate::domain::SharedRegistry;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub fn create_app(registry: SharedRegistry) -> Router {
    let health_handler = Arc::new(HealthHandler::new(registry.clone()));

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let api_router = Router::new()
        .route(
            "/industry/category-fields/",
            get(api_handler::get_category_fields),
        )
        .with_state(ApiState { registry });

    Router::new()
        .merge(health_router)
        .nest("/api", api_router)
        .fallback(UIHandler::serve)
        .layer(CorsLayer::permissive())
}
