use axum::{extract::State, http::HeaderMap, Json};

use crate::domain::{CategorySchema, SharedRegistry};

pub const TENANT_HEADER: &str = "x-tenant-id";

#[derive(Clone)]
pub struct ApiState {
    pub registry: SharedRegistry,
}

/// `GET /api/industry/category-fields/`
///
/// Responds with `null` when the tenant has no category fields.
pub async fn get_category_fields(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Json<Option<CategorySchema>> {
    let tenant = headers
        .get(TENANT_HEADER)
        .and_then(|value| value.to_str().ok());

    let registry = state.registry.read().await;
    let schema = registry.resolve(tenant).cloned();

    match &schema {
        Some(schema) => tracing::debug!(
            "Serving category '{}' for tenant {:?}",
            schema.category,
            tenant
        ),
        None => tracing::debug!("No category fields for tenant {:?}", tenant),
    }

    Json(schema)
}
