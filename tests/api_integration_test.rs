use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use retailcloud::domain::{CategoryDefinition, CategoryRegistry};
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn definitions() -> Vec<CategoryDefinition> {
    serde_json::from_value(json!([
        {
            "category": "pharmacy",
            "category_name": "Pharmacy",
            "tenants": ["acme"],
            "fields": [
                { "key": "strength", "label": "Strength", "type": "text", "section": "dosage" },
                { "key": "controlled", "label": "Controlled", "type": "boolean" }
            ]
        },
        {
            "category": "apparel",
            "category_name": "Apparel",
            "tenants": ["globex"],
            "fields": [
                { "key": "size", "label": "Size", "type": "text" }
            ]
        }
    ]))
    .unwrap()
}

fn app(default_tenant: Option<&str>) -> Router {
    let registry =
        CategoryRegistry::build(&definitions(), default_tenant.map(String::from)).unwrap();
    retailcloud::create_app(registry.shared())
}

async fn get(app: Router, uri: &str, tenant: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri).method("GET");
    if let Some(tenant) = tenant {
        request = request.header("X-Tenant-ID", tenant);
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_category_fields_for_tenant() {
    let (status, body) = get(app(None), "/api/industry/category-fields/", Some("acme")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "pharmacy");
    assert_eq!(body["category_name"], "Pharmacy");
    assert_eq!(body["fields"].as_array().unwrap().len(), 2);
    assert_eq!(body["sections"]["dosage"][0]["key"], "strength");
    assert_eq!(body["sections"]["general"][0]["type"], "boolean");
    assert_eq!(body["sections"]["general"][0]["section"], "general");
}

#[tokio::test]
async fn test_category_fields_null_for_unknown_tenant() {
    let (status, body) = get(app(None), "/api/industry/category-fields/", Some("umbrella")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (_, body) = get(app(None), "/api/industry/category-fields/", None).await;
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_category_fields_default_tenant() {
    let (status, body) = get(app(Some("globex")), "/api/industry/category-fields/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "apparel");
}

#[tokio::test]
async fn test_health_routes() {
    let (status, body) = get(app(None), "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["categories"], 2);
    assert_eq!(body["checks"]["tenants"], 2);

    let (status, _) = get(app(None), "/health/live", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(app(None), "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let empty = retailcloud::create_app(CategoryRegistry::default().shared());
    let (status, _) = get(empty, "/health/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
