use axum::response::Html;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "magna-carta-middleware";

/// GET /
/// Human-readable liveness page.
pub async fn index_handler() -> Html<String> {
    Html(format!(
        "<html>\n  <body>\n    <h1>Magna Carta Document Generation Service</h1>\n    \
         <p>Middleware service for Salesforce → NDAQ integration</p>\n    \
         <p>Status: Running</p>\n    <p>Time: {}</p>\n  </body>\n</html>",
        Utc::now().to_rfc3339()
    ))
}

/// GET /health
/// Liveness probe for deployment checks.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": SERVICE_NAME
    }))
}
