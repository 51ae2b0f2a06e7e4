use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use super::{checkout, location};
use crate::types::Context;
use std::sync::Arc;

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/health", get(health_check))
        .nest("/locations", location::routes::get_router())
        .nest("/checkout", checkout::routes::get_router())
}
