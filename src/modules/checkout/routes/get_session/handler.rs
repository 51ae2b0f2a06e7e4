use super::{service::service, types::request};
use crate::types::Context;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(
    Path(session_id): Path<String>,
    State(ctx): State<Arc<Context>>,
) -> impl IntoResponse {
    service(ctx, request::Payload { session_id }).await
}
