use super::{service::service, types::request};
use crate::types::Context;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn handler(Path(id): Path<i32>, State(ctx): State<Arc<Context>>) -> impl IntoResponse {
    service(ctx, request::Payload { id }).await
}
