use super::{service::service, types::request};
use crate::{modules::cart::types::CartItem, types::Context};
use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

pub async fn handler(
    Path(id): Path<i32>,
    State(ctx): State<Arc<Context>>,
    body: Bytes,
) -> Response {
    // an absent or null body is an empty cart, anything else must be valid
    let items = if body.iter().all(u8::is_ascii_whitespace) {
        vec![]
    } else {
        match Json::<Option<Vec<CartItem>>>::from_bytes(&body) {
            Ok(Json(items)) => items.unwrap_or_default(),
            Err(rejection) => return rejection.into_response(),
        }
    };

    service(
        ctx,
        request::Payload {
            id,
            cart: request::Cart { items },
            now: chrono::Local::now().naive_local(),
        },
    )
    .await
    .into_response()
}
