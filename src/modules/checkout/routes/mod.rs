mod create_session;
mod get_session;
mod save_order;

use crate::types::Context;
use axum::routing::Router;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .merge(create_session::get_router())
        .merge(get_session::get_router())
        .merge(save_order::get_router())
}
