use super::types::{request, response};
use crate::{modules::checkout::service as checkout_service, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    match checkout_service::find_session(ctx, payload.session_id).await {
        Ok(Some(summary)) => Ok(response::Success::Session(summary)),
        Ok(None) => Err(response::Error::SessionNotFound),
        Err(_) => Err(response::Error::FailedToFetchSession),
    }
}
