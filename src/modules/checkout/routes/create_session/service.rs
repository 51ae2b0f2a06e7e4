use super::types::{request, response};
use crate::{modules::checkout::service as checkout_service, types::Context};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if let Err(errors) = payload.body.validate() {
        return Err(response::Error::FailedToValidate(errors));
    }

    checkout_service::create_session(ctx, payload.body.items)
        .await
        .map(|url| response::Success::SessionCreated { url })
        .map_err(|_| response::Error::FailedToCreateSession)
}
