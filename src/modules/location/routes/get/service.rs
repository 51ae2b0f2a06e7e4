use super::types::{request, response};
use crate::{modules::location::service as location_service, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    location_service::get_location_with_opening_hours(ctx, payload.id)
        .await
        .map_err(|_| response::Error::FailedToFetchLocation)?
        .ok_or(response::Error::LocationNotFound)
        .map(response::Success::Location)
}
