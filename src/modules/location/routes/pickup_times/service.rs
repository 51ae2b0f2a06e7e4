use super::types::{request, response};
use crate::{modules::location::service as location_service, types::Context};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    if let Err(errors) = payload.cart.validate() {
        return Err(response::Error::FailedToValidate(errors));
    }

    location_service::get_available_pickup_times(ctx, payload.id, payload.cart.items, payload.now)
        .await
        .map_err(|err| match err {
            location_service::Error::LocationNotFound => response::Error::LocationNotFound,
            location_service::Error::UnexpectedError => response::Error::FailedToFetchPickupTimes,
        })
        .map(response::Success::PickupTimes)
}
