use super::types::response;
use crate::{modules::location::service as location_service, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>) -> response::Response {
    location_service::get_active_locations(ctx)
        .await
        .map_err(|_| response::Error::FailedToFetchLocations)
        .map(response::Success::Locations)
}
