pub mod request {
    pub struct Payload {
        pub id: i32,
    }
}

pub mod response {
    use crate::modules::location::repository::LocationWithOpeningHours;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Location(LocationWithOpeningHours),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Location(location) => (StatusCode::OK, Json(json!(location))).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToFetchLocation,
        LocationNotFound,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToFetchLocation => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch location" })),
                )
                    .into_response(),
                Self::LocationNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Location not found" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
