pub mod request {
    use crate::modules::cart::types::CartItem;
    use chrono::NaiveDateTime;
    use validator::Validate;

    #[derive(Validate)]
    pub struct Cart {
        #[validate(nested)]
        pub items: Vec<CartItem>,
    }

    pub struct Payload {
        pub id: i32,
        pub cart: Cart,
        pub now: NaiveDateTime,
    }
}

pub mod response {
    use crate::{modules::location::service::PickupTime, utils::validation};
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        PickupTimes(Vec<PickupTime>),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::PickupTimes(times) => (StatusCode::OK, Json(json!(times))).into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        FailedToFetchPickupTimes,
        LocationNotFound,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::FailedToFetchPickupTimes => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch pickup times" })),
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
