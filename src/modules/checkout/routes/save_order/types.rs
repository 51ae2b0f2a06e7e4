pub mod request {
    use crate::modules::cart::types::{validate_price, CartItem};
    use bigdecimal::BigDecimal;
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{Deserialize, Deserializer};
    use validator::Validate;

    /// Accepts a local `2026-10-16T18:30:00` as well as an RFC 3339 instant,
    /// which is converted to the server's local time.
    fn deserialize_pickup_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        if let Ok(instant) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(instant.with_timezone(&Local).naive_local());
        }

        raw.parse::<NaiveDateTime>()
            .map_err(|err| serde::de::Error::custom(format!("invalid pickup time: {}", err)))
    }

    #[derive(Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    pub struct Body {
        #[validate(length(min = 1, message = "Customer name is required"))]
        pub customer_name: String,
        #[validate(length(min = 1, message = "Customer phone is required"))]
        pub customer_phone: String,
        #[validate(email(message = "Customer email is invalid"))]
        pub customer_email: String,
        pub location_id: i32,
        #[serde(deserialize_with = "deserialize_pickup_time")]
        pub pickup_time: NaiveDateTime,
        #[validate(length(min = 1, message = "Session id is required"))]
        pub session_id: String,
        #[validate(custom(function = "validate_price"))]
        pub total_amount: BigDecimal,
        #[validate(length(min = 1, message = "At least one cart item is required"), nested)]
        pub cart_items: Vec<CartItem>,
    }

    pub struct Payload {
        pub body: Body,
        pub now: NaiveDateTime,
    }
}

pub mod response {
    use crate::utils::validation;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;
    use validator::ValidationErrors;

    pub enum Success {
        OrderSaved { order_id: String },
        OrderAlreadySaved { order_id: String },
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::OrderSaved { order_id } => (
                    StatusCode::OK,
                    Json(json!({ "orderId": order_id, "message": "Order saved successfully" })),
                )
                    .into_response(),
                Self::OrderAlreadySaved { order_id } => (
                    StatusCode::OK,
                    Json(json!({ "orderId": order_id, "message": "Order already saved" })),
                )
                    .into_response(),
            }
        }
    }

    pub enum Error {
        FailedToValidate(ValidationErrors),
        FailedToSaveOrder,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::FailedToValidate(errors) => validation::into_response(errors).into_response(),
                Self::FailedToSaveOrder => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Failed to save order" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
