pub mod request {
    pub struct Payload {
        pub session_id: String,
    }
}

pub mod response {
    use crate::modules::checkout::types::SessionSummary;
    use axum::{extract::Json, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    pub enum Success {
        Session(SessionSummary),
    }

    impl IntoResponse for Success {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::Session(summary) => (StatusCode::OK, Json(json!(summary))).into_response(),
            }
        }
    }

    pub enum Error {
        SessionNotFound,
        FailedToFetchSession,
    }

    impl IntoResponse for Error {
        fn into_response(self) -> axum::response::Response {
            match self {
                Self::SessionNotFound => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Session not found" })),
                )
                    .into_response(),
                Self::FailedToFetchSession => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Failed to fetch checkout session" })),
                )
                    .into_response(),
            }
        }
    }

    pub type Response = Result<Success, Error>;
}
