use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use coursefeedback_lib::FeedbackError;
use tracing::error;

/// A failed request: which operation failed, and why.
///
/// Validation failures map to 400 and everything else to 500. The body is
/// always `{ "error": <label>, "message": <detail> }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    label: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, label: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            label,
            message: message.into(),
        }
    }

    pub fn from_feedback(label: &'static str, err: FeedbackError) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            error!(%err, "{}", label);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, label, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({
                "error": self.label,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

pub fn feedback_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Feedback not found"})),
    )
        .into_response()
}

pub async fn route_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Route not found"})),
    )
        .into_response()
}

/// Body for handler panics caught by `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%message, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "Something went wrong!",
            "message": message,
        })),
    )
        .into_response()
}
