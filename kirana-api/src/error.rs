use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kirana_core::CoreError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Core(CoreError),
    BadRequest(String),
    NotFound(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Core(err) => {
                let status = match &err {
                    CoreError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    CoreError::DeliveryRestricted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    CoreError::Busy(_) => StatusCode::CONFLICT,
                    CoreError::Unauthorized => StatusCode::UNAUTHORIZED,
                    CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                    CoreError::Transport(_) => StatusCode::BAD_GATEWAY,
                };
                (status, err.code(), err.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
