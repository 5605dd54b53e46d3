use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{:#?}", self);

        let (status_code, error_message) = match self {
            ApiError::UnexpectedError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "unexpected error".to_string(),
            ),
            ApiError::BadRequest(err) => (StatusCode::BAD_REQUEST, err),
            ApiError::PayloadTooLarge(err) => (StatusCode::PAYLOAD_TOO_LARGE, err),
        };

        return (status_code, Json(json!({ "error": error_message }))).into_response();
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        return ApiError::UnexpectedError(anyhow::anyhow!(err));
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        return ApiError::BadRequest(err.to_string());
    }
}

/// Upload-level failures. Their messages are shown to the user as is.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ImportError {
    #[error("Формат не поддерживается.")]
    UnsupportedFormat(String),

    #[error("Не удалось обработать файл.")]
    EmptyOrUnparseable,
}

/// A single amount cell that could not be read as a number.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("invalid amount: {0:?}")]
pub struct AmountFormatError(pub String);
