use crate::services::error::ServiceError;
use axum::{
    Json,
    extract::multipart::MultipartRejection,
    extract::rejection::{FormRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and stable error code for this failure
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Service(e) => {
                let status = match e {
                    ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                    ServiceError::InvalidContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    ServiceError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
                    ServiceError::UploadFailed(_) => StatusCode::BAD_GATEWAY,
                    ServiceError::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    ServiceError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, e.code())
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl AppError {
    /// Turns an extractor rejection into the JSON error contract
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else if status.is_server_error() {
            AppError::Internal(message)
        } else {
            AppError::BadRequest(message)
        }
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::from_rejection(rejection.status(), rejection.body_text())
                }
            }
        )*
    };
}

impl_from_rejection!(PathRejection, QueryRejection, FormRejection, MultipartRejection);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::Service(e @ ServiceError::UploadFailed(_))
            | AppError::Service(e @ ServiceError::PersistenceFailed(_))
            | AppError::Service(e @ ServiceError::StorageUnavailable(_)) => {
                tracing::error!("Backend error: {}", e);
                match e {
                    ServiceError::UploadFailed(_) => "File upload to object storage failed",
                    ServiceError::PersistenceFailed(_) => "File uploaded but could not be recorded",
                    _ => "Storage backend unavailable",
                }
                .to_string()
            }
            AppError::Service(e) => e.to_string(),
            AppError::BadRequest(msg) => msg,
            AppError::PayloadTooLarge(msg) => msg,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal Server Error".to_string()
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_distinct_statuses() {
        let cases = [
            (ServiceError::NotFound("Order 1".into()), StatusCode::NOT_FOUND),
            (
                ServiceError::InvalidContentType("x".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (ServiceError::FileTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (ServiceError::UploadFailed("x".into()), StatusCode::BAD_GATEWAY),
            (
                ServiceError::PersistenceFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::StorageUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            let code = err.code();
            let (status, mapped_code) = AppError::from(err).status_and_code();
            assert_eq!(status, expected);
            assert_eq!(mapped_code, code);
        }
    }

    #[test]
    fn test_rejections_keep_their_class() {
        let (status, code) =
            AppError::from_rejection(StatusCode::UNSUPPORTED_MEDIA_TYPE, "form".into())
                .status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "BAD_REQUEST");

        let (status, code) =
            AppError::from_rejection(StatusCode::PAYLOAD_TOO_LARGE, "body".into())
                .status_and_code();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(code, "FILE_TOO_LARGE");

        let (status, code) =
            AppError::from_rejection(StatusCode::INTERNAL_SERVER_ERROR, "params".into())
                .status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn test_body_limit_reports_file_too_large() {
        let (status, code) = AppError::PayloadTooLarge("too big".into()).status_and_code();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(code, "FILE_TOO_LARGE");
    }
}
