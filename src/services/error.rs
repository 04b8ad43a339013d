use thiserror::Error;

/// Failures surfaced by the order and attachment stores.
///
/// Each variant has a stable machine-readable code; the HTTP layer maps
/// them to status codes without inspecting the message.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidContentType(String),

    #[error("{0}")]
    FileTooLarge(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::InvalidContentType(_) => "INVALID_CONTENT_TYPE",
            ServiceError::FileTooLarge(_) => "FILE_TOO_LARGE",
            ServiceError::UploadFailed(_) => "UPLOAD_FAILED",
            ServiceError::PersistenceFailed(_) => "PERSISTENCE_FAILED",
            ServiceError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }

    pub fn order_not_found(id: i32) -> Self {
        ServiceError::NotFound(format!("Order {}", id))
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        tracing::error!("Database error: {:?}", e);
        ServiceError::StorageUnavailable(e.to_string())
    }
}

impl From<crate::utils::validation::PolicyViolation> for ServiceError {
    fn from(v: crate::utils::validation::PolicyViolation) -> Self {
        use crate::utils::validation::PolicyViolation;
        match v {
            PolicyViolation::InvalidContentType { .. } => {
                ServiceError::InvalidContentType(v.to_string())
            }
            PolicyViolation::FileTooLarge { .. } => ServiceError::FileTooLarge(v.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::{FileCategory, PolicyViolation};

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ServiceError::NotFound("x".into()),
            ServiceError::InvalidContentType("x".into()),
            ServiceError::FileTooLarge("x".into()),
            ServiceError::UploadFailed("x".into()),
            ServiceError::PersistenceFailed("x".into()),
            ServiceError::StorageUnavailable("x".into()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_policy_violation_mapping() {
        let err: ServiceError = PolicyViolation::FileTooLarge {
            category: FileCategory::Act,
            size: 11,
            max_size: 10,
        }
        .into();
        assert_eq!(err.code(), "FILE_TOO_LARGE");

        let err: ServiceError = PolicyViolation::InvalidContentType {
            category: FileCategory::Video,
            content_type: "video/webm".into(),
        }
        .into();
        assert_eq!(err.code(), "INVALID_CONTENT_TYPE");
        assert!(err.to_string().contains("video/webm"));
    }

    #[test]
    fn test_order_not_found_message() {
        assert_eq!(ServiceError::order_not_found(9).to_string(), "Order 9 not found");
    }
}
