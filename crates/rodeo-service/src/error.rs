use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    ConversionError(#[from] rodeo_schedule::ConversionError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A series stopped partway. Rows created before the failure remain.
    #[error("Failed to add event {} of {total}: {source}", .created + 1)]
    PartialSubmission {
        created: usize,
        total: usize,
        source: rodeo_db::error::DbError,
    },
}

impl ServiceError {
    /// Message safe to show to the person submitting the form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationError(message) => message.clone(),
            Self::ConversionError(err) => format!("Could not schedule occurrence: {err}"),
            Self::PartialSubmission { created, total, .. } => {
                format!("Failed to add event {} of {total}", created + 1)
            }
        }
    }

    /// Whether the error is the submitter's to fix.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::ConversionError(_))
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
