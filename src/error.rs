use thiserror::Error;

use crate::models::review::FieldError;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("invalid review: {}", describe(.0))]
    Validation(Vec<FieldError>),

    #[error("malformed multipart payload: {0}")]
    Payload(String),

    #[error("review {0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("upload storage error: {0}")]
    Upload(#[from] std::io::Error),
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ReviewError {
    /// Client faults: the request itself cannot be turned into a review.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReviewError::Validation(_) | ReviewError::Payload(_))
    }
}
