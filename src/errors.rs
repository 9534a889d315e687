// Error types surfaced by the service layer

use crate::schema::ValidationError;
use thiserror::Error;

/// How a failure should be reported to a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Internal,
}

#[derive(Debug, Error)]
pub enum ShipError {
    #[error("invalid ship id {0}: ids start at 1")]
    InvalidId(i64),

    #[error("invalid page request: {0}")]
    InvalidPage(String),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("ship {0} not found")]
    NotFound(i64),

    /// Store failures pass through untouched
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ShipError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShipError::InvalidId(_) | ShipError::InvalidPage(_) | ShipError::Validation(_) => {
                ErrorKind::BadRequest
            }
            ShipError::NotFound(_) => ErrorKind::NotFound,
            ShipError::Store(_) => ErrorKind::Internal,
        }
    }
}

impl From<Vec<ValidationError>> for ShipError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ShipError::Validation(errors)
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type ShipResult<T> = Result<T, ShipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ShipError::InvalidId(0).kind(), ErrorKind::BadRequest);
        assert_eq!(ShipError::InvalidPage("x".into()).kind(), ErrorKind::BadRequest);
        assert_eq!(ShipError::Validation(vec![]).kind(), ErrorKind::BadRequest);
        assert_eq!(ShipError::NotFound(3).kind(), ErrorKind::NotFound);
        assert_eq!(
            ShipError::Store(anyhow::anyhow!("disk on fire")).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ShipError::from(vec![
            ValidationError {
                field: "name".to_string(),
                message: "too long".to_string(),
            },
            ValidationError {
                field: "speed".to_string(),
                message: "too fast".to_string(),
            },
        ]);

        assert_eq!(
            err.to_string(),
            "validation failed: name: too long; speed: too fast"
        );
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = ShipError::from(anyhow::anyhow!("database is locked"));
        assert_eq!(err.to_string(), "database is locked");
    }
}
