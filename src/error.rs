use thiserror::Error;

#[cfg(feature = "api")]
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

#[cfg(feature = "api")]
use crate::models::ErrorResponse;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid odds: {0} (American odds cannot be zero)")]
    InvalidOdds(i32),

    #[error("Invalid decimal odds: {0} (must be greater than 1)")]
    InvalidDecimalOdds(f64),

    #[error("Invalid amount: {0} (stake must be positive)")]
    InvalidAmount(f64),

    #[error("Invalid boost: {0} (must be non-negative)")]
    InvalidBoost(f64),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown result: {0}")]
    UnknownResult(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Bet not found at index {index} (ledger has {len} bets)")]
    BetNotFound { index: usize, len: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] polars::prelude::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Validation functions
pub fn validate_odds(odds: i32) -> Result<()> {
    if odds == 0 {
        return Err(LedgerError::InvalidOdds(odds));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}

pub fn validate_boost(boost: f64) -> Result<()> {
    if !boost.is_finite() || boost < 0.0 {
        return Err(LedgerError::InvalidBoost(boost));
    }
    Ok(())
}

pub fn validate_required(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::MissingField(field));
    }
    Ok(())
}

/// API error types
#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    /// Invalid bet submission
    ValidationError(String),
    /// Edit attempted without a valid session
    Unauthorized,
    /// Referenced bet does not exist
    NotFound(String),
    /// Storage or other internal failure
    InternalError(String),
}

#[cfg(feature = "api")]
impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Unauthorized => write!(f, "Editing requires the shared password"),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

#[cfg(feature = "api")]
impl std::error::Error for AppError {}

#[cfg(feature = "api")]
impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::BetNotFound { .. } => AppError::NotFound(err.to_string()),
            LedgerError::Storage(_) | LedgerError::Io(_) => {
                AppError::InternalError(err.to_string())
            }
            other => AppError::ValidationError(other.to_string()),
        }
    }
}

#[cfg(feature = "api")]
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::Unauthorized => ("unauthorized", self.to_string()),
            AppError::NotFound(msg) => ("not_found", msg.clone()),
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_odds() {
        assert!(validate_odds(-110).is_ok());
        assert!(validate_odds(150).is_ok());
        assert!(matches!(validate_odds(0), Err(LedgerError::InvalidOdds(0))));
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(10.0).is_ok());
        assert!(validate_amount(0.01).is_ok());
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-5.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_boost() {
        assert!(validate_boost(0.0).is_ok());
        assert!(validate_boost(1.5).is_ok());
        assert!(validate_boost(-0.1).is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("game", "Caps vs Rangers").is_ok());
        assert!(matches!(
            validate_required("game", "   "),
            Err(LedgerError::MissingField("game"))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InvalidOdds(0);
        assert!(err.to_string().contains("cannot be zero"));
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InternalError("".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_ledger_error_maps_to_app_error() {
        let app: AppError = LedgerError::InvalidOdds(0).into();
        assert!(matches!(app, AppError::ValidationError(_)));

        let app: AppError = LedgerError::BetNotFound { index: 3, len: 1 }.into();
        assert!(matches!(app, AppError::NotFound(_)));
    }
}
