//! Error types for the booking gateway.

use crate::domain::Currency;
use crate::ports::GatewayError;

/// Domain-level errors (invalid configuration values and business types).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: Currency, got: Currency },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Tax rate must be a finite, non-negative number (got {0})")]
    InvalidTaxRate(f64),

    #[error("Duration tier configured twice: {0}")]
    DuplicateTier(String),

    #[error("Invalid signing credential: {0}")]
    InvalidCredential(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Application-level errors (for HTTP responses).
///
/// Validation faults map to 400 and are never forwarded upstream;
/// configuration faults map to 500; upstream faults carry the provider's
/// status when there is one.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid booking duration. Choose {}", choice_list(.valid))]
    InvalidDuration { valid: Vec<String> },

    #[error("Service unavailable in this district")]
    DistrictUnavailable { available: Vec<String> },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: {detail}")]
    Upstream { status: Option<u16>, detail: String },
}

impl AppError {
    /// True for faults caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidDuration { .. }
                | AppError::DistrictUnavailable { .. }
                | AppError::BadRequest(_)
        )
    }

    /// Detail passed through to the caller in failure bodies.
    pub fn details(&self) -> String {
        match self {
            AppError::Upstream { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::Upstream {
            status: err.status(),
            detail: err.detail(),
        }
    }
}

/// "a", "a or b", "a, b, or c".
fn choice_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [a, b] => format!("{} or {}", a, b),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}
