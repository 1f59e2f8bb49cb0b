//! Payment-augmented scheduling port.
//!
//! The adapter behind this trait creates the booking at the scheduling
//! provider and performs whatever payment handshake the provider demands.
//! The application layer only supplies the payment terms and reads back the
//! receipt.

use serde::Serialize;

use crate::domain::{Money, SigningCredential};
use crate::dto::{BookingId, OutboundBookingPayload};

/// Error type for outbound scheduling/payment operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Scheduling provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Scheduling provider unreachable: {0}")]
    Transport(String),

    #[error("Scheduling provider timed out")]
    Timeout,

    #[error("Payment rejected: {0}")]
    PaymentRejected(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// HTTP status reported by the provider, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Upstream { status, .. } => Some(*status),
            GatewayError::PaymentRejected(_) => Some(402),
            _ => None,
        }
    }

    /// Caller-facing detail (the provider's own message when it sent one).
    pub fn detail(&self) -> String {
        match self {
            GatewayError::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// What the payer agrees to pay for one booking.
#[derive(Debug, Clone)]
pub struct PaymentTerms {
    pub amount: Money,
    pub tax_rate: f64,
    pub description: String,
}

impl PaymentTerms {
    /// Upper bound the payer will authorize: amount plus tax.
    pub fn max_total(&self) -> Money {
        self.amount
            .checked_add(self.amount.apply_rate(self.tax_rate))
            .unwrap_or(self.amount)
    }
}

/// Settlement outcome reported by the payment layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Settled,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Settled => "settled",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Decoded payment receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub status: PaymentStatus,
    pub transaction: Option<String>,
    pub network: Option<String>,
    pub payer: Option<String>,
    pub error_reason: Option<String>,
}

/// Created booking plus the receipt for the payment attached to it.
#[derive(Debug, Clone)]
pub struct PaymentAugmentedResult {
    pub booking_id: BookingId,
    pub receipt: PaymentReceipt,
}

/// Port for creating a paid booking at the scheduling provider.
#[async_trait::async_trait]
pub trait PaymentChannel: Send + Sync + 'static {
    /// Creates the booking, paying under `terms` with `credential`.
    ///
    /// Exactly one logical booking-creation call per invocation; no retries
    /// beyond the payment handshake itself.
    async fn create_booking(
        &self,
        payload: &OutboundBookingPayload,
        terms: &PaymentTerms,
        credential: &SigningCredential,
    ) -> Result<PaymentAugmentedResult, GatewayError>;
}
