//! x402 wire format.
//!
//! A provider that wants payment answers `402` with a [`PaymentRequired`]
//! body. The payer replays the request with an `X-PAYMENT` header holding a
//! base64-encoded [`PaymentPayload`]. On success the provider returns an
//! `X-PAYMENT-RESPONSE` header holding a base64-encoded [`SettlementResponse`].

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use booking_types::{GatewayError, PaymentReceipt, PaymentStatus};

pub const X_PAYMENT: &str = "x-payment";
pub const X_PAYMENT_RESPONSE: &str = "x-payment-response";

/// Body of a `402 Payment Required` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequired {
    pub x402_version: u32,
    #[serde(default)]
    pub accepts: Vec<PaymentRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One way the provider is willing to be paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    pub scheme: String,
    pub network: String,
    /// Atomic units of `asset`, as a decimal string.
    pub max_amount_required: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub pay_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub asset: String,
}

/// Signed transfer authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub from: String,
    pub to: String,
    pub value: String,
    pub valid_after: String,
    pub valid_before: String,
    pub nonce: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactPayload {
    pub signature: String,
    pub authorization: Authorization,
}

/// Content of the `X-PAYMENT` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub x402_version: u32,
    pub scheme: String,
    pub network: String,
    pub payload: ExactPayload,
}

/// Content of the `X-PAYMENT-RESPONSE` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    #[serde(default)]
    pub transaction: String,
    #[serde(default)]
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
}

impl From<SettlementResponse> for PaymentReceipt {
    fn from(s: SettlementResponse) -> Self {
        let non_empty = |v: String| (!v.is_empty()).then_some(v);
        PaymentReceipt {
            status: if s.success {
                PaymentStatus::Settled
            } else {
                PaymentStatus::Failed
            },
            transaction: non_empty(s.transaction),
            network: non_empty(s.network),
            payer: s.payer,
            error_reason: s.error_reason,
        }
    }
}

/// base64(JSON(value)).
pub fn encode_header<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(STANDARD.encode(serde_json::to_vec(value)?))
}

/// Inverse of [`encode_header`].
pub fn decode_header<T: DeserializeOwned>(raw: &str) -> Result<T, GatewayError> {
    let bytes = STANDARD
        .decode(raw.trim())
        .map_err(|e| GatewayError::MalformedResponse(format!("header is not base64: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::MalformedResponse(format!("header is not valid JSON: {}", e)))
}

/// Decodes an `X-PAYMENT-RESPONSE` header value into a receipt.
pub fn decode_payment_response(raw: &str) -> Result<PaymentReceipt, GatewayError> {
    decode_header::<SettlementResponse>(raw).map(PaymentReceipt::from)
}
