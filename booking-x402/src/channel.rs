//! Payment-augmented booking channel over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use booking_types::{
    BookingId, Currency, GatewayError, OutboundBookingPayload, PaymentAugmentedResult,
    PaymentChannel, PaymentTerms, SigningCredential,
};

use crate::signer::{HmacSigner, PaymentSigner};
use crate::wire::{
    Authorization, ExactPayload, PaymentPayload, PaymentRequired, PaymentRequirements, X_PAYMENT,
    X_PAYMENT_RESPONSE, decode_payment_response, encode_header,
};

/// Decimals of the settlement asset (USDC).
const ASSET_DECIMALS: u32 = 6;

/// Default validity window when the provider does not state one.
const DEFAULT_PAYMENT_TIMEOUT_SECS: u64 = 60;

/// Errors building the channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Invalid scheduling provider URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Created-booking representation returned by the provider.
#[derive(Debug, Deserialize)]
struct CreatedBooking {
    id: BookingId,
}

/// Creates bookings at the scheduling provider, paying via x402 when asked.
pub struct X402Channel<G: PaymentSigner = HmacSigner> {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    signer: G,
}

impl X402Channel<HmacSigner> {
    /// Creates a channel with the default signer.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChannelError> {
        Self::with_signer(base_url, timeout, HmacSigner)
    }
}

impl<G: PaymentSigner> X402Channel<G> {
    /// Creates a channel with a custom signer. Every outbound call is bounded
    /// by `timeout`.
    pub fn with_signer(base_url: &str, timeout: Duration, signer: G) -> Result<Self, ChannelError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        match Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ChannelError::InvalidBaseUrl(base_url)),
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key: None,
            signer,
        })
    }

    /// Sends the provider API key as the `apiKey` query parameter.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_booking(
        &self,
        payload: &OutboundBookingPayload,
        payment: Option<&str>,
    ) -> Result<Response, GatewayError> {
        let mut url = Url::parse(&format!("{}/bookings", self.base_url))
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("apiKey", key);
        }

        let mut req = self.client.post(url).json(payload);
        if let Some(header) = payment {
            req = req.header(X_PAYMENT, header);
        }

        req.send().await.map_err(transport_error)
    }

    /// Builds the `X-PAYMENT` header answering a 402.
    fn authorize(
        &self,
        required: &PaymentRequired,
        terms: &PaymentTerms,
        credential: &SigningCredential,
    ) -> Result<String, GatewayError> {
        let requirement = required
            .accepts
            .iter()
            .find(|r| r.scheme == "exact")
            .ok_or_else(|| {
                GatewayError::PaymentRejected(
                    required
                        .error
                        .clone()
                        .unwrap_or_else(|| "no supported payment scheme offered".into()),
                )
            })?;

        check_amount(requirement, terms)?;

        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let window = requirement
            .max_timeout_seconds
            .unwrap_or(DEFAULT_PAYMENT_TIMEOUT_SECS);
        let nonce: [u8; 32] = rand::random();

        let authorization = Authorization {
            from: self.signer.payer(credential),
            to: requirement.pay_to.clone(),
            value: requirement.max_amount_required.clone(),
            valid_after: now.saturating_sub(60).to_string(),
            valid_before: (now + window).to_string(),
            nonce: format!("0x{}", hex::encode(nonce)),
        };
        let signature = self.signer.sign(credential, &authorization);

        let payment = PaymentPayload {
            x402_version: required.x402_version,
            scheme: requirement.scheme.clone(),
            network: requirement.network.clone(),
            payload: ExactPayload {
                signature,
                authorization,
            },
        };

        encode_header(&payment).map_err(|e| GatewayError::PaymentRejected(e.to_string()))
    }
}

#[async_trait]
impl<G: PaymentSigner> PaymentChannel for X402Channel<G> {
    #[instrument(skip_all, fields(event_type_id = %payload.event_type_id))]
    async fn create_booking(
        &self,
        payload: &OutboundBookingPayload,
        terms: &PaymentTerms,
        credential: &SigningCredential,
    ) -> Result<PaymentAugmentedResult, GatewayError> {
        let mut response = self.post_booking(payload, None).await?;

        if response.status() == StatusCode::PAYMENT_REQUIRED {
            let required: PaymentRequired = response.json().await.map_err(|e| {
                GatewayError::MalformedResponse(format!("unreadable 402 body: {}", e))
            })?;
            debug!(
                offers = required.accepts.len(),
                description = %terms.description,
                "provider requires payment"
            );

            let header = self.authorize(&required, terms, credential)?;
            response = self.post_booking(payload, Some(&header)).await?;
        }

        if !response.status().is_success() {
            let err = upstream_error(response).await;
            warn!(error = %err, "scheduling provider rejected booking");
            return Err(err);
        }

        let receipt = response
            .headers()
            .get(X_PAYMENT_RESPONSE)
            .ok_or_else(|| {
                GatewayError::MalformedResponse("missing X-PAYMENT-RESPONSE header".into())
            })?
            .to_str()
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
            .and_then(decode_payment_response)?;

        let created: CreatedBooking = response.json().await.map_err(|e| {
            GatewayError::MalformedResponse(format!("unreadable booking body: {}", e))
        })?;

        info!(
            booking_id = %created.id,
            payment_status = receipt.status.as_str(),
            transaction = receipt.transaction.as_deref().unwrap_or(""),
            "booking created"
        );

        Ok(PaymentAugmentedResult {
            booking_id: created.id,
            receipt,
        })
    }
}

/// Refuses requirements above what the terms allow (amount plus tax).
///
/// The settlement asset is USDC, so only USD-priced terms can be capped.
fn check_amount(requirement: &PaymentRequirements, terms: &PaymentTerms) -> Result<(), GatewayError> {
    let currency = terms.amount.currency();
    if currency != Currency::USD {
        return Err(GatewayError::PaymentRejected(format!(
            "terms priced in {} cannot be settled in USDC",
            currency.code()
        )));
    }

    let required: u128 = requirement.max_amount_required.trim().parse().map_err(|_| {
        GatewayError::MalformedResponse(format!(
            "maxAmountRequired is not an integer: {}",
            requirement.max_amount_required
        ))
    })?;

    let cap = terms.max_total().cents().max(0) as u128 * 10u128.pow(ASSET_DECIMALS - 2);
    if required > cap {
        return Err(GatewayError::PaymentRejected(format!(
            "provider asked for {} atomic units, terms allow at most {} ({})",
            required,
            cap,
            terms.max_total()
        )));
    }
    Ok(())
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(e.to_string())
    }
}

/// Maps a non-success response, preferring the provider's `message` field.
async fn upstream_error(response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    GatewayError::Upstream {
        status: status.as_u16(),
        message,
    }
}
