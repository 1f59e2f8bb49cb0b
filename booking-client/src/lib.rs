//! # Booking Client SDK
//!
//! A typed Rust client for the booking gateway.

use booking_types::{BookingConfirmation, BookingRequest};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CORS headers returned by a preflight request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreflightInfo {
    pub allow_origin: Option<String>,
    pub allow_methods: Option<String>,
    pub allow_headers: Option<String>,
}

/// Booking gateway client.
pub struct BookingClient {
    base_url: String,
    http: Client,
}

impl BookingClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the gateway is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Submits a booking.
    pub async fn book(&self, req: &BookingRequest) -> Result<BookingConfirmation, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/booking", self.base_url))
            .json(req)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Sends a CORS preflight for the booking endpoint from `origin`.
    pub async fn preflight(&self, origin: &str) -> Result<PreflightInfo, ClientError> {
        let resp = self
            .http
            .request(Method::OPTIONS, format!("{}/api/booking", self.base_url))
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .send()
            .await?;

        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };

        Ok(PreflightInfo {
            allow_origin: header("access-control-allow-origin"),
            allow_methods: header("access-control-allow-methods"),
            allow_headers: header("access-control-allow-headers"),
        })
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
            let field = |name: &str| {
                parsed
                    .as_ref()
                    .and_then(|v| v.get(name).and_then(|e| e.as_str()).map(String::from))
            };
            Err(ClientError::Api {
                status: status.as_u16(),
                message: field("error").unwrap_or(body.clone()),
                details: field("details"),
            })
        }
    }
}
