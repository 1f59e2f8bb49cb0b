//! Integration tests for the x402 channel against a local fake provider.
//!
//! The fake provider is an axum app bound to an ephemeral port. It demands
//! payment on the first call, verifies the `X-PAYMENT` header on the replay
//! and answers with an `X-PAYMENT-RESPONSE` receipt.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};

use booking_types::{
    AttendeeResponses, BookingId, BookingMetadata, Currency, EventTypeId, GatewayError, Money,
    OutboundBookingPayload, PaymentChannel, PaymentStatus, PaymentTerms, SigningCredential,
};
use booking_x402::{
    HmacSigner, X402Channel,
    wire::{PaymentPayload, SettlementResponse, decode_header, encode_header},
};

const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// How the fake provider behaves.
#[derive(Clone, Copy)]
enum Mode {
    /// 402 first, then create the booking.
    Paid { atomic_amount: u64 },
    /// Create the booking without asking for payment, no receipt header.
    FreeWithoutReceipt,
    /// Reject every call with the given status.
    Reject(u16),
    /// Never answer in time.
    Slow,
}

#[derive(Default)]
struct Seen {
    calls: usize,
    payments: Vec<PaymentPayload>,
    bodies: Vec<Value>,
    api_keys: Vec<Option<String>>,
}

struct Fake {
    mode: Mode,
    seen: Mutex<Seen>,
}

async fn bookings(
    State(fake): State<Arc<Fake>>,
    Query(query): Query<std::collections::HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    {
        let mut seen = fake.seen.lock().unwrap();
        seen.calls += 1;
        seen.bodies.push(body);
        seen.api_keys.push(query.get("apiKey").cloned());
    }

    match fake.mode {
        Mode::Reject(status) => (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({ "message": "Booking slot no longer available" })),
        )
            .into_response(),
        Mode::Slow => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK.into_response()
        }
        Mode::FreeWithoutReceipt => Json(json!({ "id": 1 })).into_response(),
        Mode::Paid { atomic_amount } => match headers.get("x-payment") {
            None => (
                StatusCode::PAYMENT_REQUIRED,
                Json(json!({
                    "x402Version": 1,
                    "error": "X-PAYMENT header is required",
                    "accepts": [{
                        "scheme": "exact",
                        "network": "base-sepolia",
                        "maxAmountRequired": atomic_amount.to_string(),
                        "payTo": "0x209693Bc6afc0C5328bA36FaF03C514EF312287C",
                        "maxTimeoutSeconds": 120,
                        "asset": "0x036CbD53842c5426634e7929541eC2318f3dCF7e"
                    }]
                })),
            )
                .into_response(),
            Some(raw) => {
                let payment: PaymentPayload = decode_header(raw.to_str().unwrap()).unwrap();
                let payer = payment.payload.authorization.from.clone();
                fake.seen.lock().unwrap().payments.push(payment);

                let receipt = encode_header(&SettlementResponse {
                    success: true,
                    error_reason: None,
                    transaction: "0xsettled".into(),
                    network: "base-sepolia".into(),
                    payer: Some(payer),
                })
                .unwrap();

                (
                    StatusCode::OK,
                    [("x-payment-response", receipt)],
                    Json(json!({ "id": 4242, "uid": "abc" })),
                )
                    .into_response()
            }
        },
    }
}

async fn spawn_provider(mode: Mode) -> (String, Arc<Fake>) {
    let fake = Arc::new(Fake {
        mode,
        seen: Mutex::new(Seen::default()),
    });
    let app = Router::new()
        .route("/v1/bookings", post(bookings))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), fake)
}

fn payload() -> OutboundBookingPayload {
    OutboundBookingPayload {
        event_type_id: EventTypeId::new("201").unwrap(),
        start: Some("2025-03-01T15:00:00Z".into()),
        end: Some("2025-03-01T15:30:00Z".into()),
        time_zone: "America/New_York".into(),
        responses: AttendeeResponses {
            name: Some("Jordan Doe".into()),
            email: Some("jordan@example.com".into()),
            phone: None,
            location: None,
            district: "Midtown".into(),
            duration: "30min".into(),
        },
        metadata: BookingMetadata {
            city: "Atlanta".into(),
            booking_type: "ATL5D_Public".into(),
            payment_method: "x402".into(),
        },
    }
}

fn terms() -> PaymentTerms {
    PaymentTerms {
        amount: Money::from_major(45.0, Currency::USD).unwrap(),
        tax_rate: 0.08,
        description: "ATL5D 30min Booking".into(),
    }
}

fn credential() -> SigningCredential {
    SigningCredential::from_hex(KEY).unwrap()
}

fn channel(base_url: &str) -> X402Channel {
    X402Channel::new(base_url, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_paid_booking_round_trip() {
    let (base_url, fake) = spawn_provider(Mode::Paid {
        atomic_amount: 48_600_000,
    })
    .await;
    let channel = channel(&base_url).with_api_key(Some("cal_test_key".into()));

    let result = channel
        .create_booking(&payload(), &terms(), &credential())
        .await
        .unwrap();

    assert_eq!(result.booking_id, BookingId::Number(4242));
    assert_eq!(result.receipt.status, PaymentStatus::Settled);
    assert_eq!(result.receipt.transaction.as_deref(), Some("0xsettled"));

    let seen = fake.seen.lock().unwrap();
    assert_eq!(seen.calls, 2);
    assert_eq!(seen.bodies[0]["eventTypeId"], 201);
    assert_eq!(seen.bodies[0]["metadata"]["paymentMethod"], "x402");
    assert_eq!(seen.bodies[0], seen.bodies[1]);
    assert!(
        seen.api_keys
            .iter()
            .all(|k| k.as_deref() == Some("cal_test_key"))
    );

    let payment = &seen.payments[0];
    assert_eq!(payment.scheme, "exact");
    assert_eq!(payment.network, "base-sepolia");
    let auth = &payment.payload.authorization;
    assert_eq!(auth.value, "48600000");
    assert_eq!(auth.to, "0x209693Bc6afc0C5328bA36FaF03C514EF312287C");
    assert!(
        auth.valid_before.parse::<u64>().unwrap() > auth.valid_after.parse::<u64>().unwrap()
    );
    assert!(HmacSigner.verify(&credential(), auth, &payment.payload.signature));
}

#[tokio::test]
async fn test_overpriced_requirement_is_refused() {
    let (base_url, fake) = spawn_provider(Mode::Paid {
        atomic_amount: 100_000_000,
    })
    .await;

    let err = channel(&base_url)
        .create_booking(&payload(), &terms(), &credential())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::PaymentRejected(_)));
    assert_eq!(err.status(), Some(402));
    let seen = fake.seen.lock().unwrap();
    assert_eq!(seen.calls, 1);
    assert!(seen.payments.is_empty());
}

#[tokio::test]
async fn test_upstream_rejection_is_mirrored() {
    let (base_url, _) = spawn_provider(Mode::Reject(409)).await;

    let err = channel(&base_url)
        .create_booking(&payload(), &terms(), &credential())
        .await
        .unwrap_err();

    match err {
        GatewayError::Upstream { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Booking slot no longer available");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_receipt_is_malformed() {
    let (base_url, _) = spawn_provider(Mode::FreeWithoutReceipt).await;

    let err = channel(&base_url)
        .create_booking(&payload(), &terms(), &credential())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::MalformedResponse(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let (base_url, _) = spawn_provider(Mode::Slow).await;
    let channel = X402Channel::new(&base_url, Duration::from_millis(200)).unwrap();

    let err = channel
        .create_booking(&payload(), &terms(), &credential())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Timeout));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = channel(&format!("http://{}", addr))
        .create_booking(&payload(), &terms(), &credential())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
}
