//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use booking_types::dto::{
    BookingConfirmation, BookingErrorBody, BookingId, BookingRequest, ValidationErrorBody,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Submit a paid booking
#[utoipa::path(
    post,
    path = "/api/booking",
    tag = "booking",
    request_body = BookingRequest,
    responses(
        (status = 200, description = "Booking created and paid", body = BookingConfirmation),
        (status = 400, description = "Unknown duration, disallowed district or malformed body", body = ValidationErrorBody),
        (status = 500, description = "Configuration or upstream failure (upstream status is mirrored when known)", body = BookingErrorBody)
    )
)]
async fn create_booking() {}

/// CORS preflight for the booking endpoint
#[utoipa::path(
    options,
    path = "/api/booking",
    tag = "booking",
    responses(
        (status = 200, description = "Empty body with CORS headers")
    )
)]
async fn preflight() {}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Booking Gateway API",
        version = "0.1.0",
        description = "Paid booking submission for a local service business."
    ),
    paths(health, create_booking, preflight),
    components(
        schemas(
            BookingRequest,
            BookingConfirmation,
            BookingErrorBody,
            ValidationErrorBody,
            BookingId,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "booking", description = "Booking submission"),
    )
)]
pub struct ApiDoc;
