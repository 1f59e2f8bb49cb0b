//! CORS policy for the booking endpoint.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use booking_types::AllowedOrigin;

/// Builds the CORS layer for the configured origin.
///
/// `OPTIONS` requests are answered by the layer itself with an empty body,
/// so preflights never reach the booking service.
pub fn cors_layer(origin: &AllowedOrigin) -> CorsLayer {
    let allow_origin = match origin {
        AllowedOrigin::Any => AllowOrigin::any(),
        AllowedOrigin::Exact(_) => match HeaderValue::from_str(origin.header_value()) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(
                    origin = origin.header_value(),
                    "allowed origin is not a valid header value; denying cross-origin requests"
                );
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        },
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
