//! # Booking Hex
//!
//! Application service layer and HTTP adapter for the booking gateway.
//!
//! ## Architecture
//!
//! - `service/` - Booking service (validate, price, delegate, translate)
//! - `selection/` - Uniform random event type selection
//! - `inbound/` - HTTP adapter (Axum server, CORS, error bodies)
//! - `openapi/` - OpenAPI document for the public endpoint
//!
//! The service is generic over `C: PaymentChannel` and `S: EventSelector`,
//! so the outbound adapter and the random source are injected.

pub mod inbound;
pub mod openapi;
pub mod selection;
pub mod service;


pub use selection::RandomEventSelector;
pub use service::BookingService;
