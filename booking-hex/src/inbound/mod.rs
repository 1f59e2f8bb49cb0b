//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the booking service.

mod cors;
mod handlers;
mod server;

pub use cors::cors_layer;
pub use server::HttpServer;
