//! # Booking x402
//!
//! Outbound adapter for the booking gateway: creates bookings at a
//! Cal.com-style scheduling API and settles the x402 "Payment Required"
//! handshake the API may demand.
//!
//! - `channel` - `PaymentChannel` implementation over reqwest
//! - `wire` - x402 header and body shapes
//! - `signer` - payment authorization signing

pub mod channel;
pub mod signer;
pub mod wire;

pub use channel::{ChannelError, X402Channel};
pub use signer::{HmacSigner, PaymentSigner};
