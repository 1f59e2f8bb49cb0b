//! Port traits (interfaces for adapters).
//!
//! The application layer depends on these traits, not on the HTTP client or
//! the random number generator behind them.

mod channel;
mod selector;

pub use channel::{
    GatewayError, PaymentAugmentedResult, PaymentChannel, PaymentReceipt, PaymentStatus,
    PaymentTerms,
};
pub use selector::EventSelector;
