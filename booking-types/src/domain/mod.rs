//! Domain models for the booking gateway.

pub mod config;
pub mod credential;
pub mod money;
pub mod pricing;

pub use config::{
    AllowedOrigin, BookingConfiguration, BrandProfile, EventIdentifierSource, HandlerPolicy,
};
pub use credential::SigningCredential;
pub use money::{Currency, Money};
pub use pricing::{EventTypeId, PricingTier};
