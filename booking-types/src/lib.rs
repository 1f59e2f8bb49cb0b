//! # Booking Types
//!
//! Domain types and port traits for the booking gateway.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pricing tiers, money, static configuration and handler policy
//! - `ports/` - Traits the outbound adapters must implement
//! - `dto/` - Wire shapes for the inbound and outbound HTTP boundaries
//! - `error/` - Domain, gateway and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AllowedOrigin, BookingConfiguration, BrandProfile, Currency, EventIdentifierSource,
    EventTypeId, HandlerPolicy, Money, PricingTier, SigningCredential,
};
pub use dto::*;
pub use error::{AppError, DomainError};
pub use ports::{
    EventSelector, GatewayError, PaymentAugmentedResult, PaymentChannel, PaymentReceipt,
    PaymentStatus, PaymentTerms,
};
