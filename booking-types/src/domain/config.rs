//! Process-wide booking configuration.
//!
//! Built once at startup and shared read-only (behind an `Arc`) for the
//! lifetime of the process.

use crate::domain::{Currency, EventTypeId, PricingTier, SigningCredential};
use crate::error::DomainError;

/// CORS origin policy for the booking endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigin {
    Any,
    Exact(String),
}

impl AllowedOrigin {
    /// `"*"` (or blank) means any origin; anything else is a single origin.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "*" => AllowedOrigin::Any,
            origin => AllowedOrigin::Exact(origin.trim_end_matches('/').to_string()),
        }
    }

    /// Value for the `Access-Control-Allow-Origin` header.
    pub fn header_value(&self) -> &str {
        match self {
            AllowedOrigin::Any => "*",
            AllowedOrigin::Exact(origin) => origin,
        }
    }
}

/// Where the outbound event type identifier comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventIdentifierSource {
    /// Pick uniformly among the chosen tier's candidates.
    PerTier,
    /// Always send this identifier, whatever the duration.
    Fixed(EventTypeId),
}

/// Deployment-level knobs for the booking handler.
#[derive(Debug, Clone)]
pub struct HandlerPolicy {
    pub allowed_origin: AllowedOrigin,
    /// Reject durations missing from the pricing table (fail closed).
    pub strict_duration_validation: bool,
    pub event_identifier_source: EventIdentifierSource,
    /// Tier used to price unknown durations when validation is not strict.
    pub fallback_duration: String,
}

impl Default for HandlerPolicy {
    fn default() -> Self {
        Self {
            allowed_origin: AllowedOrigin::Any,
            strict_duration_validation: true,
            event_identifier_source: EventIdentifierSource::PerTier,
            fallback_duration: "30min".into(),
        }
    }
}

/// Business identity stamped on outbound metadata and client responses.
#[derive(Debug, Clone)]
pub struct BrandProfile {
    pub confirmation_prefix: String,
    pub city: String,
    pub booking_type: String,
    pub payment_method: String,
    pub currency: Currency,
    pub failure_message: String,
    pub next_steps: String,
    pub support_email: String,
    pub support_phone: String,
}

impl Default for BrandProfile {
    fn default() -> Self {
        Self {
            confirmation_prefix: "ATL5D".into(),
            city: "Atlanta".into(),
            booking_type: "ATL5D_Public".into(),
            payment_method: "x402".into(),
            currency: Currency::USD,
            failure_message: "Failed to process Atlanta booking".into(),
            next_steps: "You'll receive an Atlanta-specific confirmation email shortly".into(),
            support_email: "hi@atl5d.com".into(),
            support_phone: "(404) 889-5545".into(),
        }
    }
}

/// Static booking configuration.
#[derive(Debug, Clone)]
pub struct BookingConfiguration {
    tiers: Vec<PricingTier>,
    timezone: String,
    allowed_districts: Vec<String>,
    signing_credential: Option<SigningCredential>,
    brand: BrandProfile,
    policy: HandlerPolicy,
}

impl BookingConfiguration {
    /// Creates a configuration with the default brand and policy and no
    /// signing credential.
    pub fn new(
        tiers: Vec<PricingTier>,
        timezone: impl Into<String>,
        allowed_districts: Vec<String>,
    ) -> Result<Self, DomainError> {
        for (i, tier) in tiers.iter().enumerate() {
            if tiers[..i].iter().any(|t| t.duration() == tier.duration()) {
                return Err(DomainError::DuplicateTier(tier.duration().to_string()));
            }
        }

        let timezone = timezone.into();
        if timezone.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Timezone cannot be empty".into(),
            ));
        }

        Ok(Self {
            tiers,
            timezone,
            allowed_districts,
            signing_credential: None,
            brand: BrandProfile::default(),
            policy: HandlerPolicy::default(),
        })
    }

    pub fn with_signing_credential(mut self, credential: Option<SigningCredential>) -> Self {
        self.signing_credential = credential;
        self
    }

    pub fn with_brand(mut self, brand: BrandProfile) -> Self {
        self.brand = brand;
        self
    }

    pub fn with_policy(mut self, policy: HandlerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn tier(&self, duration: &str) -> Option<&PricingTier> {
        self.tiers.iter().find(|t| t.duration() == duration)
    }

    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    /// Duration keys in configuration order.
    pub fn duration_keys(&self) -> Vec<String> {
        self.tiers.iter().map(|t| t.duration().to_string()).collect()
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn allowed_districts(&self) -> &[String] {
        &self.allowed_districts
    }

    /// Exact, case-sensitive membership.
    pub fn is_district_allowed(&self, district: &str) -> bool {
        self.allowed_districts.iter().any(|d| d == district)
    }

    pub fn signing_credential(&self) -> Option<&SigningCredential> {
        self.signing_credential.as_ref()
    }

    pub fn brand(&self) -> &BrandProfile {
        &self.brand
    }

    pub fn policy(&self) -> &HandlerPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Money;

    fn tier(duration: &str) -> PricingTier {
        PricingTier::new(
            duration,
            EventTypeId::parse_list("1"),
            Money::from_major(10.0, Currency::USD).unwrap(),
            0.08,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_and_keys() {
        let config = BookingConfiguration::new(
            vec![tier("15min"), tier("30min")],
            "America/New_York",
            vec!["Midtown".into()],
        )
        .unwrap();

        assert!(config.tier("30min").is_some());
        assert!(config.tier("45min").is_none());
        assert_eq!(config.duration_keys(), vec!["15min", "30min"]);
        assert!(config.is_district_allowed("Midtown"));
        assert!(!config.is_district_allowed("midtown"));
        assert!(config.signing_credential().is_none());
    }

    #[test]
    fn test_duplicate_tiers_rejected() {
        let result = BookingConfiguration::new(
            vec![tier("30min"), tier("30min")],
            "America/New_York",
            vec![],
        );
        assert!(matches!(result, Err(DomainError::DuplicateTier(_))));
    }

    #[test]
    fn test_allowed_origin_parse() {
        assert_eq!(AllowedOrigin::parse("*"), AllowedOrigin::Any);
        assert_eq!(AllowedOrigin::parse(""), AllowedOrigin::Any);
        assert_eq!(
            AllowedOrigin::parse("https://atl5d.com/"),
            AllowedOrigin::Exact("https://atl5d.com".into())
        );
        assert_eq!(
            AllowedOrigin::parse("https://atl5d.com").header_value(),
            "https://atl5d.com"
        );
    }
}
