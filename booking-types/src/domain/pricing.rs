//! Duration tiers: price, tax and the provider event types that serve them.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::Money;
use crate::error::DomainError;

/// Scheduling-provider event type identifier.
///
/// Provider ids are usually numeric; they go over the wire as JSON numbers
/// when they are all digits and as strings otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventTypeId(String);

impl EventTypeId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(DomainError::ValidationError(
                "Event type id cannot be empty".into(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses a comma-separated list, skipping blank entries.
    pub fn parse_list(raw: &str) -> Vec<EventTypeId> {
        raw.split(',')
            .filter_map(|part| EventTypeId::new(part).ok())
            .collect()
    }
}

impl fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EventTypeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(n) => serializer.serialize_u64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

/// A named booking-length category with its price and candidate event types.
#[derive(Debug, Clone)]
pub struct PricingTier {
    duration: String,
    event_type_ids: Vec<EventTypeId>,
    price: Money,
    tax_rate: f64,
}

impl PricingTier {
    /// Creates a tier. Price is non-negative by construction of `Money`;
    /// the tax rate must be finite and non-negative.
    pub fn new(
        duration: impl Into<String>,
        event_type_ids: Vec<EventTypeId>,
        price: Money,
        tax_rate: f64,
    ) -> Result<Self, DomainError> {
        let duration = duration.into();
        if duration.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Tier duration label cannot be empty".into(),
            ));
        }
        if !tax_rate.is_finite() || tax_rate < 0.0 {
            return Err(DomainError::InvalidTaxRate(tax_rate));
        }
        Ok(Self {
            duration,
            event_type_ids,
            price,
            tax_rate,
        })
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    /// Candidate event types; may be empty, in which case the tier is not
    /// bookable under per-tier selection.
    pub fn event_type_ids(&self) -> &[EventTypeId] {
        &self.event_type_ids
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn tax(&self) -> Money {
        self.price.apply_rate(self.tax_rate)
    }

    /// price × (1 + tax rate), at cent precision.
    pub fn total(&self) -> Money {
        // Same currency on both sides, so this cannot fail.
        self.price.checked_add(self.tax()).unwrap_or(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;

    fn tier(price: f64, rate: f64) -> PricingTier {
        PricingTier::new(
            "30min",
            EventTypeId::parse_list("101,102"),
            Money::from_major(price, Currency::USD).unwrap(),
            rate,
        )
        .unwrap()
    }

    #[test]
    fn test_totals_for_default_tiers() {
        for (price, expected_tax, expected_total) in [
            (25.0, 200, 2700),
            (45.0, 360, 4860),
            (120.0, 960, 12960),
        ] {
            let t = tier(price, 0.08);
            assert_eq!(t.tax().cents(), expected_tax);
            assert_eq!(t.total().cents(), expected_total);
            assert_eq!(
                t.total().cents(),
                (t.price().cents() as f64 * 1.08).round() as i64
            );
        }
    }

    #[test]
    fn test_negative_tax_rate_rejected() {
        let result = PricingTier::new(
            "15min",
            vec![],
            Money::from_major(25.0, Currency::USD).unwrap(),
            -0.01,
        );
        assert!(matches!(result, Err(DomainError::InvalidTaxRate(_))));
    }

    #[test]
    fn test_parse_list_skips_blanks() {
        let ids = EventTypeId::parse_list(" 101, ,abc,");
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].as_str(), "101");
        assert_eq!(ids[1].as_str(), "abc");
        assert!(EventTypeId::parse_list("").is_empty());
    }

    #[test]
    fn test_event_type_id_serialization() {
        let numeric = EventTypeId::new("101").unwrap();
        let text = EventTypeId::new("atl-30").unwrap();
        assert_eq!(serde_json::to_value(&numeric).unwrap(), serde_json::json!(101));
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            serde_json::json!("atl-30")
        );
    }
}
