//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use anyhow::{Context, anyhow};

use booking_types::{
    AllowedOrigin, BookingConfiguration, BrandProfile, Currency, EventIdentifierSource,
    EventTypeId, HandlerPolicy, Money, PricingTier, SigningCredential,
};

const DEFAULT_BASE_URL: &str = "https://api.cal.com/v1";
const DEFAULT_PRICING: &str = "15min=25.00,30min=45.00,90min=120.00";
const DEFAULT_TAX_RATE: f64 = 0.08;
const DEFAULT_TIMEZONE: &str = "America/New_York";
const DEFAULT_DISTRICTS: &str = "Downtown,Midtown,Buckhead,West End";
const SHARED_EVENT_IDS: &str = "ATL_EVENT_TYPE_IDS";

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub scheduler_base_url: String,
    pub scheduler_api_key: Option<String>,
    pub scheduler_timeout: Duration,
    pub booking: BookingConfiguration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .trim()
            .parse()
            .context("PORT must be a port number")?;

        let scheduler_timeout = Duration::from_secs(
            var("SCHEDULER_TIMEOUT_SECS")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .context("SCHEDULER_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(15),
        );

        let currency: Currency = var("BOOKING_CURRENCY")
            .unwrap_or_else(|| "USD".to_string())
            .parse()?;
        if currency != Currency::USD {
            tracing::warn!(
                currency = currency.code(),
                "x402 settles in USDC; bookings priced in other currencies will be refused"
            );
        }

        let tax_rate = var("BOOKING_TAX_RATE")
            .map(|v| v.trim().parse::<f64>())
            .transpose()
            .context("BOOKING_TAX_RATE must be a number")?
            .unwrap_or(DEFAULT_TAX_RATE);

        let shared_ids = var(SHARED_EVENT_IDS).unwrap_or_default();
        let pricing = var("BOOKING_PRICING").unwrap_or_else(|| DEFAULT_PRICING.to_string());

        let mut tiers = Vec::new();
        for (duration, price) in parse_pricing(&pricing)? {
            let ids =
                var(tier_event_ids_key(&duration).as_str()).unwrap_or_else(|| shared_ids.clone());
            let tier = PricingTier::new(
                duration,
                EventTypeId::parse_list(&ids),
                Money::from_major(price, currency)?,
                tax_rate,
            )?;
            if tier.event_type_ids().is_empty() {
                tracing::warn!(
                    tier = tier.duration(),
                    "no event types configured; bookings for this tier will fail"
                );
            }
            tiers.push(tier);
        }

        let districts = var("BOOKING_ALLOWED_DISTRICTS")
            .unwrap_or_else(|| DEFAULT_DISTRICTS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from)
            .collect();

        let signing_credential = var("PRIVATE_KEY")
            .map(|raw| SigningCredential::from_hex(&raw))
            .transpose()
            .context("PRIVATE_KEY is set but is not a valid hex private key")?;

        let booking = BookingConfiguration::new(
            tiers,
            var("BOOKING_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            districts,
        )?
        .with_signing_credential(signing_credential)
        .with_brand(parse_brand(&var, currency))
        .with_policy(parse_policy(&var)?);

        Ok(Self {
            port,
            scheduler_base_url: var("CALCOM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            scheduler_api_key: var("CALCOM_API_KEY"),
            scheduler_timeout,
            booking,
        })
    }
}

/// `"15min=25.00,30min=45.00"` → `[("15min", 25.0), ("30min", 45.0)]`.
fn parse_pricing(raw: &str) -> anyhow::Result<Vec<(String, f64)>> {
    let tiers = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (duration, price) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("BOOKING_PRICING entry '{}' must be duration=price", entry))?;
            let price = price
                .trim()
                .parse::<f64>()
                .with_context(|| format!("BOOKING_PRICING price for '{}' is not a number", duration))?;
            Ok((duration.trim().to_string(), price))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if tiers.is_empty() {
        return Err(anyhow!("BOOKING_PRICING must define at least one tier"));
    }
    Ok(tiers)
}

/// `30min` → `ATL_EVENT_TYPE_IDS_30MIN`.
fn tier_event_ids_key(duration: &str) -> String {
    let suffix: String = duration
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}", SHARED_EVENT_IDS, suffix)
}

fn parse_brand(var: &impl Fn(&str) -> Option<String>, currency: Currency) -> BrandProfile {
    let mut brand = BrandProfile {
        currency,
        ..BrandProfile::default()
    };
    if let Some(prefix) = var("BOOKING_CONFIRMATION_PREFIX") {
        brand.booking_type = format!("{}_Public", prefix);
        brand.confirmation_prefix = prefix;
    }
    if let Some(city) = var("BOOKING_CITY") {
        brand.failure_message = format!("Failed to process {} booking", city);
        brand.next_steps = format!("You'll receive a {}-specific confirmation email shortly", city);
        brand.city = city;
    }
    if let Some(email) = var("BOOKING_SUPPORT_EMAIL") {
        brand.support_email = email;
    }
    if let Some(phone) = var("BOOKING_SUPPORT_PHONE") {
        brand.support_phone = phone;
    }
    brand
}

fn parse_policy(var: &impl Fn(&str) -> Option<String>) -> anyhow::Result<HandlerPolicy> {
    let defaults = HandlerPolicy::default();

    let strict_duration_validation = match var("BOOKING_STRICT_DURATIONS") {
        None => defaults.strict_duration_validation,
        Some(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => return Err(anyhow!("BOOKING_STRICT_DURATIONS: expected a boolean, got '{}'", other)),
        },
    };

    let event_identifier_source = match var("BOOKING_EVENT_SOURCE").as_deref().map(str::trim) {
        None | Some("per-tier") => EventIdentifierSource::PerTier,
        Some("fixed") => {
            let id = var("DEFAULT_EVENT_TYPE_ID")
                .ok_or_else(|| anyhow!("BOOKING_EVENT_SOURCE=fixed requires DEFAULT_EVENT_TYPE_ID"))?;
            EventIdentifierSource::Fixed(EventTypeId::new(id)?)
        }
        Some(other) => {
            return Err(anyhow!(
                "BOOKING_EVENT_SOURCE must be 'per-tier' or 'fixed', got '{}'",
                other
            ));
        }
    };

    Ok(HandlerPolicy {
        allowed_origin: var("BOOKING_ALLOWED_ORIGIN")
            .map(|o| AllowedOrigin::parse(&o))
            .unwrap_or(defaults.allowed_origin),
        strict_duration_validation,
        event_identifier_source,
        fallback_duration: var("BOOKING_FALLBACK_DURATION").unwrap_or(defaults.fallback_duration),
    })
}
