//! Type-safe monetary value with embedded currency.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Currencies a booking can be priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Returns the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
        }
    }

    /// Returns the ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            other => Err(DomainError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Type-safe money representation with embedded currency.
///
/// Amount is stored in cents so that tax and totals are exact at cent
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    cents: i64,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value from cents.
    pub fn new(cents: i64, currency: Currency) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self { cents, currency })
    }

    /// Creates a Money value from major units (e.g. `45.00` dollars),
    /// rounding to the nearest cent.
    pub fn from_major(amount: f64, currency: Currency) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::InvalidAmount(amount.to_string()));
        }
        Self::new((amount * 100.0).round() as i64, currency)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the amount in major units.
    pub fn as_major(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Applies a rate (e.g. a tax rate of `0.08`) and rounds to the nearest cent.
    pub fn apply_rate(&self, rate: f64) -> Money {
        Money {
            cents: (self.cents as f64 * rate).round() as i64,
            currency: self.currency,
        }
    }

    /// Checked addition - returns error if currencies don't match.
    pub fn checked_add(&self, other: Money) -> Result<Money, DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                expected: self.currency,
                got: other.currency,
            });
        }
        Ok(Money {
            cents: self.cents.saturating_add(other.cents),
            currency: self.currency,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.cents / 100;
        let minor = self.cents % 100;
        write!(f, "{}{}.{:02}", self.currency.symbol(), major, minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_major_rounds_to_cents() {
        let money = Money::from_major(45.0, Currency::USD).unwrap();
        assert_eq!(money.cents(), 4500);

        let money = Money::from_major(19.999, Currency::USD).unwrap();
        assert_eq!(money.cents(), 2000);
    }

    #[test]
    fn test_negative_money_fails() {
        assert!(matches!(
            Money::new(-100, Currency::USD),
            Err(DomainError::NegativeAmount)
        ));
        assert!(matches!(
            Money::from_major(-1.0, Currency::USD),
            Err(DomainError::NegativeAmount)
        ));
    }

    #[test]
    fn test_non_finite_amount_fails() {
        assert!(Money::from_major(f64::NAN, Currency::USD).is_err());
    }

    #[test]
    fn test_apply_rate() {
        let price = Money::new(4500, Currency::USD).unwrap();
        assert_eq!(price.apply_rate(0.08).cents(), 360);
        assert_eq!(price.apply_rate(0.0).cents(), 0);
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::new(100, Currency::USD).unwrap();
        let eur = Money::new(50, Currency::EUR).unwrap();
        assert!(matches!(
            usd.checked_add(eur),
            Err(DomainError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_money_display() {
        let money = Money::new(4860, Currency::USD).unwrap();
        assert_eq!(format!("{}", money), "$48.60");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert!("XYZ".parse::<Currency>().is_err());
    }
}
