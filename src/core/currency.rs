use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// Supports standard fiat currencies (PLN, EUR, USD, etc.) as well as
/// arbitrary identifiers; the engine never interprets the code beyond
/// equality and ordering.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::CurrencyCode;
///
/// let pln = CurrencyCode::new("PLN");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(pln, eur);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Number of decimal digits in the smallest currency unit.
///
/// All supported currencies are assumed to have a two-digit minor unit
/// (cents, grosze, eurocents). Every monetary amount that leaves a
/// computation stage is rounded to this scale.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Round a monetary amount to the smallest currency unit,
/// half away from zero.
///
/// This is the single rounding rule of the engine. Normalization, share
/// remainder assignment and settlement amounts all go through it so the
/// stages cannot disagree on edge cases.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::round_minor;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_minor(dec!(33.333)), dec!(33.33));
/// assert_eq!(round_minor(dec!(0.005)), dec!(0.01));
/// assert_eq!(round_minor(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_minor(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Errors arising from exchange-rate operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    #[error("exchange rate must be positive, got {rate} for {currency}")]
    InvalidRate {
        currency: CurrencyCode,
        rate: Decimal,
    },
}

/// The exchange rate captured when an expense was recorded.
///
/// One unit of `currency` equals `rate` units of the trip's base
/// currency. Rates are immutable once referenced by an expense; there is
/// no retroactive recalculation when newer rates are recorded.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::{CurrencyCode, ExchangeRate};
/// use rust_decimal_macros::dec;
///
/// let rate = ExchangeRate::new(CurrencyCode::new("EUR"), dec!(4.30));
/// assert_eq!(rate.normalize(dec!(20.00)).unwrap(), dec!(86.00));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub currency: CurrencyCode,
    pub rate: Decimal,
}

impl ExchangeRate {
    pub fn new(currency: CurrencyCode, rate: Decimal) -> Self {
        Self { currency, rate }
    }

    /// Identity rate for amounts already denominated in the base currency.
    pub fn base(currency: CurrencyCode) -> Self {
        Self {
            currency,
            rate: Decimal::ONE,
        }
    }

    /// Convert an original-currency amount into the base currency.
    ///
    /// The result is `value * rate` rounded to the minor unit.
    /// Fails when the captured rate is not positive.
    pub fn normalize(&self, value: Decimal) -> Result<Decimal, RateError> {
        if self.rate <= Decimal::ZERO {
            return Err(RateError::InvalidRate {
                currency: self.currency.clone(),
                rate: self.rate,
            });
        }
        Ok(round_minor(value * self.rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_code_equality() {
        let a = CurrencyCode::new("PLN");
        let b = CurrencyCode::new("PLN");
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_minor(dec!(0.125)), dec!(0.13));
        assert_eq!(round_minor(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_minor(dec!(0.124)), dec!(0.12));
        assert_eq!(round_minor(dec!(10)), dec!(10));
    }

    #[test]
    fn test_normalize_multiplies_and_rounds() {
        let rate = ExchangeRate::new(CurrencyCode::new("EUR"), dec!(4.30));
        assert_eq!(rate.normalize(dec!(20.00)).unwrap(), dec!(86.00));

        let odd = ExchangeRate::new(CurrencyCode::new("EUR"), dec!(4.333));
        assert_eq!(odd.normalize(dec!(10.01)).unwrap(), dec!(43.37));
    }

    #[test]
    fn test_normalize_zero_value() {
        let rate = ExchangeRate::new(CurrencyCode::new("EUR"), dec!(4.30));
        assert_eq!(rate.normalize(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_invalid_rate() {
        let rate = ExchangeRate::new(CurrencyCode::new("EUR"), dec!(-1));
        assert!(matches!(
            rate.normalize(dec!(10)),
            Err(RateError::InvalidRate { .. })
        ));

        let zero = ExchangeRate::new(CurrencyCode::new("EUR"), Decimal::ZERO);
        assert!(zero.normalize(dec!(10)).is_err());
    }

    #[test]
    fn test_base_rate_is_identity() {
        let rate = ExchangeRate::base(CurrencyCode::new("PLN"));
        assert_eq!(rate.normalize(dec!(123.45)).unwrap(), dec!(123.45));
    }
}
