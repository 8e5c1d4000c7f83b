use crate::core::currency::CurrencyCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A trip with a base currency.
///
/// All balances and budget summaries are expressed in the trip's base
/// currency; expenses recorded in other currencies are normalized through
/// the exchange rate captured on each expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    pub base_currency: CurrencyCode,
}

impl Trip {
    pub fn new(name: impl Into<String>, base_currency: CurrencyCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            base_currency,
        }
    }

    /// Create a trip with a specific id (useful for testing / determinism).
    pub fn with_id(id: Uuid, name: impl Into<String>, base_currency: CurrencyCode) -> Self {
        Self {
            id,
            name: name.into(),
            base_currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_creation() {
        let trip = Trip::new("Alps 2025", CurrencyCode::new("PLN"));
        assert_eq!(trip.name, "Alps 2025");
        assert_eq!(trip.base_currency.as_str(), "PLN");
    }

    #[test]
    fn test_trip_with_id_is_deterministic() {
        let id = Uuid::nil();
        let trip = Trip::with_id(id, "Coast", CurrencyCode::new("EUR"));
        assert_eq!(trip.id, Uuid::nil());
    }
}
