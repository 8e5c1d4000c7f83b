use crate::core::currency::CurrencyCode;
use crate::core::expense::ExpenseSet;
use crate::core::person::Person;
use crate::core::trip::Trip;
use crate::settlement::balance::{NetBalanceResolver, ParticipantBalance};
use crate::settlement::ledger::LedgerAggregator;
use crate::settlement::simplify::{DebtDetail, DebtSimplifier};
use crate::settlement::SettlementError;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who owes whom, and how much, to settle a trip with the fewest
/// transactions. Recomputed fresh from the expense snapshot on every
/// request; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub trip_id: Uuid,
    pub trip_name: String,
    pub trip_currency: CurrencyCode,
    pub participant_balances: Vec<ParticipantBalance>,
    pub debt_details: Vec<DebtDetail>,
}

impl BalanceReport {
    /// Sum of all net balances. Zero for any well-formed expense set.
    pub fn net_total(&self) -> Decimal {
        self.participant_balances
            .iter()
            .map(|b| b.net_balance)
            .sum()
    }
}

/// The settlement pipeline: aggregate → resolve → simplify.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::{CurrencyCode, ExchangeRate};
/// use trip_ledger::core::expense::{Expense, ExpenseSet, ShareInput};
/// use trip_ledger::core::person::{Person, PersonId};
/// use trip_ledger::core::trip::Trip;
/// use trip_ledger::settlement::BalanceEngine;
/// use trip_ledger::split::ShareCalculator;
/// use rust_decimal_macros::dec;
///
/// let trip = Trip::new("Alps", CurrencyCode::new("PLN"));
/// let people = vec![Person::new("anna", "Anna"), Person::new("bob", "Bob")];
///
/// let shares = ShareCalculator::compute_shares(
///     dec!(80.00),
///     &[ShareInput::equal("anna"), ShareInput::equal("bob")],
/// ).unwrap();
/// let mut expenses = ExpenseSet::new();
/// expenses.add(Expense::split(
///     dec!(80.00),
///     PersonId::new("anna"),
///     ExchangeRate::base(CurrencyCode::new("PLN")),
///     shares,
/// ));
///
/// let report = BalanceEngine::calculate_balances(&trip, &expenses, &people, true).unwrap();
/// assert_eq!(report.debt_details.len(), 1);
/// assert_eq!(report.debt_details[0].amount, dec!(40.00));
/// ```
pub struct BalanceEngine;

impl BalanceEngine {
    /// Compute the full balance report for one trip.
    ///
    /// Pure and deterministic: the same snapshot always yields the same
    /// report. Estimated expenses are included under `include_estimated`.
    pub fn calculate_balances(
        trip: &Trip,
        expenses: &ExpenseSet,
        people: &[Person],
        include_estimated: bool,
    ) -> Result<BalanceReport, SettlementError> {
        debug!(
            "calculating balances for trip '{}' over {} expenses",
            trip.name,
            expenses.len()
        );
        let ledger = LedgerAggregator::aggregate(expenses, include_estimated)?;
        let participant_balances = NetBalanceResolver::resolve(&ledger, people);
        let debt_details = DebtSimplifier::simplify(&participant_balances)?;

        Ok(BalanceReport {
            trip_id: trip.id,
            trip_name: trip.name.clone(),
            trip_currency: trip.base_currency.clone(),
            participant_balances,
            debt_details,
        })
    }
}

impl std::fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Balances: {} ({}) ===", self.trip_name, self.trip_currency)?;
        for balance in &self.participant_balances {
            writeln!(
                f,
                "  {:<20} paid {:>10}  owed {:>10}  net {:>10}",
                balance.display_name, balance.paid, balance.owed, balance.net_balance
            )?;
        }
        if self.debt_details.is_empty() {
            writeln!(f, "\nAll settled.")?;
        } else {
            writeln!(f, "\nSettlement plan:")?;
            for debt in &self.debt_details {
                writeln!(f, "  {} {}", debt, self.trip_currency)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::ExchangeRate;
    use crate::core::expense::{Expense, ShareInput};
    use crate::core::person::PersonId;
    use crate::split::ShareCalculator;
    use rust_decimal_macros::dec;

    fn setup() -> (Trip, Vec<Person>, ExpenseSet) {
        let trip = Trip::new("Alps 2025", CurrencyCode::new("PLN"));
        let people = vec![
            Person::new("anna", "Anna"),
            Person::new("bob", "Bob"),
            Person::new("carol", "Carol"),
        ];
        let shares = ShareCalculator::compute_shares(
            dec!(100.00),
            &[
                ShareInput::equal("anna"),
                ShareInput::equal("bob"),
                ShareInput::equal("carol"),
            ],
        )
        .unwrap();
        let mut expenses = ExpenseSet::new();
        expenses.add(Expense::split(
            dec!(100.00),
            PersonId::new("anna"),
            ExchangeRate::base(CurrencyCode::new("PLN")),
            shares,
        ));
        (trip, people, expenses)
    }

    #[test]
    fn test_full_pipeline() {
        let (trip, people, expenses) = setup();
        let report = BalanceEngine::calculate_balances(&trip, &expenses, &people, true).unwrap();

        assert_eq!(report.trip_currency, CurrencyCode::new("PLN"));
        assert_eq!(report.participant_balances.len(), 3);
        assert_eq!(report.debt_details.len(), 2);
        assert_eq!(report.net_total(), Decimal::ZERO);
    }

    #[test]
    fn test_idempotence() {
        let (trip, people, expenses) = setup();
        let a = BalanceEngine::calculate_balances(&trip, &expenses, &people, true).unwrap();
        let b = BalanceEngine::calculate_balances(&trip, &expenses, &people, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_mentions_settlement_plan() {
        let (trip, people, expenses) = setup();
        let report = BalanceEngine::calculate_balances(&trip, &expenses, &people, true).unwrap();
        let text = format!("{}", report);
        assert!(text.contains("Settlement plan:"));
        assert!(text.contains("Anna"));
    }

    #[test]
    fn test_empty_trip_is_settled() {
        let trip = Trip::new("Nowhere", CurrencyCode::new("PLN"));
        let report =
            BalanceEngine::calculate_balances(&trip, &ExpenseSet::new(), &[], true).unwrap();
        assert!(report.participant_balances.is_empty());
        assert!(report.debt_details.is_empty());
        assert!(format!("{}", report).contains("All settled."));
    }
}
