use crate::core::person::{Person, PersonId};
use crate::settlement::ledger::TripLedger;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Signed net position of one participant, in base currency.
///
/// Positive `net_balance` means others owe this person; negative means
/// this person owes others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantBalance {
    pub person_id: PersonId,
    pub display_name: String,
    pub paid: Decimal,
    pub owed: Decimal,
    pub sent_transfers: Decimal,
    pub received_transfers: Decimal,
    pub net_balance: Decimal,
}

/// Turns aggregated per-person totals into signed net balances.
///
/// `net = paid − owed + received_transfers − sent_transfers`: every share
/// is counted once as a debit (in someone's `owed`) and once as a credit
/// (in the payer's `paid`), so the net balances sum to zero exactly,
/// by construction.
pub struct NetBalanceResolver;

impl NetBalanceResolver {
    /// Resolve a ledger into one balance row per participant, sorted by
    /// person id.
    ///
    /// `people` supplies display names; persons missing from it fall back
    /// to their id.
    pub fn resolve(ledger: &TripLedger, people: &[Person]) -> Vec<ParticipantBalance> {
        let names: HashMap<&PersonId, &str> = people
            .iter()
            .map(|p| (&p.id, p.display_name.as_str()))
            .collect();

        ledger
            .entries()
            .iter()
            .map(|(person, entry)| ParticipantBalance {
                person_id: person.clone(),
                display_name: names
                    .get(person)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| person.to_string()),
                paid: entry.paid,
                owed: entry.owed,
                sent_transfers: entry.sent_transfers,
                received_transfers: entry.received_transfers,
                net_balance: entry.paid - entry.owed + entry.received_transfers
                    - entry.sent_transfers,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::{CurrencyCode, ExchangeRate};
    use crate::core::expense::{Expense, ExpenseSet, ShareInput};
    use crate::settlement::ledger::LedgerAggregator;
    use crate::split::ShareCalculator;
    use rust_decimal_macros::dec;

    fn pln() -> ExchangeRate {
        ExchangeRate::base(CurrencyCode::new("PLN"))
    }

    fn people() -> Vec<Person> {
        vec![
            Person::new("anna", "Anna"),
            Person::new("bob", "Bob"),
            Person::new("carol", "Carol"),
        ]
    }

    #[test]
    fn test_equal_split_balances() {
        let shares = ShareCalculator::compute_shares(
            dec!(100.00),
            &[
                ShareInput::equal("anna"),
                ShareInput::equal("bob"),
                ShareInput::equal("carol"),
            ],
        )
        .unwrap();
        let mut set = ExpenseSet::new();
        set.add(Expense::split(
            dec!(100.00),
            PersonId::new("anna"),
            pln(),
            shares,
        ));

        let ledger = LedgerAggregator::aggregate(&set, true).unwrap();
        let balances = NetBalanceResolver::resolve(&ledger, &people());

        assert_eq!(balances.len(), 3);
        assert_eq!(balances[0].person_id, PersonId::new("anna"));
        assert_eq!(balances[0].display_name, "Anna");
        assert_eq!(balances[0].net_balance, dec!(66.67));
        assert_eq!(balances[1].net_balance, dec!(-33.33));
        assert_eq!(balances[2].net_balance, dec!(-33.34));

        let total: Decimal = balances.iter().map(|b| b.net_balance).sum();
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_transfer_signs() {
        // Scenario: anna transfers 50.00 to bob. The sender's net balance
        // decreases, the receiver's increases.
        let mut set = ExpenseSet::new();
        set.add(Expense::transfer(
            dec!(50.00),
            PersonId::new("anna"),
            PersonId::new("bob"),
            pln(),
        ));

        let ledger = LedgerAggregator::aggregate(&set, true).unwrap();
        let balances = NetBalanceResolver::resolve(&ledger, &people());

        assert_eq!(balances[0].net_balance, dec!(-50.00));
        assert_eq!(balances[1].net_balance, dec!(50.00));
    }

    #[test]
    fn test_unknown_person_falls_back_to_id() {
        let mut set = ExpenseSet::new();
        set.add(Expense::transfer(
            dec!(10.00),
            PersonId::new("dave"),
            PersonId::new("anna"),
            pln(),
        ));
        let ledger = LedgerAggregator::aggregate(&set, true).unwrap();
        let balances = NetBalanceResolver::resolve(&ledger, &people());
        let dave = balances
            .iter()
            .find(|b| b.person_id == PersonId::new("dave"))
            .unwrap();
        assert_eq!(dave.display_name, "dave");
    }

    #[test]
    fn test_resolve_is_sorted_by_person_id() {
        let shares = ShareCalculator::compute_shares(
            dec!(30.00),
            &[ShareInput::equal("carol"), ShareInput::equal("anna")],
        )
        .unwrap();
        let mut set = ExpenseSet::new();
        set.add(Expense::split(
            dec!(30.00),
            PersonId::new("carol"),
            pln(),
            shares,
        ));
        let ledger = LedgerAggregator::aggregate(&set, true).unwrap();
        let balances = NetBalanceResolver::resolve(&ledger, &people());
        assert_eq!(balances[0].person_id, PersonId::new("anna"));
        assert_eq!(balances[1].person_id, PersonId::new("carol"));
    }
}
