use crate::core::expense::{Expense, ExpenseSet};
use crate::core::person::PersonId;
use crate::settlement::SettlementError;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-person totals in the trip's base currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Normalized value of split expenses this person paid for.
    pub paid: Decimal,
    /// Normalized sum of this person's shares across all split expenses,
    /// their own shares on expenses they paid included.
    pub owed: Decimal,
    /// Normalized transfers received.
    pub received_transfers: Decimal,
    /// Normalized transfers sent.
    pub sent_transfers: Decimal,
}

/// Accumulated per-participant totals of one trip.
///
/// Keyed by person id in a `BTreeMap` so that iteration order, and
/// therefore every downstream DTO, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripLedger {
    entries: BTreeMap<PersonId, LedgerEntry>,
}

impl TripLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &BTreeMap<PersonId, LedgerEntry> {
        &self.entries
    }

    pub fn entry(&self, person: &PersonId) -> Option<&LedgerEntry> {
        self.entries.get(person)
    }

    fn entry_mut(&mut self, person: &PersonId) -> &mut LedgerEntry {
        self.entries.entry(person.clone()).or_default()
    }

    /// Money conservation check: everything paid is owed by someone, and
    /// every transfer sent was received.
    pub fn is_balanced(&self) -> bool {
        let mut paid = Decimal::ZERO;
        let mut owed = Decimal::ZERO;
        let mut sent = Decimal::ZERO;
        let mut received = Decimal::ZERO;
        for entry in self.entries.values() {
            paid += entry.paid;
            owed += entry.owed;
            sent += entry.sent_transfers;
            received += entry.received_transfers;
        }
        paid == owed && sent == received
    }
}

/// Walks all expenses and transfers of a trip and accumulates per-person
/// totals, normalized to the base currency.
///
/// Per-participant shares are normalized with the expense's own rate; the
/// per-expense rounding residual of the normalized shares is assigned to
/// the last participant, so the normalized shares of every expense sum to
/// its normalized value exactly. Without this the per-share rounding
/// would leak cents and break conservation.
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Accumulate a trip's expense snapshot into a [`TripLedger`].
    ///
    /// Estimated expenses are included or excluded whole under
    /// `include_estimated`, never partially.
    pub fn aggregate(
        expenses: &ExpenseSet,
        include_estimated: bool,
    ) -> Result<TripLedger, SettlementError> {
        let mut ledger = TripLedger::new();

        for expense in expenses.expenses() {
            if expense.is_estimated() && !include_estimated {
                continue;
            }
            if expense.is_transfer() {
                Self::apply_transfer(&mut ledger, expense)?;
            } else {
                Self::apply_split(&mut ledger, expense)?;
            }
        }

        debug!(
            "aggregated {} expenses into {} ledger entries",
            expenses.len(),
            ledger.entries().len()
        );
        Ok(ledger)
    }

    fn apply_split(ledger: &mut TripLedger, expense: &Expense) -> Result<(), SettlementError> {
        let rate = expense.exchange_rate();
        let normalized_value = rate.normalize(expense.effective_value())?;
        ledger.entry_mut(expense.payer()).paid += normalized_value;

        let scale = expense.share_scale();
        let participants = expense.participants();
        let mut allocated = Decimal::ZERO;
        for (idx, participant) in participants.iter().enumerate() {
            let is_last = idx + 1 == participants.len();
            let share = if is_last {
                normalized_value - allocated
            } else {
                rate.normalize(participant.actual_share_value * scale)?
            };
            allocated += share;
            ledger.entry_mut(&participant.person).owed += share;
        }
        Ok(())
    }

    fn apply_transfer(ledger: &mut TripLedger, expense: &Expense) -> Result<(), SettlementError> {
        let normalized = expense
            .exchange_rate()
            .normalize(expense.effective_value())?;
        ledger.entry_mut(expense.payer()).sent_transfers += normalized;
        if let Some(receiver) = expense.transferred_to() {
            ledger.entry_mut(receiver).received_transfers += normalized;
        }
        Ok(())
    }
}
