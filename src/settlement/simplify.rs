use crate::core::currency::round_minor;
use crate::core::person::PersonId;
use crate::settlement::balance::ParticipantBalance;
use crate::settlement::SettlementError;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One settlement instruction: `from` pays `to` exactly `amount`,
/// in base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtDetail {
    pub from: PersonId,
    pub to: PersonId,
    pub amount: Decimal,
}

impl std::fmt::Display for DebtDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pays {} {}", self.from, self.to, self.amount)
    }
}

/// Balances closer to zero than this are treated as settled. Half of the
/// minor unit: legitimate balances are already cent-precise, so this only
/// absorbs upstream dust.
const EPSILON: Decimal = dec!(0.005);

/// Produces a minimal list of pairwise settlement transactions from a set
/// of net balances.
///
/// Classic greedy matching: repeatedly pair the largest remaining
/// creditor with the largest remaining debtor (tie-break: lower person
/// id) and settle the smaller of the two amounts. For N participants with
/// nonzero balance this emits at most N−1 transactions, and applying them
/// all drives every balance to exactly zero.
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Compute settlement transactions.
    ///
    /// Fails with [`SettlementError::UnbalancedLedger`] when total credits
    /// and debits disagree beyond tolerance: an invariant violation in an
    /// earlier stage that must never be silently corrected here.
    pub fn simplify(
        balances: &[ParticipantBalance],
    ) -> Result<Vec<DebtDetail>, SettlementError> {
        let mut creditors: Vec<(PersonId, Decimal)> = Vec::new();
        let mut debtors: Vec<(PersonId, Decimal)> = Vec::new();

        for balance in balances {
            if balance.net_balance > EPSILON {
                creditors.push((balance.person_id.clone(), balance.net_balance));
            } else if balance.net_balance < -EPSILON {
                debtors.push((balance.person_id.clone(), -balance.net_balance));
            }
        }

        let credits: Decimal = creditors.iter().map(|(_, c)| *c).sum();
        let debits: Decimal = debtors.iter().map(|(_, d)| *d).sum();
        if (credits - debits).abs() > EPSILON {
            return Err(SettlementError::UnbalancedLedger { credits, debits });
        }

        let mut transactions = Vec::new();
        while !creditors.is_empty() && !debtors.is_empty() {
            let ci = largest(&creditors);
            let di = largest(&debtors);

            let amount = creditors[ci].1.min(debtors[di].1);
            transactions.push(DebtDetail {
                from: debtors[di].0.clone(),
                to: creditors[ci].0.clone(),
                amount: round_minor(amount),
            });

            creditors[ci].1 -= amount;
            debtors[di].1 -= amount;
            creditors.retain(|(_, c)| *c > EPSILON);
            debtors.retain(|(_, d)| *d > EPSILON);
        }

        debug!(
            "settled {} unsettled balances with {} transactions",
            balances
                .iter()
                .filter(|b| b.net_balance.abs() > EPSILON)
                .count(),
            transactions.len()
        );
        Ok(transactions)
    }
}

/// Index of the entry with the largest amount; ties go to the lower
/// person id, for determinism.
fn largest(entries: &[(PersonId, Decimal)]) -> usize {
    entries
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
