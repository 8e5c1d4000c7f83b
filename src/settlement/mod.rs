//! Ledger aggregation, net balances and minimal-transaction settlement.

pub mod balance;
pub mod engine;
pub mod ledger;
pub mod simplify;

use crate::core::currency::RateError;
use rust_decimal::Decimal;
use thiserror::Error;

pub use balance::{NetBalanceResolver, ParticipantBalance};
pub use engine::{BalanceEngine, BalanceReport};
pub use ledger::{LedgerAggregator, LedgerEntry, TripLedger};
pub use simplify::{DebtDetail, DebtSimplifier};

/// Errors raised by the settlement pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// Credits and debits disagree beyond tolerance. This signals a defect
    /// in an earlier stage, never user input; the whole computation aborts
    /// rather than emit a partially reconciled result.
    #[error("unbalanced ledger: credits {credits} vs debits {debits}")]
    UnbalancedLedger { credits: Decimal, debits: Decimal },
    #[error(transparent)]
    Rate(#[from] RateError),
}
