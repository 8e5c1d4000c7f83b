//! # trip-ledger
//!
//! Multi-currency trip expense ledger, minimal-transaction settlement
//! and budget engine.
//!
//! Given a snapshot of a trip's shared expenses and direct transfers in
//! possibly different currencies, this engine answers two questions:
//! who owes whom how much to settle up with the fewest transactions,
//! and how spending is distributed across categories and people under
//! a filter.
//!
//! All computations are pure, synchronous functions over the supplied
//! snapshot; fetching and storing expenses is the caller's concern.
//!
//! ## Architecture
//!
//! - **core**: foundational types (currencies and rates, people,
//!   trips, expenses)
//! - **split**: per-expense share computation (equal / amount /
//!   percentage, exact to the cent)
//! - **settlement**: ledger aggregation, net balances, greedy
//!   minimal-transaction settlement
//! - **budget**: filtered category- and person-level spending summaries
//! - **simulation**: random trip generation for stress testing

pub mod budget;
pub mod core;
pub mod settlement;
pub mod simulation;
pub mod split;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::budget::{BudgetAggregator, BudgetFilter, BudgetSummary};
    pub use crate::core::currency::{CurrencyCode, ExchangeRate};
    pub use crate::core::expense::{Expense, ExpenseSet, ShareInput, ShareKind};
    pub use crate::core::person::{Category, CategoryId, Person, PersonId};
    pub use crate::core::trip::Trip;
    pub use crate::settlement::{BalanceEngine, BalanceReport, SettlementError};
    pub use crate::split::{ShareCalculator, ShareError};
}
