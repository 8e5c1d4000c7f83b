//! Filtered budget aggregation: category- and person-level summaries.

pub mod summary;

pub use summary::{
    BudgetAggregator, BudgetFilter, BudgetSummary, CategorySummary, PersonSummary,
};
