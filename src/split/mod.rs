//! Per-expense share computation.

pub mod shares;

pub use shares::{ShareCalculator, ShareError};
