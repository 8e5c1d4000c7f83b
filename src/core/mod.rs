//! Foundational types: currencies and rates, people and categories,
//! trips, expenses.

pub mod currency;
pub mod expense;
pub mod person;
pub mod trip;
