//! Random trip generation for stress testing and benchmarks.

pub mod generator;

pub use generator::{generate_random_trip, TripConfig};
