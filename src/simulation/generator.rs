//! Random trip generation.
//!
//! Builds randomized expense snapshots to exercise the settlement and
//! budget pipelines under load (benches, the CLI `generate` command).

use crate::core::currency::{CurrencyCode, ExchangeRate};
use crate::core::expense::{Expense, ExpenseSet, ShareInput};
use crate::core::person::{Person, PersonId};
use crate::core::trip::Trip;
use crate::split::ShareCalculator;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random trip.
#[derive(Debug, Clone)]
pub struct TripConfig {
    /// Number of participants.
    pub person_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Original currencies to draw from. The first entry is the base
    /// currency; the others get a random rate against it.
    pub currencies: Vec<CurrencyCode>,
    /// Fraction of expenses that are direct transfers.
    pub transfer_ratio: f64,
    /// Fraction of expenses that are estimated (with a repeat multiplier).
    pub estimated_ratio: f64,
    /// Minimum expense value in minor units.
    pub min_amount_cents: i64,
    /// Maximum expense value in minor units.
    pub max_amount_cents: i64,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            person_count: 5,
            expense_count: 20,
            currencies: vec![CurrencyCode::new("PLN")],
            transfer_ratio: 0.1,
            estimated_ratio: 0.15,
            min_amount_cents: 100,
            max_amount_cents: 100_000,
        }
    }
}

/// Generate a random trip with a well-formed expense snapshot.
///
/// All split expenses go through [`ShareCalculator`], so the generated
/// set satisfies the share-exactness invariant by construction.
pub fn generate_random_trip(config: &TripConfig) -> (Trip, Vec<Person>, ExpenseSet) {
    let mut rng = rand::thread_rng();

    let base = config
        .currencies
        .first()
        .cloned()
        .unwrap_or_else(|| CurrencyCode::new("PLN"));
    let trip = Trip::new("generated trip", base.clone());

    let people: Vec<Person> = (0..config.person_count)
        .map(|i| Person::new(format!("person-{:03}", i), format!("Person {:03}", i)))
        .collect();

    // One fixed rate per currency for the whole trip.
    let rates: Vec<ExchangeRate> = config
        .currencies
        .iter()
        .map(|currency| {
            if *currency == base {
                ExchangeRate::base(base.clone())
            } else {
                let rate = Decimal::new(rng.gen_range(10..=2_000), 2);
                ExchangeRate::new(currency.clone(), rate)
            }
        })
        .collect();

    let mut expenses = ExpenseSet::new();
    for _ in 0..config.expense_count {
        let payer_idx = rng.gen_range(0..people.len());
        let payer = people[payer_idx].id.clone();
        let value = Decimal::new(
            rng.gen_range(config.min_amount_cents..=config.max_amount_cents),
            2,
        );
        let rate = rates[rng.gen_range(0..rates.len())].clone();

        if people.len() > 1 && rng.gen_bool(config.transfer_ratio) {
            let mut receiver_idx = rng.gen_range(0..people.len());
            while receiver_idx == payer_idx {
                receiver_idx = rng.gen_range(0..people.len());
            }
            expenses.add(Expense::transfer(
                value,
                payer,
                people[receiver_idx].id.clone(),
                rate,
            ));
            continue;
        }

        let participant_count = rng.gen_range(1..=people.len());
        let mut ids: Vec<PersonId> = people.iter().map(|p| p.id.clone()).collect();
        // Always include the payer, then fill with random others.
        ids.retain(|id| *id != payer);
        let mut chosen = vec![payer.clone()];
        while chosen.len() < participant_count && !ids.is_empty() {
            let idx = rng.gen_range(0..ids.len());
            chosen.push(ids.swap_remove(idx));
        }

        let inputs: Vec<ShareInput> = chosen.into_iter().map(ShareInput::equal).collect();
        let shares = ShareCalculator::compute_shares(value, &inputs)
            .expect("equal split over a non-empty participant set cannot fail");

        let mut expense = Expense::split(value, payer, rate, shares);
        if rng.gen_bool(config.estimated_ratio) {
            expense = expense.estimated(rng.gen_range(1..=5));
        }
        expenses.add(expense);
    }

    (trip, people, expenses)
}
