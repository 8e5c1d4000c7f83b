use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trip_ledger::budget::{BudgetAggregator, BudgetFilter};
use trip_ledger::settlement::BalanceEngine;
use trip_ledger::simulation::{generate_random_trip, TripConfig};

fn bench_balances_10_people(c: &mut Criterion) {
    let config = TripConfig {
        person_count: 10,
        expense_count: 50,
        ..Default::default()
    };
    let (trip, people, expenses) = generate_random_trip(&config);

    c.bench_function("balances_10_people", |b| {
        b.iter(|| {
            BalanceEngine::calculate_balances(
                black_box(&trip),
                black_box(&expenses),
                black_box(&people),
                true,
            )
        })
    });
}

fn bench_balances_100_people(c: &mut Criterion) {
    let config = TripConfig {
        person_count: 100,
        expense_count: 1_000,
        ..Default::default()
    };
    let (trip, people, expenses) = generate_random_trip(&config);

    c.bench_function("balances_100_people", |b| {
        b.iter(|| {
            BalanceEngine::calculate_balances(
                black_box(&trip),
                black_box(&expenses),
                black_box(&people),
                true,
            )
        })
    });
}

fn bench_balances_1000_people(c: &mut Criterion) {
    let config = TripConfig {
        person_count: 1_000,
        expense_count: 10_000,
        ..Default::default()
    };
    let (trip, people, expenses) = generate_random_trip(&config);

    c.bench_function("balances_1000_people", |b| {
        b.iter(|| {
            BalanceEngine::calculate_balances(
                black_box(&trip),
                black_box(&expenses),
                black_box(&people),
                true,
            )
        })
    });
}

fn bench_budget_summary(c: &mut Criterion) {
    let config = TripConfig {
        person_count: 50,
        expense_count: 2_000,
        ..Default::default()
    };
    let (trip, people, expenses) = generate_random_trip(&config);
    let filter = BudgetFilter::all();

    c.bench_function("budget_summary_2000_expenses", |b| {
        b.iter(|| {
            BudgetAggregator::summarize(
                black_box(&trip),
                black_box(&expenses),
                black_box(&people),
                &[],
                black_box(&filter),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_balances_10_people,
    bench_balances_100_people,
    bench_balances_1000_people,
    bench_budget_summary
);
criterion_main!(benches);
