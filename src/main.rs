//! trip-ledger CLI
//!
//! Run balance settlement and budget summaries from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Who owes whom, minimal transactions
//! trip-ledger balances --input trip.json
//!
//! # Output as JSON
//! trip-ledger balances --input trip.json --format json
//!
//! # Spending by category and person, under a filter
//! trip-ledger budget --input trip.json --person anna --include-transfers
//!
//! # Generate a random trip for testing
//! trip-ledger generate --people 6 --expenses 40 --currencies PLN,EUR
//! ```

use rust_decimal::Decimal;
use std::fs;
use std::process;
use trip_ledger::budget::{BudgetAggregator, BudgetFilter};
use trip_ledger::core::currency::{CurrencyCode, ExchangeRate};
use trip_ledger::core::expense::{Expense, ExpenseSet, ShareInput};
use trip_ledger::core::person::{Category, CategoryId, Person, PersonId};
use trip_ledger::core::trip::Trip;
use trip_ledger::settlement::BalanceEngine;
use trip_ledger::simulation::{generate_random_trip, TripConfig};
use trip_ledger::split::ShareCalculator;

fn print_usage() {
    eprintln!(
        r#"trip-ledger: multi-currency trip expense settlement and budgets

USAGE:
    trip-ledger <COMMAND> [OPTIONS]

COMMANDS:
    balances    Compute net balances and a minimal settlement plan
    budget      Summarize spending by category and person under a filter
    generate    Generate a random trip file (for testing)
    help        Show this message

OPTIONS (balances):
    --input <FILE>        Path to JSON trip file
    --format <FORMAT>     Output format: text (default) or json
    --exclude-estimated   Leave estimated expenses out of the ledger

OPTIONS (budget):
    --input <FILE>        Path to JSON trip file
    --format <FORMAT>     Output format: text (default) or json
    --person <ID>         Only expenses involving this person
    --category <ID>       Only expenses in this category
    --include-transfers   Count direct transfers
    --include-estimated   Count estimated expenses

OPTIONS (generate):
    --people <N>          Number of participants (default: 5)
    --expenses <N>        Number of expenses (default: 20)
    --currencies <LIST>   Comma-separated currency codes, first is base
    --output <FILE>       Write to file instead of stdout

EXAMPLES:
    trip-ledger balances --input trip.json
    trip-ledger budget --input trip.json --category food --format json
    trip-ledger generate --people 6 --expenses 40 --currencies PLN,EUR"#
    );
}

/// JSON schema for input trip files.
#[derive(serde::Deserialize, serde::Serialize)]
struct TripFile {
    trip: TripInput,
    #[serde(default)]
    people: Vec<PersonInput>,
    #[serde(default)]
    categories: Vec<CategoryInput>,
    expenses: Vec<ExpenseInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct TripInput {
    name: String,
    currency: String,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct PersonInput {
    id: String,
    name: String,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct CategoryInput {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    value: String,
    payer: String,
    /// Original currency; defaults to the trip currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency: Option<String>,
    /// Rate to the trip currency; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transfer_to: Option<String>,
    #[serde(default)]
    estimated: bool,
    #[serde(default = "default_multiplier")]
    multiplier: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    shares: Vec<ShareInputEntry>,
}

fn default_multiplier() -> u32 {
    1
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ShareInputEntry {
    person: String,
    /// "equal", "amount" or "percentage".
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

fn parse_decimal(raw: &str, what: &str) -> Decimal {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Invalid {} '{}': {}", what, raw, e);
        process::exit(1);
    })
}

fn load_trip(path: &str) -> (Trip, Vec<Person>, Vec<Category>, ExpenseSet) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: TripFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "trip": {{ "name": "Alps 2025", "currency": "PLN" }},
  "people": [ {{ "id": "anna", "name": "Anna" }} ],
  "categories": [ {{ "id": "food", "name": "Food" }} ],
  "expenses": [
    {{ "value": "100.00", "payer": "anna", "category": "food",
      "shares": [ {{ "person": "anna", "kind": "equal" }},
                  {{ "person": "bob", "kind": "equal" }} ] }},
    {{ "value": "20.00", "payer": "bob", "currency": "EUR", "rate": "4.30",
      "transfer_to": "anna" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let base = CurrencyCode::new(&file.trip.currency);
    let trip = Trip::new(&file.trip.name, base.clone());
    let people: Vec<Person> = file
        .people
        .iter()
        .map(|p| Person::new(&*p.id, &*p.name))
        .collect();
    let categories: Vec<Category> = file
        .categories
        .iter()
        .map(|c| {
            let cat = Category::new(&*c.id, &*c.name);
            match &c.color {
                Some(color) => cat.with_color(color),
                None => cat,
            }
        })
        .collect();

    let mut expenses = ExpenseSet::new();
    for input in file.expenses {
        let value = parse_decimal(&input.value, "expense value");
        let rate = match (&input.currency, &input.rate) {
            (Some(currency), Some(rate)) => ExchangeRate::new(
                CurrencyCode::new(currency),
                parse_decimal(rate, "exchange rate"),
            ),
            (None, None) => ExchangeRate::base(base.clone()),
            _ => {
                eprintln!(
                    "Expense of {} must set 'currency' and 'rate' together",
                    input.value
                );
                process::exit(1);
            }
        };
        let payer = PersonId::new(&input.payer);

        let mut expense = if let Some(receiver) = &input.transfer_to {
            if !input.shares.is_empty() {
                eprintln!("A transfer cannot carry shares (payer {})", input.payer);
                process::exit(1);
            }
            Expense::transfer(value, payer, PersonId::new(receiver), rate)
        } else {
            let inputs: Vec<ShareInput> = input
                .shares
                .iter()
                .map(|s| match s.kind.as_str() {
                    "equal" => ShareInput::equal(&*s.person),
                    "amount" => {
                        let v = s.value.as_deref().unwrap_or_else(|| {
                            eprintln!("Share kind 'amount' requires a value");
                            process::exit(1);
                        });
                        ShareInput::amount(&*s.person, parse_decimal(v, "share amount"))
                    }
                    "percentage" => {
                        let v = s.value.as_deref().unwrap_or_else(|| {
                            eprintln!("Share kind 'percentage' requires a value");
                            process::exit(1);
                        });
                        ShareInput::percentage(&*s.person, parse_decimal(v, "share percentage"))
                    }
                    other => {
                        eprintln!(
                            "Unknown share kind '{}' (expected equal, amount or percentage)",
                            other
                        );
                        process::exit(1);
                    }
                })
                .collect();

            let shares = ShareCalculator::compute_shares(value, &inputs).unwrap_or_else(|e| {
                eprintln!("Invalid shares for expense of {}: {}", value, e);
                process::exit(1);
            });
            Expense::split(value, payer, rate, shares)
        };

        if let Some(category) = &input.category {
            expense = expense.with_category(CategoryId::new(category));
        }
        if input.estimated {
            expense = expense.estimated(input.multiplier.max(1));
        }
        expenses.add(expense);
    }

    (trip, people, categories, expenses)
}

fn cmd_balances(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut include_estimated = true;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--exclude-estimated" => include_estimated = false,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let (trip, people, _categories, expenses) = load_trip(&path);
    let report = BalanceEngine::calculate_balances(&trip, &expenses, &people, include_estimated)
        .unwrap_or_else(|e| {
            eprintln!("Computation failed: {}", e);
            process::exit(1);
        });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        println!("{}", report);
    }
}

fn cmd_budget(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut filter = BudgetFilter::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--person" => {
                i += 1;
                filter.person = Some(PersonId::new(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--person requires a person id");
                    process::exit(1);
                })));
            }
            "--category" => {
                i += 1;
                filter.category =
                    Some(CategoryId::new(args.get(i).cloned().unwrap_or_else(|| {
                        eprintln!("--category requires a category id");
                        process::exit(1);
                    })));
            }
            "--include-transfers" => filter.include_transfers = true,
            "--include-estimated" => filter.include_estimated = true,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let (trip, people, categories, expenses) = load_trip(&path);
    let summary = BudgetAggregator::summarize(&trip, &expenses, &people, &categories, &filter)
        .unwrap_or_else(|e| {
            eprintln!("Computation failed: {}", e);
            process::exit(1);
        });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
    } else {
        println!("{}", summary);
    }
}

fn cmd_generate(args: &[String]) {
    let mut people = 5usize;
    let mut expense_count = 20usize;
    let mut currencies_str = "PLN".to_string();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--people" => {
                i += 1;
                people = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--people requires a number");
                    process::exit(1);
                });
            }
            "--expenses" => {
                i += 1;
                expense_count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--expenses requires a number");
                    process::exit(1);
                });
            }
            "--currencies" => {
                i += 1;
                currencies_str = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--currencies requires a comma-separated list");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let currencies: Vec<CurrencyCode> = currencies_str
        .split(',')
        .map(|s| CurrencyCode::new(s.trim()))
        .collect();

    let config = TripConfig {
        person_count: people,
        expense_count,
        currencies,
        ..Default::default()
    };

    let (trip, persons, expenses) = generate_random_trip(&config);

    let output = TripFile {
        trip: TripInput {
            name: trip.name.clone(),
            currency: trip.base_currency.to_string(),
        },
        people: persons
            .iter()
            .map(|p| PersonInput {
                id: p.id.to_string(),
                name: p.display_name.clone(),
            })
            .collect(),
        categories: Vec::new(),
        expenses: expenses
            .expenses()
            .iter()
            .map(|e| ExpenseInput {
                value: e.value().to_string(),
                payer: e.payer().to_string(),
                currency: (e.exchange_rate().currency != trip.base_currency)
                    .then(|| e.exchange_rate().currency.to_string()),
                rate: (e.exchange_rate().currency != trip.base_currency)
                    .then(|| e.exchange_rate().rate.to_string()),
                category: None,
                transfer_to: e.transferred_to().map(|p| p.to_string()),
                estimated: e.is_estimated(),
                multiplier: e.multiplier(),
                shares: e
                    .participants()
                    .iter()
                    .map(|p| ShareInputEntry {
                        person: p.person.to_string(),
                        kind: "equal".to_string(),
                        value: None,
                    })
                    .collect(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} people → {}",
            expenses.len(),
            people,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "budget" => cmd_budget(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
