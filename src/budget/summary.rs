use crate::core::currency::{CurrencyCode, RateError};
use crate::core::expense::{Expense, ExpenseSet};
use crate::core::person::{Category, CategoryId, Person, PersonId};
use crate::core::trip::Trip;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Caller-supplied restriction on which expenses enter a budget summary.
///
/// The person filter keeps expenses the person is involved in as payer,
/// participant or transfer receiver. The category filter keeps matching
/// split expenses; transfers carry no category and never match it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetFilter {
    pub person: Option<PersonId>,
    pub category: Option<CategoryId>,
    pub include_transfers: bool,
    pub include_estimated: bool,
}

impl BudgetFilter {
    /// Everything included, nothing restricted.
    pub fn all() -> Self {
        Self {
            person: None,
            category: None,
            include_transfers: true,
            include_estimated: true,
        }
    }

    fn matches(&self, expense: &Expense) -> bool {
        if expense.is_transfer() && !self.include_transfers {
            return false;
        }
        if expense.is_estimated() && !self.include_estimated {
            return false;
        }
        if let Some(person) = &self.person {
            let involved = expense.payer() == person
                || expense.transferred_to() == Some(person)
                || expense.participants().iter().any(|p| &p.person == person);
            if !involved {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if expense.category() != Some(category) {
                return false;
            }
        }
        true
    }
}

/// Actual / estimated / transferred totals of one group, in base currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Bucket {
    actual: Decimal,
    estimated: Decimal,
    transferred: Decimal,
}

impl Bucket {
    fn total(&self) -> Decimal {
        self.actual + self.estimated + self.transferred
    }
}

/// Spending grouped under one category. `category` is `None` for
/// uncategorized expenses and transfers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Option<CategoryId>,
    pub name: String,
    pub actual: Decimal,
    pub estimated: Decimal,
    pub transferred: Decimal,
    pub percentage_of_total: f64,
}

impl CategorySummary {
    pub fn total(&self) -> Decimal {
        self.actual + self.estimated + self.transferred
    }

    /// Budget-vs-actual delta, not a debt.
    pub fn balance(&self) -> Decimal {
        self.actual - self.estimated
    }
}

/// Spending grouped under one person (the payer; transfers under the
/// sender).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub person: PersonId,
    pub display_name: String,
    pub actual: Decimal,
    pub estimated: Decimal,
    pub transferred: Decimal,
    pub percentage_of_total: f64,
}

impl PersonSummary {
    pub fn total(&self) -> Decimal {
        self.actual + self.estimated + self.transferred
    }

    pub fn balance(&self) -> Decimal {
        self.actual - self.estimated
    }
}

/// How spending is distributed across categories and people, under a
/// filter. Computed fresh per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub trip_id: Uuid,
    pub trip_currency: CurrencyCode,
    /// The filter this summary was computed under, echoed back.
    pub filter: BudgetFilter,
    pub total_actual: Decimal,
    pub total_estimated: Decimal,
    pub total_transferred: Decimal,
    pub categories: Vec<CategorySummary>,
    pub people: Vec<PersonSummary>,
}

impl BudgetSummary {
    pub fn grand_total(&self) -> Decimal {
        self.total_actual + self.total_estimated + self.total_transferred
    }

    /// Overall budget-vs-actual delta.
    pub fn balance(&self) -> Decimal {
        self.total_actual - self.total_estimated
    }
}

/// Filters the expense set, then groups normalized amounts by category
/// and by person.
pub struct BudgetAggregator;

impl BudgetAggregator {
    /// Summarize a trip's spending under a filter.
    ///
    /// Filtering happens before aggregation, so percentages are relative
    /// to the filtered grand total. When that total is zero every
    /// percentage is 0 rather than a division error.
    pub fn summarize(
        trip: &Trip,
        expenses: &ExpenseSet,
        people: &[Person],
        categories: &[Category],
        filter: &BudgetFilter,
    ) -> Result<BudgetSummary, RateError> {
        let mut by_category: BTreeMap<Option<CategoryId>, Bucket> = BTreeMap::new();
        let mut by_person: BTreeMap<PersonId, Bucket> = BTreeMap::new();
        let mut totals = Bucket::default();
        let mut included = 0usize;

        for expense in expenses.expenses() {
            if !filter.matches(expense) {
                continue;
            }
            included += 1;
            let amount = expense
                .exchange_rate()
                .normalize(expense.effective_value())?;

            let category_bucket = by_category.entry(expense.category().cloned()).or_default();
            let person_bucket = by_person.entry(expense.payer().clone()).or_default();

            if expense.is_transfer() {
                category_bucket.transferred += amount;
                person_bucket.transferred += amount;
                totals.transferred += amount;
            } else if expense.is_estimated() {
                category_bucket.estimated += amount;
                person_bucket.estimated += amount;
                totals.estimated += amount;
            } else {
                category_bucket.actual += amount;
                person_bucket.actual += amount;
                totals.actual += amount;
            }
        }

        debug!(
            "budget summary for trip '{}': {} of {} expenses pass the filter",
            trip.name,
            included,
            expenses.len()
        );

        let grand_total = totals.total();
        let category_names: HashMap<&CategoryId, &str> = categories
            .iter()
            .map(|c| (&c.id, c.name.as_str()))
            .collect();
        let person_names: HashMap<&PersonId, &str> = people
            .iter()
            .map(|p| (&p.id, p.display_name.as_str()))
            .collect();

        let categories = by_category
            .into_iter()
            .map(|(category, bucket)| CategorySummary {
                name: match &category {
                    Some(id) => category_names
                        .get(id)
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| id.to_string()),
                    None => "uncategorized".to_string(),
                },
                percentage_of_total: percentage(bucket.total(), grand_total),
                category,
                actual: bucket.actual,
                estimated: bucket.estimated,
                transferred: bucket.transferred,
            })
            .collect();

        let people = by_person
            .into_iter()
            .map(|(person, bucket)| PersonSummary {
                display_name: person_names
                    .get(&person)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| person.to_string()),
                percentage_of_total: percentage(bucket.total(), grand_total),
                person,
                actual: bucket.actual,
                estimated: bucket.estimated,
                transferred: bucket.transferred,
            })
            .collect();

        Ok(BudgetSummary {
            trip_id: trip.id,
            trip_currency: trip.base_currency.clone(),
            filter: filter.clone(),
            total_actual: totals.actual,
            total_estimated: totals.estimated,
            total_transferred: totals.transferred,
            categories,
            people,
        })
    }
}

/// Group share of the grand total as a percentage; 0 when the total is
/// zero.
fn percentage(group: Decimal, grand_total: Decimal) -> f64 {
    if grand_total == Decimal::ZERO {
        return 0.0;
    }
    let pct = group * Decimal::from(100) / grand_total;
    pct.to_string().parse::<f64>().unwrap_or(0.0)
}

impl std::fmt::Display for BudgetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Budget Summary ({}) ===", self.trip_currency)?;
        writeln!(f, "Actual:      {}", self.total_actual)?;
        writeln!(f, "Estimated:   {}", self.total_estimated)?;
        writeln!(f, "Transferred: {}", self.total_transferred)?;
        writeln!(f, "Balance:     {}", self.balance())?;

        writeln!(f, "\nBy category:")?;
        for cat in &self.categories {
            writeln!(
                f,
                "  {:<20} {:>10}  ({:.1}%)",
                cat.name,
                cat.total(),
                cat.percentage_of_total
            )?;
        }

        writeln!(f, "\nBy person:")?;
        for person in &self.people {
            writeln!(
                f,
                "  {:<20} {:>10}  ({:.1}%)",
                person.display_name,
                person.total(),
                person.percentage_of_total
            )?;
        }
        Ok(())
    }
}
