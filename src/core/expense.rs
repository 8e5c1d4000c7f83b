use crate::core::currency::{CurrencyCode, ExchangeRate};
use crate::core::person::{CategoryId, PersonId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a participant's share of a split expense is specified.
///
/// Fixed kinds (`Amount`, `Percentage`) are resolved first; `Equal`
/// participants split whatever value the fixed kinds leave unclaimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum ShareKind {
    /// Equal part of the value not claimed by fixed entries.
    Equal,
    /// Absolute amount in the expense's original currency.
    Amount(Decimal),
    /// Percentage of the expense value, 0–100.
    Percentage(Decimal),
}

/// One participant's share request for a split expense, as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareInput {
    pub person: PersonId,
    pub kind: ShareKind,
}

impl ShareInput {
    pub fn equal(person: impl Into<PersonId>) -> Self {
        Self {
            person: person.into(),
            kind: ShareKind::Equal,
        }
    }

    pub fn amount(person: impl Into<PersonId>, value: Decimal) -> Self {
        Self {
            person: person.into(),
            kind: ShareKind::Amount(value),
        }
    }

    pub fn percentage(person: impl Into<PersonId>, value: Decimal) -> Self {
        Self {
            person: person.into(),
            kind: ShareKind::Percentage(value),
        }
    }
}

/// A participant's computed share of one expense.
///
/// `share` is the fraction of the expense (0..1); `actual_share_value` is
/// the exact monetary share in the expense's original currency. Across a
/// split expense the actual values sum to the expense value exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseParticipant {
    pub person: PersonId,
    pub share: Decimal,
    pub actual_share_value: Decimal,
}

/// A recorded cost on a trip.
///
/// Comes in two mutually exclusive shapes, enforced by the constructors:
///
/// - **Split expense**: a non-empty set of participants shares the value;
///   no `transferred_to`.
/// - **Transfer**: moves exactly the value from the payer to
///   `transferred_to`; no category and no participants.
///
/// The value is denominated in the currency of the captured
/// [`ExchangeRate`]; estimated expenses may carry a `multiplier` that
/// scales the value for repeated planned costs.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::currency::{CurrencyCode, ExchangeRate};
/// use trip_ledger::core::expense::Expense;
/// use trip_ledger::core::person::PersonId;
/// use trip_ledger::split::ShareCalculator;
/// use rust_decimal_macros::dec;
/// use trip_ledger::core::expense::ShareInput;
///
/// let shares = ShareCalculator::compute_shares(
///     dec!(100.00),
///     &[ShareInput::equal("anna"), ShareInput::equal("bob")],
/// ).unwrap();
/// let expense = Expense::split(
///     dec!(100.00),
///     PersonId::new("anna"),
///     ExchangeRate::base(CurrencyCode::new("PLN")),
///     shares,
/// );
/// assert!(!expense.is_transfer());
/// assert_eq!(expense.participants().len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    /// Monetary value in the original currency. Never negative.
    value: Decimal,
    payer: PersonId,
    category: Option<CategoryId>,
    exchange_rate: ExchangeRate,
    transferred_to: Option<PersonId>,
    is_estimated: bool,
    /// Scales the value for repeated estimated costs. At least 1.
    multiplier: u32,
    participants: Vec<ExpenseParticipant>,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a split expense.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative or `participants` is empty; a split
    /// expense without participants has no meaning in the ledger.
    pub fn split(
        value: Decimal,
        payer: PersonId,
        exchange_rate: ExchangeRate,
        participants: Vec<ExpenseParticipant>,
    ) -> Self {
        assert!(
            value >= Decimal::ZERO,
            "expense value must not be negative, got {}",
            value
        );
        assert!(
            !participants.is_empty(),
            "split expense requires at least one participant"
        );
        Self {
            id: Uuid::new_v4(),
            value,
            payer,
            category: None,
            exchange_rate,
            transferred_to: None,
            is_estimated: false,
            multiplier: 1,
            participants,
            created_at: Utc::now(),
        }
    }

    /// Create a direct transfer of `value` from `payer` to `receiver`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative.
    pub fn transfer(
        value: Decimal,
        payer: PersonId,
        receiver: PersonId,
        exchange_rate: ExchangeRate,
    ) -> Self {
        assert!(
            value >= Decimal::ZERO,
            "transfer value must not be negative, got {}",
            value
        );
        Self {
            id: Uuid::new_v4(),
            value,
            payer,
            category: None,
            exchange_rate,
            transferred_to: Some(receiver),
            is_estimated: false,
            multiplier: 1,
            participants: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Set a specific id (useful for testing / determinism).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Mark as an estimated (planned) cost, optionally repeated
    /// `multiplier` times.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is zero.
    pub fn estimated(mut self, multiplier: u32) -> Self {
        assert!(multiplier >= 1, "multiplier must be at least 1");
        self.is_estimated = true;
        self.multiplier = multiplier;
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn payer(&self) -> &PersonId {
        &self.payer
    }

    pub fn category(&self) -> Option<&CategoryId> {
        self.category.as_ref()
    }

    pub fn exchange_rate(&self) -> &ExchangeRate {
        &self.exchange_rate
    }

    pub fn transferred_to(&self) -> Option<&PersonId> {
        self.transferred_to.as_ref()
    }

    pub fn is_transfer(&self) -> bool {
        self.transferred_to.is_some()
    }

    pub fn is_estimated(&self) -> bool {
        self.is_estimated
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn participants(&self) -> &[ExpenseParticipant] {
        &self.participants
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The original-currency value with the repeat multiplier applied.
    ///
    /// The multiplier scales the value before currency normalization, so
    /// the normalized amount is `value * multiplier * rate`.
    pub fn effective_value(&self) -> Decimal {
        if self.is_estimated && self.multiplier > 1 {
            self.value * Decimal::from(self.multiplier)
        } else {
            self.value
        }
    }

    /// The multiplier as a decimal factor, for scaling per-participant
    /// shares consistently with [`Expense::effective_value`].
    pub fn share_scale(&self) -> Decimal {
        if self.is_estimated && self.multiplier > 1 {
            Decimal::from(self.multiplier)
        } else {
            Decimal::ONE
        }
    }
}

/// The expense snapshot of one trip, as handed to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseSet {
    expenses: Vec<Expense>,
}

impl ExpenseSet {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
        }
    }

    pub fn add(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// All unique people referenced by this set, sorted: payers,
    /// participants and transfer receivers alike.
    pub fn people(&self) -> Vec<PersonId> {
        let mut people: Vec<PersonId> = self
            .expenses
            .iter()
            .flat_map(|e| {
                let mut ids = vec![e.payer().clone()];
                ids.extend(e.participants().iter().map(|p| p.person.clone()));
                ids.extend(e.transferred_to().cloned());
                ids
            })
            .collect();
        people.sort();
        people.dedup();
        people
    }

    /// All unique original currencies referenced by this set, sorted.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        let mut currencies: Vec<CurrencyCode> = self
            .expenses
            .iter()
            .map(|e| e.exchange_rate().currency.clone())
            .collect();
        currencies.sort();
        currencies.dedup();
        currencies
    }
}

impl FromIterator<Expense> for ExpenseSet {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}
