use crate::core::currency::round_minor;
use crate::core::expense::{ExpenseParticipant, ShareInput, ShareKind};
use crate::core::person::PersonId;
use log::debug;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while computing shares at expense-authoring time.
///
/// These are validation failures the caller must fix before the ledger
/// is recomputed; they are never silently repaired.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShareError {
    #[error("split expense has no participants")]
    EmptyParticipantSet,
    #[error("fixed shares sum to {fixed}, expense value is {value}")]
    ShareSumMismatch { fixed: Decimal, value: Decimal },
    #[error("invalid share input for {person}: {detail}")]
    InvalidShareInput { person: PersonId, detail: String },
}

/// Computes each participant's exact monetary share of one expense.
///
/// Fixed entries (`Amount`, `Percentage`) are resolved first; the value
/// they leave unclaimed is split equally among `Equal` entries. Every
/// actual value is rounded to the minor unit; the rounding residual is
/// assigned to the last participant in input order, so the actual values
/// always sum to the expense value exactly.
///
/// # Examples
///
/// ```
/// use trip_ledger::core::expense::ShareInput;
/// use trip_ledger::split::ShareCalculator;
/// use rust_decimal_macros::dec;
///
/// let shares = ShareCalculator::compute_shares(
///     dec!(100.00),
///     &[
///         ShareInput::equal("anna"),
///         ShareInput::equal("bob"),
///         ShareInput::equal("carol"),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(shares[0].actual_share_value, dec!(33.33));
/// assert_eq!(shares[1].actual_share_value, dec!(33.33));
/// // carol, last in input order, absorbs the rounding cent
/// assert_eq!(shares[2].actual_share_value, dec!(33.34));
/// ```
pub struct ShareCalculator;

impl ShareCalculator {
    /// Compute shares for one expense.
    ///
    /// Guarantees on success:
    ///
    /// - actual share values sum to `expense_value` exactly
    /// - fractional shares sum to 1 (within 1e-6)
    /// - each actual value deviates from its ideal unrounded value by at
    ///   most one minor unit
    pub fn compute_shares(
        expense_value: Decimal,
        inputs: &[ShareInput],
    ) -> Result<Vec<ExpenseParticipant>, ShareError> {
        if inputs.is_empty() {
            return Err(ShareError::EmptyParticipantSet);
        }

        let hundred = Decimal::from(100);
        let mut fixed_total = Decimal::ZERO;
        let mut equal_count = 0u32;

        for input in inputs {
            match &input.kind {
                ShareKind::Equal => equal_count += 1,
                ShareKind::Amount(amount) => {
                    if *amount < Decimal::ZERO {
                        return Err(ShareError::InvalidShareInput {
                            person: input.person.clone(),
                            detail: format!("amount {} is negative", amount),
                        });
                    }
                    fixed_total += round_minor(*amount);
                }
                ShareKind::Percentage(pct) => {
                    if *pct < Decimal::ZERO || *pct > hundred {
                        return Err(ShareError::InvalidShareInput {
                            person: input.person.clone(),
                            detail: format!("percentage {} is outside 0..=100", pct),
                        });
                    }
                    fixed_total += round_minor(expense_value * *pct / hundred);
                }
            }
        }

        if fixed_total > expense_value {
            return Err(ShareError::ShareSumMismatch {
                fixed: fixed_total,
                value: expense_value,
            });
        }

        let remainder = expense_value - fixed_total;

        // Without equal entries there is nobody to soak up a shortfall;
        // anything beyond one minor unit per participant is an authoring
        // error, not a rounding residual.
        if equal_count == 0 {
            let tolerance = Decimal::new(inputs.len() as i64, 2);
            if remainder > tolerance {
                return Err(ShareError::ShareSumMismatch {
                    fixed: fixed_total,
                    value: expense_value,
                });
            }
        }

        let equal_share = if equal_count > 0 {
            round_minor(remainder / Decimal::from(equal_count))
        } else {
            Decimal::ZERO
        };

        let mut actuals: Vec<Decimal> = inputs
            .iter()
            .map(|input| match &input.kind {
                ShareKind::Equal => equal_share,
                ShareKind::Amount(amount) => round_minor(*amount),
                ShareKind::Percentage(pct) => round_minor(expense_value * *pct / hundred),
            })
            .collect();

        let allocated: Decimal = actuals.iter().copied().sum();
        let residual = expense_value - allocated;
        if !residual.is_zero() {
            // Last participant in input order absorbs the residual.
            if let Some(last) = actuals.last_mut() {
                *last += residual;
            }
        }

        debug!(
            "computed {} shares for value {} (residual {})",
            inputs.len(),
            expense_value,
            residual
        );

        let one_over_n = Decimal::ONE / Decimal::from(inputs.len() as u32);
        Ok(inputs
            .iter()
            .zip(actuals)
            .map(|(input, actual)| ExpenseParticipant {
                person: input.person.clone(),
                // A zero-value expense has no meaningful proportions;
                // fall back to equal fractions so shares still sum to 1.
                share: if expense_value.is_zero() {
                    one_over_n
                } else {
                    actual / expense_value
                },
                actual_share_value: actual,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn total(shares: &[ExpenseParticipant]) -> Decimal {
        shares.iter().map(|s| s.actual_share_value).sum()
    }

    #[test]
    fn test_equal_three_way_split() {
        let shares = ShareCalculator::compute_shares(
            dec!(100.00),
            &[
                ShareInput::equal("anna"),
                ShareInput::equal("bob"),
                ShareInput::equal("carol"),
            ],
        )
        .unwrap();

        assert_eq!(shares[0].actual_share_value, dec!(33.33));
        assert_eq!(shares[1].actual_share_value, dec!(33.33));
        assert_eq!(shares[2].actual_share_value, dec!(33.34));
        assert_eq!(total(&shares), dec!(100.00));

        let share_sum: Decimal = shares.iter().map(|s| s.share).sum();
        assert_eq!(share_sum, Decimal::ONE);
    }

    #[test]
    fn test_mixed_share_kinds() {
        let shares = ShareCalculator::compute_shares(
            dec!(100.00),
            &[
                ShareInput::amount("anna", dec!(20.00)),
                ShareInput::percentage("bob", dec!(30)),
                ShareInput::equal("carol"),
                ShareInput::equal("dave"),
            ],
        )
        .unwrap();

        assert_eq!(shares[0].actual_share_value, dec!(20.00));
        assert_eq!(shares[1].actual_share_value, dec!(30.00));
        assert_eq!(shares[2].actual_share_value, dec!(25.00));
        assert_eq!(shares[3].actual_share_value, dec!(25.00));
        assert_eq!(total(&shares), dec!(100.00));
    }

    #[test]
    fn test_percentage_rounding_residual_goes_last() {
        let shares = ShareCalculator::compute_shares(
            dec!(10.00),
            &[
                ShareInput::percentage("anna", dec!(33.33)),
                ShareInput::percentage("bob", dec!(33.33)),
                ShareInput::percentage("carol", dec!(33.34)),
            ],
        )
        .unwrap();

        // 3.333 → 3.33, 3.333 → 3.33, 3.334 → 3.33, residual 0.01 to carol
        assert_eq!(shares[0].actual_share_value, dec!(3.33));
        assert_eq!(shares[1].actual_share_value, dec!(3.33));
        assert_eq!(shares[2].actual_share_value, dec!(3.34));
        assert_eq!(total(&shares), dec!(10.00));
    }

    #[test]
    fn test_amounts_exceeding_value_rejected() {
        let err = ShareCalculator::compute_shares(
            dec!(50.00),
            &[
                ShareInput::amount("anna", dec!(30.00)),
                ShareInput::amount("bob", dec!(30.00)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ShareError::ShareSumMismatch { .. }));
    }

    #[test]
    fn test_single_amount_exceeding_value_rejected() {
        let err = ShareCalculator::compute_shares(
            dec!(50.00),
            &[ShareInput::amount("anna", dec!(60.00))],
        )
        .unwrap_err();
        assert!(matches!(err, ShareError::ShareSumMismatch { .. }));
    }

    #[test]
    fn test_fixed_shortfall_without_equal_entries_rejected() {
        let err = ShareCalculator::compute_shares(
            dec!(100.00),
            &[
                ShareInput::amount("anna", dec!(30.00)),
                ShareInput::amount("bob", dec!(30.00)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ShareError::ShareSumMismatch { .. }));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let err = ShareCalculator::compute_shares(dec!(10.00), &[]).unwrap_err();
        assert_eq!(err, ShareError::EmptyParticipantSet);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = ShareCalculator::compute_shares(
            dec!(10.00),
            &[ShareInput::amount("anna", dec!(-5.00))],
        )
        .unwrap_err();
        assert!(matches!(err, ShareError::InvalidShareInput { .. }));
    }

    #[test]
    fn test_percentage_out_of_range_rejected() {
        let err = ShareCalculator::compute_shares(
            dec!(10.00),
            &[ShareInput::percentage("anna", dec!(120))],
        )
        .unwrap_err();
        assert!(matches!(err, ShareError::InvalidShareInput { .. }));
    }

    #[test]
    fn test_zero_value_expense() {
        let shares = ShareCalculator::compute_shares(
            Decimal::ZERO,
            &[ShareInput::equal("anna"), ShareInput::equal("bob")],
        )
        .unwrap();
        assert_eq!(total(&shares), Decimal::ZERO);
        let share_sum: Decimal = shares.iter().map(|s| s.share).sum();
        assert_eq!(share_sum, Decimal::ONE);
    }

    #[test]
    fn test_tiny_value_negative_residual() {
        // 0.02 split three ways: each rounds to 0.01, one cent too many;
        // the last participant gives it back.
        let shares = ShareCalculator::compute_shares(
            dec!(0.02),
            &[
                ShareInput::equal("anna"),
                ShareInput::equal("bob"),
                ShareInput::equal("carol"),
            ],
        )
        .unwrap();
        assert_eq!(shares[0].actual_share_value, dec!(0.01));
        assert_eq!(shares[1].actual_share_value, dec!(0.01));
        assert_eq!(shares[2].actual_share_value, dec!(0.00));
        assert_eq!(total(&shares), dec!(0.02));
    }

    #[test]
    fn test_full_percentage_split() {
        let shares = ShareCalculator::compute_shares(
            dec!(80.00),
            &[
                ShareInput::percentage("anna", dec!(75)),
                ShareInput::percentage("bob", dec!(25)),
            ],
        )
        .unwrap();
        assert_eq!(shares[0].actual_share_value, dec!(60.00));
        assert_eq!(shares[1].actual_share_value, dec!(20.00));
        assert_eq!(shares[0].share, dec!(0.75));
    }
}
