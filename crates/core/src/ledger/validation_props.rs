//! Property-based tests for journal line validation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::JournalLineInput;
use super::validation::validate_lines;

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Builds a balanced entry: one debit line per amount, one credit line for the sum.
fn balanced_lines(amounts: &[Decimal]) -> Vec<JournalLineInput> {
    let mut lines: Vec<JournalLineInput> = amounts
        .iter()
        .map(|a| JournalLineInput::debit(Uuid::new_v4(), *a))
        .collect();
    lines.push(JournalLineInput::credit(
        Uuid::new_v4(),
        amounts.iter().copied().sum(),
    ));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_balanced_lines_accepted(amounts in prop::collection::vec(positive_amount(), 1..10)) {
        let lines = balanced_lines(&amounts);
        let totals = validate_lines(&lines).unwrap();
        prop_assert_eq!(totals.total_debit, totals.total_credit);
        prop_assert!(totals.is_balanced);
    }

    #[test]
    fn prop_offset_of_a_cent_rejected(
        amounts in prop::collection::vec(positive_amount(), 1..10),
        extra_cents in 1i64..10_000i64,
    ) {
        let mut lines = balanced_lines(&amounts);
        if let Some(last) = lines.last_mut() {
            last.credit += Decimal::new(extra_cents, 2);
        }
        let is_unbalanced = matches!(validate_lines(&lines), Err(LedgerError::Unbalanced { .. }));
        prop_assert!(is_unbalanced);
    }

    #[test]
    fn prop_negative_amount_rejected_at_its_line(
        amounts in prop::collection::vec(positive_amount(), 2..10),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut lines = balanced_lines(&amounts);
        let idx = pick.index(lines.len());
        let line = &mut lines[idx];
        if line.debit.is_zero() {
            line.credit = -line.credit;
        } else {
            line.debit = -line.debit;
        }
        let rejected_at = match validate_lines(&lines) {
            Err(LedgerError::NegativeAmount { line }) => Some(line),
            _ => None,
        };
        prop_assert_eq!(rejected_at, Some(idx + 1));
    }
}
