//! Reversing entries.
//!
//! A reversal mirrors every line of a posted entry with debit and credit
//! swapped. Applying the mirrored lines through the sign convention exactly
//! cancels the original's balance effect.

use super::types::JournalLineInput;

/// Prefix applied to reversed line descriptions.
pub const REVERSAL_PREFIX: &str = "Reversal";

/// Mirrors the given lines: same account and cost center, debit/credit swapped.
#[must_use]
pub fn reverse_lines(lines: &[JournalLineInput]) -> Vec<JournalLineInput> {
    lines
        .iter()
        .map(|line| JournalLineInput {
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            cost_center_id: line.cost_center_id,
            description: Some(match line.description.as_deref() {
                Some(text) if !text.is_empty() => format!("{REVERSAL_PREFIX}: {text}"),
                _ => REVERSAL_PREFIX.to_string(),
            }),
        })
        .collect()
}

/// Header description for the reversing entry.
#[must_use]
pub fn reversal_description(original_number: &str, original_description: Option<&str>) -> String {
    match original_description {
        Some(text) if !text.is_empty() => {
            format!("{REVERSAL_PREFIX} of {original_number}: {text}")
        }
        _ => format!("{REVERSAL_PREFIX} of {original_number}"),
    }
}
