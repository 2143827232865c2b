//! Business rule validation for journal entries.
//!
//! All checks run before any mutation so a rejected operation leaves no trace.

use rust_decimal::Decimal;
use uuid::Uuid;

use daftar_shared::types::money::{has_money_scale, within_money_range};

use super::error::LedgerError;
use super::types::{EntryStatus, JournalLineInput, JournalTotals, LineAccount};

/// Longest accepted entry reference.
pub const MAX_REFERENCE_LEN: usize = 100;

/// Validates the shape of a set of journal lines and returns their totals.
///
/// Rules, in order: at least two lines; per line (reported 1-based) amounts
/// are non-negative, carry at most two decimal places, fit a money column and
/// exactly one of debit/credit is nonzero; totals fit a money column; debits
/// equal credits within tolerance.
///
/// # Errors
///
/// Returns the first rule violation found.
pub fn validate_lines(lines: &[JournalLineInput]) -> Result<JournalTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    for (idx, line) in lines.iter().enumerate() {
        validate_line_amounts(idx + 1, line.debit, line.credit)?;
    }

    let totals = JournalTotals::from_lines(lines);
    if !within_money_range(totals.total_debit) || !within_money_range(totals.total_credit) {
        return Err(LedgerError::TotalTooLarge);
    }
    if !totals.is_balanced {
        return Err(LedgerError::Unbalanced {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}

fn validate_line_amounts(line: usize, debit: Decimal, credit: Decimal) -> Result<(), LedgerError> {
    if debit < Decimal::ZERO || credit < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount { line });
    }
    if !has_money_scale(debit) || !has_money_scale(credit) {
        return Err(LedgerError::ExcessPrecision { line });
    }
    if !within_money_range(debit) || !within_money_range(credit) {
        return Err(LedgerError::AmountTooLarge { line });
    }
    match (debit.is_zero(), credit.is_zero()) {
        (true, true) => Err(LedgerError::ZeroLine { line }),
        (false, false) => Err(LedgerError::DebitAndCredit { line }),
        _ => Ok(()),
    }
}

/// Checks the free-text header fields of an entry.
///
/// # Errors
///
/// Returns `TextTooLong` for a reference over [`MAX_REFERENCE_LEN`] characters.
pub fn validate_entry_text(reference: Option<&str>) -> Result<(), LedgerError> {
    match reference {
        Some(r) => check_text_len("reference", r, MAX_REFERENCE_LEN),
        None => Ok(()),
    }
}

/// Rejects text longer than `max` characters (not bytes).
///
/// # Errors
///
/// Returns `TextTooLong`.
pub fn check_text_len(field: &'static str, value: &str, max: usize) -> Result<(), LedgerError> {
    if value.chars().count() > max {
        return Err(LedgerError::TextTooLong { field, max });
    }
    Ok(())
}

/// Rejects blank text and text longer than `max` characters.
///
/// # Errors
///
/// Returns `TextRequired` or `TextTooLong`.
pub fn check_required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::TextRequired(field));
    }
    check_text_len(field, value, max)
}

/// Checks that an account may appear on a journal line.
///
/// Header accounts are always rejected. Inactive accounts are only rejected
/// when `require_active` is set, which is the case for posting and reversal.
///
/// # Errors
///
/// Returns `HeaderAccount` or `AccountInactive`.
pub fn validate_line_account(account: &LineAccount, require_active: bool) -> Result<(), LedgerError> {
    if account.is_header {
        return Err(LedgerError::HeaderAccount(account.id));
    }
    if require_active && !account.is_active {
        return Err(LedgerError::AccountInactive(account.id));
    }
    Ok(())
}

/// Only drafts can be posted.
///
/// # Errors
///
/// Returns `NotDraft` for posted entries.
pub const fn ensure_postable(status: EntryStatus) -> Result<(), LedgerError> {
    if status.is_draft() {
        Ok(())
    } else {
        Err(LedgerError::NotDraft)
    }
}

/// Only drafts can be deleted.
///
/// # Errors
///
/// Returns `CanOnlyDeleteDraft` for posted entries.
pub const fn ensure_deletable(status: EntryStatus) -> Result<(), LedgerError> {
    if status.is_draft() {
        Ok(())
    } else {
        Err(LedgerError::CanOnlyDeleteDraft)
    }
}

/// Only posted entries that have not yet been reversed can be reversed.
///
/// # Errors
///
/// Returns `NotPosted` or `AlreadyReversed`.
pub const fn ensure_reversible(
    entry_id: Uuid,
    status: EntryStatus,
    reversed_by: Option<Uuid>,
) -> Result<(), LedgerError> {
    if status.is_draft() {
        return Err(LedgerError::NotPosted);
    }
    if reversed_by.is_some() {
        return Err(LedgerError::AlreadyReversed(entry_id));
    }
    Ok(())
}
