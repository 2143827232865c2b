//! Account creation rules.

use uuid::Uuid;

use crate::ledger::error::LedgerError;
use crate::ledger::validation::check_required_text;

/// Longest accepted account code.
pub const MAX_CODE_LEN: usize = 20;

/// Longest accepted account name, in either language.
pub const MAX_NAME_LEN: usize = 255;

/// Validates an account code and returns it trimmed.
///
/// Codes are 1 to 20 characters of ASCII letters, digits, `-` or `.`.
///
/// # Errors
///
/// Returns `InvalidAccountCode` otherwise.
pub fn validate_account_code(code: &str) -> Result<&str, LedgerError> {
    let trimmed = code.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_CODE_LEN
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    if valid {
        Ok(trimmed)
    } else {
        Err(LedgerError::InvalidAccountCode(code.to_string()))
    }
}

/// Both names are required and limited to [`MAX_NAME_LEN`] characters.
///
/// # Errors
///
/// Returns `TextRequired` or `TextTooLong`.
pub fn validate_account_names(name_en: &str, name_ar: &str) -> Result<(), LedgerError> {
    check_required_text("name_en", name_en, MAX_NAME_LEN)?;
    check_required_text("name_ar", name_ar, MAX_NAME_LEN)
}

/// The parent fields that matter when attaching a child account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentAccount {
    /// Parent ID.
    pub id: Uuid,
    /// Only header accounts may have children.
    pub is_header: bool,
    /// Parent depth.
    pub level: i32,
}

/// Computes the level of a new account.
///
/// Roots sit at level 1; children one below their parent.
///
/// # Errors
///
/// Returns `ParentNotHeader` if the parent is a leaf account.
pub const fn resolve_level(parent: Option<&ParentAccount>) -> Result<i32, LedgerError> {
    match parent {
        None => Ok(1),
        Some(p) if !p.is_header => Err(LedgerError::ParentNotHeader(p.id)),
        Some(p) => Ok(p.level + 1),
    }
}
