//! Ledger error types.
//!
//! Every failure falls into one of four kinds: validation (bad input or an
//! illegal state transition), not-found (absent or outside the tenant),
//! concurrency (a lost race, retried once internally) and persistence
//! (storage failure, never partially applied).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use daftar_shared::AppError;
use daftar_shared::types::MAX_AMOUNT;

/// Error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, illegal transition or broken business rule.
    Validation,
    /// Entity absent or owned by another tenant.
    NotFound,
    /// Lost race on entry numbering or reversal linkage.
    Concurrency,
    /// Storage failure.
    Persistence,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Line Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Line amount is negative.
    #[error("Line {line}: amounts cannot be negative")]
    NegativeAmount {
        /// 1-based line number.
        line: usize,
    },

    /// Line amount has more than two fractional digits.
    #[error("Line {line}: amounts are limited to two decimal places")]
    ExcessPrecision {
        /// 1-based line number.
        line: usize,
    },

    /// Line amount does not fit a money column.
    #[error("Line {line}: amount exceeds the maximum of {max}", max = MAX_AMOUNT)]
    AmountTooLarge {
        /// 1-based line number.
        line: usize,
    },

    /// Line has neither a debit nor a credit.
    #[error("Line {line} must have a debit or a credit amount")]
    ZeroLine {
        /// 1-based line number.
        line: usize,
    },

    /// Line has both a debit and a credit.
    #[error("Line {line} cannot have both a debit and a credit amount")]
    DebitAndCredit {
        /// 1-based line number.
        line: usize,
    },

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit.
        debit: Decimal,
        /// Total credit.
        credit: Decimal,
    },

    /// Entry totals do not fit a money column.
    #[error("Journal entry totals exceed the maximum of {max}", max = MAX_AMOUNT)]
    TotalTooLarge,

    /// A required text field is empty.
    #[error("{0} is required")]
    TextRequired(&'static str),

    /// A text field exceeds its stored length.
    #[error("{field} cannot exceed {max} characters")]
    TextTooLong {
        /// Field name.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    // ========== Account Errors ==========
    /// Account is inactive and cannot be posted to.
    #[error("Cannot post to inactive account {0}")]
    AccountInactive(Uuid),

    /// Header accounts are structural only.
    #[error("Account {0} is a header account and cannot be posted to")]
    HeaderAccount(Uuid),

    /// Account code already used in the tenant.
    #[error("Account code '{0}' already exists")]
    DuplicateAccountCode(String),

    /// Account code is empty or malformed.
    #[error("Invalid account code '{0}'")]
    InvalidAccountCode(String),

    /// Parent account is absent or belongs to another tenant.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account is not a header account.
    #[error("Parent account {0} is not a header account")]
    ParentNotHeader(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    // ========== Entry State Errors ==========
    /// Only draft entries can be posted.
    #[error("Only draft entries can be posted")]
    NotDraft,

    /// Only draft entries can be deleted.
    #[error("Only draft entries can be deleted")]
    CanOnlyDeleteDraft,

    /// Only posted entries can be reversed.
    #[error("Only posted entries can be reversed")]
    NotPosted,

    /// Entry already has a reversing entry.
    #[error("Journal entry {0} has already been reversed")]
    AlreadyReversed(Uuid),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    // ========== Fiscal Year Errors ==========
    /// No fiscal year contains the business date.
    #[error("No active fiscal year for {0}")]
    NoActiveFiscalYear(NaiveDate),

    /// No fiscal year contains the entry date.
    #[error("No fiscal year covers {0}")]
    NoFiscalYearForDate(NaiveDate),

    /// Requested fiscal year does not exist in the tenant.
    #[error("Fiscal year not found: {0}")]
    FiscalYearNotFound(Uuid),

    /// A report was requested for a fiscal year absent from the tenant.
    #[error("No fiscal year found: {0}")]
    NoFiscalYearFound(Uuid),

    /// Fiscal year end is not after its start.
    #[error("Fiscal year end {end} must be after start {start}")]
    InvalidFiscalYearRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Fiscal year overlaps an existing one.
    #[error("Fiscal year overlaps with existing year: {0}")]
    OverlappingFiscalYear(String),

    /// Fiscal year name is already used in the tenant.
    #[error("Fiscal year '{0}' already exists")]
    DuplicateFiscalYearName(String),

    // ========== Concurrency Errors ==========
    /// Concurrent modification detected.
    #[error("Concurrent modification detected, please retry")]
    ConcurrentModification,

    /// Another transaction claimed the same entry number.
    #[error("Entry number {0} was taken by a concurrent transaction")]
    EntryNumberCollision(String),

    // ========== Persistence Errors ==========
    /// Storage failure.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl LedgerError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_) | Self::EntryNotFound(_) | Self::FiscalYearNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::ConcurrentModification | Self::EntryNumberCollision(_) => {
                ErrorKind::Concurrency
            }
            Self::Persistence(_) => ErrorKind::Persistence,
            _ => ErrorKind::Validation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::ExcessPrecision { .. } => "EXCESS_PRECISION",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::ZeroLine { .. } => "ZERO_LINE",
            Self::DebitAndCredit { .. } => "DEBIT_AND_CREDIT",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::TotalTooLarge => "TOTAL_TOO_LARGE",
            Self::TextRequired(_) => "TEXT_REQUIRED",
            Self::TextTooLong { .. } => "TEXT_TOO_LONG",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::HeaderAccount(_) => "HEADER_ACCOUNT",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::InvalidAccountCode(_) => "INVALID_ACCOUNT_CODE",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::ParentNotHeader(_) => "PARENT_NOT_HEADER",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::NotDraft => "NOT_DRAFT",
            Self::CanOnlyDeleteDraft => "CAN_ONLY_DELETE_DRAFT",
            Self::NotPosted => "NOT_POSTED",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::NoActiveFiscalYear(_) => "NO_ACTIVE_FISCAL_YEAR",
            Self::NoFiscalYearForDate(_) => "NO_FISCAL_YEAR_FOR_DATE",
            Self::FiscalYearNotFound(_) => "FISCAL_YEAR_NOT_FOUND",
            Self::NoFiscalYearFound(_) => "NO_FISCAL_YEAR_FOUND",
            Self::InvalidFiscalYearRange { .. } => "INVALID_FISCAL_YEAR_RANGE",
            Self::OverlappingFiscalYear(_) => "OVERLAPPING_FISCAL_YEAR",
            Self::DuplicateFiscalYearName(_) => "DUPLICATE_FISCAL_YEAR_NAME",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::EntryNumberCollision(_) => "ENTRY_NUMBER_COLLISION",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Concurrency => 409,
            ErrorKind::Persistence => 500,
        }
    }

    /// Returns true if the operation may be retried once with fresh state.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Concurrency)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::Validation(err.to_string()),
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::Concurrency => {
                Self::Conflict("The ledger was modified concurrently, please retry".to_string())
            }
            ErrorKind::Persistence => Self::Internal("An internal error occurred".to_string()),
        }
    }
}
