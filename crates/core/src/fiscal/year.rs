//! Fiscal years: date ranges that scope entry numbering and reports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use daftar_shared::types::{FiscalYearId, TenantId};

use crate::ledger::error::LedgerError;
use crate::ledger::validation::check_required_text;

/// Longest accepted fiscal year name.
pub const MAX_YEAR_NAME_LEN: usize = 50;

/// A tenant's fiscal year. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Unique identifier.
    pub id: FiscalYearId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Year name (e.g., "FY2026").
    pub name: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
}

impl FiscalYear {
    /// Returns true if the given date falls within this year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Rejects ranges whose end is not after their start.
///
/// # Errors
///
/// Returns `InvalidFiscalYearRange`.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), LedgerError> {
    if end > start {
        Ok(())
    } else {
        Err(LedgerError::InvalidFiscalYearRange { start, end })
    }
}

/// Year names are required and limited to [`MAX_YEAR_NAME_LEN`] characters.
///
/// # Errors
///
/// Returns `TextRequired` or `TextTooLong`.
pub fn validate_year_name(name: &str) -> Result<(), LedgerError> {
    check_required_text("name", name, MAX_YEAR_NAME_LEN)
}

/// Returns true if two inclusive date ranges share at least one day.
#[must_use]
pub fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// First existing year that overlaps the candidate range.
#[must_use]
pub fn find_overlapping(
    existing: &[FiscalYear],
    start: NaiveDate,
    end: NaiveDate,
) -> Option<&FiscalYear> {
    existing
        .iter()
        .find(|fy| date_ranges_overlap(fy.start_date, fy.end_date, start, end))
}

/// The year containing `today`.
///
/// Overlaps are rejected at creation, so at most one year matches; if legacy
/// data overlaps anyway the latest-starting year wins.
#[must_use]
pub fn resolve_current(years: &[FiscalYear], today: NaiveDate) -> Option<&FiscalYear> {
    years
        .iter()
        .filter(|fy| fy.contains(today))
        .max_by_key(|fy| fy.start_date)
}
