//! Fiscal year management and resolution.

pub mod year;

pub use year::{
    FiscalYear, date_ranges_overlap, find_overlapping, resolve_current, validate_date_range,
    validate_year_name,
};
