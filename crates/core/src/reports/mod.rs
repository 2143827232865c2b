//! Financial report generation.
//!
//! - Trial Balance
//! - Balance Sheet (with computed retained earnings)

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::*;
