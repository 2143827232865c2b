//! Core business logic for Daftar.
//!
//! This crate contains pure ledger logic with ZERO web or database dependencies.
//! All domain types, validation rules and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping: sign convention, validation, posting and reversal plans
//! - `accounts` - Chart of accounts rules, tree assembly and the standard template
//! - `fiscal` - Fiscal year validation and resolution
//! - `reports` - Trial balance and balance sheet

pub mod accounts;
pub mod fiscal;
pub mod ledger;
pub mod reports;
