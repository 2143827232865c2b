//! `SeaORM` entities for the ledger schema.

pub mod prelude;

pub mod accounts;
pub mod entry_sequences;
pub mod fiscal_years;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod sea_orm_active_enums;
pub mod tenants;
pub mod users;
