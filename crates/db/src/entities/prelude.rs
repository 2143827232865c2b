//! `SeaORM` entity prelude.

pub use super::accounts::Entity as Accounts;
pub use super::entry_sequences::Entity as EntrySequences;
pub use super::fiscal_years::Entity as FiscalYears;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_entry_lines::Entity as JournalEntryLines;
pub use super::tenants::Entity as Tenants;
pub use super::users::Entity as Users;
