//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every tenant query runs inside a transaction carrying the tenant's RLS
//! context.

pub mod account;
pub mod error;
pub mod fiscal;
pub mod journal;
pub mod report;
pub mod tenant;

pub use account::{AccountFilter, AccountRepository, CreateAccountInput};
pub use error::RepositoryError;
pub use fiscal::{CreateFiscalYearInput, FiscalRepository};
pub use journal::{CreateDraftInput, JournalEntryWithLines, JournalFilter, JournalRepository};
pub use report::ReportRepository;
pub use tenant::{CreateTenantInput, CreateUserInput, TenantRepository};
