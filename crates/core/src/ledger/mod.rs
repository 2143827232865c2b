//! Double-entry bookkeeping logic.
//!
//! - Domain types and the account sign convention
//! - Journal line and state-transition validation
//! - Entry numbering within a fiscal year
//! - Posting and reversal plans
//! - Error taxonomy for ledger operations

pub mod balance;
pub mod error;
pub mod numbering;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{aggregate_deltas, balance_delta};
pub use error::{ErrorKind, LedgerError};
pub use numbering::{format_entry_number, next_sequence, parse_entry_number};
pub use service::{LedgerService, PostingPlan, ReversalPlan, ReversibleEntry};
pub use types::{
    AccountDelta, AccountType, EntryStatus, JournalLineInput, JournalTotals, LineAccount,
    NormalBalance,
};
