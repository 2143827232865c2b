//! Chart of accounts.
//!
//! - `rules`: account code format and level derivation from the parent
//! - `tree`: parent/child forest assembly
//! - `template`: the standard Egyptian chart seeded for new tenants

pub mod rules;
pub mod template;
pub mod tree;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::types::AccountType;

pub use rules::{ParentAccount, resolve_level, validate_account_code, validate_account_names};
pub use template::{STANDARD_CHART, TemplateAccount};
pub use tree::{AccountTreeNode, build_tree};

/// An account in a tenant's chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartAccount {
    /// Account ID.
    pub id: Uuid,
    /// Parent header account, if any.
    pub parent_id: Option<Uuid>,
    /// Code, unique within the tenant.
    pub code: String,
    /// English display name.
    pub name_en: String,
    /// Arabic display name.
    pub name_ar: String,
    /// Classification.
    pub account_type: AccountType,
    /// Structural node, never posted to.
    pub is_header: bool,
    /// Depth, root = 1.
    pub level: i32,
    /// Cached running balance maintained by posting and reversal.
    pub balance: Decimal,
    /// Inactive accounts block posting.
    pub is_active: bool,
}
