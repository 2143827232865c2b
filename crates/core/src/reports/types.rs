//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::types::AccountType;

/// Account metadata needed to label report rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportAccount {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// English name.
    pub name_en: String,
    /// Arabic name.
    pub name_ar: String,
    /// Classification.
    pub account_type: AccountType,
    /// Header accounts never appear as rows.
    pub is_header: bool,
}

/// Debit/credit from posted journal lines for one account.
///
/// May be a single line or a pre-aggregated sum; the service adds them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostedLine {
    /// Account ID.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Flags for the trial balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TrialBalanceOptions {
    /// Keep accounts with no activity and zero balance.
    #[serde(default)]
    pub include_zero: bool,
    /// Also return rows grouped per account type.
    #[serde(default)]
    pub group_by_type: bool,
}

/// One account's totals in a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalanceRow {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// English name.
    pub name_en: String,
    /// Arabic name.
    pub name_ar: String,
    /// Classification.
    pub account_type: AccountType,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Closing balance under the account's sign convention.
    pub balance: Decimal,
}

/// Totals for one account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeSubtotal {
    /// Account type.
    pub account_type: AccountType,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Sum of balances.
    pub balance: Decimal,
}

/// Trial balance rows for one account type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceGroup {
    /// Account type.
    pub account_type: AccountType,
    /// Rows of this type, by code.
    pub rows: Vec<AccountBalanceRow>,
    /// Totals of this type.
    pub subtotal: TypeSubtotal,
}

/// Trial balance grand totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Debit minus credit.
    pub difference: Decimal,
    /// Whether debits equal credits within tolerance.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceReport {
    /// Fiscal year reported on.
    pub fiscal_year_id: Uuid,
    /// Fiscal year name.
    pub fiscal_year_name: String,
    /// Inclusive cutoff date.
    pub as_of: NaiveDate,
    /// All rows, by code.
    pub rows: Vec<AccountBalanceRow>,
    /// Rows grouped by type, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<TrialBalanceGroup>>,
    /// One subtotal per account type, in statement order.
    pub subtotals: Vec<TypeSubtotal>,
    /// Grand totals.
    pub totals: TrialBalanceTotals,
}

/// A balance sheet line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSheetRow {
    /// Account ID; `None` for computed rows.
    pub account_id: Option<Uuid>,
    /// Account code; `None` for computed rows.
    pub code: Option<String>,
    /// English name.
    pub name_en: String,
    /// Arabic name.
    pub name_ar: String,
    /// Balance under the account's sign convention.
    pub balance: Decimal,
    /// True for the computed retained earnings row.
    pub is_synthetic: bool,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceSheetSection {
    /// Section rows.
    pub rows: Vec<BalanceSheetRow>,
    /// Section total.
    pub total: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSheetReport {
    /// Inclusive cutoff date.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section, including retained earnings.
    pub equity: BalanceSheetSection,
    /// Revenue minus expense over the same lines.
    pub retained_earnings: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
}
