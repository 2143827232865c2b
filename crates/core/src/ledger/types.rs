//! Ledger domain types for journal entry creation, posting and reversal.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use daftar_shared::types::{CostCenterId, money::within_tolerance};

/// Account classification driving the sign convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Resources owned (debit-normal).
    Asset,
    /// Obligations owed (credit-normal).
    Liability,
    /// Owners' residual interest (credit-normal).
    Equity,
    /// Income earned (credit-normal).
    Revenue,
    /// Costs incurred (debit-normal).
    Expense,
}

/// The side on which an account's balance naturally grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl AccountType {
    /// All account types in statement order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the normal balance side for this account type.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for types reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "EQUITY" => Ok(Self::Equity),
            "REVENUE" => Ok(Self::Revenue),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// Journal entry lifecycle status.
///
/// `DRAFT --post--> POSTED`; nothing ever returns to `DRAFT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Editable, no balance effect.
    Draft,
    /// Applied to account balances (immutable).
    Posted,
}

impl EntryStatus {
    /// Returns true if the entry may be posted or deleted.
    #[must_use]
    pub const fn is_draft(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Posted => "POSTED",
        }
    }
}

/// A single journal line, as submitted or as loaded for posting/reversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// The leaf account to post to.
    pub account_id: Uuid,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Optional line narration.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            cost_center_id: None,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            cost_center_id: None,
            description: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// What the engine needs to know about an account referenced by a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAccount {
    /// The account ID.
    pub id: Uuid,
    /// The account type (drives the sign convention).
    pub account_type: AccountType,
    /// Header accounts are structural and never posted to.
    pub is_header: bool,
    /// Inactive accounts block posting.
    pub is_active: bool,
}

/// Entry totals with the balance check applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JournalTotals {
    /// Sum of line debits.
    pub total_debit: Decimal,
    /// Sum of line credits.
    pub total_credit: Decimal,
    /// Whether debits equal credits within tolerance.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates totals and evaluates the balance check.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: within_tolerance(total_debit, total_credit),
        }
    }

    /// Sums the given lines.
    #[must_use]
    pub fn from_lines(lines: &[JournalLineInput]) -> Self {
        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        Self::new(total_debit, total_credit)
    }
}

/// A signed change to one account's cached balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountDelta {
    /// The account to update.
    pub account_id: Uuid,
    /// Amount added to the stored balance (may be negative).
    pub delta: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_balance() {
        assert_eq!(AccountType::Asset.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Liability.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_account_type_round_trips_through_str() {
        for account_type in AccountType::ALL {
            assert_eq!(
                account_type.as_str().parse::<AccountType>().unwrap(),
                account_type
            );
        }
        assert_eq!("revenue".parse::<AccountType>().unwrap(), AccountType::Revenue);
        assert!("income".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_account_type_serde_is_upper_case() {
        let json = serde_json::to_string(&AccountType::Liability).unwrap();
        assert_eq!(json, "\"LIABILITY\"");
    }

    #[test]
    fn test_entry_status() {
        assert!(EntryStatus::Draft.is_draft());
        assert!(!EntryStatus::Posted.is_draft());
        assert_eq!(EntryStatus::Posted.as_str(), "POSTED");
    }

    #[test]
    fn test_totals_from_lines() {
        let lines = vec![
            JournalLineInput::debit(Uuid::nil(), dec!(300.00)),
            JournalLineInput::debit(Uuid::nil(), dec!(200.00)),
            JournalLineInput::credit(Uuid::nil(), dec!(500.00)),
        ];
        let totals = JournalTotals::from_lines(&lines);
        assert_eq!(totals.total_debit, dec!(500.00));
        assert_eq!(totals.total_credit, dec!(500.00));
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_totals_tolerance() {
        assert!(JournalTotals::new(dec!(100.00), dec!(100.005)).is_balanced);
        assert!(!JournalTotals::new(dec!(100.00), dec!(100.01)).is_balanced);
    }
}
