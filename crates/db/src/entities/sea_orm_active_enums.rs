//! `SeaORM` active enums mirroring the `PostgreSQL` enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use daftar_core::ledger::{AccountType as DomainAccountType, EntryStatus as DomainEntryStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "ASSET")]
    Asset,
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    #[sea_orm(string_value = "REVENUE")]
    Revenue,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "journal_entry_status"
)]
pub enum JournalEntryStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "POSTED")]
    Posted,
}

impl From<AccountType> for DomainAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<DomainAccountType> for AccountType {
    fn from(value: DomainAccountType) -> Self {
        match value {
            DomainAccountType::Asset => Self::Asset,
            DomainAccountType::Liability => Self::Liability,
            DomainAccountType::Equity => Self::Equity,
            DomainAccountType::Revenue => Self::Revenue,
            DomainAccountType::Expense => Self::Expense,
        }
    }
}

impl From<JournalEntryStatus> for DomainEntryStatus {
    fn from(value: JournalEntryStatus) -> Self {
        match value {
            JournalEntryStatus::Draft => Self::Draft,
            JournalEntryStatus::Posted => Self::Posted,
        }
    }
}

impl From<DomainEntryStatus> for JournalEntryStatus {
    fn from(value: DomainEntryStatus) -> Self {
        match value {
            DomainEntryStatus::Draft => Self::Draft,
            DomainEntryStatus::Posted => Self::Posted,
        }
    }
}
