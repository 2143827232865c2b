//! Report repository: loads posted activity and hands it to the report service.
//!
//! Totals are summed from journal lines of posted entries; the cached
//! `accounts.balance` column is never read here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QuerySelect, RelationTrait, sea_query::Expr,
};
use uuid::Uuid;

use daftar_core::ledger::LedgerError;
use daftar_core::reports::{
    BalanceSheetReport, PostedLine, ReportAccount, ReportService, TrialBalanceOptions,
    TrialBalanceReport,
};
use daftar_shared::types::TenantId;

use super::error::RepositoryError;
use super::fiscal::{current_year, year_by_id};
use crate::entities::{
    accounts, journal_entries, journal_entry_lines, sea_orm_active_enums::JournalEntryStatus,
};
use crate::rls::RlsExt;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Trial balance for a fiscal year.
    ///
    /// Without `fiscal_year_id` the year containing `today` is used. The
    /// cutoff defaults to `today`, capped at the year's last day.
    ///
    /// # Errors
    ///
    /// Returns `NoFiscalYearFound` for an unknown year, or
    /// `NoActiveFiscalYear` when no year contains `today`. Both are
    /// validation failures.
    pub async fn trial_balance(
        &self,
        tenant_id: TenantId,
        fiscal_year_id: Option<Uuid>,
        as_of: Option<NaiveDate>,
        today: NaiveDate,
        options: TrialBalanceOptions,
    ) -> Result<TrialBalanceReport, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let txn = rls.transaction();

        let fiscal_year = match fiscal_year_id {
            Some(id) => year_by_id(txn, tenant_id, id)
                .await
                .map_err(|e| match e {
                    RepositoryError::Ledger(LedgerError::FiscalYearNotFound(id)) => {
                        LedgerError::NoFiscalYearFound(id).into()
                    }
                    other => other,
                })?,
            None => current_year(txn, tenant_id, today).await?,
        };
        let as_of = as_of.unwrap_or_else(|| today.min(fiscal_year.end_date));

        let accounts = report_accounts(txn, tenant_id).await?;
        let lines =
            posted_sums(txn, tenant_id, as_of, Some(fiscal_year.id.into_inner())).await?;

        rls.commit().await?;

        Ok(ReportService::trial_balance(
            &fiscal_year,
            as_of,
            &accounts,
            &lines,
            options,
        ))
    }

    /// Balance sheet as of a date, across all fiscal years.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_sheet(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let txn = rls.transaction();

        let accounts = report_accounts(txn, tenant_id).await?;
        let lines = posted_sums(txn, tenant_id, as_of, None).await?;

        rls.commit().await?;

        Ok(ReportService::balance_sheet(as_of, &accounts, &lines))
    }
}

async fn report_accounts(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
) -> Result<Vec<ReportAccount>, RepositoryError> {
    let accounts = accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
        .all(txn)
        .await?;

    Ok(accounts
        .into_iter()
        .map(|a| ReportAccount {
            id: a.id,
            code: a.code,
            name_en: a.name_en,
            name_ar: a.name_ar,
            account_type: a.account_type.into(),
            is_header: a.is_header,
        })
        .collect())
}

/// Per-account debit and credit sums of posted lines dated on or before
/// `as_of`, optionally limited to one fiscal year.
async fn posted_sums(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    as_of: NaiveDate,
    fiscal_year_id: Option<Uuid>,
) -> Result<Vec<PostedLine>, RepositoryError> {
    #[derive(Debug, FromQueryResult)]
    struct AccountSum {
        account_id: Uuid,
        total_debit: Decimal,
        total_credit: Decimal,
    }

    let mut query = journal_entry_lines::Entity::find()
        .select_only()
        .column(journal_entry_lines::Column::AccountId)
        .column_as(
            Expr::col((journal_entry_lines::Entity, journal_entry_lines::Column::Debit)).sum(),
            "total_debit",
        )
        .column_as(
            Expr::col((journal_entry_lines::Entity, journal_entry_lines::Column::Credit)).sum(),
            "total_credit",
        )
        .join(
            JoinType::InnerJoin,
            journal_entry_lines::Relation::JournalEntries.def(),
        )
        .filter(journal_entry_lines::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(journal_entries::Column::Status.eq(JournalEntryStatus::Posted))
        .filter(journal_entries::Column::EntryDate.lte(as_of));

    if let Some(fiscal_year_id) = fiscal_year_id {
        query = query.filter(journal_entries::Column::FiscalYearId.eq(fiscal_year_id));
    }

    let sums = query
        .group_by(journal_entry_lines::Column::AccountId)
        .into_model::<AccountSum>()
        .all(txn)
        .await?;

    Ok(sums
        .into_iter()
        .map(|s| PostedLine {
            account_id: s.account_id,
            debit: s.total_debit,
            credit: s.total_credit,
        })
        .collect())
}
