//! Journal repository: draft creation, posting, reversal and deletion.
//!
//! Every mutation runs in one tenant-scoped transaction. The entry row is
//! locked with `SELECT ... FOR UPDATE` before its status is checked, so two
//! callers racing on the same entry are serialized and the loser sees the
//! winner's result.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use daftar_core::ledger::validation::{ensure_deletable, validate_entry_text};
use daftar_core::ledger::{
    AccountDelta, EntryStatus, JournalLineInput, LedgerError, LedgerService, ReversibleEntry,
};
use daftar_shared::TenantContext;
use daftar_shared::types::{CostCenterId, JournalEntryId, JournalLineId, TenantId};

use super::account::{AccountRepository, account_lookup};
use super::error::{DbFailure, RepositoryError, classify};
use super::fiscal::{allocate_entry_number, current_year, year_for_date};
use crate::entities::{
    journal_entries, journal_entry_lines, sea_orm_active_enums::JournalEntryStatus,
};
use crate::rls::RlsExt;

/// A lost race is retried once before the error reaches the caller.
const MAX_ATTEMPTS: u32 = 2;

/// Name of the index allowing one reversal per entry.
const REVERSAL_INDEX: &str = "uq_journal_entries_reverses";

/// Input for creating a draft journal entry.
#[derive(Debug, Clone)]
pub struct CreateDraftInput {
    /// Accounting date; selects the fiscal year.
    pub entry_date: NaiveDate,
    /// Free-text description.
    pub description: Option<String>,
    /// External reference (invoice number, etc.).
    pub reference: Option<String>,
    /// Lines in order.
    pub lines: Vec<JournalLineInput>,
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Filter by fiscal year.
    pub fiscal_year_id: Option<Uuid>,
    /// Entries dated on or after.
    pub from_date: Option<NaiveDate>,
    /// Entries dated on or before.
    pub to_date: Option<NaiveDate>,
}

/// Journal entry with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntryWithLines {
    /// The entry header.
    #[serde(flatten)]
    pub entry: journal_entries::Model,
    /// Lines by line number.
    pub lines: Vec<journal_entry_lines::Model>,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a numbered draft entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the lines are malformed, unbalanced or too large to store
    /// - the reference is too long
    /// - an account is unknown in the tenant or is a header
    /// - no fiscal year contains the entry date
    pub async fn create_draft(
        &self,
        ctx: &TenantContext,
        input: CreateDraftInput,
    ) -> Result<JournalEntryWithLines, RepositoryError> {
        validate_entry_text(input.reference.as_deref())?;

        let mut attempt = 1;
        loop {
            match self.try_create_draft(ctx, &input).await.map_err(reclassify) {
                Err(err) if err.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        tenant_id = %ctx.tenant_id,
                        attempt,
                        error = %err,
                        "Draft creation lost a race, retrying"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_create_draft(
        &self,
        ctx: &TenantContext,
        input: &CreateDraftInput,
    ) -> Result<JournalEntryWithLines, RepositoryError> {
        let rls = self.db.with_rls(ctx.tenant()).await?;
        let txn = rls.transaction();

        let accounts = AccountRepository::load_line_accounts(
            txn,
            ctx.tenant_id,
            &distinct_accounts(&input.lines),
        )
        .await?;
        let totals = LedgerService::validate_draft(&input.lines, account_lookup(&accounts))?;

        let fiscal_year = year_for_date(txn, ctx.tenant_id, input.entry_date).await?;
        let entry_number =
            allocate_entry_number(txn, ctx.tenant_id, fiscal_year.id.into_inner()).await?;

        let now = chrono::Utc::now().into();
        let entry = insert_entry(
            txn,
            journal_entries::ActiveModel {
                id: Set(JournalEntryId::new().into_inner()),
                tenant_id: Set(ctx.tenant()),
                fiscal_year_id: Set(fiscal_year.id.into_inner()),
                entry_number: Set(entry_number.clone()),
                entry_date: Set(input.entry_date),
                description: Set(input.description.clone()),
                reference: Set(input.reference.clone()),
                status: Set(JournalEntryStatus::Draft),
                total_debit: Set(totals.total_debit),
                total_credit: Set(totals.total_credit),
                is_reversing: Set(false),
                reverses_entry_id: Set(None),
                reversed_by: Set(None),
                reversed_at: Set(None),
                created_by: Set(ctx.user()),
                posted_by: Set(None),
                posted_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            },
            &entry_number,
        )
        .await?;
        let lines = insert_lines(txn, ctx.tenant_id, entry.id, &input.lines).await?;

        rls.commit().await?;

        info!(
            tenant_id = %ctx.tenant_id,
            entry_id = %entry.id,
            entry_number = %entry.entry_number,
            created_by = %ctx.user_id,
            "Draft journal entry created"
        );
        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Finds an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist in the tenant.
    pub async fn get_entry(
        &self,
        tenant_id: TenantId,
        entry_id: Uuid,
    ) -> Result<JournalEntryWithLines, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let txn = rls.transaction();

        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
            .one(txn)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        let lines = lines_of(txn, tenant_id, entry_id).await?;

        rls.commit().await?;
        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Lists entry headers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        tenant_id: TenantId,
        filter: JournalFilter,
    ) -> Result<Vec<journal_entries::Model>, RepositoryError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::EntryNumber);

        if let Some(status) = filter.status {
            query = query
                .filter(journal_entries::Column::Status.eq(JournalEntryStatus::from(status)));
        }

        if let Some(fiscal_year_id) = filter.fiscal_year_id {
            query = query.filter(journal_entries::Column::FiscalYearId.eq(fiscal_year_id));
        }

        if let Some(from_date) = filter.from_date {
            query = query.filter(journal_entries::Column::EntryDate.gte(from_date));
        }

        if let Some(to_date) = filter.to_date {
            query = query.filter(journal_entries::Column::EntryDate.lte(to_date));
        }

        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let entries = query.all(rls.transaction()).await?;
        rls.commit().await?;
        Ok(entries)
    }

    /// Posts a draft and applies its balance deltas.
    ///
    /// All checks run before anything is written; the status change and every
    /// balance update commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the entry does not exist in the tenant
    /// - the entry is not a draft
    /// - a line is invalid or references an inactive or header account
    pub async fn post(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
    ) -> Result<JournalEntryWithLines, RepositoryError> {
        let mut attempt = 1;
        loop {
            match self.try_post(ctx, entry_id).await.map_err(reclassify) {
                Err(err) if err.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        tenant_id = %ctx.tenant_id,
                        entry_id = %entry_id,
                        attempt,
                        error = %err,
                        "Posting lost a race, retrying"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_post(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
    ) -> Result<JournalEntryWithLines, RepositoryError> {
        let rls = self.db.with_rls(ctx.tenant()).await?;
        let txn = rls.transaction();

        let entry = lock_entry(txn, ctx.tenant_id, entry_id).await?;
        let lines = lines_of(txn, ctx.tenant_id, entry_id).await?;
        let inputs: Vec<JournalLineInput> = lines.iter().map(to_line_input).collect();

        let accounts =
            AccountRepository::load_line_accounts(txn, ctx.tenant_id, &distinct_accounts(&inputs))
                .await?;
        let plan =
            LedgerService::plan_posting(entry.status.into(), &inputs, account_lookup(&accounts))?;

        let now = chrono::Utc::now().into();
        let mut active: journal_entries::ActiveModel = entry.into();
        active.status = Set(JournalEntryStatus::Posted);
        active.total_debit = Set(plan.totals.total_debit);
        active.total_credit = Set(plan.totals.total_credit);
        active.posted_by = Set(Some(ctx.user()));
        active.posted_at = Set(Some(now));
        active.updated_at = Set(now);
        let entry = active.update(txn).await?;

        apply_deltas(txn, ctx.tenant_id, &plan.deltas).await?;

        rls.commit().await?;

        info!(
            tenant_id = %ctx.tenant_id,
            entry_id = %entry.id,
            entry_number = %entry.entry_number,
            posted_by = %ctx.user_id,
            accounts = plan.deltas.len(),
            "Journal entry posted"
        );
        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Reverses a posted entry with a new posted entry that swaps every line.
    ///
    /// The reversal is dated `today` and numbered in the fiscal year
    /// containing it. Returns the new reversing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the entry does not exist in the tenant
    /// - the entry is not posted or was already reversed
    /// - no fiscal year contains `today`
    pub async fn reverse(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
        today: NaiveDate,
    ) -> Result<JournalEntryWithLines, RepositoryError> {
        let mut attempt = 1;
        loop {
            match self.try_reverse(ctx, entry_id, today).await.map_err(reclassify) {
                Err(err) if err.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        tenant_id = %ctx.tenant_id,
                        entry_id = %entry_id,
                        attempt,
                        error = %err,
                        "Reversal lost a race, retrying"
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_reverse(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
        today: NaiveDate,
    ) -> Result<JournalEntryWithLines, RepositoryError> {
        let rls = self.db.with_rls(ctx.tenant()).await?;
        let txn = rls.transaction();

        let original = lock_entry(txn, ctx.tenant_id, entry_id).await?;
        let original_lines = lines_of(txn, ctx.tenant_id, entry_id).await?;
        let inputs: Vec<JournalLineInput> = original_lines.iter().map(to_line_input).collect();

        let accounts =
            AccountRepository::load_line_accounts(txn, ctx.tenant_id, &distinct_accounts(&inputs))
                .await?;
        let plan = LedgerService::plan_reversal(
            &ReversibleEntry {
                id: original.id,
                entry_number: original.entry_number.clone(),
                description: original.description.clone(),
                status: original.status.into(),
                reversed_by: original.reversed_by,
                total_debit: original.total_debit,
                total_credit: original.total_credit,
            },
            &inputs,
            account_lookup(&accounts),
        )?;

        let fiscal_year = current_year(txn, ctx.tenant_id, today).await?;
        let entry_number =
            allocate_entry_number(txn, ctx.tenant_id, fiscal_year.id.into_inner()).await?;

        let now = chrono::Utc::now().into();
        let reversal_id = JournalEntryId::new().into_inner();
        let reversal = insert_entry(
            txn,
            journal_entries::ActiveModel {
                id: Set(reversal_id),
                tenant_id: Set(ctx.tenant()),
                fiscal_year_id: Set(fiscal_year.id.into_inner()),
                entry_number: Set(entry_number.clone()),
                entry_date: Set(today),
                description: Set(Some(plan.description.clone())),
                reference: Set(original.reference.clone()),
                status: Set(JournalEntryStatus::Posted),
                total_debit: Set(plan.total_debit),
                total_credit: Set(plan.total_credit),
                is_reversing: Set(true),
                reverses_entry_id: Set(Some(original.id)),
                reversed_by: Set(None),
                reversed_at: Set(None),
                created_by: Set(ctx.user()),
                posted_by: Set(Some(ctx.user())),
                posted_at: Set(Some(now)),
                created_at: Set(now),
                updated_at: Set(now),
            },
            &entry_number,
        )
        .await?;
        let lines = insert_lines(txn, ctx.tenant_id, reversal_id, &plan.lines).await?;

        let original_number = original.entry_number.clone();
        let mut active: journal_entries::ActiveModel = original.into();
        active.reversed_by = Set(Some(reversal_id));
        active.reversed_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(txn).await?;

        apply_deltas(txn, ctx.tenant_id, &plan.deltas).await?;

        rls.commit().await?;

        info!(
            tenant_id = %ctx.tenant_id,
            entry_id = %entry_id,
            entry_number = %original_number,
            reversal_id = %reversal.id,
            reversal_number = %reversal.entry_number,
            "Journal entry reversed"
        );
        Ok(JournalEntryWithLines {
            entry: reversal,
            lines,
        })
    }

    /// Deletes a draft and its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist in the tenant or is not
    /// a draft.
    pub async fn delete_draft(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
    ) -> Result<(), RepositoryError> {
        let rls = self.db.with_rls(ctx.tenant()).await?;
        let txn = rls.transaction();

        let entry = lock_entry(txn, ctx.tenant_id, entry_id).await?;
        ensure_deletable(entry.status.into())?;

        journal_entry_lines::Entity::delete_many()
            .filter(journal_entry_lines::Column::TenantId.eq(ctx.tenant()))
            .filter(journal_entry_lines::Column::JournalEntryId.eq(entry_id))
            .exec(txn)
            .await?;
        journal_entries::Entity::delete_by_id(entry_id)
            .filter(journal_entries::Column::TenantId.eq(ctx.tenant()))
            .exec(txn)
            .await?;

        rls.commit().await?;

        info!(
            tenant_id = %ctx.tenant_id,
            entry_id = %entry_id,
            entry_number = %entry.entry_number,
            "Draft journal entry deleted"
        );
        Ok(())
    }
}

/// Loads an entry and holds its row lock until the transaction ends.
async fn lock_entry(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    entry_id: Uuid,
) -> Result<journal_entries::Model, RepositoryError> {
    let entry = journal_entries::Entity::find_by_id(entry_id)
        .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(LedgerError::EntryNotFound(entry_id))?;
    Ok(entry)
}

async fn lines_of(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    entry_id: Uuid,
) -> Result<Vec<journal_entry_lines::Model>, RepositoryError> {
    let lines = journal_entry_lines::Entity::find()
        .filter(journal_entry_lines::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(journal_entry_lines::Column::JournalEntryId.eq(entry_id))
        .order_by_asc(journal_entry_lines::Column::LineNumber)
        .all(txn)
        .await?;
    Ok(lines)
}

/// Inserts an entry header, translating unique violations into
/// retryable races.
async fn insert_entry(
    txn: &DatabaseTransaction,
    entry: journal_entries::ActiveModel,
    entry_number: &str,
) -> Result<journal_entries::Model, RepositoryError> {
    entry.insert(txn).await.map_err(|e| {
        let failure = DbFailure::of(&e);
        if failure.is_unique_violation() {
            if failure.constraint_is(REVERSAL_INDEX) {
                RepositoryError::Ledger(LedgerError::ConcurrentModification)
            } else {
                RepositoryError::Ledger(LedgerError::EntryNumberCollision(
                    entry_number.to_string(),
                ))
            }
        } else {
            e.into()
        }
    })
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    entry_id: Uuid,
    lines: &[JournalLineInput],
) -> Result<Vec<journal_entry_lines::Model>, RepositoryError> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
    let mut inserted = Vec::with_capacity(lines.len());

    for (line_number, line) in (1..).zip(lines) {
        let model = journal_entry_lines::ActiveModel {
            id: Set(JournalLineId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            journal_entry_id: Set(entry_id),
            line_number: Set(line_number),
            account_id: Set(line.account_id),
            debit: Set(line.debit),
            credit: Set(line.credit),
            cost_center_id: Set(line.cost_center_id.map(CostCenterId::into_inner)),
            description: Set(line.description.clone()),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;
        inserted.push(model);
    }

    Ok(inserted)
}

/// Applies deltas in account-id order so concurrent postings lock rows in
/// the same sequence.
async fn apply_deltas(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    deltas: &[AccountDelta],
) -> Result<(), RepositoryError> {
    for delta in deltas {
        AccountRepository::apply_balance_delta(txn, tenant_id, delta.account_id, delta.delta)
            .await?;
    }
    Ok(())
}

fn to_line_input(line: &journal_entry_lines::Model) -> JournalLineInput {
    JournalLineInput {
        account_id: line.account_id,
        debit: line.debit,
        credit: line.credit,
        cost_center_id: line.cost_center_id.map(CostCenterId::from),
        description: line.description.clone(),
    }
}

fn distinct_accounts(lines: &[JournalLineInput]) -> Vec<Uuid> {
    lines
        .iter()
        .map(|l| l.account_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn reclassify(err: RepositoryError) -> RepositoryError {
    match err {
        RepositoryError::Database(e) => classify(e),
        other => other,
    }
}
