//! Fiscal year repository and per-year entry number allocation.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use tracing::{debug, info};
use uuid::Uuid;

use daftar_core::fiscal::{
    FiscalYear, find_overlapping, resolve_current, validate_date_range, validate_year_name,
};
use daftar_core::ledger::{LedgerError, format_entry_number, next_sequence};
use daftar_shared::types::{FiscalYearId, TenantId};

use super::error::{DbFailure, RepositoryError};
use crate::entities::{entry_sequences, fiscal_years, journal_entries};
use crate::rls::RlsExt;

/// Atomically claims the next number, creating the counter on first use.
const ALLOCATE_SQL: &str = r"
INSERT INTO entry_sequences (tenant_id, fiscal_year_id, last_number, updated_at)
VALUES ($1, $2, $3, now())
ON CONFLICT (tenant_id, fiscal_year_id)
DO UPDATE SET last_number = entry_sequences.last_number + 1, updated_at = now()
RETURNING last_number
";

/// Input for creating a fiscal year.
#[derive(Debug, Clone)]
pub struct CreateFiscalYearInput {
    /// Year name, unique within the tenant (e.g., "FY2026").
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
}

/// Fiscal year repository.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    db: DatabaseConnection,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the end date is not after the start date
    /// - the name is blank or longer than 50 characters
    /// - the range overlaps another year of the tenant
    /// - the name is already used in the tenant
    pub async fn create_fiscal_year(
        &self,
        tenant_id: TenantId,
        input: CreateFiscalYearInput,
    ) -> Result<FiscalYear, RepositoryError> {
        validate_date_range(input.start_date, input.end_date)?;
        let name = input.name.trim().to_string();
        validate_year_name(&name)?;

        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let txn = rls.transaction();

        let existing = years_in(txn, tenant_id).await?;
        if existing.iter().any(|fy| fy.name == name) {
            return Err(LedgerError::DuplicateFiscalYearName(name).into());
        }
        if let Some(other) = find_overlapping(&existing, input.start_date, input.end_date) {
            return Err(LedgerError::OverlappingFiscalYear(other.name.clone()).into());
        }

        let now = chrono::Utc::now().into();
        let model = fiscal_years::ActiveModel {
            id: Set(FiscalYearId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            name: Set(name.clone()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            // A concurrent insert can slip past the checks above; the
            // constraints have the final word.
            let failure = DbFailure::of(&e);
            if failure.is_exclusion_violation() {
                RepositoryError::Ledger(LedgerError::OverlappingFiscalYear(format!(
                    "{} to {}",
                    input.start_date, input.end_date
                )))
            } else if failure.is_unique_violation() {
                RepositoryError::Ledger(LedgerError::DuplicateFiscalYearName(name.clone()))
            } else {
                e.into()
            }
        })?;

        rls.commit().await?;

        info!(
            tenant_id = %tenant_id,
            fiscal_year_id = %model.id,
            name = %model.name,
            "Fiscal year created"
        );
        Ok(to_fiscal_year(model))
    }

    /// Lists the tenant's fiscal years by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_fiscal_years(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<FiscalYear>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let years = years_in(rls.transaction(), tenant_id).await?;
        rls.commit().await?;
        Ok(years)
    }

    /// Finds a fiscal year by ID within the tenant.
    ///
    /// # Errors
    ///
    /// Returns `FiscalYearNotFound` if it does not exist in the tenant.
    pub async fn get_fiscal_year(
        &self,
        tenant_id: TenantId,
        fiscal_year_id: Uuid,
    ) -> Result<FiscalYear, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let year = year_by_id(rls.transaction(), tenant_id, fiscal_year_id).await?;
        rls.commit().await?;
        Ok(year)
    }

    /// Returns the fiscal year containing `today`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn current_fiscal_year(
        &self,
        tenant_id: TenantId,
        today: NaiveDate,
    ) -> Result<Option<FiscalYear>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let years = years_in(rls.transaction(), tenant_id).await?;
        rls.commit().await?;
        Ok(resolve_current(&years, today).cloned())
    }

    /// Previews the entry number the next allocation in a fiscal year yields.
    ///
    /// The preview is not reserved; a concurrent draft may claim it first.
    ///
    /// # Errors
    ///
    /// Returns `FiscalYearNotFound` if the year does not exist in the tenant.
    pub async fn next_entry_number(
        &self,
        tenant_id: TenantId,
        fiscal_year_id: Uuid,
    ) -> Result<String, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let txn = rls.transaction();

        year_by_id(txn, tenant_id, fiscal_year_id).await?;

        let counter = entry_sequences::Entity::find_by_id((tenant_id.into_inner(), fiscal_year_id))
            .one(txn)
            .await?;
        let next = match counter {
            Some(row) => sequence_value(row.last_number)? + 1,
            None => first_sequence(txn, tenant_id, fiscal_year_id).await?,
        };
        rls.commit().await?;

        Ok(format_entry_number(next))
    }
}

/// Loads every fiscal year of the tenant, by start date.
pub(crate) async fn years_in(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
) -> Result<Vec<FiscalYear>, RepositoryError> {
    let years = fiscal_years::Entity::find()
        .filter(fiscal_years::Column::TenantId.eq(tenant_id.into_inner()))
        .order_by_asc(fiscal_years::Column::StartDate)
        .all(txn)
        .await?;
    Ok(years.into_iter().map(to_fiscal_year).collect())
}

/// Loads one fiscal year of the tenant.
pub(crate) async fn year_by_id(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    fiscal_year_id: Uuid,
) -> Result<FiscalYear, RepositoryError> {
    let year = fiscal_years::Entity::find_by_id(fiscal_year_id)
        .filter(fiscal_years::Column::TenantId.eq(tenant_id.into_inner()))
        .one(txn)
        .await?
        .ok_or(LedgerError::FiscalYearNotFound(fiscal_year_id))?;
    Ok(to_fiscal_year(year))
}

/// The fiscal year an entry dated `date` belongs to.
pub(crate) async fn year_for_date(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    date: NaiveDate,
) -> Result<FiscalYear, RepositoryError> {
    let years = years_in(txn, tenant_id).await?;
    resolve_current(&years, date)
        .cloned()
        .ok_or_else(|| LedgerError::NoFiscalYearForDate(date).into())
}

/// The fiscal year containing the business date `today`.
pub(crate) async fn current_year(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    today: NaiveDate,
) -> Result<FiscalYear, RepositoryError> {
    let years = years_in(txn, tenant_id).await?;
    resolve_current(&years, today)
        .cloned()
        .ok_or_else(|| LedgerError::NoActiveFiscalYear(today).into())
}

/// Claims the next entry number in a fiscal year.
///
/// The counter row stays locked until the surrounding transaction ends, so
/// concurrent allocations in the same year queue up and never see the same
/// value. If the transaction rolls back, so does the increment.
pub(crate) async fn allocate_entry_number(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    fiscal_year_id: Uuid,
) -> Result<String, RepositoryError> {
    #[derive(Debug, FromQueryResult)]
    struct SequenceRow {
        last_number: i64,
    }

    let has_counter = entry_sequences::Entity::find_by_id((tenant_id.into_inner(), fiscal_year_id))
        .one(txn)
        .await?
        .is_some();

    // First use: continue after any numbers already in the year.
    let first = if has_counter {
        1
    } else {
        first_sequence(txn, tenant_id, fiscal_year_id).await?
    };
    let first = i64::try_from(first)
        .map_err(|_| LedgerError::Persistence("entry number overflow".to_string()))?;

    let row = SequenceRow::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        ALLOCATE_SQL,
        [
            tenant_id.into_inner().into(),
            fiscal_year_id.into(),
            first.into(),
        ],
    ))
    .one(txn)
    .await?
    .ok_or_else(|| LedgerError::Persistence("entry sequence not returned".to_string()))?;

    let entry_number = format_entry_number(sequence_value(row.last_number)?);
    debug!(
        tenant_id = %tenant_id,
        fiscal_year_id = %fiscal_year_id,
        entry_number = %entry_number,
        "Entry number allocated"
    );
    Ok(entry_number)
}

/// Where a new counter starts: after any entry numbers already in the year.
async fn first_sequence(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    fiscal_year_id: Uuid,
) -> Result<u64, RepositoryError> {
    let numbers: Vec<String> = journal_entries::Entity::find()
        .select_only()
        .column(journal_entries::Column::EntryNumber)
        .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(journal_entries::Column::FiscalYearId.eq(fiscal_year_id))
        .into_tuple()
        .all(txn)
        .await?;
    Ok(next_sequence(numbers.iter().map(String::as_str)))
}

fn sequence_value(last_number: i64) -> Result<u64, RepositoryError> {
    u64::try_from(last_number).map_err(|_| {
        LedgerError::Persistence(format!("invalid entry sequence value {last_number}")).into()
    })
}

/// Converts a database row into the domain fiscal year.
pub(crate) fn to_fiscal_year(model: fiscal_years::Model) -> FiscalYear {
    FiscalYear {
        id: FiscalYearId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        name: model.name,
        start_date: model.start_date,
        end_date: model.end_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fiscal_year() {
        let now = chrono::Utc::now().into();
        let id = Uuid::new_v4();
        let tenant = Uuid::new_v4();
        let fy = to_fiscal_year(fiscal_years::Model {
            id,
            tenant_id: tenant,
            name: "FY2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            created_at: now,
            updated_at: now,
        });
        assert_eq!(fy.id.into_inner(), id);
        assert_eq!(fy.tenant_id.into_inner(), tenant);
        assert!(fy.contains(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()));
    }

    #[test]
    fn test_sequence_value_rejects_negative() {
        assert_eq!(sequence_value(7).unwrap(), 7);
        assert!(sequence_value(-1).is_err());
    }

    #[test]
    fn test_allocate_sql_increments_on_conflict() {
        assert!(ALLOCATE_SQL.contains("ON CONFLICT (tenant_id, fiscal_year_id)"));
        assert!(ALLOCATE_SQL.contains("last_number = entry_sequences.last_number + 1"));
        assert!(ALLOCATE_SQL.contains("RETURNING last_number"));
    }
}
