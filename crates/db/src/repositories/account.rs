//! Account repository for chart of accounts database operations.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use tracing::{debug, info};
use uuid::Uuid;

use daftar_core::accounts::{
    AccountTreeNode, ChartAccount, ParentAccount, STANDARD_CHART, build_tree, resolve_level,
    validate_account_code, validate_account_names,
};
use daftar_core::ledger::{AccountType, LedgerError, LineAccount};
use daftar_shared::types::TenantId;

use super::error::{DbFailure, RepositoryError};
use crate::entities::accounts;
use crate::rls::RlsExt;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (unique within the tenant).
    pub code: String,
    /// English name.
    pub name_en: String,
    /// Arabic name.
    pub name_ar: String,
    /// Classification.
    pub account_type: AccountType,
    /// Parent header account.
    pub parent_id: Option<Uuid>,
    /// Header accounts group children and take no postings.
    pub is_header: bool,
    /// Whether the account accepts postings.
    pub is_active: bool,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by header flag.
    pub is_header: Option<bool>,
    /// Filter by parent ID (`Some(None)` = root accounts only).
    pub parent_id: Option<Option<Uuid>>,
}

/// Account repository for the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the code is malformed or already used in the tenant
    /// - a name is blank or too long
    /// - the parent does not exist in the tenant or is not a header
    pub async fn create_account(
        &self,
        tenant_id: TenantId,
        input: CreateAccountInput,
    ) -> Result<ChartAccount, RepositoryError> {
        let code = validate_account_code(&input.code)?.to_string();
        validate_account_names(&input.name_en, &input.name_ar)?;

        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let txn = rls.transaction();

        let existing = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(accounts::Column::Code.eq(&code))
            .one(txn)
            .await?;
        if existing.is_some() {
            return Err(LedgerError::DuplicateAccountCode(code).into());
        }

        let parent = match input.parent_id {
            Some(parent_id) => {
                let parent = accounts::Entity::find_by_id(parent_id)
                    .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
                    .one(txn)
                    .await?
                    .ok_or(LedgerError::ParentNotFound(parent_id))?;
                Some(ParentAccount {
                    id: parent.id,
                    is_header: parent.is_header,
                    level: parent.level,
                })
            }
            None => None,
        };
        let level = resolve_level(parent.as_ref())?;

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id.into_inner()),
            parent_id: Set(input.parent_id),
            code: Set(code.clone()),
            name_en: Set(input.name_en),
            name_ar: Set(input.name_ar),
            account_type: Set(input.account_type.into()),
            is_header: Set(input.is_header),
            level: Set(level),
            balance: Set(Decimal::ZERO),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            if DbFailure::of(&e).is_unique_violation() {
                RepositoryError::Ledger(LedgerError::DuplicateAccountCode(code.clone()))
            } else {
                e.into()
            }
        })?;

        rls.commit().await?;

        info!(
            tenant_id = %tenant_id,
            account_id = %account.id,
            code = %account.code,
            "Account created"
        );
        Ok(to_chart_account(account))
    }

    /// Finds an account by ID within the tenant.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist in the tenant.
    pub async fn get_account(
        &self,
        tenant_id: TenantId,
        account_id: Uuid,
    ) -> Result<ChartAccount, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let account = accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .one(rls.transaction())
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        rls.commit().await?;
        Ok(to_chart_account(account))
    }

    /// Lists accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        tenant_id: TenantId,
        filter: AccountFilter,
    ) -> Result<Vec<ChartAccount>, RepositoryError> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            query = query.filter(
                accounts::Column::AccountType
                    .eq(crate::entities::sea_orm_active_enums::AccountType::from(account_type)),
            );
        }

        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        if let Some(is_header) = filter.is_header {
            query = query.filter(accounts::Column::IsHeader.eq(is_header));
        }

        if let Some(parent_id) = filter.parent_id {
            match parent_id {
                Some(pid) => {
                    query = query.filter(accounts::Column::ParentId.eq(pid));
                }
                None => {
                    query = query.filter(accounts::Column::ParentId.is_null());
                }
            }
        }

        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let accounts = query.all(rls.transaction()).await?;
        rls.commit().await?;

        Ok(accounts.into_iter().map(to_chart_account).collect())
    }

    /// Returns the tenant's chart of accounts as a forest ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_tree(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<AccountTreeNode>, RepositoryError> {
        let accounts = self
            .list_accounts(tenant_id, AccountFilter::default())
            .await?;
        Ok(build_tree(accounts))
    }

    /// Inserts the standard Egyptian chart of accounts.
    ///
    /// Codes that already exist are skipped, so running it twice inserts
    /// nothing the second time. Returns the number of accounts inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing account with a template parent code
    /// is not a header, or the database operation fails.
    pub async fn seed_standard_chart(&self, tenant_id: TenantId) -> Result<u64, RepositoryError> {
        let rls = self.db.with_rls(tenant_id.into_inner()).await?;
        let txn = rls.transaction();

        let mut by_code: HashMap<String, ParentAccount> = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .all(txn)
            .await?
            .into_iter()
            .map(|a| {
                (
                    a.code,
                    ParentAccount {
                        id: a.id,
                        is_header: a.is_header,
                        level: a.level,
                    },
                )
            })
            .collect();

        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let mut inserted = 0u64;

        for template in STANDARD_CHART {
            if by_code.contains_key(template.code) {
                continue;
            }

            let parent = match template.parent_code {
                Some(parent_code) => Some(
                    *by_code
                        .get(parent_code)
                        .ok_or_else(|| LedgerError::InvalidAccountCode(parent_code.to_string()))?,
                ),
                None => None,
            };
            let level = resolve_level(parent.as_ref())?;

            let id = Uuid::now_v7();
            accounts::ActiveModel {
                id: Set(id),
                tenant_id: Set(tenant_id.into_inner()),
                parent_id: Set(parent.map(|p| p.id)),
                code: Set(template.code.to_string()),
                name_en: Set(template.name_en.to_string()),
                name_ar: Set(template.name_ar.to_string()),
                account_type: Set(template.account_type.into()),
                is_header: Set(template.is_header),
                level: Set(level),
                balance: Set(Decimal::ZERO),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(txn)
            .await?;

            by_code.insert(
                template.code.to_string(),
                ParentAccount {
                    id,
                    is_header: template.is_header,
                    level,
                },
            );
            inserted += 1;
        }

        rls.commit().await?;

        info!(tenant_id = %tenant_id, inserted, "Standard chart of accounts seeded");
        Ok(inserted)
    }

    /// Adds a signed delta to an account's stored balance.
    ///
    /// Runs as a single `UPDATE ... SET balance = balance + delta`, so
    /// concurrent postings to the same account serialize on the row lock
    /// instead of overwriting each other.
    pub(crate) async fn apply_balance_delta(
        txn: &DatabaseTransaction,
        tenant_id: TenantId,
        account_id: Uuid,
        delta: Decimal,
    ) -> Result<(), RepositoryError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
            .filter(accounts::Column::Id.eq(account_id))
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(LedgerError::AccountNotFound(account_id).into());
        }

        debug!(account_id = %account_id, delta = %delta, "Balance delta applied");
        Ok(())
    }

    /// Loads the posting-relevant fields of the given accounts.
    ///
    /// Accounts outside the tenant are simply absent from the map.
    pub(crate) async fn load_line_accounts(
        txn: &DatabaseTransaction,
        tenant_id: TenantId,
        account_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, LineAccount>, RepositoryError> {
        if account_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let accounts = accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(accounts::Column::Id.is_in(account_ids.iter().copied()))
            .all(txn)
            .await?;

        Ok(accounts
            .into_iter()
            .map(|a| {
                (
                    a.id,
                    LineAccount {
                        id: a.id,
                        account_type: a.account_type.into(),
                        is_header: a.is_header,
                        is_active: a.is_active,
                    },
                )
            })
            .collect())
    }
}

/// Converts a database row into the domain account.
pub(crate) fn to_chart_account(model: accounts::Model) -> ChartAccount {
    ChartAccount {
        id: model.id,
        parent_id: model.parent_id,
        code: model.code,
        name_en: model.name_en,
        name_ar: model.name_ar,
        account_type: model.account_type.into(),
        is_header: model.is_header,
        level: model.level,
        balance: model.balance,
        is_active: model.is_active,
    }
}

/// Builds a lookup closure over a preloaded account map.
pub(crate) fn account_lookup(
    accounts: &HashMap<Uuid, LineAccount>,
) -> impl Fn(Uuid) -> Result<LineAccount, LedgerError> + '_ {
    |id| {
        accounts
            .get(&id)
            .copied()
            .ok_or(LedgerError::AccountNotFound(id))
    }
}
