//! Row-Level Security (RLS) context management.
//!
//! Every tenant-owned table carries a policy comparing `tenant_id` against the
//! `app.current_tenant_id` setting, so all tenant queries must run inside a
//! transaction that has set it.
//!
//! # Usage
//!
//! ```ignore
//! use daftar_db::rls::RlsExt;
//!
//! let rls = db.with_rls(tenant_id).await?;
//! let accounts = accounts::Entity::find().all(rls.transaction()).await?;
//! rls.commit().await?;
//! ```

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use uuid::Uuid;

/// A transaction scoped to one tenant.
///
/// The `SET LOCAL` only lives until the transaction ends, so a pooled
/// connection never leaks one tenant's context into the next request.
/// Dropping it without committing rolls back.
pub struct RlsConnection {
    txn: DatabaseTransaction,
}

impl RlsConnection {
    /// Begins a transaction and sets the tenant context on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the context
    /// cannot be set.
    pub async fn new(db: &DatabaseConnection, tenant_id: Uuid) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        set_rls_context(&txn, tenant_id).await?;
        Ok(Self { txn })
    }

    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }
}

/// Extension trait for `DatabaseConnection` to open tenant-scoped transactions.
#[async_trait::async_trait]
pub trait RlsExt {
    /// Opens a transaction scoped to the given tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the RLS connection cannot be created.
    async fn with_rls(&self, tenant_id: Uuid) -> Result<RlsConnection, DbErr>;
}

#[async_trait::async_trait]
impl RlsExt for DatabaseConnection {
    async fn with_rls(&self, tenant_id: Uuid) -> Result<RlsConnection, DbErr> {
        RlsConnection::new(self, tenant_id).await
    }
}

/// Builds the statement that sets the tenant context.
///
/// The id is a parsed `Uuid`, so its textual form cannot carry quotes.
#[must_use]
pub fn rls_context_sql(tenant_id: Uuid) -> String {
    format!("SET LOCAL app.current_tenant_id = '{tenant_id}'")
}

/// Sets the tenant context on an existing transaction.
///
/// # Errors
///
/// Returns an error if the context cannot be set.
pub async fn set_rls_context(txn: &DatabaseTransaction, tenant_id: Uuid) -> Result<(), DbErr> {
    txn.execute_unprepared(&rls_context_sql(tenant_id)).await?;
    Ok(())
}
