//! Tenant and user repository.
//!
//! Tenants and users are global tables without row-level security; they are
//! looked up before a tenant context exists.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::info;
use uuid::Uuid;

use daftar_shared::types::{TenantId, UserId};

use crate::entities::{tenants, users};

/// Input for creating a tenant.
#[derive(Debug, Clone)]
pub struct CreateTenantInput {
    /// Display name.
    pub name: String,
    /// URL-safe unique slug.
    pub slug: String,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Home tenant; `None` only for platform administrators.
    pub tenant_id: Option<TenantId>,
    /// Login email.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// Role name carried into tokens.
    pub role: String,
    /// May impersonate tenants.
    pub is_platform_admin: bool,
}

/// Repository for tenants and their users.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is taken or the insert fails.
    pub async fn create_tenant(&self, input: CreateTenantInput) -> Result<tenants::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let tenant = tenants::ActiveModel {
            id: Set(TenantId::new().into_inner()),
            name: Set(input.name),
            slug: Set(input.slug),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(tenant_id = %tenant.id, slug = %tenant.slug, "Tenant created");
        Ok(tenant)
    }

    /// Finds a tenant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<tenants::Model>, DbErr> {
        tenants::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a tenant by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<tenants::Model>, DbErr> {
        tenants::Entity::find()
            .filter(tenants::Column::Slug.eq(slug))
            .one(&self.db)
            .await
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the insert fails.
    pub async fn create_user(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            tenant_id: Set(input.tenant_id.map(TenantId::into_inner)),
            email: Set(input.email),
            full_name: Set(input.full_name),
            role: Set(input.role),
            is_platform_admin: Set(input.is_platform_admin),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }
}
