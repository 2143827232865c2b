//! Authentication types: JWT claims and the resolved tenant context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{TenantId, UserId};

/// JWT claims for access and impersonation tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID). For impersonation tokens this is the acting admin.
    pub sub: Uuid,
    /// Tenant the token is scoped to.
    pub tenant: Uuid,
    /// User's role in the tenant.
    pub role: String,
    /// Acting platform admin, present only on impersonation tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act: Option<Uuid>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a tenant user.
    #[must_use]
    pub fn new(user_id: Uuid, tenant_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            tenant: tenant_id,
            role: role.to_string(),
            act: None,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Creates claims for a platform admin acting inside a tenant.
    #[must_use]
    pub fn impersonation(
        acting_admin_id: Uuid,
        target_tenant_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let mut claims = Self::new(acting_admin_id, target_tenant_id, "admin", expires_at);
        claims.act = Some(acting_admin_id);
        claims
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the tenant ID from claims.
    #[must_use]
    pub const fn tenant_id(&self) -> Uuid {
        self.tenant
    }

    /// Returns true if this token was issued for impersonation.
    #[must_use]
    pub const fn is_impersonation(&self) -> bool {
        self.act.is_some()
    }
}

/// The `(tenant, user)` pair every ledger operation runs under.
///
/// Resolved by the authorization layer before any ledger call. The ledger
/// only reads `tenant_id` and `user_id`; `acting_admin_id` is carried for
/// audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    /// Tenant whose data is being accessed.
    pub tenant_id: TenantId,
    /// User recorded as creator/poster.
    pub user_id: UserId,
    /// Platform admin impersonating the tenant, if any.
    pub acting_admin_id: Option<UserId>,
}

impl TenantContext {
    /// Creates a context for a regular tenant user.
    #[must_use]
    pub const fn new(tenant_id: TenantId, user_id: UserId) -> Self {
        Self {
            tenant_id,
            user_id,
            acting_admin_id: None,
        }
    }

    /// Returns the tenant ID as a raw UUID.
    #[must_use]
    pub const fn tenant(&self) -> Uuid {
        self.tenant_id.0
    }

    /// Returns the user ID as a raw UUID.
    #[must_use]
    pub const fn user(&self) -> Uuid {
        self.user_id.0
    }
}

impl From<&Claims> for TenantContext {
    fn from(claims: &Claims) -> Self {
        Self {
            tenant_id: TenantId::from_uuid(claims.tenant),
            user_id: UserId::from_uuid(claims.sub),
            acting_admin_id: claims.act.map(UserId::from_uuid),
        }
    }
}
