//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthContext,
};
use daftar_core::ledger::AccountType;
use daftar_db::repositories::{AccountFilter, AccountRepository, CreateAccountInput};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/tree", get(account_tree))
        .route("/accounts/{account_id}", get(get_account))
}

/// Query parameters for listing accounts.
#[derive(Debug, Default, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub active: Option<bool>,
    /// Filter by header flag.
    pub header: Option<bool>,
    /// Only children of this account.
    pub parent_id: Option<Uuid>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Digits-only code, unique within the tenant.
    pub code: String,
    /// English name.
    pub name_en: String,
    /// Arabic name.
    pub name_ar: String,
    /// ASSET, LIABILITY, EQUITY, REVENUE or EXPENSE.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Parent header account.
    pub parent_id: Option<Uuid>,
    /// Whether the account only groups children (default: false).
    #[serde(default)]
    pub is_header: bool,
    /// Whether the account is active (default: true).
    pub is_active: Option<bool>,
}

/// GET `/accounts` - List accounts ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Query(query), _): WithRejection<Query<ListAccountsQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());
    let filter = AccountFilter {
        account_type: query.account_type,
        is_active: query.active,
        is_header: query.header,
        parent_id: query.parent_id.map(Some),
    };

    let accounts = repo.list_accounts(ctx.tenant_id, filter).await?;
    Ok(Json(json!({ "accounts": accounts })))
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Json(payload), _): WithRejection<Json<CreateAccountRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        code: payload.code,
        name_en: payload.name_en,
        name_ar: payload.name_ar,
        account_type: payload.account_type,
        parent_id: payload.parent_id,
        is_header: payload.is_header,
        is_active: payload.is_active.unwrap_or(true),
    };

    let account = repo.create_account(ctx.tenant_id, input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts/tree` - Nested chart of accounts.
async fn account_tree(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());
    let tree = repo.account_tree(ctx.tenant_id).await?;
    Ok(Json(json!({ "accounts": tree })))
}

/// GET `/accounts/{account_id}` - Account detail with its stored balance.
async fn get_account(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Path(account_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = AccountRepository::new((*state.db).clone());
    let account = repo.get_account(ctx.tenant_id, account_id).await?;
    Ok(Json(account))
}
