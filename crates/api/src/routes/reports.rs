//! Report routes.
//!
//! Reports are recomputed from posted journal lines on every request; the
//! stored account balances are never read here.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthContext,
};
use daftar_core::reports::TrialBalanceOptions;
use daftar_db::repositories::ReportRepository;

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trial-balance", get(get_trial_balance))
        .route("/reports/balance-sheet", get(get_balance_sheet))
}

/// Query parameters for the trial balance.
#[derive(Debug, Default, Deserialize)]
pub struct TrialBalanceQuery {
    /// Fiscal year (defaults to the current one).
    pub fiscal_year_id: Option<Uuid>,
    /// Cutoff date (defaults to today, capped at the year's end).
    pub as_of: Option<NaiveDate>,
    /// Include accounts with no activity.
    #[serde(default)]
    pub include_zero: bool,
    /// Group rows by account type.
    #[serde(default)]
    pub group_by_type: bool,
}

/// Query parameters for the balance sheet.
#[derive(Debug, Default, Deserialize)]
pub struct BalanceSheetQuery {
    /// As of date (defaults to today).
    pub as_of: Option<NaiveDate>,
}

/// GET `/reports/trial-balance`
async fn get_trial_balance(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Query(query), _): WithRejection<Query<TrialBalanceQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = ReportRepository::new((*state.db).clone());
    let options = TrialBalanceOptions {
        include_zero: query.include_zero,
        group_by_type: query.group_by_type,
    };

    let report = repo
        .trial_balance(
            ctx.tenant_id,
            query.fiscal_year_id,
            query.as_of,
            state.today(),
            options,
        )
        .await?;
    Ok(Json(report))
}

/// GET `/reports/balance-sheet`
async fn get_balance_sheet(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Query(query), _): WithRejection<Query<BalanceSheetQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = ReportRepository::new((*state.db).clone());
    let as_of = query.as_of.unwrap_or_else(|| state.today());
    let report = repo.balance_sheet(ctx.tenant_id, as_of).await?;
    Ok(Json(report))
}
