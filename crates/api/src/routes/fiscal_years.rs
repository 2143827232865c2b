//! Fiscal year routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthContext,
};
use daftar_db::repositories::{CreateFiscalYearInput, FiscalRepository};

/// Creates the fiscal year routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/fiscal-years",
            get(list_fiscal_years).post(create_fiscal_year),
        )
        .route("/fiscal-years/current", get(current_fiscal_year))
        .route(
            "/fiscal-years/{fiscal_year_id}/next-entry-number",
            get(next_entry_number),
        )
}

/// Request body for creating a fiscal year.
#[derive(Debug, Deserialize)]
pub struct CreateFiscalYearRequest {
    /// Fiscal year name (e.g., "FY2026"), unique within the tenant.
    pub name: String,
    /// Start date (YYYY-MM-DD).
    pub start_date: NaiveDate,
    /// End date (YYYY-MM-DD), after the start date.
    pub end_date: NaiveDate,
}

/// GET `/fiscal-years` - List fiscal years by start date.
async fn list_fiscal_years(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
) -> ApiResult<impl IntoResponse> {
    let repo = FiscalRepository::new((*state.db).clone());
    let years = repo.list_fiscal_years(ctx.tenant_id).await?;
    Ok(Json(json!({ "fiscal_years": years })))
}

/// POST `/fiscal-years` - Create a fiscal year.
async fn create_fiscal_year(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Json(payload), _): WithRejection<Json<CreateFiscalYearRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = FiscalRepository::new((*state.db).clone());
    let input = CreateFiscalYearInput {
        name: payload.name,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    let year = repo.create_fiscal_year(ctx.tenant_id, input).await?;
    Ok((StatusCode::CREATED, Json(year)))
}

/// GET `/fiscal-years/current` - The year containing today, or `null`.
async fn current_fiscal_year(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
) -> ApiResult<impl IntoResponse> {
    let repo = FiscalRepository::new((*state.db).clone());
    let today = state.today();
    let year = repo.current_fiscal_year(ctx.tenant_id, today).await?;
    Ok(Json(json!({ "today": today, "fiscal_year": year })))
}

/// GET `/fiscal-years/{fiscal_year_id}/next-entry-number` - Preview without allocating.
async fn next_entry_number(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Path(fiscal_year_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = FiscalRepository::new((*state.db).clone());
    let number = repo.next_entry_number(ctx.tenant_id, fiscal_year_id).await?;
    Ok(Json(json!({
        "fiscal_year_id": fiscal_year_id,
        "next_entry_number": number
    })))
}
