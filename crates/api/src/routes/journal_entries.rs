//! Journal entry routes: drafts, posting, reversal and deletion.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthContext,
};
use daftar_core::ledger::{EntryStatus, JournalLineInput};
use daftar_db::repositories::{CreateDraftInput, JournalFilter, JournalRepository};
use daftar_shared::types::CostCenterId;

/// Creates the journal entry routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", get(list_entries).post(create_draft))
        .route(
            "/journal-entries/{entry_id}",
            get(get_entry).delete(delete_draft),
        )
        .route("/journal-entries/{entry_id}/post", post(post_entry))
        .route("/journal-entries/{entry_id}/reverse", post(reverse_entry))
}

/// Query parameters for listing entries.
#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesQuery {
    /// DRAFT or POSTED.
    pub status: Option<EntryStatus>,
    /// Restrict to one fiscal year.
    pub fiscal_year_id: Option<Uuid>,
    /// Entries dated on or after (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Entries dated on or before (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// One line of a draft request; omitted sides default to zero.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// Leaf account.
    pub account_id: Uuid,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Line narration.
    pub description: Option<String>,
}

impl From<LineRequest> for JournalLineInput {
    fn from(line: LineRequest) -> Self {
        Self {
            account_id: line.account_id,
            debit: line.debit,
            credit: line.credit,
            cost_center_id: line.cost_center_id,
            description: line.description,
        }
    }
}

/// Request body for creating a draft entry.
#[derive(Debug, Deserialize)]
pub struct CreateDraftRequest {
    /// Accounting date (YYYY-MM-DD).
    pub entry_date: NaiveDate,
    /// Free-text description.
    pub description: Option<String>,
    /// External reference.
    pub reference: Option<String>,
    /// At least two lines.
    pub lines: Vec<LineRequest>,
}

/// GET `/journal-entries` - List entry headers, newest first.
async fn list_entries(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Query(query), _): WithRejection<Query<ListEntriesQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = JournalRepository::new((*state.db).clone());
    let filter = JournalFilter {
        status: query.status,
        fiscal_year_id: query.fiscal_year_id,
        from_date: query.from,
        to_date: query.to,
    };

    let entries = repo.list_entries(ctx.tenant_id, filter).await?;
    Ok(Json(json!({ "journal_entries": entries })))
}

/// POST `/journal-entries` - Create a numbered draft.
async fn create_draft(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Json(payload), _): WithRejection<Json<CreateDraftRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = JournalRepository::new((*state.db).clone());
    let input = CreateDraftInput {
        entry_date: payload.entry_date,
        description: payload.description,
        reference: payload.reference,
        lines: payload.lines.into_iter().map(Into::into).collect(),
    };

    let entry = repo.create_draft(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET `/journal-entries/{entry_id}` - Entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Path(entry_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = JournalRepository::new((*state.db).clone());
    let entry = repo.get_entry(ctx.tenant_id, entry_id).await?;
    Ok(Json(entry))
}

/// DELETE `/journal-entries/{entry_id}` - Delete a draft.
async fn delete_draft(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Path(entry_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = JournalRepository::new((*state.db).clone());
    repo.delete_draft(&ctx, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/journal-entries/{entry_id}/post` - Post a draft.
async fn post_entry(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Path(entry_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = JournalRepository::new((*state.db).clone());
    let entry = repo.post(&ctx, entry_id).await?;
    Ok(Json(entry))
}

/// POST `/journal-entries/{entry_id}/reverse` - Reverse a posted entry as of today.
async fn reverse_entry(
    State(state): State<AppState>,
    AuthContext(ctx): AuthContext,
    WithRejection(Path(entry_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let repo = JournalRepository::new((*state.db).clone());
    let reversal = repo.reverse(&ctx, entry_id, state.today()).await?;
    Ok((StatusCode::CREATED, Json(reversal)))
}
