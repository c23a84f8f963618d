//! Form handlers. Each mutating route performs one store operation under the
//! board lock, then redirects back to the page (303), which renders the
//! snapshot that operation published.

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{ApplicationForm, JobPayload, Role, SortOrder};
use crate::state::AppState;
use crate::view;

pub const APPLIED_NOTICE: &str = "applied";

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct TypeFilterForm {
    pub type_filter: String,
}

#[derive(Debug, Deserialize)]
pub struct SortForm {
    pub sort: SortOrder,
}

#[derive(Debug, Deserialize)]
pub struct SaveJobForm {
    #[serde(default)]
    pub editing_id: Option<String>,
    #[serde(flatten)]
    pub payload: JobPayload,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirmed: String,
}

/// GET /
pub async fn handle_page(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, AppError> {
    let notice = match params.notice.as_deref() {
        Some(APPLIED_NOTICE) => Some("Application submitted!"),
        _ => None,
    };
    Ok(Html(view::render_page(&state.snapshot(), notice)?))
}

/// POST /role
pub async fn handle_set_role(
    State(state): State<AppState>,
    Form(form): Form<RoleForm>,
) -> Result<Redirect, AppError> {
    let role = form
        .role
        .parse::<Role>()
        .map_err(|e| AppError::Validation(format!("Unknown role '{}'", e.0)))?;
    state.board.lock().await.set_role(role).await?;
    Ok(Redirect::to("/"))
}

/// POST /query
pub async fn handle_set_query(
    State(state): State<AppState>,
    Form(form): Form<QueryForm>,
) -> Redirect {
    state.board.lock().await.set_query(&form.query);
    Redirect::to("/")
}

/// POST /type
pub async fn handle_set_type_filter(
    State(state): State<AppState>,
    Form(form): Form<TypeFilterForm>,
) -> Redirect {
    state.board.lock().await.set_type_filter(&form.type_filter);
    Redirect::to("/")
}

/// POST /sort
pub async fn handle_set_sort(
    State(state): State<AppState>,
    Form(form): Form<SortForm>,
) -> Redirect {
    state.board.lock().await.set_sort(form.sort);
    Redirect::to("/")
}

/// POST /jobs/:id/select
pub async fn handle_select(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    state.board.lock().await.select(&id);
    Redirect::to("/")
}

/// GET /jobs/new
pub async fn handle_new_job_form() -> Result<Html<String>, AppError> {
    Ok(Html(view::render_job_form(&JobPayload::default(), None)?))
}

/// GET /jobs/:id/edit
pub async fn handle_edit_job_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let snapshot = state.snapshot();
    let job = snapshot
        .job(&id)
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Html(view::render_job_form(
        &JobPayload::from_job(job),
        Some(job.id.as_str()),
    )?))
}

/// POST /jobs
pub async fn handle_save_job(
    State(state): State<AppState>,
    Form(form): Form<SaveJobForm>,
) -> Result<Redirect, AppError> {
    let editing_id = form.editing_id.as_deref().filter(|id| !id.is_empty());
    state
        .board
        .lock()
        .await
        .create_or_update_job(form.payload, editing_id)
        .await?;
    Ok(Redirect::to("/"))
}

/// GET /jobs/:id/delete
pub async fn handle_confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let snapshot = state.snapshot();
    let job = snapshot
        .job(&id)
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Html(view::render_delete_confirmation(job)?))
}

/// POST /jobs/:id/delete
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, AppError> {
    let confirmed = form.confirmed == "true";
    state.board.lock().await.delete_job(&id, &confirmed).await?;
    Ok(Redirect::to("/"))
}

/// POST /jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ApplicationForm>,
) -> Result<Redirect, AppError> {
    state
        .board
        .lock()
        .await
        .submit_application(&id, form)
        .await?;
    Ok(Redirect::to(&format!("/?notice={APPLIED_NOTICE}")))
}
