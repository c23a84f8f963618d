pub mod handlers;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_page))
        .route("/health", get(health::health_handler))
        // View state
        .route("/role", post(handlers::handle_set_role))
        .route("/query", post(handlers::handle_set_query))
        .route("/type", post(handlers::handle_set_type_filter))
        .route("/sort", post(handlers::handle_set_sort))
        // Jobs
        .route("/jobs", post(handlers::handle_save_job))
        .route("/jobs/new", get(handlers::handle_new_job_form))
        .route("/jobs/:id/select", post(handlers::handle_select))
        .route("/jobs/:id/edit", get(handlers::handle_edit_job_form))
        .route(
            "/jobs/:id/delete",
            get(handlers::handle_confirm_delete).post(handlers::handle_delete_job),
        )
        // Applications
        .route("/jobs/:id/apply", post(handlers::handle_apply))
        .with_state(state)
}
