//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the HTTP API under a single Axum router: roadmap
//! generation and flowchart layout, AI career analysis, and profile/resume
//! persistence. Handlers translate requests into service calls and map
//! service errors onto status codes; business logic stays in `services`.

pub mod analysis;
pub mod profiles;
pub mod roadmaps;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[must_use]
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/roadmaps/generate", post(roadmaps::generate))
        .route("/api/roadmaps/flowchart", post(roadmaps::flowchart))
        .route("/api/roadmaps/flowchart/reveal", post(roadmaps::flowchart_reveal))
        .route("/api/roadmaps/batch", post(roadmaps::batch))
        .route("/api/analysis/compatibility", post(analysis::compatibility))
        .route("/api/analysis/skills", post(analysis::skills))
        .route("/api/analysis/resume", post(analysis::resume))
        .route("/api/analysis/team", post(analysis::team))
        .route("/api/analysis/certifications", post(analysis::certifications))
        .route("/api/analysis/employee-name", post(analysis::employee_name))
        .route("/api/analysis/next-role", post(analysis::next_role))
        .route(
            "/api/profiles/{id}",
            get(profiles::get_profile).patch(profiles::update_desired_roles),
        )
        .route(
            "/api/profiles/{id}/resumes",
            get(profiles::list_resumes).post(profiles::upload_resume),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
