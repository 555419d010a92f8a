//! AI career-analysis routes.
//!
//! Every handler follows the same shape: require a configured LLM (503
//! otherwise), pass the caller through the rate limiter (429 on rejection),
//! then delegate to the career service and map its error to a status code.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::llm::LlmChat;
use crate::services::career::{self, CareerError, ResumeAnalysis, SkillEntry, TeamProfile};
use crate::state::AppState;

fn require_llm(state: &AppState) -> Result<Arc<dyn LlmChat>, StatusCode> {
    state.llm.clone().ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

/// Anonymous callers share one rate-limit bucket keyed by the nil UUID.
fn check_rate_limit(state: &AppState, user_id: Option<Uuid>) -> Result<(), StatusCode> {
    state
        .rate_limiter
        .check_and_record(user_id.unwrap_or_else(Uuid::nil))
        .map_err(|e| {
            warn!(error = %e, "analysis: rate limit exceeded");
            StatusCode::TOO_MANY_REQUESTS
        })
}

pub(crate) fn career_error_to_status(err: &CareerError) -> StatusCode {
    match err {
        CareerError::Llm(_) | CareerError::InvalidRoleTitle(_) => StatusCode::BAD_GATEWAY,
    }
}

// =============================================================================
// COMPATIBILITY
// =============================================================================

#[derive(Deserialize)]
pub struct CompatibilityBody {
    pub resume: String,
    pub role: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct CompatibilityResponse {
    pub compatibility: u8,
}

/// `POST /api/analysis/compatibility` — score resume vs role, 0–100.
pub async fn compatibility(
    State(state): State<AppState>,
    Json(body): Json<CompatibilityBody>,
) -> Result<Json<CompatibilityResponse>, StatusCode> {
    let llm = require_llm(&state)?;
    check_rate_limit(&state, body.user_id)?;

    let score = career::compatibility(&llm, &body.resume, &body.role, &body.skills_required)
        .await
        .map_err(|e| career_error_to_status(&e))?;
    Ok(Json(CompatibilityResponse { compatibility: score }))
}

// =============================================================================
// SKILLS / RESUME / TEAM
// =============================================================================

#[derive(Deserialize)]
pub struct ResumeBody {
    pub resume: String,
    pub user_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct SkillsResponse {
    pub skills: Vec<SkillEntry>,
}

/// `POST /api/analysis/skills` — three recommended skills with reasons.
pub async fn skills(
    State(state): State<AppState>,
    Json(body): Json<ResumeBody>,
) -> Result<Json<SkillsResponse>, StatusCode> {
    let llm = require_llm(&state)?;
    check_rate_limit(&state, body.user_id)?;

    let entries = career::skills_to_learn(&llm, &body.resume)
        .await
        .map_err(|e| career_error_to_status(&e))?;
    Ok(Json(SkillsResponse { skills: entries }))
}

/// `POST /api/analysis/resume` — sectioned resume critique.
pub async fn resume(
    State(state): State<AppState>,
    Json(body): Json<ResumeBody>,
) -> Result<Json<ResumeAnalysis>, StatusCode> {
    let llm = require_llm(&state)?;
    check_rate_limit(&state, body.user_id)?;

    let analysis = career::resume_analysis(&llm, &body.resume)
        .await
        .map_err(|e| career_error_to_status(&e))?;
    Ok(Json(analysis))
}

#[derive(Deserialize)]
pub struct TeamBody {
    #[serde(flatten)]
    pub profile: TeamProfile,
    pub resumes: Vec<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct TeamResponse {
    pub analysis: String,
}

/// `POST /api/analysis/team` — aggregate skills-gap report for a team.
pub async fn team(
    State(state): State<AppState>,
    Json(body): Json<TeamBody>,
) -> Result<Json<TeamResponse>, StatusCode> {
    let llm = require_llm(&state)?;
    check_rate_limit(&state, body.user_id)?;

    let report = career::team_analysis(&llm, &body.profile, &body.resumes)
        .await
        .map_err(|e| career_error_to_status(&e))?;
    Ok(Json(TeamResponse { analysis: report }))
}

// =============================================================================
// CERTIFICATIONS
// =============================================================================

#[derive(Deserialize)]
pub struct CompareCertificationsBody {
    pub certification1: String,
    pub certification2: String,
    pub user_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct CompareCertificationsResponse {
    pub comparison: String,
}

/// `POST /api/analysis/certifications` — compare two certifications on
/// demand, pay range, and job titles. Both names are required.
pub async fn certifications(
    State(state): State<AppState>,
    Json(body): Json<CompareCertificationsBody>,
) -> Result<Json<CompareCertificationsResponse>, StatusCode> {
    let first = body.certification1.trim();
    let second = body.certification2.trim();
    if first.is_empty() || second.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let llm = require_llm(&state)?;
    check_rate_limit(&state, body.user_id)?;

    let comparison = career::compare_certifications(&llm, first, second)
        .await
        .map_err(|e| career_error_to_status(&e))?;
    Ok(Json(CompareCertificationsResponse { comparison }))
}

// =============================================================================
// NAME / NEXT ROLE
// =============================================================================

#[derive(Serialize)]
pub struct EmployeeNameResponse {
    pub name: String,
}

/// `POST /api/analysis/employee-name` — extract the candidate's name.
pub async fn employee_name(
    State(state): State<AppState>,
    Json(body): Json<ResumeBody>,
) -> Result<Json<EmployeeNameResponse>, StatusCode> {
    let llm = require_llm(&state)?;
    check_rate_limit(&state, body.user_id)?;

    let name = career::employee_name(&llm, &body.resume)
        .await
        .map_err(|e| career_error_to_status(&e))?;
    Ok(Json(EmployeeNameResponse { name }))
}

#[derive(Serialize)]
pub struct NextRoleResponse {
    pub role: String,
}

/// `POST /api/analysis/next-role` — suggest the next logical higher role.
pub async fn next_role(
    State(state): State<AppState>,
    Json(body): Json<ResumeBody>,
) -> Result<Json<NextRoleResponse>, StatusCode> {
    let llm = require_llm(&state)?;
    check_rate_limit(&state, body.user_id)?;

    let role = career::next_role(&llm, &body.resume)
        .await
        .map_err(|e| career_error_to_status(&e))?;
    Ok(Json(NextRoleResponse { role }))
}

#[cfg(test)]
#[path = "analysis_test.rs"]
mod tests;
