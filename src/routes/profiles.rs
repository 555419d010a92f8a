//! Profile and resume routes.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::services::profile::{self, ProfileError, ProfileRow, ResumeRow};
use crate::state::AppState;

pub(crate) fn profile_error_to_status(err: &ProfileError) -> StatusCode {
    match err {
        ProfileError::NotFound(_) => StatusCode::NOT_FOUND,
        ProfileError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `GET /api/profiles/:id` — fetch a profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<ProfileRow>, StatusCode> {
    let row = profile::get_profile(&state.pool, profile_id)
        .await
        .map_err(|e| profile_error_to_status(&e))?;
    Ok(Json(row))
}

#[derive(Deserialize)]
pub struct UpdateRolesBody {
    pub desired_roles: Vec<String>,
}

/// `PATCH /api/profiles/:id` — replace the desired roles list.
pub async fn update_desired_roles(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Json(body): Json<UpdateRolesBody>,
) -> Result<Json<ProfileRow>, StatusCode> {
    let row = profile::update_desired_roles(&state.pool, profile_id, &body.desired_roles)
        .await
        .map_err(|e| profile_error_to_status(&e))?;
    Ok(Json(row))
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub file_name: Option<String>,
}

/// `POST /api/profiles/:id/resumes` — accept raw document bytes, extract
/// text through the OCR collaborator, and store the result. Extraction is
/// best-effort: an upload with no extractable text is still stored.
pub async fn upload_resume(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<ResumeRow>), StatusCode> {
    if body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Confirm the profile exists before the slow extraction round-trip.
    profile::get_profile(&state.pool, profile_id)
        .await
        .map_err(|e| profile_error_to_status(&e))?;

    let file_name = query.file_name.unwrap_or_else(|| "resume".to_owned());
    let extracted = state.extract.extract(&body, &file_name).await;
    info!(%profile_id, file_name = %file_name, bytes = body.len(), extracted_chars = extracted.len(), "resume uploaded");

    let row = profile::insert_resume(&state.pool, profile_id, &file_name, &extracted)
        .await
        .map_err(|e| profile_error_to_status(&e))?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/profiles/:id/resumes` — list stored resumes, newest first.
pub async fn list_resumes(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Vec<ResumeRow>>, StatusCode> {
    let rows = profile::list_resumes(&state.pool, profile_id)
        .await
        .map_err(|e| profile_error_to_status(&e))?;
    Ok(Json(rows))
}
