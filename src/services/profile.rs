//! Profile and resume persistence against the hosted Postgres instance.

use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub desired_roles: Vec<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ResumeRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub file_name: String,
    pub extracted_text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

/// Fetch a profile by id.
///
/// # Errors
///
/// Returns [`ProfileError::NotFound`] when no row matches.
pub async fn get_profile(pool: &PgPool, profile_id: Uuid) -> Result<ProfileRow, ProfileError> {
    sqlx::query_as::<_, ProfileRow>("SELECT id, name, email, desired_roles FROM profiles WHERE id = $1")
        .bind(profile_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ProfileError::NotFound(profile_id))
}

/// Replace a profile's desired roles list.
///
/// # Errors
///
/// Returns [`ProfileError::NotFound`] when no row matches.
pub async fn update_desired_roles(
    pool: &PgPool,
    profile_id: Uuid,
    desired_roles: &[String],
) -> Result<ProfileRow, ProfileError> {
    sqlx::query_as::<_, ProfileRow>(
        "UPDATE profiles SET desired_roles = $2, updated_at = now()
         WHERE id = $1
         RETURNING id, name, email, desired_roles",
    )
    .bind(profile_id)
    .bind(desired_roles)
    .fetch_optional(pool)
    .await?
    .ok_or(ProfileError::NotFound(profile_id))
}

/// Store an uploaded resume's extracted text.
///
/// # Errors
///
/// Returns a database error (including FK violation for unknown profiles).
pub async fn insert_resume(
    pool: &PgPool,
    profile_id: Uuid,
    file_name: &str,
    extracted_text: &str,
) -> Result<ResumeRow, ProfileError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        "INSERT INTO resumes (profile_id, file_name, extracted_text)
         VALUES ($1, $2, $3)
         RETURNING id, profile_id, file_name, extracted_text, uploaded_at",
    )
    .bind(profile_id)
    .bind(file_name)
    .bind(extracted_text)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// List a profile's resumes, newest first.
///
/// # Errors
///
/// Returns a database error on query failure.
pub async fn list_resumes(pool: &PgPool, profile_id: Uuid) -> Result<Vec<ResumeRow>, ProfileError> {
    let rows = sqlx::query_as::<_, ResumeRow>(
        "SELECT id, profile_id, file_name, extracted_text, uploaded_at
         FROM resumes WHERE profile_id = $1
         ORDER BY uploaded_at DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
