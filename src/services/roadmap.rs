//! Roadmap service — fetches outline text from the roadmap-generation SaaS
//! and turns it into cached flowcharts.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::flowchart::{Flowchart, LayoutCache, layout_cached, parse_outline};

pub const DEFAULT_ROADMAP_API_URL: &str = "https://api.roadmap.sh/v1-generate-ai-roadmap";

const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Delimiter the upload pipeline inserts between concatenated resumes.
pub const RESUME_DELIMITER: &str = "\n----------------------------------------------------------------\n";

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RoadmapError {
    #[error("roadmap term must not be empty")]
    EmptyTerm,
    #[error("roadmap API request failed: {0}")]
    ApiRequest(String),
    #[error("roadmap API response error: status {status}")]
    ApiResponse { status: u16, body: String },
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// CLIENT
// =============================================================================

/// Client for the roadmap-generation SaaS. The API takes a role term and
/// streams back a markdown-like outline; we consume it as one text body.
pub struct RoadmapClient {
    http: reqwest::Client,
    api_url: String,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    term: &'a str,
}

impl RoadmapClient {
    /// Build the client from `ROADMAP_API_URL` (default: the public
    /// roadmap.sh generation endpoint).
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::HttpClientBuild`] if the HTTP client fails.
    pub fn from_env() -> Result<Self, RoadmapError> {
        let api_url = std::env::var("ROADMAP_API_URL").unwrap_or_else(|_| DEFAULT_ROADMAP_API_URL.to_string());
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RoadmapError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_url })
    }

    /// Fetch the raw roadmap outline for a role term.
    ///
    /// # Errors
    ///
    /// Returns a [`RoadmapError`] for an empty term, a transport failure, or
    /// a non-success status from the SaaS.
    pub async fn generate(&self, term: &str) -> Result<String, RoadmapError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(RoadmapError::EmptyTerm);
        }

        let response = self
            .http
            .post(&self.api_url)
            .json(&GenerateBody { term })
            .send()
            .await
            .map_err(|e| RoadmapError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RoadmapError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(RoadmapError::ApiResponse { status, body });
        }

        info!(term, bytes = body.len(), "roadmap: outline fetched");
        Ok(body)
    }

    #[cfg(test)]
    #[must_use]
    pub fn for_tests() -> Self {
        Self { http: reqwest::Client::new(), api_url: "http://localhost:0/unused".into() }
    }
}

// =============================================================================
// ORCHESTRATION
// =============================================================================

/// Parse raw roadmap text and lay it out through the cache.
#[must_use]
pub fn build_flowchart(cache: &LayoutCache, role: &str, raw_text: &str) -> Arc<Flowchart> {
    let sections = parse_outline(raw_text);
    layout_cached(cache, None, role, &sections)
}

/// Batch variant: one namespaced flowchart per team member, ids prefixed
/// `member-{index}` so several charts can share a canvas.
#[must_use]
pub fn build_member_flowchart(cache: &LayoutCache, member_index: usize, role: &str, raw_text: &str) -> Arc<Flowchart> {
    let sections = parse_outline(raw_text);
    let namespace = format!("member-{member_index}");
    layout_cached(cache, Some(&namespace), role, &sections)
}

/// Split a concatenated multi-resume blob on the upload delimiter, dropping
/// empty segments.
#[must_use]
pub fn split_resumes(blob: &str) -> Vec<String> {
    blob.split(RESUME_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "roadmap_test.rs"]
mod tests;
