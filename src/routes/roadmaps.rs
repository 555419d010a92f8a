//! Roadmap routes: SaaS proxy, flowchart layout, incremental reveal, and the
//! batch team view.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::flowchart::{
    CancelFlag, Fingerprint, Flowchart, GraphEdge, GraphNode, NodeKind, RevealStage, RevealStream, parse_outline,
};
use crate::services::career;
use crate::services::roadmap::{self, RoadmapError};
use crate::state::AppState;

/// Hold after a section snapshot before its first item appears.
const SECTION_PAUSE: Duration = Duration::from_millis(1000);
/// Tick between successive item snapshots (and into the next section).
const ITEM_PAUSE: Duration = Duration::from_millis(100);

// =============================================================================
// GENERATE
// =============================================================================

#[derive(Deserialize)]
pub struct GenerateBody {
    pub term: String,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// `POST /api/roadmaps/generate` — proxy a role term to the roadmap SaaS and
/// return the raw outline text.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    let text = state
        .roadmap
        .generate(&body.term)
        .await
        .map_err(roadmap_error_to_status)?;
    Ok(Json(GenerateResponse { text }))
}

pub(crate) fn roadmap_error_to_status(err: RoadmapError) -> StatusCode {
    match err {
        RoadmapError::EmptyTerm => StatusCode::BAD_REQUEST,
        RoadmapError::ApiRequest(_) | RoadmapError::ApiResponse { .. } => StatusCode::BAD_GATEWAY,
        RoadmapError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// FLOWCHART
// =============================================================================

#[derive(Deserialize)]
pub struct FlowchartBody {
    pub role: String,
    pub text: String,
}

/// `POST /api/roadmaps/flowchart` — parse roadmap text and return the full
/// laid-out graph. Repeated calls with identical content hit the layout cache.
pub async fn flowchart(State(state): State<AppState>, Json(body): Json<FlowchartBody>) -> Json<Flowchart> {
    let chart = roadmap::build_flowchart(&state.layouts, &body.role, &body.text);
    Json(chart.as_ref().clone())
}

// =============================================================================
// REVEAL
// =============================================================================

/// One NDJSON line of the reveal stream: the growing graph so far.
#[derive(Serialize)]
struct RevealLine {
    stage: RevealStage,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    canvas_height: f64,
    complete: bool,
}

struct RevealTask {
    stream: Option<RevealStream>,
    /// Stage of the last emitted frame; the pause before the next frame
    /// follows from it.
    prev_stage: Option<RevealStage>,
    fingerprint: Fingerprint,
    cache: Arc<crate::flowchart::LayoutCache>,
}

/// Pause between a frame and its predecessor, keyed on the predecessor's
/// stage: a section holds a full beat before its first item, items tick
/// quickly, and the next section follows the last item on the same quick
/// tick. The root and the first section appear immediately.
fn stage_pause(prev: Option<RevealStage>) -> Duration {
    match prev {
        None | Some(RevealStage::Root) => Duration::ZERO,
        Some(RevealStage::Section) => SECTION_PAUSE,
        Some(RevealStage::Item) => ITEM_PAUSE,
    }
}

/// `POST /api/roadmaps/flowchart/reveal` — stream the layout as NDJSON
/// snapshots, paced per stage for animated display. Content already in the
/// layout cache is served as a single complete snapshot with no pacing.
/// Client disconnect drops the stream mid-flight; a partial reveal is never
/// cached.
pub async fn flowchart_reveal(State(state): State<AppState>, Json(body): Json<FlowchartBody>) -> Response {
    let sections = parse_outline(&body.text);
    let fingerprint = Fingerprint::of(None, &body.role, &sections);

    if let Some(chart) = state.layouts.get(&fingerprint) {
        let line = RevealLine {
            stage: final_stage(&chart),
            nodes: chart.nodes.clone(),
            edges: chart.edges.clone(),
            canvas_height: chart.canvas_height,
            complete: true,
        };
        return ndjson_response(Body::from(to_ndjson_line(&line)));
    }

    let stream = RevealStream::new(None, &body.role, &sections, CancelFlag::new());
    let task = RevealTask { stream: Some(stream), prev_stage: None, fingerprint, cache: state.layouts.clone() };

    let body_stream = futures_util::stream::unfold(task, |mut task| async move {
        let mut stream = task.stream.take()?;
        match stream.next() {
            Some(frame) => {
                let pause = stage_pause(task.prev_stage);
                if !pause.is_zero() {
                    tokio::time::sleep(pause).await;
                }
                task.prev_stage = Some(frame.stage);
                let line = RevealLine {
                    stage: frame.stage,
                    nodes: frame.nodes,
                    edges: frame.edges,
                    canvas_height: stream.canvas_height(),
                    complete: stream.is_complete(),
                };
                let bytes = Bytes::from(to_ndjson_line(&line));
                task.stream = Some(stream);
                Some((Ok::<Bytes, Infallible>(bytes), task))
            }
            None => {
                if let Some(chart) = stream.into_flowchart() {
                    task.cache.insert(task.fingerprint.clone(), chart);
                }
                None
            }
        }
    });

    ndjson_response(Body::from_stream(body_stream))
}

fn ndjson_response(body: Body) -> Response {
    ([(CONTENT_TYPE, "application/x-ndjson; charset=utf-8")], body).into_response()
}

fn to_ndjson_line<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => format!("{json}\n"),
        Err(e) => {
            warn!(error = %e, "reveal: snapshot serialization failed");
            String::new()
        }
    }
}

/// Stage of the last emitted node, used to tag a cache-served full snapshot.
fn final_stage(chart: &Flowchart) -> RevealStage {
    match chart.nodes.last().map(|n| n.kind) {
        Some(NodeKind::Section) => RevealStage::Section,
        Some(NodeKind::Item) => RevealStage::Item,
        _ => RevealStage::Root,
    }
}

// =============================================================================
// BATCH
// =============================================================================

#[derive(Deserialize)]
pub struct BatchBody {
    /// Concatenated resumes separated by the upload delimiter.
    pub resumes: String,
    pub user_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct BatchMember {
    pub index: usize,
    pub name: String,
    pub role: String,
    pub flowchart: Flowchart,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub members: Vec<BatchMember>,
}

/// `POST /api/roadmaps/batch` — split a multi-resume blob and build one
/// namespaced flowchart per team member (name, next role, roadmap fetch,
/// layout). Members whose roadmap fetch fails are skipped with a warning so
/// one bad fetch does not sink the whole team view.
pub async fn batch(
    State(state): State<AppState>,
    Json(body): Json<BatchBody>,
) -> Result<Json<BatchResponse>, StatusCode> {
    let llm = state.llm.clone().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    state
        .rate_limiter
        .check_and_record(body.user_id.unwrap_or_else(Uuid::nil))
        .map_err(|_| StatusCode::TOO_MANY_REQUESTS)?;

    let resumes = roadmap::split_resumes(&body.resumes);
    if resumes.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut members = Vec::with_capacity(resumes.len());
    for (index, resume) in resumes.iter().enumerate() {
        let name = career::employee_name(&llm, resume)
            .await
            .map_err(|_| StatusCode::BAD_GATEWAY)?;
        let role = career::next_role(&llm, resume)
            .await
            .map_err(|_| StatusCode::BAD_GATEWAY)?;

        let raw = match state.roadmap.generate(&role).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(member = index, role = %role, error = %e, "batch: roadmap fetch failed, skipping member");
                continue;
            }
        };

        let chart = roadmap::build_member_flowchart(&state.layouts, index, &role, &raw);
        members.push(BatchMember { index, name, role, flowchart: chart.as_ref().clone() });
    }

    Ok(Json(BatchResponse { members }))
}

#[cfg(test)]
#[path = "roadmaps_test.rs"]
mod tests;
