use std::sync::Arc;

use super::*;
use crate::llm::types::{Completion, LlmError};
use crate::state::test_helpers::{test_app_state, test_app_state_with_llm};

struct FixedLlm(&'static str);

#[async_trait::async_trait]
impl LlmChat for FixedLlm {
    async fn complete(&self, _max_tokens: u32, _temperature: f32, _prompt: &str) -> Result<Completion, LlmError> {
        Ok(Completion { text: self.0.to_owned(), model: "mock".into(), input_tokens: 0, output_tokens: 0 })
    }
}

fn state_with_reply(reply: &'static str) -> AppState {
    test_app_state_with_llm(Arc::new(FixedLlm(reply)))
}

#[test]
fn career_errors_map_to_statuses() {
    assert_eq!(
        career_error_to_status(&CareerError::Llm(LlmError::ApiParse("bad body".into()))),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        career_error_to_status(&CareerError::InvalidRoleTitle("way too many words here".into())),
        StatusCode::BAD_GATEWAY
    );
}

#[tokio::test]
async fn employee_name_without_llm_is_service_unavailable() {
    let state = test_app_state();
    let result = employee_name(
        State(state),
        Json(ResumeBody { resume: "resume".into(), user_id: None }),
    )
    .await;
    assert_eq!(result.err(), Some(StatusCode::SERVICE_UNAVAILABLE));
}

#[tokio::test]
async fn employee_name_returns_trimmed_name() {
    let state = state_with_reply(" Dana Whitcombe \n");
    let Json(response) = employee_name(
        State(state),
        Json(ResumeBody { resume: "resume".into(), user_id: None }),
    )
    .await
    .unwrap();
    assert_eq!(response.name, "Dana Whitcombe");
}

#[tokio::test]
async fn compatibility_returns_parsed_score() {
    let state = state_with_reply("88");
    let Json(response) = compatibility(
        State(state),
        Json(CompatibilityBody {
            resume: "resume".into(),
            role: "Backend Engineer".into(),
            skills_required: vec!["Rust".into()],
            user_id: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(response.compatibility, 88);
}

#[tokio::test]
async fn next_role_bad_provider_reply_is_bad_gateway() {
    let state = state_with_reply("Principal Distinguished Staff Platform Engineering Fellow");
    let result = next_role(
        State(state),
        Json(ResumeBody { resume: "resume".into(), user_id: None }),
    )
    .await;
    assert_eq!(result.err(), Some(StatusCode::BAD_GATEWAY));
}

#[tokio::test]
async fn certifications_requires_both_names() {
    let state = state_with_reply("table");
    let result = certifications(
        State(state),
        Json(CompareCertificationsBody {
            certification1: "AWS Solutions Architect".into(),
            certification2: "   ".into(),
            user_id: None,
        }),
    )
    .await;
    assert_eq!(result.err(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn certifications_returns_comparison_table() {
    let state = state_with_reply("| Demand | High | Medium |");
    let Json(response) = certifications(
        State(state),
        Json(CompareCertificationsBody {
            certification1: "AWS Solutions Architect".into(),
            certification2: "CompTIA Security+".into(),
            user_id: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(response.comparison, "| Demand | High | Medium |");
}

#[tokio::test]
async fn repeated_requests_hit_the_rate_limit() {
    let state = state_with_reply("Dana");
    let user_id = Some(Uuid::new_v4());

    let mut last = None;
    // Default per-user window allows 10 requests; the 11th must be rejected.
    for _ in 0..11 {
        last = employee_name(
            State(state.clone()),
            Json(ResumeBody { resume: "resume".into(), user_id }),
        )
        .await
        .err();
    }
    assert_eq!(last, Some(StatusCode::TOO_MANY_REQUESTS));
}
