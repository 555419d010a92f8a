mod db;
mod flowchart;
mod llm;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::llm::{LlmChat, LlmClient};
use crate::services::extract::ExtractClient;
use crate::services::roadmap::RoadmapClient;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // AI endpoints answer 503 when the LLM is not configured; startup continues.
    let llm: Option<Arc<dyn LlmChat>> = match LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM provider configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM not configured, AI endpoints disabled");
            None
        }
    };

    let roadmap = RoadmapClient::from_env().expect("roadmap client init failed");
    let extract = ExtractClient::from_env();
    let state = state::AppState::new(pool, llm, roadmap, extract);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "careermap listening");
    axum::serve(listener, app).await.expect("server failed");
}
