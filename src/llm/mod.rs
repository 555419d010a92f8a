//! LLM — multi-provider adapter for the AI career features.
//!
//! DESIGN
//! ======
//! The `LlmClient` enum dispatches to Upstage Solar (OpenAI-compatible chat
//! completions) or Google Gemini based on `LLM_PROVIDER`. Services depend
//! only on the [`LlmChat`] trait so tests can substitute canned responses.

pub mod config;
pub mod gemini;
pub mod solar;
pub mod types;

use config::{LlmConfig, LlmProviderKind};
pub use types::LlmChat;
use types::{Completion, LlmError};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to either Solar or Gemini.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: LlmProvider,
    model: String,
}

enum LlmProvider {
    Solar(solar::SolarClient),
    Gemini(gemini::GeminiClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let model = config.model.clone();
        let inner = match config.provider {
            LlmProviderKind::Solar => {
                LlmProvider::Solar(solar::SolarClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
            LlmProviderKind::Gemini => {
                LlmProvider::Gemini(gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
        };
        Ok(Self { inner, model })
    }

    /// Return the configured model name (e.g. `"solar-1-mini-chat"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn complete(&self, max_tokens: u32, temperature: f32, prompt: &str) -> Result<Completion, LlmError> {
        match &self.inner {
            LlmProvider::Solar(c) => {
                c.complete(&self.model, max_tokens, temperature, prompt)
                    .await
            }
            LlmProvider::Gemini(c) => {
                c.complete(&self.model, max_tokens, temperature, prompt)
                    .await
            }
        }
    }
}
