//! Upstage Solar client (OpenAI-compatible `/chat/completions`).

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::config::LlmTimeouts;
use super::types::{Completion, LlmError};

pub struct SolarClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SolarClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    /// Send a single-turn chat completion request.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] on transport failure, non-200 status, or a
    /// response body that does not match the chat-completions shape.
    pub async fn complete(
        &self,
        model: &str,
        max_tokens: u32,
        temperature: f32,
        prompt: &str,
    ) -> Result<Completion, LlmError> {
        let body = ChatRequest {
            model,
            max_tokens,
            temperature,
            stream: false,
            messages: &[ChatMessage { role: "user", content: prompt }],
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_chat_response(&text)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
    messages: &'a [ChatMessage<'a>],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Parse a chat-completions response body into a [`Completion`].
pub(crate) fn parse_chat_response(raw: &str) -> Result<Completion, LlmError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let text = value
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| LlmError::ApiParse("missing choices[0].message.content".into()))?
        .to_owned();

    let model = value
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let usage = value.get("usage");
    let input_tokens = usage
        .and_then(|u| u.get("prompt_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let output_tokens = usage
        .and_then(|u| u.get("completion_tokens"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    Ok(Completion { text, model, input_tokens, output_tokens })
}

#[cfg(test)]
#[path = "solar_test.rs"]
mod tests;
