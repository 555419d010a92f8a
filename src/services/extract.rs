//! Resume text extraction via the hosted OCR service.
//!
//! DESIGN
//! ======
//! Extraction is best-effort: the document goes to the OCR endpoint as raw
//! bytes and whatever text comes back is used as-is. Failures (no endpoint
//! configured, transport error, non-success status) are logged and collapse
//! to an empty string — callers treat missing text as "nothing extracted",
//! never as a request failure.

use std::time::Duration;

use tracing::warn;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for the OCR/PDF text-extraction collaborator.
pub struct ExtractClient {
    http: reqwest::Client,
    /// `None` when `OCR_API_URL` is unset — extraction is disabled and every
    /// call returns empty text.
    api_url: Option<String>,
}

impl ExtractClient {
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = std::env::var("OCR_API_URL").ok().filter(|u| !u.is_empty());
        if api_url.is_none() {
            warn!("OCR_API_URL not set — resume text extraction disabled");
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { http, api_url }
    }

    #[cfg(test)]
    #[must_use]
    pub fn disabled() -> Self {
        Self { http: reqwest::Client::new(), api_url: None }
    }

    /// Extract plain text from a document. Best-effort: any failure is
    /// logged and yields an empty string.
    pub async fn extract(&self, bytes: &[u8], file_name: &str) -> String {
        let Some(url) = self.api_url.as_deref() else {
            return String::new();
        };

        let result = self
            .http
            .post(url)
            .query(&[("filename", file_name)])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, file_name, "extract: OCR request failed");
                return String::new();
            }
        };

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), file_name, "extract: OCR returned error status");
            return String::new();
        }

        match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, file_name, "extract: OCR body read failed");
                String::new()
            }
        }
    }
}
