//! Remote-model summarization strategy: POSTs the transcript to a hosted
//! inference endpoint and returns its summary text.
//!
//! Not the active path. The gateway wires this in only when
//! `summarizer_mode = "remote"`; the heuristic strategy is the default and
//! the instruction-keyword formatting is applied locally either way, so the
//! two strategies stay substitutable behind [`Summarizer`].

use crate::error::CoreError;
use crate::summarize::{Summarizer, SummaryFormat};
use serde::Deserialize;

const ENV_MODEL_API_URL: &str = "RECAP_MODEL_API_URL";
const ENV_MODEL_API_KEY: &str = "RECAP_MODEL_API_KEY";
const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

#[derive(serde::Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(serde::Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct InferenceResponse {
    summary_text: String,
}

/// Summarizer backed by a hosted inference API (Hugging Face wire format).
pub struct RemoteModelSummarizer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl RemoteModelSummarizer {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    /// Endpoint and key from RECAP_MODEL_API_URL / RECAP_MODEL_API_KEY.
    /// A missing key is reported at call time, not here, so the gateway can
    /// still boot and answer health checks.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var(ENV_MODEL_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_key = std::env::var(ENV_MODEL_API_KEY)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self::new(api_url, api_key)
    }

    async fn call_model(&self, transcript: &str) -> Result<String, CoreError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            CoreError::RemoteModel(format!(
                "remote summarizer not configured: set {ENV_MODEL_API_KEY}"
            ))
        })?;

        let request = InferenceRequest {
            inputs: transcript,
            parameters: InferenceParameters {
                max_length: 300,
                min_length: 80,
                do_sample: false,
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CoreError::RemoteModel(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CoreError::RemoteModel(format!(
                "inference endpoint returned {}",
                response.status()
            )));
        }

        let parsed: Vec<InferenceResponse> = response
            .json()
            .await
            .map_err(|e| CoreError::RemoteModel(format!("unexpected response shape: {e}")))?;
        parsed
            .into_iter()
            .next()
            .map(|r| r.summary_text)
            .ok_or_else(|| CoreError::RemoteModel("empty inference response".to_string()))
    }
}

#[async_trait::async_trait]
impl Summarizer for RemoteModelSummarizer {
    fn name(&self) -> &str {
        "remote-model"
    }

    async fn summarize(&self, transcript: &str, instructions: &str) -> Result<String, CoreError> {
        let summary = self.call_model(transcript).await?;
        // Formatting stays local so instruction keywords behave identically
        // across strategies.
        let format = SummaryFormat::from_instructions(instructions);
        Ok(match format {
            SummaryFormat::Bulleted => summary
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| format!("\u{2022} {}", l.trim()))
                .collect::<Vec<_>>()
                .join("\n\n"),
            SummaryFormat::Executive => format!("EXECUTIVE SUMMARY:\n\n{summary}"),
            SummaryFormat::ActionPoints => format!("KEY POINTS:\n\n{summary}"),
            SummaryFormat::Paragraph => summary,
        })
    }
}
