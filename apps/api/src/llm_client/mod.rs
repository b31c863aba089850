//! LLM Client: the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All generation goes through the `TextGenerator` trait implemented here.
//!
//! Model: gemini-2.0-flash. Only the endpoint URL is configurable.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod prompts;

const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
/// The model used for all generation calls.
pub const MODEL: &str = "gemini-2.0-flash";
/// One initial attempt plus a single retry on transient failure.
const MAX_ATTEMPTS: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(500);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// What the caller expects back. The marker protocol itself lives in the prompt;
/// the mode only selects generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    BadgeAndPost,
    RecommendationList,
}

impl GenerationMode {
    fn max_output_tokens(self) -> u32 {
        match self {
            GenerationMode::BadgeAndPost => 1024,
            GenerationMode::RecommendationList => 2048,
        }
    }

    fn temperature(self) -> f32 {
        match self {
            GenerationMode::BadgeAndPost => 0.9,
            GenerationMode::RecommendationList => 0.4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::BadgeAndPost => "badge_and_post",
            GenerationMode::RecommendationList => "recommendation_list",
        }
    }
}

/// Transport-level failure of a generation call.
///
/// Variants carry no upstream payload; details are logged where they occur.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("text generation timed out")]
    Timeout,

    #[error("could not reach the text generation service")]
    Transport,

    #[error("text generation service returned status {0}")]
    Status(u16),

    #[error("text generation service returned an empty body")]
    EmptyBody,

    #[error("text generation service returned an unreadable body")]
    MalformedBody,
}

impl GenerationFailure {
    /// Timeouts, connection errors, 5xx and 429 are worth one more attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationFailure::Timeout | GenerationFailure::Transport => true,
            GenerationFailure::Status(status) => *status == 429 || *status >= 500,
            GenerationFailure::EmptyBody | GenerationFailure::MalformedBody => false,
        }
    }
}

/// A backend that turns one prompt into one raw response string.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, mode: GenerationMode)
        -> Result<String, GenerationFailure>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GeminiResponse {
    /// Concatenates the text parts of the first candidate.
    /// A response with no candidate text yields an empty string.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Gemini `generateContent` client with a fixed timeout and a single retry.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(api_key: String, endpoint: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.unwrap_or_else(|| GEMINI_API_URL.to_string()),
        })
    }

    async fn attempt(
        &self,
        request_body: &GeminiRequest<'_>,
        mode: GenerationMode,
    ) -> Result<String, GenerationFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(request_body)
            .send()
            .await
            .map_err(|e| {
                warn!(mode = mode.as_str(), "Generation request failed: {e}");
                classify_transport_error(&e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(mode = mode.as_str(), "Failed to read generation response body: {e}");
            classify_transport_error(&e)
        })?;

        if !status.is_success() {
            // Upstream error schema is unstable; keep it in the logs only.
            warn!(
                mode = mode.as_str(),
                "Generation API returned {}: {}",
                status,
                truncate_for_log(&body)
            );
            return Err(status_failure(status));
        }

        if body.is_empty() {
            return Err(GenerationFailure::EmptyBody);
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(mode = mode.as_str(), "Unreadable generation response: {e}");
            GenerationFailure::MalformedBody
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Generation call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed.text())
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<String, GenerationFailure> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: mode.temperature(),
                max_output_tokens: mode.max_output_tokens(),
            },
        };

        let mut attempt = 1;
        loop {
            match self.attempt(&request_body, mode).await {
                Ok(text) => {
                    info!(
                        mode = mode.as_str(),
                        attempt,
                        chars = text.len(),
                        "Generation completed"
                    );
                    return Ok(text);
                }
                Err(failure) if failure.is_transient() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        mode = mode.as_str(),
                        "Generation attempt {attempt} failed ({failure}), retrying after {}ms",
                        RETRY_DELAY.as_millis()
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}

fn classify_transport_error(error: &reqwest::Error) -> GenerationFailure {
    if error.is_timeout() {
        GenerationFailure::Timeout
    } else {
        GenerationFailure::Transport
    }
}

fn status_failure(status: StatusCode) -> GenerationFailure {
    GenerationFailure::Status(status.as_u16())
}

fn truncate_for_log(body: &str) -> String {
    const LIMIT: usize = 300;
    if body.chars().count() <= LIMIT {
        body.to_string()
    } else {
        let head: String = body.chars().take(LIMIT).collect();
        format!("{head}…")
    }
}
