//! # Generation Client Module
//!
//! Sends composed prompts to a generative text service and returns the raw
//! text of the answer. [`GeminiClient`] talks to the Gemini
//! `generateContent` REST endpoint; [`FakeGenerator`] returns canned text
//! for tests.
//!
//! A call is made exactly once per request. There is no retry and, unless
//! a timeout is configured, no local deadline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::errors::GenerationError;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Public Gemini API base URL
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// A generative text service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model identifier sent with each call
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

/// Joined text of the first candidate's parts
fn first_candidate_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client against the public API
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at another base URL (proxies, local test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a request timeout by rebuilding the HTTP client
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GenerationError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::NotConfigured(e.to_string()))?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::NotConfigured(
                "GEMINI_API_KEY not set".to_string(),
            ));
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        info!(model = %self.model, prompt_chars = prompt.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), "Gemini API returned an error");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        let text = first_candidate_text(parsed)?;

        info!(response_chars = text.len(), "Received response from Gemini API");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Canned-response generator for tests
///
/// Returns the configured responses in order, repeating the last one, and
/// records every prompt it receives.
#[derive(Debug)]
pub struct FakeGenerator {
    responses: Vec<Result<String, GenerationError>>,
    prompts: Mutex<Vec<String>>,
    model: String,
}

impl FakeGenerator {
    /// Always answer with `response`
    pub fn with_response(response: &str) -> Self {
        Self::with_results(vec![Ok(response.to_string())])
    }

    /// Always fail with `error`
    pub fn failing(error: GenerationError) -> Self {
        Self::with_results(vec![Err(error)])
    }

    pub fn with_results(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses,
            prompts: Mutex::new(Vec::new()),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let index = match self.prompts.lock() {
            Ok(mut prompts) => {
                prompts.push(prompt.to_string());
                prompts.len() - 1
            }
            Err(_) => 0,
        };
        debug!(call = index, "Fake generator invoked");

        let last = self.responses.len().saturating_sub(1);
        self.responses
            .get(index.min(last))
            .cloned()
            .unwrap_or(Err(GenerationError::EmptyResponse))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
