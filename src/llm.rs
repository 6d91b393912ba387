use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use crate::error::{AppError, Result};

/// A text-generation backend: prompt in, completion out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub fn summary_prompt(content: &str) -> String {
    format!("Summarize this blog:\n{}", content)
}

pub fn urdu_prompt(summary: &str) -> String {
    format!("Translate this into Urdu:\n{}", summary)
}

pub async fn summarize(generator: &dyn TextGenerator, content: &str) -> Result<String> {
    generator.generate(&summary_prompt(content)).await
}

pub async fn translate_to_urdu(generator: &dyn TextGenerator, summary: &str) -> Result<String> {
    generator.generate(&urdu_prompt(summary)).await
}

/// Summary first, then the Urdu translation of that summary. Either call
/// failing fails the pair.
pub async fn summarize_and_translate(
    generator: &dyn TextGenerator,
    content: &str,
) -> Result<(String, String)> {
    let summary = summarize(generator, content).await?;
    let urdu = translate_to_urdu(generator, &summary).await?;
    Ok((summary, urdu))
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip_all, fields(model = %self.model, prompt_chars = prompt.chars().count()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Service(format!("request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(AppError::Service(format!("API returned {}: {}", status, detail)));
        }

        let parsed: GenerateResponse = res
            .json()
            .await
            .map_err(|e| AppError::Service(format!("Invalid response format: {}", e)))?;

        let text = first_candidate_text(parsed)
            .ok_or_else(|| AppError::Service("Response contained no text".to_string()))?;
        debug!(chars = text.chars().count(), "generation complete");
        Ok(text)
    }
}

fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    let parts = response.candidates.into_iter().next()?.content?.parts;
    let text: String = parts.into_iter().filter_map(|part| part.text).collect();
    if text.trim().is_empty() { None } else { Some(text) }
}
