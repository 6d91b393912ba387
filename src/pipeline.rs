use chrono::Utc;
use std::time::Instant;
use tracing::{info, instrument};

use crate::AppState;
use crate::error::{AppError, Result};
use crate::history::{NewSummary, SummaryRecord};
use crate::llm::summarize_and_translate;
use crate::scraper::extract_paragraphs;

/// Outcome of one successful scrape, summarize, translate and persist cycle.
#[derive(Debug, Clone)]
pub struct BlogDigest {
    /// The bounded source text sent to the model.
    pub content: String,
    pub summary: String,
    pub urdu: String,
    pub record: SummaryRecord,
}

/// Runs the whole cycle for one url.
///
/// `Config::request_timeout` bounds the fetch and generation steps only. The
/// insert is never cancelled midway, so a timeout can't leave behind a row the
/// caller was told failed.
#[instrument(skip(state))]
pub async fn digest_blog(state: &AppState, url: &str) -> Result<BlogDigest> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidInput("url is required".to_string()));
    }

    let started = Instant::now();
    let limit = state.config.request_timeout;
    let (content, summary, urdu) = tokio::time::timeout(limit, gather(state, url))
        .await
        .map_err(|_| AppError::Timeout(limit))??;

    let record = state
        .history
        .insert(NewSummary {
            url: url.to_string(),
            summary: summary.clone(),
            urdu_translation: urdu.clone(),
            created_at: Utc::now(),
        })
        .await?;

    info!(id = record.id, words = record.word_count(), elapsed = ?started.elapsed(), "digest stored");

    Ok(BlogDigest {
        content,
        summary,
        urdu,
        record,
    })
}

async fn gather(state: &AppState, url: &str) -> Result<(String, String, String)> {
    let html = state.fetcher.fetch_html(url).await?;

    let content = extract_paragraphs(&html);
    info!(chars = content.chars().count(), "extracted paragraph text");

    let (summary, urdu) = summarize_and_translate(state.generator.as_ref(), &content).await?;
    Ok((content, summary, urdu))
}
