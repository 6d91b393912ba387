use reqwest::{Client, ClientBuilder};
use scraper::{Html, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use tracing::{debug, instrument};
use crate::error::{AppError, Result};

/// Upper bound on the text handed to the generation service.
pub const MAX_CONTENT_CHARS: usize = 5000;

const USER_AGENT: &str = concat!("blog-summarizer/", env!("CARGO_PKG_VERSION"));

// Compiled once; the literal is known to be valid.
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

/// Downloads blog pages. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .pool_max_idle_per_host(10)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    #[instrument(skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        debug!(bytes = html.len(), "fetched page");
        Ok(html)
    }
}

/// Text of every `<p>` in document order, space-joined and capped at
/// [`MAX_CONTENT_CHARS`].
pub fn extract_paragraphs(html: &str) -> String {
    let document = Html::parse_document(html);

    let joined = document
        .select(&PARAGRAPH_SELECTOR)
        .map(|element| element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(&joined, MAX_CONTENT_CHARS).to_string()
}

/// Keeps at most `max` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
