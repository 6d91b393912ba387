pub mod api;
pub mod archive;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod llm;
pub mod pipeline;
pub mod scraper;
pub mod workbench;

use std::sync::Arc;
use archive::BlogArchive;
use config::Config;
use error::Result;
use history::HistoryStore;
use llm::{GeminiClient, TextGenerator};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: crate::scraper::PageFetcher,
    pub generator: Arc<dyn TextGenerator>,
    pub history: Arc<dyn HistoryStore>,
    pub archive: Arc<dyn BlogArchive>,
}

impl AppState {
    /// Wires the fetcher and Gemini client from `config` onto the given stores.
    pub fn new(
        config: Config,
        history: Arc<dyn HistoryStore>,
        archive: Arc<dyn BlogArchive>,
    ) -> Result<Self> {
        let generator = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )?;
        Self::with_generator(config, Arc::new(generator), history, archive)
    }

    pub fn with_generator(
        config: Config,
        generator: Arc<dyn TextGenerator>,
        history: Arc<dyn HistoryStore>,
        archive: Arc<dyn BlogArchive>,
    ) -> Result<Self> {
        let fetcher = crate::scraper::PageFetcher::new(config.fetch_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            generator,
            history,
            archive,
        })
    }
}
