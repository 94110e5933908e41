use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::services::{
    CompletionClient, DocumentTextExtractor, GeminiClient, TempFileStore, TextExtractor,
    UploadFilter,
};

/// Collaborators shared by all handlers. Built once at startup and injected
/// into the router, so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub completion: Arc<dyn CompletionClient>,
    pub extractor: Arc<dyn TextExtractor>,
    pub temp_store: TempFileStore,
    pub upload_filter: UploadFilter,
}

impl AppState {
    pub fn new(
        config: Config,
        completion: Arc<dyn CompletionClient>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            temp_store: TempFileStore::new(config.upload_dir.clone()),
            upload_filter: UploadFilter::new(config.max_file_size_bytes()),
            config: Arc::new(config),
            completion,
            extractor,
        }
    }

    /// Production wiring: Gemini for completions, `pdf-extract` for text.
    pub fn from_config(config: Config) -> Result<Self> {
        let completion =
            GeminiClient::from_config(&config).context("Failed to create completion client")?;
        Ok(Self::new(
            config,
            Arc::new(completion),
            Arc::new(DocumentTextExtractor::new()),
        ))
    }
}
