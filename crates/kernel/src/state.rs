//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::content::{ContentClient, ContentSource, PageService};
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Page rendering over the content source.
    pages: PageService,

    /// Page shell templates.
    theme: ThemeEngine,
}

impl AppState {
    /// Build state from configuration, reading content from the remote
    /// content service.
    pub fn new(config: &Config) -> Result<Self> {
        let client = ContentClient::new(config.content_config());
        info!(content_api = %client.base_url(), "content client configured");
        let media_base = client.base_url().to_string();
        Self::with_source(config, Arc::new(client), media_base)
    }

    /// Build state over an explicit content source.
    pub fn with_source(
        config: &Config,
        source: Arc<dyn ContentSource>,
        media_base: impl Into<String>,
    ) -> Result<Self> {
        let theme = match &config.template_dir {
            Some(dir) => ThemeEngine::from_dir(dir)
                .with_context(|| format!("failed to load templates from {}", dir.display()))?,
            None => ThemeEngine::new()?,
        };
        let pages = PageService::new(source, media_base, config.seo_defaults());

        Ok(Self {
            inner: Arc::new(AppStateInner { pages, theme }),
        })
    }

    pub fn pages(&self) -> &PageService {
        &self.inner.pages
    }

    pub fn theme(&self) -> &ThemeEngine {
        &self.inner.theme
    }
}
