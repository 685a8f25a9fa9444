// Application state module
// Process-wide state built once at startup and shared read-only

use std::sync::Arc;

use super::types::Config;
use crate::render::{HtmlTemplates, RenderError, Renderer};
use crate::routing::PathValidator;
use crate::store::{FileStore, PageStore};

/// Failure to build the application state; aborts startup
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to compile path pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to open page directory '{dir}': {source}")]
    Store {
        dir: String,
        source: std::io::Error,
    },

    #[error("failed to load templates: {0}")]
    Templates(#[from] RenderError),
}

/// Application state
///
/// Everything here is constructed before the listener is bound. Failure to
/// build any part aborts startup instead of surfacing per request.
pub struct AppState {
    pub config: Config,
    pub validator: PathValidator,
    pub store: Arc<dyn PageStore>,
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn new(
        config: Config,
        validator: PathValidator,
        store: Arc<dyn PageStore>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            config,
            validator,
            store,
            renderer,
        }
    }

    /// Build the file-backed store, HTML templates and path validator
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let validator = PathValidator::new()?;
        let store = FileStore::open(&config.storage.data_dir, config.storage.extension.as_str())
            .map_err(|source| StartupError::Store {
                dir: config.storage.data_dir.clone(),
                source,
            })?;
        let renderer = HtmlTemplates::load(&config.templates.dir)?;

        Ok(Self::new(
            config,
            validator,
            Arc::new(store),
            Arc::new(renderer),
        ))
    }

    /// Whether access lines should be written
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
