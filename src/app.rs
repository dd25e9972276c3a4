//! App core for Markshelf.
//!
//! Loads settings, builds the configured backend and hands both to the organizer.

use std::sync::Arc;

use tracing::info;

use crate::managers::organizer::Organizer;
use crate::platform;
use crate::services::backend::Backend;
#[cfg(feature = "http")]
use crate::services::http_backend::HttpBackend;
use crate::services::memory_backend::MemoryBackend;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::sqlite_backend::SqliteBackend;
use crate::types::errors::BackendError;
use crate::types::settings::{BackendKind, BackendSettings};

pub struct App {
    pub settings_engine: SettingsEngine,
    pub organizer: Organizer,
}

impl App {
    /// Reads settings from `settings_path` (or the platform default) and opens the backend they name.
    pub fn new(settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        let settings = settings_engine.load()?;
        let backend = build_backend(&settings.backend)?;
        Ok(Self::with_backend(settings_engine, backend))
    }

    /// Wires an already-built backend; the initial sort comes from the view settings.
    pub fn with_backend(settings_engine: SettingsEngine, backend: Arc<dyn Backend>) -> Self {
        let view = &settings_engine.get_settings().view;
        let organizer = Organizer::with_sort(backend, view.sort_option, view.sort_order);
        Self {
            settings_engine,
            organizer,
        }
    }
}

/// Instantiates the backend selected in settings.
pub fn build_backend(settings: &BackendSettings) -> Result<Arc<dyn Backend>, BackendError> {
    match settings.kind {
        BackendKind::Memory => {
            info!(seeded = settings.seed_demo_data, "using in-memory backend");
            let backend = if settings.seed_demo_data {
                MemoryBackend::seeded()
            } else {
                MemoryBackend::new()
            };
            Ok(Arc::new(backend))
        }
        BackendKind::Sqlite => {
            let path = settings
                .database_path
                .clone()
                .map(std::path::PathBuf::from)
                .unwrap_or_else(platform::default_database_path);
            info!(path = %path.display(), "using sqlite backend");
            Ok(Arc::new(SqliteBackend::open(&path)?))
        }
        #[cfg(feature = "http")]
        BackendKind::Http => {
            info!(base_url = %settings.base_url, "using http backend");
            Ok(Arc::new(HttpBackend::new(&settings.base_url)))
        }
        #[cfg(not(feature = "http"))]
        BackendKind::Http => Err(BackendError::Network(
            "built without the http feature".to_string(),
        )),
    }
}
