use serde::{Deserialize, Serialize};

use super::filter::{SortOption, SortOrder};

/// Top-level application settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    pub backend: BackendSettings,
    pub view: ViewSettings,
    pub logging: LoggingSettings,
}

/// Which persistence layer the organizer talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Sqlite,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub base_url: String,
    /// Falls back to `<data_dir>/markshelf.db` when unset.
    pub database_path: Option<String>,
    /// Only honoured by the in-memory backend.
    pub seed_demo_data: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::Sqlite,
            base_url: "http://localhost:8080/api".to_string(),
            database_path: None,
            seed_demo_data: false,
        }
    }
}

/// Initial sort applied to a fresh session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewSettings {
    pub sort_option: SortOption,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
