use std::fmt;

// === OrganizerError ===

/// Errors returned by the organizer's mutation operations.
///
/// None of these are fatal: the entity store is left in its last confirmed state.
#[derive(Debug, Clone, PartialEq)]
pub enum OrganizerError {
    /// Moving `dragged` under `target` would create a cycle.
    CycleDetected { dragged: String, target: String },
    /// A folder cannot be moved onto itself.
    SameFolder(String),
    /// The root sentinel folder cannot be renamed or moved.
    RootFolderImmutable,
    /// The referenced entity does not exist in the store.
    NotFound(String),
    /// Input rejected before contacting the backend.
    InvalidInput(String),
    /// The backend answered with `success: false`.
    Rejected(Option<String>),
    /// The backend call itself failed.
    Transport(String),
    /// The backend confirmed but sent no payload for an operation that needs one.
    MissingData(String),
    /// The response belongs to a session that has since ended.
    SessionExpired,
}

impl fmt::Display for OrganizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganizerError::CycleDetected { dragged, target } => {
                write!(f, "Moving folder {} into {} would create a cycle", dragged, target)
            }
            OrganizerError::SameFolder(id) => write!(f, "Folder cannot be moved onto itself: {}", id),
            OrganizerError::RootFolderImmutable => write!(f, "The root folder cannot be changed"),
            OrganizerError::NotFound(id) => write!(f, "Entity not found: {}", id),
            OrganizerError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            OrganizerError::Rejected(Some(msg)) => write!(f, "Rejected by backend: {}", msg),
            OrganizerError::Rejected(None) => write!(f, "Rejected by backend"),
            OrganizerError::Transport(msg) => write!(f, "Backend unreachable: {}", msg),
            OrganizerError::MissingData(op) => write!(f, "Backend sent no data for {}", op),
            OrganizerError::SessionExpired => write!(f, "Session ended before the response arrived"),
        }
    }
}

impl std::error::Error for OrganizerError {}

impl From<BackendError> for OrganizerError {
    fn from(err: BackendError) -> Self {
        OrganizerError::Transport(err.to_string())
    }
}

// === BackendError ===

/// Transport-level failures raised by a backend implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// HTTP or connection failure.
    Network(String),
    /// Local storage failure.
    Database(String),
    /// Payload could not be encoded or decoded.
    Serialization(String),
    /// A call requiring a session was made without one.
    NotAuthenticated,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "Backend network error: {}", msg),
            BackendError::Database(msg) => write!(f, "Backend database error: {}", msg),
            BackendError::Serialization(msg) => write!(f, "Backend serialization error: {}", msg),
            BackendError::NotAuthenticated => write!(f, "Not authenticated"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<rusqlite::Error> for BackendError {
    fn from(err: rusqlite::Error) -> Self {
        BackendError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings/configuration operations.
#[derive(Debug)]
pub enum SettingsError {
    /// File system I/O error.
    IoError(String),
    /// JSON serialization/deserialization error.
    SerializationError(String),
    /// The specified settings key does not exist.
    InvalidKey(String),
    /// The provided value is invalid for the given key.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}
