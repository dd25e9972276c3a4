use markshelf::types::errors::*;

// === OrganizerError Tests ===

#[test]
fn organizer_error_cycle_display() {
    let err = OrganizerError::CycleDetected {
        dragged: "work".to_string(),
        target: "drafts".to_string(),
    };
    assert_eq!(err.to_string(), "Moving folder work into drafts would create a cycle");
}

#[test]
fn organizer_error_rejected_display_with_and_without_message() {
    assert_eq!(
        OrganizerError::Rejected(Some("Not found".to_string())).to_string(),
        "Rejected by backend: Not found"
    );
    assert_eq!(OrganizerError::Rejected(None).to_string(), "Rejected by backend");
}

#[test]
fn organizer_error_display_variants() {
    assert_eq!(
        OrganizerError::SameFolder("tech".to_string()).to_string(),
        "Folder cannot be moved onto itself: tech"
    );
    assert_eq!(
        OrganizerError::RootFolderImmutable.to_string(),
        "The root folder cannot be changed"
    );
    assert_eq!(
        OrganizerError::NotFound("b9".to_string()).to_string(),
        "Entity not found: b9"
    );
    assert_eq!(
        OrganizerError::MissingData("auth.login".to_string()).to_string(),
        "Backend sent no data for auth.login"
    );
    assert_eq!(
        OrganizerError::SessionExpired.to_string(),
        "Session ended before the response arrived"
    );
}

#[test]
fn organizer_error_from_backend_error_is_transport() {
    let err: OrganizerError = BackendError::Network("connection refused".to_string()).into();
    assert_eq!(
        err,
        OrganizerError::Transport("Backend network error: connection refused".to_string())
    );
}

#[test]
fn organizer_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(OrganizerError::RootFolderImmutable);
    assert!(err.source().is_none());
}

// === BackendError Tests ===

#[test]
fn backend_error_display_variants() {
    assert_eq!(
        BackendError::Database("locked".to_string()).to_string(),
        "Backend database error: locked"
    );
    assert_eq!(
        BackendError::Serialization("eof".to_string()).to_string(),
        "Backend serialization error: eof"
    );
    assert_eq!(BackendError::NotAuthenticated.to_string(), "Not authenticated");
}

#[test]
fn backend_error_from_serde_json() {
    let parse_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
    let err = BackendError::from(parse_err);
    assert!(matches!(err, BackendError::Serialization(_)));
}

#[test]
fn backend_error_from_rusqlite() {
    let err = BackendError::from(rusqlite::Error::QueryReturnedNoRows);
    assert!(matches!(err, BackendError::Database(_)));
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("disk full".to_string()).to_string(),
        "Settings I/O error: disk full"
    );
    assert_eq!(
        SettingsError::SerializationError("bad json".to_string()).to_string(),
        "Settings serialization error: bad json"
    );
    assert_eq!(
        SettingsError::InvalidKey("foo.bar".to_string()).to_string(),
        "Invalid settings key: foo.bar"
    );
    assert_eq!(
        SettingsError::InvalidValue("expected bool".to_string()).to_string(),
        "Invalid settings value: expected bool"
    );
}
