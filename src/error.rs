use thiserror::Error;

/// Errors raised by the jar library (reports, reminders, invitations).
///
/// Storage helpers in `db` return `anyhow::Result` with context instead;
/// both convert cleanly at the binary boundary.
#[derive(Debug, Error)]
pub enum JarError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON (de)serialisation of stored values failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The PDF backend could not serialise the laid-out document.
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    /// Reminder settings were rejected (no days, malformed time, unknown day).
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Invitation request was rejected.
    #[error("Invalid invitation: {0}")]
    InvalidInvitation(String),

    /// No jar with the given id exists in the store.
    #[error("Jar not found: {id}")]
    JarNotFound { id: i64 },

    /// No invitation with the given id exists in the store.
    #[error("Invitation not found: {id}")]
    InvitationNotFound { id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JarError>;
