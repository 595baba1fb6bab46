use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Validation failed on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidState(InvalidStateKind),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Distinguishable state-rule violations, so clients can render the right
/// message (full vs. deadline vs. duplicate) instead of a generic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidStateKind {
    NotPending,
    TerminalImmutable,
    EventNotOpen,
    RegistrationClosed,
    EventFull,
    AlreadyRegistered,
}

impl InvalidStateKind {
    /// Stable machine-readable code carried in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotPending => "score_not_pending",
            Self::TerminalImmutable => "score_terminal",
            Self::EventNotOpen => "event_not_open",
            Self::RegistrationClosed => "registration_closed",
            Self::EventFull => "event_full",
            Self::AlreadyRegistered => "already_registered",
        }
    }
}

impl std::fmt::Display for InvalidStateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::NotPending => "Score is not pending",
            Self::TerminalImmutable => "Score is already approved or rejected",
            Self::EventNotOpen => "Event is not open for registration",
            Self::RegistrationClosed => "Registration deadline has passed",
            Self::EventFull => "Event is full",
            Self::AlreadyRegistered => "Already registered for this event",
        };
        f.write_str(message)
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }
}
