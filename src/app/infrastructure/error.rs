use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    /// The bridge handshake failed; the editor pane cannot be used.
    #[error("Editor initialization failed: {0}")]
    Initialization(String),

    /// A call reached the bridge before the handshake completed.
    #[error("Bridge call '{method}' issued before the editor was ready")]
    NotReady { method: String },

    /// The embedded runtime raised while executing a script.
    #[error("Script error: {message} - script: {script}")]
    Script { script: String, message: String },

    #[error("Operation must run on the UI thread: {0}")]
    WrongThread(&'static str),

    #[error("Bridge disconnected: {0}")]
    Disconnected(String),

    #[error("Could not access '{location}': {source}")]
    DocumentIo {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation rejected while a save is in progress: {0}")]
    ConflictingOperation(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl AppError {
    /// Errors raised by a bridge invocation, as opposed to document or
    /// handshake failures.
    pub fn is_bridge_call_error(&self) -> bool {
        matches!(
            self,
            Self::NotReady { .. } | Self::Script { .. } | Self::WrongThread(_) | Self::Disconnected(_)
        )
    }

    pub fn document_io(location: impl Into<String>, source: std::io::Error) -> Self {
        Self::DocumentIo {
            location: location.into(),
            source,
        }
    }
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
