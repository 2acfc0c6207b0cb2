use crate::core::session::SessionStage;
use thiserror::Error;

/// Failure reported by the accounting engine itself (connection, session or
/// request transport). `code` mirrors the HRESULT-style code the engine raises.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("engine error 0x{code:08X}: {message}")]
pub struct EngineError {
    pub code: u32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum TermsError {
    #[error("Connection failed during {stage}: {source}")]
    Connection {
        stage: SessionStage,
        source: EngineError,
    },

    #[error("Request transport failed: {0}")]
    Transport(#[source] EngineError),

    #[error("Teardown failed during {stage}: {source}")]
    Teardown {
        stage: SessionStage,
        source: EngineError,
    },

    #[error("Request failed with status {status_code}: {message}")]
    RequestFailed { status_code: i32, message: String },

    #[error("Missing response: {message}")]
    MissingResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Transport,
    Response,
    Configuration,
    System,
}

impl TermsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TermsError::Connection { .. } | TermsError::Teardown { .. } => {
                ErrorCategory::Connection
            }
            TermsError::Transport(_) => ErrorCategory::Transport,
            TermsError::RequestFailed { .. } | TermsError::MissingResponse { .. } => {
                ErrorCategory::Response
            }
            TermsError::ConfigError { .. } | TermsError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            TermsError::IoError(_)
            | TermsError::SerializationError(_)
            | TermsError::CsvError(_)
            | TermsError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    /// Short message suitable for printing to a terminal user.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Connection => format!(
                "Could not talk to the accounting application, check that it is running \
                 with a company file open ({})",
                self
            ),
            ErrorCategory::Transport => {
                format!("The request to the accounting application failed ({})", self)
            }
            ErrorCategory::Response => {
                format!("The accounting application rejected the request ({})", self)
            }
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("Unexpected error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TermsError>;

pub type EngineResult<T> = std::result::Result<T, EngineError>;
