//! WolfHDFS Error Types

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for WolfHDFS operations
pub type Result<T> = std::result::Result<T, Error>;

/// WolfHDFS error types
#[derive(Error, Debug)]
pub enum Error {
    // Store precondition errors
    #[error("File already exists")]
    AlreadyExists(String),

    #[error("Destination path exist")]
    DestinationExists(String),

    #[error("File does not exist: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Errors handed in by the transport before dispatch
    #[error("{0}")]
    Passthrough(String),

    #[error("Payload stream failed: {0}")]
    Payload(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is an "already exists" failure (target or destination)
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists(_) | Error::DestinationExists(_))
    }

    /// Whether this is a "does not exist" failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// HTTP status the WebHDFS transport answers with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::AlreadyExists(_) | Error::DestinationExists(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidArgument(_) | Error::Passthrough(_) | Error::Payload(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Java exception simple name used in `RemoteException` bodies
    pub fn exception_name(&self) -> &'static str {
        match self {
            Error::AlreadyExists(_) | Error::DestinationExists(_) => "FileAlreadyExistsException",
            Error::NotFound(_) => "FileNotFoundException",
            Error::InvalidArgument(_) | Error::Passthrough(_) => "IllegalArgumentException",
            Error::Payload(_) | Error::Io(_) | Error::Network(_) => "IOException",
            _ => "RuntimeException",
        }
    }

    /// Fully qualified Java class name for `RemoteException` bodies
    pub fn java_class_name(&self) -> &'static str {
        match self.exception_name() {
            "FileAlreadyExistsException" => "org.apache.hadoop.fs.FileAlreadyExistsException",
            "FileNotFoundException" => "java.io.FileNotFoundException",
            "IllegalArgumentException" => "java.lang.IllegalArgumentException",
            "IOException" => "java.io.IOException",
            _ => "java.lang.RuntimeException",
        }
    }
}
