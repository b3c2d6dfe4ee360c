use reqwest::StatusCode;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while putting a website to a storage collection
#[derive(Error, Debug)]
pub enum StorageError {
    /// A directory could not be read during the walk
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    /// A local file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Entry is not below the source root
    #[error("{path} is not inside source directory {root}")]
    RelativePath { path: String, root: String },

    /// File name cannot be carried verbatim in a URL
    #[error("{path} is not valid UTF-8 and cannot be uploaded verbatim")]
    NonUtf8Path { path: String },

    /// Target URL could not be parsed
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Scheme override was rejected
    #[error("Cannot change scheme of '{url}' to '{scheme}'")]
    Scheme { url: String, scheme: String },

    /// Invocation produced a header that HTTP cannot carry
    #[error("Invalid header '{name}': {message}")]
    Header { name: String, message: String },

    /// Signing key could not be loaded
    #[error("Invalid signing key in {path}: {message}")]
    Key { path: String, message: String },

    /// Request failed to send or receive
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Collection rejected the invocation
    #[error("PUT {url} was unauthorized (401); the signer is not a controller of this collection")]
    Unauthorized { url: String },

    /// Collection answered with something other than 201 Created
    #[error("PUT {url} MUST have status 201, got {status}")]
    UnexpectedStatus { url: String, status: StatusCode },
}

impl StorageError {
    pub fn walk(error: walkdir::Error, root: &Path) -> Self {
        let path = error
            .path()
            .unwrap_or(root)
            .display()
            .to_string();
        Self::Walk {
            path,
            source: error,
        }
    }

    pub fn read(error: std::io::Error, path: &Path) -> Self {
        Self::Read {
            path: path.display().to_string(),
            source: error,
        }
    }

    pub fn invalid_url(error: url::ParseError, url: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source: error,
        }
    }

    pub fn key(path: &Path, message: impl Into<String>) -> Self {
        Self::Key {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { url } => {
                format!(
                    "Unauthorized PUT to {}\n\nPossible solutions:\n  \
                     1. Pass the collection controller's key with --key <file>\n  \
                     2. Set WAS_KEY_FILE in .env\n  \
                     3. Check that the collection exists and is controlled by that key",
                    url
                )
            }
            Self::Read { path, source } if source.kind() == std::io::ErrorKind::PermissionDenied => {
                format!(
                    "Permission denied: {}\n\nPossible solutions:\n  \
                     1. Check file permissions: ls -l {}\n  \
                     2. Ensure you have read access to the file",
                    path, path
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
