//! Unified error handling for the forkast crate
//!
//! Analysis itself never fails: every component returns a well-defined
//! neutral/empty result for any text. Errors only arise while loading
//! configuration and resource files at startup, and in the presentation
//! layer (templates, server socket).
//!
//! # Usage
//!
//! ```rust,ignore
//! use forkast::error::{Error, ErrorCategory};
//!
//! fn report(err: &Error) {
//!     if err.category() == ErrorCategory::Resource {
//!         eprintln!("missing analysis resource: {err}");
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration and validation errors
    Config,
    /// Lexicon, gazetteer and other resource files
    Resource,
    /// Template rendering and serialization
    Rendering,
    /// Socket and HTTP server errors
    Server,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short human readable description of the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::Config => "configuration error",
            Self::Resource => "resource error",
            Self::Rendering => "rendering error",
            Self::Server => "server error",
            Self::Other => "other error",
        }
    }
}

/// Unified error type for the forkast crate
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value
    #[error("Invalid config value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Resource file (lexicon, gazetteer) does not exist
    #[error("Resource file not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// Resource file exists but a line could not be parsed
    #[error("Invalid resource file {} at line {line}: {reason}", path.display())]
    InvalidResource {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A configured keyword could not be compiled into a matcher
    #[error("Invalid keyword pattern '{keyword}': {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template registration errors
    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// Template rendering errors
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Web server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a resource parsing error
    pub fn invalid_resource(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidResource {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig { .. } | Self::Toml(_) | Self::Pattern { .. } => {
                ErrorCategory::Config
            }
            Self::ResourceNotFound { .. } | Self::InvalidResource { .. } | Self::Io(_) => {
                ErrorCategory::Resource
            }
            Self::Json(_) | Self::Template(_) | Self::Render(_) => ErrorCategory::Rendering,
            Self::Server(_) => ErrorCategory::Server,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }

    /// Whether the process must stop instead of serving requests
    ///
    /// Configuration and resource errors happen at startup and are never
    /// retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Config | ErrorCategory::Resource
        )
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(Box::new(err))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err = Error::invalid_config("sentiment.positive_threshold", "must be >= 0");
        assert_eq!(err.category(), ErrorCategory::Config);

        let err = Error::ResourceNotFound {
            path: PathBuf::from("missing.tsv"),
        };
        assert_eq!(err.category(), ErrorCategory::Resource);
    }

    #[test]
    fn test_is_fatal() {
        let err = Error::ResourceNotFound {
            path: PathBuf::from("lexicon.tsv"),
        };
        assert!(err.is_fatal());

        let err = Error::Server("bind failed".to_string());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::invalid_resource("lexicon.tsv", 3, "missing polarity");
        assert_eq!(
            err.to_string(),
            "Invalid resource file lexicon.tsv at line 3: missing polarity"
        );

        let err = Error::invalid_config("cuisine.min_score", "must be within [0, 1]");
        assert!(err.to_string().contains("cuisine.min_score"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "nope");
        let unified: Error = io_err.into();
        assert!(matches!(unified, Error::Io(_)));
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("Something went wrong");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.category().description(), "other error");
    }
}
