//! Error types for Badger
//!
//! All modules use `BadgerResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Badger operations
pub type BadgerResult<T> = Result<T, BadgerError>;

/// All errors that can occur in Badger
#[derive(Error, Debug)]
pub enum BadgerError {
    // Lookup errors - the only hard failures the resolver surfaces
    #[error("No badge is configured for artifact: {0}")]
    BadgeNotFound(String),

    #[error("No generator registered for id: {0}")]
    GeneratorUnresolved(String),

    // Pipeline errors - collapsed to an error badge at the resolver boundary
    #[error("Metadata lookup failed for {module}: {reason}")]
    MetadataFetch { module: String, reason: String },

    #[error("Generator {generator} failed: {reason}")]
    GenerationFailed { generator: String, reason: String },

    #[error("Generator {0} produced a malformed artifact")]
    MalformedArtifact(String),

    // Store errors
    #[error("Cache entry vanished between existence check and read: {key}")]
    EntryVanished { key: String },

    #[error("Cache entry corrupt for {key}: {reason}")]
    EntryCorrupt { key: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BadgerError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a metadata lookup error
    pub fn metadata(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MetadataFetch {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Create a generation failure error
    pub fn generation(generator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GenerationFailed {
            generator: generator.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the hard not-found signal (unresolvable badge or
    /// generator), as opposed to a failure the resolver degrades into an
    /// error badge.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BadgeNotFound(_) | Self::GeneratorUnresolved(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::BadgeNotFound(_) => Some("Check the [badges] table in your config"),
            Self::GeneratorUnresolved(_) => Some("Register the generator or fix the badge name"),
            Self::MetadataFetch { .. } => Some("Check the registry URL and package name"),
            Self::ConfigNotFound(_) => Some("Pass --config or create the default config file"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = BadgerError::BadgeNotFound("cov.svg".to_string());
        assert!(err.to_string().contains("cov.svg"));
    }

    #[test]
    fn error_hint() {
        let err = BadgerError::metadata("pkg", "timeout");
        assert_eq!(err.hint(), Some("Check the registry URL and package name"));
    }

    #[test]
    fn error_not_found_classification() {
        assert!(BadgerError::BadgeNotFound("x".into()).is_not_found());
        assert!(BadgerError::GeneratorUnresolved("x".into()).is_not_found());
        assert!(!BadgerError::metadata("pkg", "boom").is_not_found());
        assert!(!BadgerError::MalformedArtifact("x".into()).is_not_found());
    }
}
