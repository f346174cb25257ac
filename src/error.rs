//! Error types for catalog loading and model lookup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },
}

impl CatalogError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CatalogError::FileNotFound { .. } | CatalogError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors when a requested model cannot be found.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown model \"{name}\": expected one of {}", known.join(", "))]
    UnknownModel { name: String, known: Vec<String> },
}

impl ResolveError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::UnknownModel { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_exit_codes() {
        let err = CatalogError::FileNotFound {
            path: PathBuf::from("models.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CatalogError::InvalidJson { source };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_model_display() {
        let err = ResolveError::UnknownModel {
            name: "Ghost".into(),
            known: vec!["Order".into(), "User".into()],
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "unknown model \"Ghost\": expected one of Order, User"
        );
    }
}
