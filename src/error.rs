//! Error types.
//!
//! [`DevgateError`] covers config loading, backend forwarding and the CLI
//! commands. [`ValidationError`] is one problem found in a config; the
//! validator collects all of them before failing.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Where in the config the problem is, e.g. `backend` or `rules[2]`.
    pub location: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}: {}", self.location, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DevgateError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config has {} problem(s):\n{}", .errors.len(), format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Connecting to the backend or reading its response failed. Answered
    /// with 502.
    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The backend took longer than `backend.timeout`, headers and body
    /// together. Answered with 504.
    #[error("Backend did not respond within {timeout_ms}ms")]
    UpstreamTimeout { timeout_ms: u64 },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_listed_one_per_line() {
        let err = DevgateError::ConfigValidation {
            errors: vec![
                ValidationError {
                    location: "backend".into(),
                    field: "timeout".into(),
                    message: "must be greater than 0".into(),
                    suggestion: None,
                },
                ValidationError {
                    location: "rules[0]".into(),
                    field: "pattern".into(),
                    message: "pattern '/logout' starts with '/'".into(),
                    suggestion: Some("did you mean 'logout'?".into()),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Config has 2 problem(s):\n  backend: timeout: must be greater than 0\n  \
             rules[0]: pattern: pattern '/logout' starts with '/' (did you mean 'logout'?)"
        );
    }
}
