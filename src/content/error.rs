//! Content store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching or decoding content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("request to content store failed")]
    Transport(#[from] reqwest::Error),

    #[error("content store returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("failed to decode result of `{query}` query")]
    Decode {
        query: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("content store is not configured: {0}")]
    Config(String),

    #[error("invalid content store url")]
    Url(#[from] url::ParseError),

    #[error("IO error when reading dataset `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid document on line {line} of dataset")]
    Document {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("fetch task failed")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_content_error_display() {
        let io_err = ContentError::Io(
            PathBuf::from("dataset.ndjson"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("dataset.ndjson"));

        let upstream = ContentError::Upstream {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(
            format!("{upstream}"),
            "content store returned 401: Unauthorized"
        );
    }
}
