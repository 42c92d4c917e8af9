// Error types for glpipe.
// Covers GitLab API failures, startup configuration errors, and terminal IO.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlpipeError {
    #[error("GitLab API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Please set GITLAB_PERSONAL_TOKEN environment variable.")]
    MissingToken,

    #[error("Invalid GitLab URL {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GlpipeError>;
