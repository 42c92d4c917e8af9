// Startup configuration read from the environment.
// The token is mandatory; the instance URL falls back to gitlab.com.

use std::env;
use std::path::PathBuf;

use crate::error::{GlpipeError, Result};

pub const TOKEN_VAR: &str = "GITLAB_PERSONAL_TOKEN";
pub const URL_VAR: &str = "GITLAB_URL";
pub const LOG_VAR: &str = "GLPIPE_LOG";

pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Settings needed before the UI starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Personal access token sent as `PRIVATE-TOKEN`.
    pub token: String,
    /// Instance root, e.g. `https://gitlab.example.com` (no `/api/v4`).
    pub gitlab_url: String,
    /// Optional diagnostic log file.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_reader(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_env_reader<F>(reader: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = read_non_empty(&reader, TOKEN_VAR).ok_or(GlpipeError::MissingToken)?;
        let gitlab_url = read_non_empty(&reader, URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());
        let log_file = read_non_empty(&reader, LOG_VAR).map(PathBuf::from);

        Ok(Self {
            token,
            gitlab_url,
            log_file,
        })
    }

    /// Base URL for REST v4 calls.
    pub fn api_base(&self) -> String {
        format!("{}/api/v4", self.gitlab_url)
    }
}

fn read_non_empty<F>(reader: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    reader(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
