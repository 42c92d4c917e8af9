// GitLab API HTTP client.
// Handles authentication, request dispatch, and status-code mapping.

use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode, Url,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::config::Config;
use crate::error::{GlpipeError, Result};

const PRIVATE_TOKEN: &str = "private-token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitLab REST v4 client bound to one instance and token.
pub struct GitLabClient {
    client: Client,
    api_base: String,
}

impl GitLabClient {
    /// Create a client for `api_base` (e.g. `https://gitlab.com/api/v4`).
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/');
        let parsed =
            Url::parse(api_base).map_err(|e| GlpipeError::InvalidUrl(format!("{api_base}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GlpipeError::InvalidUrl(format!(
                "{api_base}: unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        let mut token_value =
            HeaderValue::from_str(token).map_err(|e| GlpipeError::Other(e.to_string()))?;
        token_value.set_sensitive(true);
        headers.insert(PRIVATE_TOKEN, token_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("glpipe-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GlpipeError::Api)?;

        Ok(Self {
            client,
            api_base: api_base.to_string(),
        })
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base(), &config.token)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Make a GET request to the GitLab API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        self.check_response(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).query(params).send().await?;
        self.check_response(response).await
    }

    /// Make a POST request with an empty body.
    pub async fn post(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).send().await?;
        self.check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        tracing::warn!(status = status.as_u16(), url = %response.url(), "request failed");
        match status {
            StatusCode::UNAUTHORIZED => Err(GlpipeError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(GlpipeError::NotFound(url))
            }
            status => Err(GlpipeError::Other(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }
}
