//! HTTP retrieval of rendered gist content.
//!
//! Fetches `https://gist.github.com/{username}/{id}.json`, which returns the
//! rendered gist as JSON with a `div` field of table markup and a
//! `stylesheet` URL. The markup transforms in `gist-markup` consume `div`;
//! `stylesheet` is exposed for callers that handle CSS inclusion.

use std::time::Duration;

use serde::Deserialize;
use ureq::Agent;

use gist_directive::GistRef;

/// Default gist host.
pub const DEFAULT_BASE_URL: &str = "https://gist.github.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Rendered gist content as returned by the gist JSON endpoint.
///
/// Unknown fields in the payload are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GistContent {
    /// Rendered HTML for the gist (or the single requested file).
    #[serde(default)]
    pub div: String,
    /// URL of the gist stylesheet, when the API provides one.
    #[serde(default)]
    pub stylesheet: Option<String>,
}

/// Error from gist retrieval.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, bad body).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// Server returned an error status.
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Payload was not the expected JSON shape.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

/// Client for the gist JSON endpoint.
///
/// Wraps a pooled [`Agent`] so repeated fetches reuse connections.
///
/// # Example
///
/// ```no_run
/// use gist_directive::resolve;
/// use gist_fetch::GistClient;
///
/// let client = GistClient::new().with_token("ghp_example");
/// let reference = resolve("alice/5458438?lines=1-3", "").unwrap();
/// let content = client.fetch(&reference).unwrap();
/// assert!(content.div.contains("<table"));
/// ```
pub struct GistClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl Default for GistClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GistClient {
    /// Create a client with the default host and timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: DEFAULT_BASE_URL.to_owned(),
            token: None,
        }
    }

    /// Override the gist host (for mirrors or tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Authenticate requests with a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Fetch the rendered content for a resolved gist reference.
    ///
    /// # Errors
    ///
    /// [`FetchError::Http`] for transport failures, [`FetchError::HttpResponse`]
    /// for non-success statuses, [`FetchError::Json`] for unexpected payloads.
    pub fn fetch(&self, reference: &GistRef) -> Result<GistContent, FetchError> {
        let url = gist_url(&self.base_url, reference);

        let mut request = self
            .agent
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }

        let response = request.call()?;
        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(FetchError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let text = body.read_to_string()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Build the JSON endpoint URL for a gist reference.
fn gist_url(base_url: &str, reference: &GistRef) -> String {
    let mut url = format!(
        "{}/{}/{}.json",
        base_url.trim_end_matches('/'),
        reference.username,
        reference.id
    );
    if let Some(file) = &reference.file {
        url.push_str("?file=");
        url.push_str(file);
    }
    url
}
