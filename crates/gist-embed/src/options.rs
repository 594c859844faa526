//! Embedding options.

use std::time::Duration;

use gist_fetch::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Options for gist embedding.
///
/// The default username is passed in here explicitly; directives without an
/// inline `username/` fall back to it.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    /// Default gist user for directives without an inline username.
    /// Empty means no default is configured.
    pub username: String,
    /// GitHub access token for authenticated fetches.
    pub token: Option<String>,
    /// Shrink embedded markup (reduces output size 15-35%).
    ///
    /// Individual directives can override this with `?truncate=...`.
    pub truncate: bool,
    /// Gist host.
    pub base_url: String,
    /// Request timeout for gist fetches.
    pub timeout: Duration,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbedOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            username: String::new(),
            token: None,
            truncate: false,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the default gist username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the access token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Enable or disable markup shrinking.
    #[must_use]
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Set the gist host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the fetch timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
