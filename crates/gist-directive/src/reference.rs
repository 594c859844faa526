//! Canonical gist reference resolution.
//!
//! Combines the `[username/]id` head of a directive with a configured
//! default username into the key handed to the fetch layer.

use crate::DirectiveError;

/// Canonical `(username, id, file?)` retrieval key for a gist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistRef {
    /// Gist owner, inline or from the configured default.
    pub username: String,
    /// Gist id.
    pub id: String,
    /// File to fetch within the gist, if the query named one.
    pub file: Option<String>,
}

impl GistRef {
    /// Attach the file identifier from a parsed query.
    ///
    /// The file can come from either the `#file` segment or a `?file=` key,
    /// both of which are parsed by [`GistQuery`](crate::GistQuery), so it is
    /// attached after resolution rather than re-parsed here.
    #[must_use]
    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }
}

/// Resolve a directive into a [`GistRef`].
///
/// `raw` is the directive text with the leading `gist:` marker stripped.
/// Everything before the first `?`/`#` delimiter is the `[username/]id`
/// segment; a `/` splits it into username and id, otherwise the whole
/// segment is the id and `default_username` is used. A blank
/// `default_username` means no default is configured.
///
/// # Errors
///
/// [`DirectiveError::MissingUsername`] when neither an inline nor a default
/// username is available, [`DirectiveError::MissingId`] when the id is blank
/// after trimming.
///
/// # Example
///
/// ```
/// use gist_directive::resolve;
///
/// let reference = resolve("123#example.sh", "bob").unwrap();
/// assert_eq!(reference.username, "bob");
/// assert_eq!(reference.id, "123");
/// ```
pub fn resolve(raw: &str, default_username: &str) -> Result<GistRef, DirectiveError> {
    let head = raw.split(['?', '#']).next().unwrap_or("");

    let (inline_username, id) = match head.split_once('/') {
        Some((username, id)) => (Some(username), id),
        None => (None, head),
    };

    let username = inline_username
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(default_username)
        .trim();

    if username.is_empty() {
        return Err(DirectiveError::MissingUsername);
    }

    let id = id.trim();
    if id.is_empty() {
        return Err(DirectiveError::MissingId);
    }

    Ok(GistRef {
        username: username.to_owned(),
        id: id.to_owned(),
        file: None,
    })
}
