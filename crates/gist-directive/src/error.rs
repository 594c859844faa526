//! Error types for directive parsing.

/// Error while parsing a `gist:` directive.
///
/// All variants are terminal for the directive occurrence that produced
/// them; callers are expected to catch them per occurrence so that one bad
/// directive never aborts the rest of the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DirectiveError {
    /// Delimiter structure of the directive is ambiguous: more than two
    /// `?`/`#` delimited segments, or a single non-hash segment without `=`.
    #[error("malformed directive: check the gist: reference syntax")]
    MalformedDirective,

    /// No usable `file`, `highlights`, or `lines` field after parsing.
    #[error("invalid query: expected at least one of file, highlights, lines")]
    InvalidQuery,

    /// No inline username and no default username configured.
    #[error("missing username information")]
    MissingUsername,

    /// The gist id is absent or blank.
    #[error("missing gist id information")]
    MissingId,

    /// A range expression segment is not an integer or `lo-hi` pair.
    #[error("invalid range segment: {segment:?}")]
    InvalidRange {
        /// The offending segment as written in the directive.
        segment: String,
    },
}
