//! Directive query parsing.
//!
//! Splits the text after the `gist:` marker into its query fields.

use std::collections::BTreeSet;

use crate::{DirectiveError, range};

/// Query parsed from a `gist:` directive.
///
/// Built once per directive occurrence by [`GistQuery::parse`], consumed by
/// the resolver and the markup transforms, then discarded.
///
/// # Example
///
/// ```
/// use gist_directive::GistQuery;
///
/// let query = GistQuery::parse("alice/5458438#example.sh?highlights=1-2").unwrap();
/// assert_eq!(query.username.as_deref(), Some("alice"));
/// assert_eq!(query.id, "5458438");
/// assert_eq!(query.file.as_deref(), Some("example.sh"));
/// assert!(query.highlights.contains(&2));
/// assert!(query.lines.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GistQuery {
    /// Username from the `[username/]id` segment, if given inline.
    pub username: Option<String>,
    /// Gist id. May still be blank here; [`resolve`](crate::resolve)
    /// enforces that it is non-empty.
    pub id: String,
    /// File identifier, raw as written in the directive.
    pub file: Option<String>,
    /// Lines to mark with the highlight class. May be empty.
    pub highlights: BTreeSet<u32>,
    /// Lines to retain. Empty means "retain all".
    pub lines: BTreeSet<u32>,
    /// Per-directive override of the global truncate option.
    pub truncate: bool,
}

/// Raw string fields collected before range expansion.
///
/// `highlights`/`lines` are `Some` as soon as the key appears, even with an
/// empty value; repeated keys accumulate and their expansions are unioned.
#[derive(Debug, Default)]
struct RawFields {
    file: Option<String>,
    highlights: Option<Vec<String>>,
    lines: Option<Vec<String>>,
    truncate: bool,
}

impl RawFields {
    /// Merge key/value pairs from a query-string segment.
    ///
    /// Recognized keys are `file`, `highlights`, `lines`, and `truncate`;
    /// anything else is ignored. A later `file` key overrides a `#file`
    /// segment parsed earlier.
    fn merge_pairs(&mut self, segment: &str) {
        for pair in segment.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "file" => self.file = Some(value.to_owned()),
                "highlights" => self
                    .highlights
                    .get_or_insert_with(Vec::new)
                    .push(value.to_owned()),
                "lines" => self
                    .lines
                    .get_or_insert_with(Vec::new)
                    .push(value.to_owned()),
                "truncate" => {
                    self.truncate = matches!(value.to_ascii_lowercase().as_str(), "true" | "1");
                }
                _ => {}
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.file.is_none() && self.highlights.is_none() && self.lines.is_none()
    }
}

impl GistQuery {
    /// Parse a directive with the leading `gist:` marker already stripped.
    ///
    /// Splitting on every `?` and `#` yields the `[username/]id` head plus:
    ///
    /// - no further segment: no file, no query string
    /// - one segment: a `#file` when `#` was present, otherwise a
    ///   `?key=value` query string (anything else is malformed)
    /// - two segments: a `#file` followed by a `?key=value` query string
    /// - more: malformed
    ///
    /// After the split, at least one of `file`, `highlights`, or `lines`
    /// must have been found, otherwise the query is invalid. String values
    /// for `highlights`/`lines` are expanded via [`expand`](crate::expand);
    /// repeated keys union their expansions; an absent key yields the empty
    /// set.
    ///
    /// # Errors
    ///
    /// [`DirectiveError::MalformedDirective`] for ambiguous delimiter
    /// structure, [`DirectiveError::InvalidQuery`] when no usable field was
    /// found, and [`DirectiveError::InvalidRange`] for bad range values.
    pub fn parse(raw: &str) -> Result<Self, DirectiveError> {
        let has_hash = raw.contains('#');

        let mut parts = raw.split(['?', '#']);
        let head = parts.next().unwrap_or("");
        let qs: Vec<&str> = parts.collect();

        let mut fields = RawFields::default();

        match qs.as_slice() {
            [] => {}
            [segment] if has_hash => fields.file = Some((*segment).to_owned()),
            [segment] if segment.contains('=') => fields.merge_pairs(segment),
            [_] => return Err(DirectiveError::MalformedDirective),
            [file, pairs] => {
                fields.file = Some((*file).to_owned());
                fields.merge_pairs(pairs);
            }
            _ => return Err(DirectiveError::MalformedDirective),
        }

        if fields.is_empty() {
            return Err(DirectiveError::InvalidQuery);
        }

        let (username, id) = match head.split_once('/') {
            Some((username, id)) => (non_blank(username), id),
            None => (None, head),
        };

        Ok(Self {
            username,
            id: id.trim().to_owned(),
            file: fields.file,
            highlights: expand_all(fields.highlights)?,
            lines: expand_all(fields.lines)?,
            truncate: fields.truncate,
        })
    }
}

/// Expand every collected value for a key and union the results.
fn expand_all(values: Option<Vec<String>>) -> Result<BTreeSet<u32>, DirectiveError> {
    let mut set = BTreeSet::new();
    for value in values.unwrap_or_default() {
        set.extend(range::expand(&value)?);
    }
    Ok(set)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn set(values: &[u32]) -> BTreeSet<u32> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_hash_file_only() {
        let query = GistQuery::parse("alice/123#example.sh").unwrap();
        assert_eq!(query.username.as_deref(), Some("alice"));
        assert_eq!(query.id, "123");
        assert_eq!(query.file.as_deref(), Some("example.sh"));
        assert!(query.highlights.is_empty());
        assert!(query.lines.is_empty());
    }

    #[test]
    fn test_query_string_only() {
        let query = GistQuery::parse("123?highlights=1-3,5&lines=1-10").unwrap();
        assert_eq!(query.username, None);
        assert_eq!(query.id, "123");
        assert_eq!(query.file, None);
        assert_eq!(query.highlights, set(&[1, 2, 3, 5]));
        assert_eq!(query.lines, set(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]));
    }

    #[test]
    fn test_hash_file_and_query_string() {
        let query = GistQuery::parse("123#example.sh?highlights=2").unwrap();
        assert_eq!(query.file.as_deref(), Some("example.sh"));
        assert_eq!(query.highlights, set(&[2]));
    }

    #[test]
    fn test_query_string_file_overrides_hash_file() {
        let query = GistQuery::parse("123#first.sh?file=second.sh&lines=1").unwrap();
        assert_eq!(query.file.as_deref(), Some("second.sh"));
    }

    #[test]
    fn test_id_only_is_invalid_query() {
        assert_eq!(GistQuery::parse("123"), Err(DirectiveError::InvalidQuery));
        assert_eq!(
            GistQuery::parse("alice/123"),
            Err(DirectiveError::InvalidQuery)
        );
    }

    #[test]
    fn test_single_segment_without_equals_is_malformed() {
        assert_eq!(
            GistQuery::parse("123?notaquery"),
            Err(DirectiveError::MalformedDirective)
        );
    }

    #[test]
    fn test_three_segments_is_malformed() {
        assert_eq!(
            GistQuery::parse("123#a.sh?lines=1?extra=2"),
            Err(DirectiveError::MalformedDirective)
        );
        assert_eq!(
            GistQuery::parse("123#a#b#c"),
            Err(DirectiveError::MalformedDirective)
        );
    }

    #[test]
    fn test_repeated_keys_union() {
        let query = GistQuery::parse("123?highlights=1&highlights=3-4").unwrap();
        assert_eq!(query.highlights, set(&[1, 3, 4]));
    }

    #[test]
    fn test_key_present_with_empty_value() {
        // Presence of the key is enough to make the query valid.
        let query = GistQuery::parse("123?lines=").unwrap();
        assert!(query.lines.is_empty());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let query = GistQuery::parse("123?lines=1&wat=2").unwrap();
        assert_eq!(query.lines, set(&[1]));
    }

    #[test]
    fn test_truncate_override() {
        assert!(GistQuery::parse("123?lines=1&truncate=true").unwrap().truncate);
        assert!(GistQuery::parse("123?lines=1&truncate=1").unwrap().truncate);
        assert!(!GistQuery::parse("123?lines=1&truncate=false").unwrap().truncate);
        assert!(!GistQuery::parse("123?lines=1").unwrap().truncate);
    }

    #[test]
    fn test_invalid_range_propagates() {
        assert!(matches!(
            GistQuery::parse("123?lines=1-x"),
            Err(DirectiveError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_blank_inline_username_dropped() {
        let query = GistQuery::parse(" /123#a.sh").unwrap();
        assert_eq!(query.username, None);
        assert_eq!(query.id, "123");
    }
}
