//! Row-structured view of gist table markup.

use std::sync::LazyLock;

use regex::Regex;

static ROW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)<tr\b[^>]*>.*?</tr>").unwrap());

/// Tree-manipulation capability needed by the line selector.
///
/// Elements are addressed by their `id` attribute; rows are the structural
/// unit of removal (deleting a cell deletes its whole row).
pub trait MarkupTree {
    /// Number of structural rows.
    fn row_count(&self) -> usize;

    /// Add a class to the element with the given id.
    ///
    /// Returns `false` if no such element exists.
    fn add_class(&mut self, id: &str, class: &str) -> bool;

    /// Remove the row containing the element with the given id.
    ///
    /// Returns `false` if no row contains such an element.
    fn remove_row_of(&mut self, id: &str) -> bool;
}

#[derive(Debug)]
enum Segment {
    /// A `<tr>...</tr>` block.
    Row(String),
    /// Everything between rows.
    Other(String),
}

impl Segment {
    fn text(&self) -> &str {
        match self {
            Self::Row(text) | Self::Other(text) => text,
        }
    }

    fn text_mut(&mut self) -> &mut String {
        match self {
            Self::Row(text) | Self::Other(text) => text,
        }
    }
}

/// Gist markup split into table rows and the text around them.
///
/// Parsing is purely textual: each non-nested `<tr>...</tr>` block becomes a
/// row segment, everything else is kept verbatim, and [`to_html`](Self::to_html)
/// reassembles the original text minus any removed rows.
///
/// # Example
///
/// ```
/// use gist_markup::{GistTable, MarkupTree};
///
/// let html = r#"<table><tr><td id="LC1">a</td></tr><tr><td id="LC2">b</td></tr></table>"#;
/// let mut table = GistTable::parse(html);
/// assert_eq!(table.row_count(), 2);
///
/// table.remove_row_of("LC1");
/// assert_eq!(table.to_html(), r#"<table><tr><td id="LC2">b</td></tr></table>"#);
/// ```
#[derive(Debug)]
pub struct GistTable {
    segments: Vec<Segment>,
}

impl GistTable {
    /// Split markup into row and non-row segments.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for row in ROW_PATTERN.find_iter(html) {
            if row.start() > last {
                segments.push(Segment::Other(html[last..row.start()].to_owned()));
            }
            segments.push(Segment::Row(html[row.start()..row.end()].to_owned()));
            last = row.end();
        }
        if last < html.len() {
            segments.push(Segment::Other(html[last..].to_owned()));
        }

        Self { segments }
    }

    /// Serialize back to markup text.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }
}

impl MarkupTree for GistTable {
    fn row_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Row(_)))
            .count()
    }

    fn add_class(&mut self, id: &str, class: &str) -> bool {
        let needle = id_needle(id);
        self.segments
            .iter_mut()
            .any(|segment| add_class_in(segment.text_mut(), &needle, class))
    }

    fn remove_row_of(&mut self, id: &str) -> bool {
        let needle = id_needle(id);
        let index = self
            .segments
            .iter()
            .position(|s| matches!(s, Segment::Row(text) if text.contains(&needle)));

        match index {
            Some(index) => {
                self.segments.remove(index);
                true
            }
            None => false,
        }
    }
}

fn id_needle(id: &str) -> String {
    format!(r#"id="{id}""#)
}

/// Add a class to the tag whose `id` attribute matches `needle`.
///
/// Locates the enclosing tag around the id attribute, then appends to an
/// existing `class` attribute or inserts a new one. Already-present classes
/// are left alone.
fn add_class_in(text: &mut String, needle: &str, class: &str) -> bool {
    let Some(id_pos) = text.find(needle) else {
        return false;
    };
    let Some(tag_start) = text[..id_pos].rfind('<') else {
        return false;
    };
    let Some(tag_end) = text[id_pos..].find('>').map(|i| id_pos + i) else {
        return false;
    };

    let tag = &text[tag_start..tag_end];
    if let Some(class_pos) = tag.find(r#"class=""#) {
        let value_start = class_pos + r#"class=""#.len();
        let Some(value_len) = tag[value_start..].find('"') else {
            return false;
        };
        let value = &tag[value_start..value_start + value_len];
        if value.split_ascii_whitespace().any(|c| c == class) {
            return true;
        }
        text.insert_str(tag_start + value_start + value_len, &format!(" {class}"));
    } else {
        text.insert_str(tag_end, &format!(r#" class="{class}""#));
    }
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const THREE_ROWS: &str = concat!(
        r#"<table class="highlight"><tbody>"#,
        r#"<tr><td id="L1" class="b-n"></td><td id="LC1">one</td></tr>"#,
        r#"<tr><td id="L2" class="b-n"></td><td id="LC2">two</td></tr>"#,
        r#"<tr><td id="L3" class="b-n"></td><td id="LC3">three</td></tr>"#,
        r#"</tbody></table>"#,
    );

    #[test]
    fn test_row_count() {
        assert_eq!(GistTable::parse(THREE_ROWS).row_count(), 3);
        assert_eq!(GistTable::parse("<div>no rows</div>").row_count(), 0);
    }

    #[test]
    fn test_roundtrip_without_edits() {
        let table = GistTable::parse(THREE_ROWS);
        assert_eq!(table.to_html(), THREE_ROWS);
    }

    #[test]
    fn test_remove_row() {
        let mut table = GistTable::parse(THREE_ROWS);
        assert!(table.remove_row_of("LC2"));
        let html = table.to_html();
        assert!(html.contains("one"));
        assert!(!html.contains("two"));
        assert!(html.contains("three"));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut table = GistTable::parse(THREE_ROWS);
        assert!(!table.remove_row_of("LC9"));
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_id_match_is_exact() {
        let html = r#"<tr><td id="LC12">x</td></tr>"#;
        let mut table = GistTable::parse(html);
        assert!(!table.remove_row_of("LC1"));
        assert!(table.remove_row_of("LC12"));
    }

    #[test]
    fn test_add_class_appends_to_existing() {
        let mut table = GistTable::parse(THREE_ROWS);
        assert!(table.add_class("L2", "highlighted"));
        assert!(table.to_html().contains(r#"id="L2" class="b-n highlighted""#));
    }

    #[test]
    fn test_add_class_inserts_attribute() {
        let mut table = GistTable::parse(THREE_ROWS);
        assert!(table.add_class("LC2", "highlighted"));
        assert!(table.to_html().contains(r#"<td id="LC2" class="highlighted">two</td>"#));
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let mut table = GistTable::parse(THREE_ROWS);
        table.add_class("LC1", "highlighted");
        table.add_class("LC1", "highlighted");
        assert_eq!(table.to_html().matches("highlighted").count(), 1);
    }

    #[test]
    fn test_add_class_missing_id() {
        let mut table = GistTable::parse(THREE_ROWS);
        assert!(!table.add_class("LC9", "highlighted"));
        assert_eq!(table.to_html(), THREE_ROWS);
    }

    #[test]
    fn test_multiline_row() {
        let html = "<table>\n<tr>\n<td id=\"LC1\">one</td>\n</tr>\n</table>";
        let mut table = GistTable::parse(html);
        assert_eq!(table.row_count(), 1);
        assert!(table.remove_row_of("LC1"));
        assert_eq!(table.to_html(), "<table>\n\n</table>");
    }
}
