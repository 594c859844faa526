//! Line highlighting and selection over gist tables.

use gist_directive::GistQuery;

use crate::MarkupTree;

/// Class added to highlighted code cells.
pub const HIGHLIGHT_CLASS: &str = "highlighted";

/// Compute the id prefix for a gist's code cells.
///
/// Shrunk output uses the short `LC` ids; otherwise cells carry the
/// file-qualified form `file-{sanitized}-LC`.
#[must_use]
pub fn selector_prefix(file: Option<&str>, truncate: bool) -> String {
    if truncate {
        "LC".to_owned()
    } else {
        format!("file-{}-LC", sanitize_file(file.unwrap_or("")))
    }
}

/// Sanitize a file name the way gist ids embed it.
///
/// Strips a single leading `.`, replaces every maximal run of characters
/// outside `[A-Za-z0-9_]` with one `-`, and lowercases.
///
/// # Example
///
/// ```
/// use gist_markup::sanitize_file;
///
/// assert_eq!(sanitize_file("Example.sh"), "example-sh");
/// assert_eq!(sanitize_file(".bashrc"), "bashrc");
/// ```
#[must_use]
pub fn sanitize_file(file: &str) -> String {
    let stripped = file.strip_prefix('.').unwrap_or(file);
    let mut out = String::with_capacity(stripped.len());
    let mut in_run = false;

    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }

    out
}

/// Mark highlighted lines and delete rows outside the requested line set.
///
/// Highlight targets are best effort: ids without a matching element are
/// skipped. When `query.lines` is non-empty, every row index in
/// `[1, row_count]` absent from the set has its row removed; values outside
/// that interval have no effect. An empty line set retains everything.
pub fn select<T: MarkupTree>(tree: &mut T, query: &GistQuery, id_prefix: &str) {
    for line in &query.highlights {
        tree.add_class(&format!("{id_prefix}{line}"), HIGHLIGHT_CLASS);
    }

    if query.lines.is_empty() {
        return;
    }

    let total = u32::try_from(tree.row_count()).unwrap_or(u32::MAX);
    for line in 1..=total {
        if !query.lines.contains(&line) {
            tree.remove_row_of(&format!("{id_prefix}{line}"));
        }
    }
}
