//! Document-level gist embedding.
//!
//! Scans markdown for inline code spans starting with `gist:` and replaces
//! each with the fetched, transformed gist markup. Every occurrence is
//! independent: occurrences are processed in parallel, and a parse or fetch
//! failure affects only its own span.

use rayon::prelude::*;

use gist_directive::{GistQuery, GistRef, resolve};
use gist_fetch::{FetchError, GistClient, GistContent};
use gist_markup::{GistTable, select, selector_prefix, shrink};

use crate::EmbedOptions;

/// Directive marker inside inline code spans (case-sensitive).
const MARKER: &str = "gist:";

/// Type alias for the fetch callback function.
pub type FetchFn = dyn Fn(&GistRef) -> Result<GistContent, FetchError> + Send + Sync;

/// Replaces `gist:` directives in markdown with embedded gist HTML.
///
/// Directives are inline code spans of the form
/// `` `gist:[username/]id[#file][?params]` ``; spans inside fenced code
/// blocks are left alone. Parse failures pass the span through unchanged and
/// record a warning; fetch failures yield an empty embed for that span. In
/// both cases sibling occurrences keep processing.
///
/// # Example
///
/// ```
/// use gist_embed::{EmbedOptions, GistEmbedder, GistContent};
///
/// let mut embedder = GistEmbedder::new(EmbedOptions::new().with_username("alice"))
///     .with_fetcher(|_reference| {
///         Ok(GistContent {
///             div: "<table><tr><td id=\"LC1\">hi</td></tr></table>".to_owned(),
///             stylesheet: None,
///         })
///     });
///
/// let output = embedder.process("See `gist:5458438?lines=1`.");
/// assert!(output.contains("<table>"));
/// ```
pub struct GistEmbedder {
    options: EmbedOptions,
    client: GistClient,
    /// Fetch callback override. Default: [`GistClient::fetch`].
    fetch: Option<Box<FetchFn>>,
    warnings: Vec<String>,
}

/// Result of processing one directive occurrence.
enum EmbedOutput {
    /// Replace the span with this HTML.
    Html(String),
    /// Pass the span through unchanged.
    Skip,
}

/// A directive span located in the document.
struct Occurrence {
    /// Byte offset of the opening backtick.
    start: usize,
    /// Byte offset one past the closing backtick.
    end: usize,
    /// Directive text with the `gist:` marker stripped.
    raw: String,
}

impl GistEmbedder {
    /// Create an embedder from options.
    #[must_use]
    pub fn new(options: EmbedOptions) -> Self {
        let mut client = GistClient::with_timeout(options.timeout)
            .with_base_url(options.base_url.clone());
        if let Some(token) = &options.token {
            client = client.with_token(token.clone());
        }

        Self {
            options,
            client,
            fetch: None,
            warnings: Vec::new(),
        }
    }

    /// Override how gist content is fetched.
    #[must_use]
    pub fn with_fetcher<F>(mut self, fetch: F) -> Self
    where
        F: Fn(&GistRef) -> Result<GistContent, FetchError> + Send + Sync + 'static,
    {
        self.fetch = Some(Box::new(fetch));
        self
    }

    /// Replace every `gist:` directive in `markdown` with embedded HTML.
    ///
    /// Occurrences are fetched and transformed in parallel; output order
    /// follows document order regardless.
    #[must_use]
    pub fn process(&mut self, markdown: &str) -> String {
        let occurrences = scan(markdown);
        if occurrences.is_empty() {
            return markdown.to_owned();
        }

        let results: Vec<(EmbedOutput, Vec<String>)> = {
            let this: &Self = self;
            occurrences
                .par_iter()
                .map(|occurrence| this.embed_one(&occurrence.raw))
                .collect()
        };

        let mut output = String::with_capacity(markdown.len());
        let mut last = 0;

        for (occurrence, (embed, warnings)) in occurrences.iter().zip(results) {
            self.warnings.extend(warnings);
            if let EmbedOutput::Html(html) = embed {
                output.push_str(&markdown[last..occurrence.start]);
                output.push_str(&html);
                last = occurrence.end;
            }
        }
        output.push_str(&markdown[last..]);

        output
    }

    /// Warnings generated during processing.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Process a single directive occurrence.
    fn embed_one(&self, raw: &str) -> (EmbedOutput, Vec<String>) {
        let mut warnings = Vec::new();

        let query = match GistQuery::parse(raw) {
            Ok(query) => query,
            Err(e) => {
                warnings.push(format!("{MARKER}{raw}: {e}"));
                return (EmbedOutput::Skip, warnings);
            }
        };

        let reference = match resolve(raw, &self.options.username) {
            Ok(reference) => reference.with_file(query.file.clone()),
            Err(e) => {
                warnings.push(format!("{MARKER}{raw}: {e}"));
                return (EmbedOutput::Skip, warnings);
            }
        };

        let content = match self.fetch_content(&reference) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    username = %reference.username,
                    id = %reference.id,
                    "Failed to load gist"
                );
                warnings.push(format!("{MARKER}{raw}: {e}"));
                // No content for this occurrence; the document continues.
                return (EmbedOutput::Html(String::new()), warnings);
            }
        };

        let truncate = query.truncate || self.options.truncate;
        let mut html = content.div;
        if html.is_empty() {
            return (EmbedOutput::Html(html), warnings);
        }

        if !query.highlights.is_empty() || !query.lines.is_empty() {
            let prefix = selector_prefix(query.file.as_deref(), truncate);
            let mut table = GistTable::parse(&html);
            select(&mut table, &query, &prefix);
            html = table.to_html();
        }

        if truncate {
            html = shrink(&html, true);
        }

        (EmbedOutput::Html(html.trim().to_owned()), warnings)
    }

    fn fetch_content(&self, reference: &GistRef) -> Result<GistContent, FetchError> {
        match &self.fetch {
            Some(fetch) => fetch(reference),
            None => self.client.fetch(reference),
        }
    }
}

/// Locate directive spans outside fenced code blocks.
fn scan(markdown: &str) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();
    let mut fence = Fence::default();
    let mut offset = 0;

    for line in markdown.split_inclusive('\n') {
        fence.update(line.trim_end_matches('\n'));
        if !fence.in_fence() {
            scan_line(line, offset, &mut occurrences);
        }
        offset += line.len();
    }

    occurrences
}

/// Collect `gist:` inline code spans from one line.
fn scan_line(line: &str, offset: usize, occurrences: &mut Vec<Occurrence>) {
    let mut from = 0;
    while let Some(open) = line[from..].find('`').map(|i| from + i) {
        let Some(close) = line[open + 1..].find('`').map(|i| open + 1 + i) else {
            break;
        };
        let inner = &line[open + 1..close];
        if let Some(raw) = inner.strip_prefix(MARKER) {
            occurrences.push(Occurrence {
                start: offset + open,
                end: offset + close + 1,
                raw: raw.to_owned(),
            });
        }
        from = close + 1;
    }
}

/// Fenced code block state across lines.
///
/// Opening fences are three or more backticks or tildes; the closing fence
/// must reuse the same character, be at least as long, and contain nothing
/// else.
#[derive(Debug, Default)]
struct Fence {
    open: Option<(char, usize)>,
}

impl Fence {
    fn update(&mut self, line: &str) {
        let trimmed = line.trim_start();
        match self.open {
            Some((ch, len)) => {
                let count = trimmed.chars().take_while(|&c| c == ch).count();
                if count >= len && trimmed[count..].trim().is_empty() {
                    self.open = None;
                }
            }
            None => {
                if let Some(ch @ ('`' | '~')) = trimmed.chars().next() {
                    let count = trimmed.chars().take_while(|&c| c == ch).count();
                    if count >= 3 {
                        self.open = Some((ch, count));
                    }
                }
            }
        }
    }

    fn in_fence(&self) -> bool {
        self.open.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const TABLE: &str = concat!(
        r#"<div id="gist1" class="gist"><table><tbody>"#,
        r#"<tr><td id="file-example-sh-L1" class="blob-num js-line-number" data-line-number="1"></td>"#,
        r#"<td id="file-example-sh-LC1" class="blob-code js-file-line">one</td></tr>"#,
        r#"<tr><td id="file-example-sh-L2" class="blob-num js-line-number" data-line-number="2"></td>"#,
        r#"<td id="file-example-sh-LC2" class="blob-code js-file-line">two</td></tr>"#,
        r#"</tbody></table></div>"#,
    );

    fn embedder() -> GistEmbedder {
        GistEmbedder::new(EmbedOptions::new().with_username("alice")).with_fetcher(|_| {
            Ok(GistContent {
                div: TABLE.to_owned(),
                stylesheet: None,
            })
        })
    }

    #[test]
    fn test_embeds_directive() {
        let mut embedder = embedder();
        let output = embedder.process("Before\n\n`gist:5458438#example.sh`\n\nAfter");

        assert!(output.starts_with("Before"));
        assert!(output.contains("<table>"));
        assert!(output.ends_with("After"));
        assert!(!output.contains("gist:"));
        assert!(embedder.warnings().is_empty());
    }

    #[test]
    fn test_non_directive_spans_untouched() {
        let mut embedder = embedder();
        let input = "Run `cargo build` first.";
        assert_eq!(embedder.process(input), input);
    }

    #[test]
    fn test_fenced_blocks_skipped() {
        let mut embedder = embedder();
        let input = "```\n`gist:5458438#example.sh`\n```\n`gist:5458438#example.sh`\n";
        let output = embedder.process(input);

        assert!(output.contains("`gist:5458438#example.sh`"));
        assert!(output.contains("<table>"));
    }

    #[test]
    fn test_line_selection_applied() {
        let mut embedder = embedder();
        let output = embedder.process("`gist:5458438#example.sh?lines=2`");

        assert!(!output.contains("one"));
        assert!(output.contains("two"));
    }

    #[test]
    fn test_highlights_applied() {
        let mut embedder = embedder();
        let output = embedder.process("`gist:5458438#example.sh?highlights=1`");

        assert!(output.contains(r#"id="file-example-sh-LC1" class="blob-code js-file-line highlighted""#));
    }

    #[test]
    fn test_truncate_option_shrinks() {
        let mut embedder =
            GistEmbedder::new(EmbedOptions::new().with_username("alice").with_truncate(true))
                .with_fetcher(|_| {
                    Ok(GistContent {
                        div: TABLE.to_owned(),
                        stylesheet: None,
                    })
                });
        let output = embedder.process("`gist:5458438#example.sh`");

        assert!(output.contains(r#"id="LC1" class="b-c js-fln""#));
        assert!(output.contains(gist_markup::ATTRIBUTION));
    }

    #[test]
    fn test_truncate_query_override() {
        let mut embedder = embedder();
        let output = embedder.process("`gist:5458438#example.sh?truncate=true`");
        assert!(output.contains(r#"id="LC1""#));
    }

    #[test]
    fn test_malformed_directive_passes_through() {
        let mut embedder = embedder();
        let input = "`gist:5458438#a#b#c` and `gist:5458438#example.sh`";
        let output = embedder.process(input);

        // The bad occurrence stays, the good one embeds.
        assert!(output.contains("`gist:5458438#a#b#c`"));
        assert!(output.contains("<table>"));
        assert_eq!(embedder.warnings().len(), 1);
        assert!(embedder.warnings()[0].contains("malformed"));
    }

    #[test]
    fn test_missing_username_passes_through() {
        let mut embedder = GistEmbedder::new(EmbedOptions::new()).with_fetcher(|_| {
            Ok(GistContent::default())
        });
        let input = "`gist:5458438#example.sh`";
        let output = embedder.process(input);

        assert_eq!(output, input);
        assert!(embedder.warnings()[0].contains("username"));
    }

    #[test]
    fn test_fetch_failure_yields_empty_embed() {
        let mut embedder = GistEmbedder::new(EmbedOptions::new().with_username("alice"))
            .with_fetcher(|_| {
                Err(FetchError::HttpResponse {
                    status: 404,
                    body: "Not Found".to_owned(),
                })
            });
        let output = embedder.process("a `gist:5458438#example.sh` b");

        assert_eq!(output, "a  b");
        assert_eq!(embedder.warnings().len(), 1);
    }

    #[test]
    fn test_failure_does_not_abort_siblings() {
        let mut embedder = GistEmbedder::new(EmbedOptions::new().with_username("alice"))
            .with_fetcher(|reference| {
                if reference.id == "bad" {
                    Err(FetchError::HttpResponse {
                        status: 500,
                        body: "boom".to_owned(),
                    })
                } else {
                    Ok(GistContent {
                        div: TABLE.to_owned(),
                        stylesheet: None,
                    })
                }
            });

        let output = embedder.process("`gist:bad#x.sh`\n\n`gist:5458438#example.sh`\n");
        assert!(output.contains("<table>"));
        assert_eq!(embedder.warnings().len(), 1);
    }

    #[test]
    fn test_multiple_spans_on_one_line() {
        let mut embedder = embedder();
        let output = embedder.process("`gist:1#a.sh` mid `gist:2#b.sh`");
        assert_eq!(output.matches("<table>").count(), 2);
        assert!(output.contains(" mid "));
    }

    #[test]
    fn test_scan_offsets() {
        let occurrences = scan("x `gist:1#a` y\n`gist:2#b`\n");
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].raw, "1#a");
        assert_eq!(occurrences[1].raw, "2#b");
        assert_eq!(&"x `gist:1#a` y\n`gist:2#b`\n"[occurrences[0].start..occurrences[0].end], "`gist:1#a`");
    }

    #[test]
    fn test_tilde_fence() {
        let mut embedder = embedder();
        let input = "~~~\n`gist:1#a.sh`\n~~~\n";
        assert_eq!(embedder.process(input), input);
    }
}
