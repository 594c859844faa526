//! Embeds `gist:` directives in markdown documents.
//!
//! An inline code span of the form
//! `` `gist:[username/]id[#file][?key=value&...]` `` is replaced with the
//! rendered gist fetched from the gist host, optionally filtered to selected
//! lines, with highlight marking and size-reducing markup rewrites.
//!
//! Recognized query keys: `file`, `highlights`, `lines` (single integers,
//! range expressions like `1-3,5`, or repeated keys), and `truncate`.
//!
//! # Architecture
//!
//! Parsing lives in `gist-directive`, markup transforms in `gist-markup`,
//! and HTTP retrieval in `gist-fetch`. This crate wires them into
//! [`GistEmbedder`], which scans a document, processes each directive
//! occurrence independently (in parallel), and isolates failures to the
//! occurrence that caused them.
//!
//! # Example
//!
//! ```no_run
//! use gist_embed::{EmbedOptions, GistEmbedder};
//!
//! let options = EmbedOptions::new().with_username("alice").with_truncate(true);
//! let mut embedder = GistEmbedder::new(options);
//!
//! let html = embedder.process("See `gist:5458438#example.sh?highlights=1-3`.");
//! for warning in embedder.warnings() {
//!     eprintln!("{warning}");
//! }
//! ```

mod options;
mod processor;

pub use options::EmbedOptions;
pub use processor::{FetchFn, GistEmbedder};

pub use gist_directive::{DirectiveError, GistQuery, GistRef};
pub use gist_fetch::{FetchError, GistClient, GistContent};
