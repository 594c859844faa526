//! Line selection and size-reducing rewrites for gist markup.
//!
//! The GitHub gist API returns each file as an HTML table with one `<tr>`
//! per source line, a line-number cell (`id="...-L{n}"`) and a code cell
//! (`id="...-LC{n}"`). This crate post-processes that markup:
//!
//! - [`GistTable`]: a row-structured view of the markup supporting id
//!   lookup, class mutation, and whole-row removal
//! - [`select`]: marks highlighted lines and deletes rows outside the
//!   requested line set
//! - [`shrink`]: shortens class/attribute names via an ordered set of
//!   fixpoint rewrite rules
//!
//! The transforms work on raw text and the fixed gist naming conventions;
//! they make no attempt to tell the table apparatus apart from user content
//! embedded inside it.

mod select;
mod shrink;
mod table;

pub use select::{HIGHLIGHT_CLASS, sanitize_file, select, selector_prefix};
pub use shrink::{ATTRIBUTION, shrink};
pub use table::{GistTable, MarkupTree};
