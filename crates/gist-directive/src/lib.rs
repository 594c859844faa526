//! Parsing for inline `gist:` directives.
//!
//! A directive has the shape:
//!
//! ```text
//! gist:[username/]id[#file][?key=value[&key=value...]]
//! ```
//!
//! This crate covers the parsing side of gist embedding:
//!
//! - [`expand`]: numeric range expressions (`"1-3,5"`) to integer sets
//! - [`GistQuery`]: the file/highlights/lines query parsed from a directive
//! - [`resolve`]: the canonical `(username, id, file?)` retrieval key
//!
//! Fetching gist content and transforming the returned markup live in the
//! `gist-fetch` and `gist-markup` crates.
//!
//! # Example
//!
//! ```
//! use gist_directive::{GistQuery, resolve};
//!
//! let query = GistQuery::parse("alice/5458438?lines=1-3&highlights=2").unwrap();
//! assert!(query.lines.contains(&3));
//!
//! let reference = resolve("alice/5458438?lines=1-3", "").unwrap();
//! assert_eq!(reference.username, "alice");
//! assert_eq!(reference.id, "5458438");
//! ```

mod error;
mod query;
mod range;
mod reference;

pub use error::DirectiveError;
pub use query::GistQuery;
pub use range::expand;
pub use reference::{GistRef, resolve};
