//! Numeric range expression expansion.
//!
//! Expands expressions like `"1-3,5"` into explicit integer sets.

use std::collections::BTreeSet;

use crate::DirectiveError;

/// Expand a range expression into a sorted, duplicate-free set.
///
/// The grammar is `segment (',' segment)*` where each segment is a single
/// integer or a `lo-hi` pair. A pair expands to every integer in the
/// inclusive interval; a descending pair is treated as a swapped range, so
/// `"3-1"` expands the same as `"1-3"`. An empty expression expands to the
/// empty set.
///
/// # Example
///
/// ```
/// use gist_directive::expand;
///
/// let set = expand("1-3,5").unwrap();
/// assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
/// ```
pub fn expand(expr: &str) -> Result<BTreeSet<u32>, DirectiveError> {
    let mut set = BTreeSet::new();

    if expr.trim().is_empty() {
        return Ok(set);
    }

    for segment in expr.split(',') {
        let trimmed = segment.trim();
        match trimmed.split_once('-') {
            Some((lo, hi)) => {
                let lo = parse_bound(lo, trimmed)?;
                let hi = parse_bound(hi, trimmed)?;
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                set.extend(lo..=hi);
            }
            None => {
                set.insert(parse_bound(trimmed, trimmed)?);
            }
        }
    }

    Ok(set)
}

fn parse_bound(value: &str, segment: &str) -> Result<u32, DirectiveError> {
    value
        .trim()
        .parse()
        .map_err(|_| DirectiveError::InvalidRange {
            segment: segment.to_owned(),
        })
}
