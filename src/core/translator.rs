//! Line translation across an edit script.
//!
//! A line keeps its identity only while it sits in an unchanged span.
//! Lines in deleted or replaced spans have no trustworthy destination, even
//! when a replacement happens to have the same length.

use crate::diff::{EditScript, EditSpan, SpanStatus};

/// Find the span containing 0-based old line `index` that satisfies `accept`
///
/// Spans are few per edit and already ordered, so a linear scan is enough.
pub fn find_span<F>(script: &EditScript, index: usize, accept: F) -> Option<&EditSpan>
where
    F: Fn(&EditSpan) -> bool,
{
    script
        .spans()
        .iter()
        .find(|span| span.contains_source(index) && accept(span))
}

/// Translate a 1-based line of the old text into the new text
///
/// Returns `None` when the line is not translatable: it was deleted or
/// rewritten, lies outside the old text, or is `0`.
pub fn translate(old_line: usize, script: &EditScript) -> Option<usize> {
    let index = old_line.checked_sub(1)?;
    let span = find_span(script, index, |s| s.status == SpanStatus::Unchanged)?;
    let offset = index - span.source_index;
    Some(span.dest_index + offset + 1)
}
