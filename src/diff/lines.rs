//! Line splitting ahead of diffing
//!
//! The diff engine compares lines as opaque tokens, so both snapshots are
//! split before being handed over. Each side picks its own separator: a
//! reference fetched from the server may use `\r\n` while the local buffer
//! uses `\n`.

/// Line separator detected in a text blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSeparator {
    /// Windows style `\r\n`
    CrLf,
    /// Unix style `\n`
    Lf,
}

impl LineSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineSeparator::CrLf => "\r\n",
            LineSeparator::Lf => "\n",
        }
    }
}

/// Detect the separator used by `text`
///
/// Any occurrence of `\r\n` means the whole text is treated as CRLF.
/// Otherwise the text is treated as LF (including text with no separator).
pub fn detect_separator(text: &str) -> LineSeparator {
    if text.contains("\r\n") {
        LineSeparator::CrLf
    } else {
        LineSeparator::Lf
    }
}

/// Split `text` into lines using its detected separator
///
/// Always returns at least one line: empty text is a single empty line,
/// and a trailing separator produces a trailing empty line. Both snapshots
/// go through the same split, so line numbers stay comparable.
pub fn split_lines(text: &str) -> Vec<&str> {
    let separator = detect_separator(text);
    text.split(separator.as_str()).collect()
}
