//! Utility functions
//!
//! Source-text helpers shared by the scanner and the transformers.

pub mod unicode;

/// Length of a leading `#!` line including its newline, or 0.
pub fn shebang_len(code: &str) -> usize {
    if !code.starts_with("#!") {
        return 0;
    }
    match code.find('\n') {
        Some(index) => index + 1,
        None => code.len(),
    }
}

/// 1-based line and column for a byte offset.
pub fn line_and_column(code: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(code.len());
    let before = &code.as_bytes()[..pos];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |index| index + 1);
    (line, pos - line_start + 1)
}

/// Count `\n` bytes in `code[start..end]`.
#[inline]
pub fn count_newlines(code: &str, start: usize, end: usize) -> usize {
    code.as_bytes()[start..end]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

/// Keep only the line breaks of `text`.
pub fn newlines_only(text: &str) -> String {
    text.chars().filter(|&c| c == '\n').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shebang_len() {
        assert_eq!(shebang_len("#!/usr/bin/env node\nfoo();"), 20);
        assert_eq!(shebang_len("#!node"), 6);
        assert_eq!(shebang_len("foo();"), 0);
    }

    #[test]
    fn test_line_and_column() {
        assert_eq!(line_and_column("abc", 0), (1, 1));
        assert_eq!(line_and_column("a\nbc", 3), (2, 2));
        assert_eq!(line_and_column("a\n", 2), (2, 1));
    }

    #[test]
    fn test_newlines_only() {
        assert_eq!(newlines_only(" /* a */\n  \n "), "\n\n");
        assert_eq!(count_newlines("a\nb\nc", 0, 5), 2);
    }
}
