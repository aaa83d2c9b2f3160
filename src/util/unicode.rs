//! Character classes used by the scanner
//!
//! ASCII is handled with explicit ranges; everything above 0x7F falls back to
//! the Unicode tables in `char`.

/// Check if a code point is a line terminator
#[inline]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Check if a code point is whitespace that separates tokens
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'
        | '\u{000B}' // Vertical Tab
        | '\u{000C}' // Form Feed
        | ' '
        | '\u{00A0}' // No-Break Space
        | '\u{FEFF}' // BOM
    ) || is_line_terminator(c)
        || is_unicode_space(c)
}

/// Check if a code point is a Unicode space character
#[inline]
pub fn is_unicode_space(c: char) -> bool {
    matches!(c, '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}')
}

/// Check if a code point can start an identifier
#[inline]
pub fn is_id_start(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_' | '$') || (!c.is_ascii() && c.is_alphabetic())
}

/// Check if a code point can continue an identifier
#[inline]
pub fn is_id_continue(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '$')
        || (!c.is_ascii() && (c.is_alphanumeric() || c == '\u{200C}' || c == '\u{200D}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_classes() {
        assert!(is_id_start('a'));
        assert!(is_id_start('$'));
        assert!(is_id_start('é'));
        assert!(!is_id_start('1'));
        assert!(is_id_continue('1'));
        assert!(!is_id_continue('-'));
    }

    #[test]
    fn test_whitespace() {
        assert!(is_whitespace('\u{00A0}'));
        assert!(is_whitespace('\u{2028}'));
        assert!(!is_whitespace('x'));
    }
}
