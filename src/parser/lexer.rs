//! JavaScript lexer/tokenizer
//!
//! Reads one token at a time on behalf of the parser. The parser picks the
//! lexing mode, since only it knows whether a `}` closes a template
//! interpolation or whether the next character starts JSX text.

use super::token::{Token, TokenType};
use crate::error::{Result, TransformError};
use crate::util::shebang_len;
use crate::util::unicode::{is_id_continue, is_id_start, is_line_terminator, is_whitespace};

/// Which grammar the next token is read in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// Regular JavaScript tokens
    Normal,
    /// Raw template text up to the next `` ` `` or `${`
    TemplateChunk,
    /// The `` ` `` or `${` that ends a template chunk
    TemplateEnd,
    /// Inside `<...>`: names, attributes, `/` and `>`
    JsxTag,
    /// Between tags: text, `<` and `{`
    JsxChild,
}

/// Lexer for JavaScript source code
pub struct Lexer<'a> {
    pub(crate) code: &'a str,
    pub(crate) source: &'a [u8],
    pub(crate) pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source, skipping a leading shebang
    pub fn new(code: &'a str) -> Self {
        Lexer {
            code,
            source: code.as_bytes(),
            pos: shebang_len(code),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Peek at the current byte without consuming it
    pub(crate) fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    /// Peek at the byte after the current one
    pub(crate) fn peek_next(&self) -> Option<u8> {
        self.source.get(self.pos + 1).copied()
    }

    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    /// Decode the character at the current position
    pub(crate) fn peek_char(&self) -> Option<char> {
        self.code.get(self.pos..)?.chars().next()
    }

    /// Consume the current character
    pub(crate) fn advance_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub(crate) fn error(&self, pos: usize, message: &str) -> TransformError {
        TransformError::syntax_at(self.code, pos, message)
    }

    /// Skip whitespace and comments, reporting whether a line break was crossed
    pub(crate) fn skip_space(&mut self) -> Result<bool> {
        let mut saw_newline = false;
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\x0b' | b'\x0c') => {
                    self.pos += 1;
                }
                Some(b'\n' | b'\r') => {
                    self.pos += 1;
                    saw_newline = true;
                }
                Some(b'/') if self.peek_next() == Some(b'/') => {
                    // Line comment
                    self.pos += 2;
                    while let Some(c) = self.peek_char() {
                        if is_line_terminator(c) {
                            break;
                        }
                        self.pos += c.len_utf8();
                    }
                }
                Some(b'/') if self.peek_next() == Some(b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.code[self.pos..].find("*/") {
                        Some(offset) => {
                            let body = &self.code[self.pos..self.pos + offset];
                            if body.contains(is_line_terminator) {
                                saw_newline = true;
                            }
                            self.pos += offset + 2;
                        }
                        None => return Err(self.error(start, "Unterminated comment")),
                    }
                }
                Some(c) if c >= 0x80 => match self.peek_char() {
                    Some(ch) if is_whitespace(ch) => {
                        if is_line_terminator(ch) {
                            saw_newline = true;
                        }
                        self.pos += ch.len_utf8();
                    }
                    _ => break,
                },
                _ => break,
            }
        }
        Ok(saw_newline)
    }

    /// Read the next token in the given mode
    pub fn read_token(&mut self, mode: LexMode, in_type: bool) -> Result<Token> {
        match mode {
            LexMode::Normal => self.next_token(in_type),
            LexMode::TemplateChunk => self.read_template_chunk(),
            LexMode::TemplateEnd => self.read_template_end(),
            LexMode::JsxTag => self.read_jsx_tag_token(),
            LexMode::JsxChild => self.read_jsx_child_token(),
        }
    }

    /// Read the next regular token
    ///
    /// Inside type annotations `>` is always a single token so that
    /// `Array<Array<T>>` closes both argument lists.
    pub fn next_token(&mut self, in_type: bool) -> Result<Token> {
        let newline_before = self.skip_space()?;
        let start = self.pos;
        let mut token = self.read_token_at(start, in_type)?;
        token.newline_before = newline_before;
        Ok(token)
    }

    fn read_token_at(&mut self, start: usize, in_type: bool) -> Result<Token> {
        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenType::Eof, start, start));
        };

        // Identifiers and keywords
        if c == b'\\' || c >= 0x80 || is_id_start(c as char) {
            return self.read_identifier(start);
        }

        // Numbers
        if c.is_ascii_digit() || (c == b'.' && self.peek_next().is_some_and(|n| n.is_ascii_digit()))
        {
            return self.read_number(start);
        }

        // Strings
        if c == b'"' || c == b'\'' {
            return self.read_string(start, c);
        }

        if c == b'#' {
            self.pos += 1;
            if self.peek_char().is_some_and(is_id_start) {
                self.read_word()?;
                return Ok(Token::new(TokenType::PrivateName, start, self.pos));
            }
            return Err(self.error(start, "Unexpected character '#'"));
        }

        let (ty, len) = self.read_punctuation(c, in_type)
            .ok_or_else(|| self.error(start, &format!("Unexpected character '{}'", c as char)))?;
        self.pos += len;
        Ok(Token::new(ty, start, self.pos))
    }

    /// Match operators and punctuation, returning the type and byte length
    fn read_punctuation(&self, c: u8, in_type: bool) -> Option<(TokenType, usize)> {
        let n1 = self.peek_at(1);
        let n2 = self.peek_at(2);
        let n3 = self.peek_at(3);
        let tok = match c {
            b'(' => (TokenType::ParenL, 1),
            b')' => (TokenType::ParenR, 1),
            b'[' => (TokenType::BracketL, 1),
            b']' => (TokenType::BracketR, 1),
            b'{' => (TokenType::BraceL, 1),
            b'}' => (TokenType::BraceR, 1),
            b',' => (TokenType::Comma, 1),
            b';' => (TokenType::Semi, 1),
            b':' => (TokenType::Colon, 1),
            b'~' => (TokenType::Tilde, 1),
            b'@' => (TokenType::At, 1),
            b'`' => (TokenType::BackQuote, 1),
            b'.' => match (n1, n2) {
                (Some(b'.'), Some(b'.')) => (TokenType::Ellipsis, 3),
                _ => (TokenType::Dot, 1),
            },
            b'?' => match (n1, n2) {
                (Some(b'.'), Some(d)) if !d.is_ascii_digit() => (TokenType::QuestionDot, 2),
                (Some(b'.'), None) => (TokenType::QuestionDot, 2),
                (Some(b'?'), Some(b'=')) => (TokenType::Assign, 3),
                (Some(b'?'), _) => (TokenType::NullishCoalescing, 2),
                _ => (TokenType::Question, 1),
            },
            b'=' => match (n1, n2) {
                (Some(b'>'), _) => (TokenType::Arrow, 2),
                (Some(b'='), Some(b'=')) => (TokenType::Equality, 3),
                (Some(b'='), _) => (TokenType::Equality, 2),
                _ => (TokenType::Eq, 1),
            },
            b'!' => match (n1, n2) {
                (Some(b'='), Some(b'=')) => (TokenType::Equality, 3),
                (Some(b'='), _) => (TokenType::Equality, 2),
                _ => (TokenType::Bang, 1),
            },
            b'+' | b'-' => match n1 {
                Some(x) if x == c => (TokenType::IncDec, 2),
                Some(b'=') => (TokenType::Assign, 2),
                _ => (TokenType::PlusMin, 1),
            },
            b'*' => match (n1, n2) {
                (Some(b'*'), Some(b'=')) => (TokenType::Assign, 3),
                (Some(b'*'), _) => (TokenType::Exponent, 2),
                (Some(b'='), _) => (TokenType::Assign, 2),
                _ => (TokenType::Star, 1),
            },
            b'/' => match n1 {
                Some(b'=') => (TokenType::Assign, 2),
                _ => (TokenType::Slash, 1),
            },
            b'%' => match n1 {
                Some(b'=') => (TokenType::Assign, 2),
                _ => (TokenType::Modulo, 1),
            },
            b'^' => match n1 {
                Some(b'=') => (TokenType::Assign, 2),
                _ => (TokenType::BitXor, 1),
            },
            b'&' => match (n1, n2) {
                (Some(b'&'), Some(b'=')) => (TokenType::Assign, 3),
                (Some(b'&'), _) => (TokenType::LogicalAnd, 2),
                (Some(b'='), _) => (TokenType::Assign, 2),
                _ => (TokenType::BitAnd, 1),
            },
            b'|' => match (n1, n2) {
                (Some(b'|'), Some(b'=')) => (TokenType::Assign, 3),
                (Some(b'|'), _) => (TokenType::LogicalOr, 2),
                (Some(b'='), _) => (TokenType::Assign, 2),
                _ => (TokenType::BitOr, 1),
            },
            b'<' => match (n1, n2) {
                (Some(b'<'), Some(b'=')) => (TokenType::Assign, 3),
                (Some(b'<'), _) => (TokenType::BitShift, 2),
                (Some(b'='), _) => (TokenType::Relational, 2),
                _ => (TokenType::LessThan, 1),
            },
            b'>' if in_type => (TokenType::GreaterThan, 1),
            b'>' => match (n1, n2, n3) {
                (Some(b'>'), Some(b'>'), Some(b'=')) => (TokenType::Assign, 4),
                (Some(b'>'), Some(b'>'), _) => (TokenType::BitShift, 3),
                (Some(b'>'), Some(b'='), _) => (TokenType::Assign, 3),
                (Some(b'>'), _, _) => (TokenType::BitShift, 2),
                (Some(b'='), _, _) => (TokenType::Relational, 2),
                _ => (TokenType::GreaterThan, 1),
            },
            _ => return None,
        };
        Some(tok)
    }

    /// Consume identifier characters, including `\u` escapes
    pub(crate) fn read_word(&mut self) -> Result<bool> {
        let mut escaped = false;
        let mut first = true;
        loop {
            match self.peek_char() {
                Some('\\') => {
                    let start = self.pos;
                    if self.peek_next() != Some(b'u') {
                        return Err(self.error(start, "Expected Unicode escape sequence \\uXXXX"));
                    }
                    self.pos += 2;
                    if self.peek() == Some(b'{') {
                        match self.code[self.pos..].find('}') {
                            Some(offset) => self.pos += offset + 1,
                            None => return Err(self.error(start, "Bad character escape sequence")),
                        }
                    } else {
                        for _ in 0..4 {
                            match self.peek() {
                                Some(h) if h.is_ascii_hexdigit() => self.pos += 1,
                                _ => return Err(self.error(start, "Bad character escape sequence")),
                            }
                        }
                    }
                    escaped = true;
                }
                Some(c) if (first && is_id_start(c)) || (!first && is_id_continue(c)) => {
                    self.pos += c.len_utf8();
                }
                _ => break,
            }
            first = false;
        }
        Ok(escaped)
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self, start: usize) -> Result<Token> {
        let escaped = self.read_word()?;
        if self.pos == start {
            return Err(self.error(start, "Unexpected character"));
        }
        let word = &self.code[start..self.pos];
        let ty = if escaped {
            TokenType::Name
        } else {
            TokenType::keyword(word).unwrap_or(TokenType::Name)
        };
        Ok(Token::new(ty, start, self.pos))
    }

    /// Read a number literal, keeping `_` separators in the token text
    fn read_number(&mut self, start: usize) -> Result<Token> {
        let is_digit: fn(u8) -> bool = match (self.peek(), self.peek_next()) {
            (Some(b'0'), Some(b'x' | b'X')) => {
                self.pos += 2;
                |b| b.is_ascii_hexdigit()
            }
            (Some(b'0'), Some(b'o' | b'O')) => {
                self.pos += 2;
                |b| (b'0'..=b'7').contains(&b)
            }
            (Some(b'0'), Some(b'b' | b'B')) => {
                self.pos += 2;
                |b| b == b'0' || b == b'1'
            }
            _ => {
                // Integer part
                self.skip_digits(|b| b.is_ascii_digit());

                // Decimal part
                if self.peek() == Some(b'.') {
                    self.pos += 1;
                    self.skip_digits(|b| b.is_ascii_digit());
                }

                // Exponent part
                if matches!(self.peek(), Some(b'e' | b'E')) {
                    self.pos += 1;
                    if matches!(self.peek(), Some(b'+' | b'-')) {
                        self.pos += 1;
                    }
                    self.skip_digits(|b| b.is_ascii_digit());
                }
                return self.finish_number(start);
            }
        };
        self.skip_digits(is_digit);
        self.finish_number(start)
    }

    fn skip_digits(&mut self, is_digit: fn(u8) -> bool) {
        while let Some(c) = self.peek() {
            if is_digit(c) || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn finish_number(&mut self, start: usize) -> Result<Token> {
        let mut ty = TokenType::Num;
        if self.peek() == Some(b'n') {
            self.pos += 1;
            ty = TokenType::BigInt;
        }
        if self.peek_char().is_some_and(is_id_start) {
            return Err(self.error(self.pos, "Identifier directly after number"));
        }
        Ok(Token::new(ty, start, self.pos))
    }

    /// Read a string literal; the token keeps its quotes and escapes verbatim
    fn read_string(&mut self, start: usize, quote: u8) -> Result<Token> {
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => {
                    return Err(self.error(start, "Unterminated string constant"));
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    // Line continuations are allowed after a backslash.
                    if self.peek() == Some(b'\r') && self.peek_next() == Some(b'\n') {
                        self.pos += 1;
                    }
                    if self.advance_char().is_none() {
                        return Err(self.error(start, "Unterminated string constant"));
                    }
                }
                Some(_) => {
                    self.advance_char();
                }
            }
        }
        Ok(Token::new(TokenType::String, start, self.pos))
    }

    /// Re-read a `/` or `/=` token as a regular expression literal
    pub fn read_regex(&mut self, start: usize) -> Result<Token> {
        self.pos = start + 1;
        let mut in_class = false;
        loop {
            let Some(c) = self.advance_char() else {
                return Err(self.error(start, "Unterminated regular expression"));
            };
            if is_line_terminator(c) {
                return Err(self.error(start, "Unterminated regular expression"));
            }
            match c {
                '\\' => {
                    if self.advance_char().is_none() {
                        return Err(self.error(start, "Unterminated regular expression"));
                    }
                }
                '[' => in_class = true,
                ']' if in_class => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        // Flags
        while self.peek_char().is_some_and(is_id_continue) {
            self.advance_char();
        }
        Ok(Token::new(TokenType::Regex, start, self.pos))
    }

    /// Read template text up to (not including) the closing `` ` `` or `${`
    fn read_template_chunk(&mut self) -> Result<Token> {
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error(start, "Unterminated template")),
                Some(b'`') => break,
                Some(b'$') if self.peek_next() == Some(b'{') => break,
                Some(b'\\') => {
                    self.pos += 1;
                    if self.advance_char().is_none() {
                        return Err(self.error(start, "Unterminated template"));
                    }
                }
                Some(_) => {
                    self.advance_char();
                }
            }
        }
        Ok(Token::new(TokenType::Template, start, self.pos))
    }

    fn read_template_end(&mut self) -> Result<Token> {
        let start = self.pos;
        match self.peek() {
            Some(b'`') => {
                self.pos += 1;
                Ok(Token::new(TokenType::BackQuote, start, self.pos))
            }
            Some(b'$') if self.peek_next() == Some(b'{') => {
                self.pos += 2;
                Ok(Token::new(TokenType::DollarBraceL, start, self.pos))
            }
            _ => Err(self.error(start, "Unterminated template")),
        }
    }

    /// Check whether the next significant character (after whitespace and
    /// comments) is `expected`, without moving.
    pub fn next_significant_is(&mut self, expected: u8) -> Result<bool> {
        let saved = self.pos;
        self.skip_space()?;
        let found = self.peek() == Some(expected);
        self.pos = saved;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(code: &str) -> Vec<TokenType> {
        let mut lexer = Lexer::new(code);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token(false).unwrap();
            if token.ty == TokenType::Eof {
                break;
            }
            out.push(token.ty);
        }
        out
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            types("42 3.14 1e10 0xff 1_000 10n .5"),
            vec![
                TokenType::Num,
                TokenType::Num,
                TokenType::Num,
                TokenType::Num,
                TokenType::Num,
                TokenType::BigInt,
                TokenType::Num
            ]
        );
    }

    #[test]
    fn test_strings_keep_raw_text() {
        let code = r#""he\"llo" 'world'"#;
        let mut lexer = Lexer::new(code);
        let token = lexer.next_token(false).unwrap();
        assert_eq!(token.ty, TokenType::String);
        assert_eq!(token.text(code), r#""he\"llo""#);
        assert_eq!(lexer.next_token(false).unwrap().text(code), "'world'");
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_eq!(
            types("foo var if let class"),
            vec![
                TokenType::Name,
                TokenType::Var,
                TokenType::If,
                TokenType::Name,
                TokenType::Class
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            types("+ ++ += === !== => ... ?. ?? >>>="),
            vec![
                TokenType::PlusMin,
                TokenType::IncDec,
                TokenType::Assign,
                TokenType::Equality,
                TokenType::Equality,
                TokenType::Arrow,
                TokenType::Ellipsis,
                TokenType::QuestionDot,
                TokenType::NullishCoalescing,
                TokenType::Assign
            ]
        );
    }

    #[test]
    fn test_greater_than_splits_in_types() {
        let mut lexer = Lexer::new(">>");
        let token = lexer.next_token(true).unwrap();
        assert_eq!((token.ty, token.end), (TokenType::GreaterThan, 1));
    }

    #[test]
    fn test_comments_and_newlines() {
        let mut lexer = Lexer::new("1 // comment\n2 /* block */ 3");
        assert!(!lexer.next_token(false).unwrap().newline_before);
        assert!(lexer.next_token(false).unwrap().newline_before);
        assert!(!lexer.next_token(false).unwrap().newline_before);
    }

    #[test]
    fn test_shebang_skipped() {
        assert_eq!(types("#!/usr/bin/env node\nfoo"), vec![TokenType::Name]);
    }

    #[test]
    fn test_regex_rescan() {
        let code = "/a[/]b/gi;";
        let mut lexer = Lexer::new(code);
        let slash = lexer.next_token(false).unwrap();
        assert_eq!(slash.ty, TokenType::Slash);
        let regex = lexer.read_regex(slash.start).unwrap();
        assert_eq!(regex.text(code), "/a[/]b/gi");
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("'abc");
        assert!(matches!(
            lexer.next_token(false),
            Err(TransformError::Syntax { pos: 0, .. })
        ));
    }
}
