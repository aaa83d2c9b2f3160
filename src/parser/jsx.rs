//! JSX elements
//!
//! The lexer gets two extra modes: inside a tag it reads names, `=`, quoted
//! attribute strings and the closing `>`; between tags it reads raw text up
//! to the next `<` or `{`. The parser decides which mode follows each token.

use super::Parser;
use super::lexer::{LexMode, Lexer};
use super::token::{IdentifierRole, Token, TokenType};
use crate::error::{Result, TransformError};
use crate::util::unicode::{is_id_continue, is_id_start};

impl<'a> Lexer<'a> {
    /// Read a token inside `<...>`
    pub(crate) fn read_jsx_tag_token(&mut self) -> Result<Token> {
        let newline_before = self.skip_space()?;
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenType::Eof, start, start));
        };
        let ty = match c {
            b'>' => TokenType::JsxTagEnd,
            b'<' => TokenType::JsxTagStart,
            b'/' => TokenType::Slash,
            b'=' => TokenType::Eq,
            b':' => TokenType::Colon,
            b'.' => TokenType::Dot,
            b'{' => TokenType::BraceL,
            b'"' | b'\'' => {
                // Attribute strings have no escapes and may span lines
                self.pos += 1;
                match self.code[self.pos..].find(c as char) {
                    Some(offset) => self.pos += offset + 1,
                    None => return Err(self.error(start, "Unterminated string constant")),
                }
                let mut token = Token::new(TokenType::String, start, self.pos);
                token.newline_before = newline_before;
                return Ok(token);
            }
            _ => {
                if !self.peek_char().is_some_and(is_id_start) {
                    return Err(self.error(start, &format!(
                        "Unexpected character '{}' in JSX tag",
                        self.peek_char().unwrap_or('?')
                    )));
                }
                while let Some(ch) = self.peek_char() {
                    if ch == '-' || is_id_continue(ch) {
                        self.pos += ch.len_utf8();
                    } else {
                        break;
                    }
                }
                let mut token = Token::new(TokenType::JsxName, start, self.pos);
                token.newline_before = newline_before;
                return Ok(token);
            }
        };
        self.pos += 1;
        let mut token = Token::new(ty, start, self.pos);
        token.newline_before = newline_before;
        Ok(token)
    }

    /// Read a token between tags: `<`, `{` or a run of text
    pub(crate) fn read_jsx_child_token(&mut self) -> Result<Token> {
        let start = self.pos;
        match self.peek() {
            None => Ok(Token::new(TokenType::Eof, start, start)),
            Some(b'<') => {
                self.pos += 1;
                Ok(Token::new(TokenType::JsxTagStart, start, self.pos))
            }
            Some(b'{') => {
                self.pos += 1;
                Ok(Token::new(TokenType::BraceL, start, self.pos))
            }
            Some(_) => {
                let end = self.code[start..]
                    .find(['<', '{'])
                    .map_or(self.code.len(), |offset| start + offset);
                self.pos = end;
                Ok(Token::new(TokenType::JsxText, start, end))
            }
        }
    }
}

impl<'a> Parser<'a> {
    /// Parse an element or fragment starting at the current `<`
    ///
    /// `after` is the lexing mode for the token that follows the element.
    pub(crate) fn parse_jsx_element(&mut self, after: LexMode) -> Result<()> {
        self.state.cur.ty = TokenType::JsxTagStart;
        self.next_with(LexMode::JsxTag)?;

        if self.is(TokenType::JsxTagEnd) {
            self.next_with(LexMode::JsxChild)?;
            self.parse_jsx_children()?;
            if !self.is(TokenType::JsxTagEnd) {
                return Err(TransformError::syntax_at(
                    self.code(),
                    self.state.cur.start,
                    "Expected corresponding closing tag for JSX fragment",
                ));
            }
            return self.next_with(after);
        }

        let name = self.parse_jsx_element_name()?;
        while !self.is(TokenType::JsxTagEnd) && !self.is(TokenType::Slash) {
            self.parse_jsx_attribute()?;
        }
        if self.is(TokenType::Slash) {
            self.next_with(LexMode::JsxTag)?;
            return self.expect_with(TokenType::JsxTagEnd, after);
        }
        self.next_with(LexMode::JsxChild)?;
        self.parse_jsx_children()?;

        let closing_start = self.state.cur.start;
        let closing = if self.is(TokenType::JsxName) {
            self.parse_jsx_element_name()?
        } else {
            String::new()
        };
        if closing != name {
            return Err(TransformError::syntax_at(
                self.code(),
                closing_start,
                format!("Expected corresponding JSX closing tag for <{}>", name),
            ));
        }
        self.expect_with(TokenType::JsxTagEnd, after)
    }

    /// Children up to and including the `</` of the closing tag
    fn parse_jsx_children(&mut self) -> Result<()> {
        loop {
            match self.state.cur.ty {
                TokenType::JsxText => self.next_with(LexMode::JsxChild)?,
                TokenType::BraceL => {
                    self.next()?;
                    if !self.is(TokenType::BraceR) {
                        self.eat(TokenType::Ellipsis)?;
                        self.parse_expression()?;
                    }
                    self.expect_with(TokenType::BraceR, LexMode::JsxChild)?;
                }
                TokenType::JsxTagStart => {
                    if self.state.lexer.next_significant_is(b'/')? {
                        self.next_with(LexMode::JsxTag)?;
                        self.next_with(LexMode::JsxTag)?;
                        return Ok(());
                    }
                    self.parse_jsx_element(LexMode::JsxChild)?;
                }
                TokenType::Eof => {
                    return Err(TransformError::syntax_at(
                        self.code(),
                        self.state.cur.start,
                        "Unterminated JSX contents",
                    ));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// `a`, `a:b` or `a.b.c`; returns the name as written without spaces
    fn parse_jsx_element_name(&mut self) -> Result<String> {
        if !self.is(TokenType::JsxName) {
            return Err(self.unexpected());
        }
        let mut name = self.cur_text().to_string();
        self.next_with(LexMode::JsxTag)?;
        // Intrinsic tags like `div` are strings, not references
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) || self.is(TokenType::Dot) {
            if let Some(token) = self.state.tokens.last_mut() {
                token.identifier_role = Some(IdentifierRole::Access);
            }
        }
        if self.is(TokenType::Colon) {
            self.next_with(LexMode::JsxTag)?;
            if !self.is(TokenType::JsxName) {
                return Err(self.unexpected());
            }
            name.push(':');
            name.push_str(self.cur_text());
            self.next_with(LexMode::JsxTag)?;
            return Ok(name);
        }
        while self.is(TokenType::Dot) {
            self.next_with(LexMode::JsxTag)?;
            if !self.is(TokenType::JsxName) {
                return Err(self.unexpected());
            }
            name.push('.');
            name.push_str(self.cur_text());
            self.next_with(LexMode::JsxTag)?;
        }
        Ok(name)
    }

    fn parse_jsx_attribute(&mut self) -> Result<()> {
        if self.is(TokenType::BraceL) {
            self.next()?;
            self.expect(TokenType::Ellipsis)?;
            self.parse_maybe_assign(false)?;
            return self.expect_with(TokenType::BraceR, LexMode::JsxTag);
        }
        if !self.is(TokenType::JsxName) {
            return Err(self.unexpected());
        }
        self.next_with(LexMode::JsxTag)?;
        if self.is(TokenType::Colon) {
            self.next_with(LexMode::JsxTag)?;
            self.expect_with(TokenType::JsxName, LexMode::JsxTag)?;
        }
        if !self.is(TokenType::Eq) {
            return Ok(());
        }
        self.next_with(LexMode::JsxTag)?;
        match self.state.cur.ty {
            TokenType::String => self.next_with(LexMode::JsxTag),
            TokenType::BraceL => {
                self.next()?;
                self.parse_maybe_assign(false)?;
                self.expect_with(TokenType::BraceR, LexMode::JsxTag)
            }
            TokenType::JsxTagStart => self.parse_jsx_element(LexMode::JsxTag),
            _ => Err(TransformError::syntax_at(
                self.code(),
                self.state.cur.start,
                "JSX value should be either an expression or a quoted JSX text",
            )),
        }
    }
}
