//! Token cursor and output buffer
//!
//! Every transformer reads the annotated tokens and writes output through
//! this type. Consuming operations emit the whitespace and comments that
//! preceded the token (or just their newlines) followed by the token's
//! replacement, then advance by exactly one token. Source text that no
//! operation touches is reproduced byte for byte.

use std::borrow::Cow;

use crate::error::{Result, TransformError};
use crate::parser::{Token, TokenType};
use crate::util::{count_newlines, newlines_only, shebang_len};

pub struct TokenProcessor<'a> {
    code: &'a str,
    tokens: Vec<Token>,
    index: usize,
    result: String,
    /// Byte offset and 1-based line of the last line lookup
    line_cursor: (usize, usize),
}

/// Cursor, output and line position, for processing a range ahead of time
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    index: usize,
    result_len: usize,
    line_cursor: (usize, usize),
}

impl<'a> TokenProcessor<'a> {
    pub fn new(code: &'a str, tokens: Vec<Token>) -> Self {
        TokenProcessor {
            code,
            tokens,
            index: 0,
            result: String::with_capacity(code.len()),
            line_cursor: (0, 1),
        }
    }

    pub fn code(&self) -> &'a str {
        self.code
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    // ---------- cursor ----------

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// The token under the cursor; an end-of-input token past the last one
    pub fn current_token(&self) -> &Token {
        self.token_at(self.index)
    }

    pub fn token_at(&self, index: usize) -> &Token {
        static EOF: Token = Token {
            ty: TokenType::Eof,
            start: usize::MAX,
            end: usize::MAX,
            is_type: false,
            identifier_role: None,
            context_id: None,
            scope_depth: 0,
            is_expression: false,
            rhs_end_index: None,
            newline_before: false,
        };
        self.tokens.get(index).unwrap_or(&EOF)
    }

    pub fn token_at_relative_index(&self, offset: isize) -> &Token {
        match self.index.checked_add_signed(offset) {
            Some(index) => self.token_at(index),
            None => self.token_at(usize::MAX),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            index: self.index,
            result_len: self.result.len(),
            line_cursor: self.line_cursor,
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.index = snapshot.index;
        self.result.truncate(snapshot.result_len);
        self.line_cursor = snapshot.line_cursor;
    }

    /// 1-based line of byte offset `pos`, counted from the previous lookup.
    /// Lookups run in source order, so only the text in between is read.
    pub fn line_number_for_index(&mut self, pos: usize) -> usize {
        let pos = pos.min(self.code.len());
        let (last, line) = self.line_cursor;
        let line = if pos >= last {
            line + count_newlines(self.code, last, pos)
        } else {
            line - count_newlines(self.code, pos, last)
        };
        self.line_cursor = (pos, line);
        line
    }

    pub fn result_len(&self) -> usize {
        self.result.len()
    }

    /// Output produced since `len`
    pub fn code_since(&self, len: usize) -> &str {
        &self.result[len..]
    }

    // ---------- matching ----------

    pub fn matches1(&self, ty: TokenType) -> bool {
        self.current_token().ty == ty
    }

    /// Do the tokens starting at the cursor have exactly these types?
    pub fn matches(&self, types: &[TokenType]) -> bool {
        self.matches_at(self.index, types)
    }

    pub fn matches_at(&self, index: usize, types: &[TokenType]) -> bool {
        types
            .iter()
            .enumerate()
            .all(|(offset, &ty)| self.token_at(index + offset).ty == ty)
    }

    /// Current token is the plain name `word`
    pub fn matches_name(&self, word: &str) -> bool {
        self.matches_name_at(self.index, word)
    }

    pub fn matches_name_at(&self, index: usize, word: &str) -> bool {
        let token = self.token_at(index);
        token.ty == TokenType::Name && self.raw_code(token) == word
    }

    pub fn matches_context_id_and_type(&self, ty: TokenType, context_id: u32) -> bool {
        let token = self.current_token();
        token.ty == ty && token.context_id == Some(context_id)
    }

    /// Index of the next token after `index` carrying the same context id
    pub fn find_matching_context(&self, index: usize) -> Option<usize> {
        let id = self.tokens.get(index)?.context_id?;
        self.tokens[index + 1..]
            .iter()
            .position(|t| t.context_id == Some(id))
            .map(|offset| index + 1 + offset)
    }

    // ---------- text ----------

    pub fn raw_code(&self, token: &Token) -> &'a str {
        if token.ty == TokenType::Eof {
            return "";
        }
        token.text(self.code)
    }

    pub fn current_token_code(&self) -> &'a str {
        self.raw_code(self.current_token())
    }

    /// Identifier text with `\u` escapes decoded
    pub fn identifier_name(&self) -> Cow<'a, str> {
        self.identifier_name_at(self.index)
    }

    pub fn identifier_name_at(&self, index: usize) -> Cow<'a, str> {
        decode_identifier(self.raw_code(self.token_at(index)))
    }

    /// Whitespace and comments between the previous token and the current one
    pub fn previous_whitespace(&self) -> &'a str {
        let start = match self.index.checked_sub(1) {
            Some(prev) => self.tokens[prev].end,
            None => shebang_len(self.code),
        };
        let end = self.tokens.get(self.index).map_or(self.code.len(), |t| t.start);
        &self.code[start..end]
    }

    // ---------- editing ----------

    fn advance(&mut self) -> Result<()> {
        if self.is_at_end() {
            return Err(TransformError::invariant("Unexpectedly reached end of input."));
        }
        self.index += 1;
        Ok(())
    }

    /// Move past the current token without emitting anything. Only used
    /// while looking ahead under a snapshot.
    pub fn next_token(&mut self) -> Result<()> {
        self.advance()
    }

    pub fn copy_token(&mut self) -> Result<()> {
        let whitespace = self.previous_whitespace();
        let text = self.current_token_code();
        self.result.push_str(whitespace);
        self.result.push_str(text);
        self.advance()
    }

    pub fn copy_expected_token(&mut self, ty: TokenType) -> Result<()> {
        if !self.matches1(ty) {
            return Err(TransformError::invariant(format!(
                "Expected token {:?}, found {:?}",
                ty,
                self.current_token().ty
            )));
        }
        self.copy_token()
    }

    pub fn replace_token(&mut self, text: &str) -> Result<()> {
        let whitespace = self.previous_whitespace();
        self.result.push_str(whitespace);
        self.result.push_str(text);
        self.advance()
    }

    /// Replace the token, keeping only the line breaks before it
    pub fn replace_token_trimming_left_whitespace(&mut self, text: &str) -> Result<()> {
        let newlines = newlines_only(self.previous_whitespace());
        self.result.push_str(&newlines);
        self.result.push_str(text);
        self.advance()
    }

    /// Drop a token inside a removed run
    pub fn remove_token(&mut self) -> Result<()> {
        self.replace_token_trimming_left_whitespace("")
    }

    /// Drop the first token of a removed run; its leading whitespace stays
    pub fn remove_initial_token(&mut self) -> Result<()> {
        self.replace_token("")
    }

    pub fn append_code(&mut self, text: &str) {
        self.result.push_str(text);
    }

    /// Output so far plus whatever follows the last token
    pub fn finish(mut self) -> Result<String> {
        if !self.is_at_end() {
            return Err(TransformError::invariant(
                "Tried to finish processing tokens before reaching the end.",
            ));
        }
        let tail = self.previous_whitespace();
        self.result.push_str(tail);
        Ok(self.result)
    }
}

/// Decode `\uXXXX` and `\u{...}` escapes in an identifier
fn decode_identifier(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find("\\u") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 2..];
        let (hex, consumed) = match rest.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => break,
            },
            None => (rest.get(..4).unwrap_or(rest), 4.min(rest.len())),
        };
        match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            Some(c) => out.push(c),
            None => out.push_str(&rest[..consumed]),
        }
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::parser::parse;

    fn processor(code: &str) -> TokenProcessor<'_> {
        let tokens = parse(code, &Options::default()).unwrap();
        TokenProcessor::new(code, tokens)
    }

    #[test]
    fn test_copy_reproduces_source() {
        let code = "a /* c */ + b; // end\n";
        let mut tokens = processor(code);
        while !tokens.is_at_end() {
            tokens.copy_token().unwrap();
        }
        assert_eq!(tokens.finish().unwrap(), code);
    }

    #[test]
    fn test_replace_and_remove() {
        let code = "a +\n  b;";
        let mut tokens = processor(code);
        tokens.replace_token("x").unwrap();
        tokens.remove_token().unwrap();
        tokens.remove_token().unwrap();
        tokens.copy_token().unwrap();
        assert_eq!(tokens.finish().unwrap(), "x\n;");
    }

    #[test]
    fn test_remove_initial_keeps_whitespace() {
        let code = "x =  y";
        let mut tokens = processor(code);
        tokens.copy_token().unwrap();
        tokens.remove_initial_token().unwrap();
        tokens.append_code("!");
        tokens.copy_token().unwrap();
        assert_eq!(tokens.finish().unwrap(), "x !  y");
    }

    #[test]
    fn test_matching() {
        let code = "foo(bar)";
        let tokens = processor(code);
        assert!(tokens.matches(&[TokenType::Name, TokenType::ParenL]));
        assert!(!tokens.matches(&[TokenType::ParenL]));
        assert!(tokens.matches_name("foo"));
        assert!(tokens.matches_at(3, &[TokenType::ParenR, TokenType::Eof]));
    }

    #[test]
    fn test_snapshot_discards_output() {
        let code = "a + b";
        let mut tokens = processor(code);
        let snapshot = tokens.snapshot();
        tokens.copy_token().unwrap();
        tokens.copy_token().unwrap();
        assert_eq!(tokens.code_since(snapshot.result_len), "a +");
        tokens.restore(snapshot);
        assert_eq!(tokens.current_index(), 0);
        assert_eq!(tokens.result_len(), 0);
    }

    #[test]
    fn test_line_numbers_follow_snapshots() {
        let code = "a;\nb;\nc;\nd;";
        let mut tokens = processor(code);
        assert_eq!(tokens.line_number_for_index(0), 1);
        let snapshot = tokens.snapshot();
        assert_eq!(tokens.line_number_for_index(9), 4);
        tokens.restore(snapshot);
        assert_eq!(tokens.line_number_for_index(3), 2);
        assert_eq!(tokens.line_number_for_index(6), 3);
    }

    #[test]
    fn test_find_matching_context() {
        let code = "f(a, (b));";
        let tokens = processor(code);
        // `f` has no context; the call parens are not stamped either
        assert_eq!(tokens.find_matching_context(0), None);

        let code = "function g(a) { return a; }";
        let tokens = processor(code);
        let open = tokens.tokens().iter().position(|t| t.ty == TokenType::ParenL).unwrap();
        let close = tokens.find_matching_context(open).unwrap();
        assert_eq!(tokens.token_at(close).ty, TokenType::ParenR);
        let body = tokens.find_matching_context(close + 1).unwrap();
        assert_eq!(tokens.token_at(body).ty, TokenType::BraceR);
    }

    #[test]
    fn test_copy_expected_token_mismatch() {
        let mut tokens = processor("a");
        assert!(matches!(
            tokens.copy_expected_token(TokenType::Class),
            Err(TransformError::Invariant(_))
        ));
    }

    #[test]
    fn test_decode_identifier() {
        assert_eq!(decode_identifier("plain"), "plain");
        assert_eq!(decode_identifier("\\u0061b"), "ab");
        assert_eq!(decode_identifier("x\\u{62}"), "xb");
    }
}
