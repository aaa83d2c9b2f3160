//! JavaScript scanner/parser
//!
//! Single-pass parser that annotates tokens instead of building a tree.
//! The grammar is split across capability modules that all work on one
//! [`State`]: statements, expressions, binding patterns, type annotations
//! and JSX.

pub mod lexer;
pub mod state;
pub mod token;

mod expression;
mod jsx;
mod lval;
mod statement;
mod types;

use tracing::debug;

use crate::error::{Result, TransformError};
use crate::options::{Options, Transform};
use lexer::{LexMode, Lexer};
use state::{Snapshot, State};

// Re-exports
pub use token::{IdentifierRole, Token, TokenType};

/// Scan `code` into its annotated token sequence.
pub fn parse(code: &str, options: &Options) -> Result<Vec<Token>> {
    let mut parser = Parser::new(code, options)?;
    parser.parse_top_level()?;
    debug!(tokens = parser.state.tokens.len(), "scanned source");
    Ok(parser.state.tokens)
}

/// Parser state plus the enabled syntax extensions
pub struct Parser<'a> {
    pub(crate) state: State<'a>,
    pub(crate) jsx: bool,
    pub(crate) typescript: bool,
    pub(crate) flow: bool,
}

impl<'a> Parser<'a> {
    pub fn new(code: &'a str, options: &Options) -> Result<Self> {
        Ok(Parser {
            state: State::new(code)?,
            jsx: options.has(Transform::Jsx),
            typescript: options.has(Transform::TypeScript),
            flow: options.has(Transform::Flow),
        })
    }

    fn parse_top_level(&mut self) -> Result<()> {
        while !self.is(TokenType::Eof) {
            self.parse_statement()?;
        }
        Ok(())
    }

    // ---------- token helpers ----------

    pub(crate) fn code(&self) -> &'a str {
        self.state.code()
    }

    pub(crate) fn has_types(&self) -> bool {
        self.typescript || self.flow
    }

    #[inline]
    pub(crate) fn is(&self, ty: TokenType) -> bool {
        self.state.cur.ty == ty
    }

    /// Current token is the plain name `word`
    pub(crate) fn is_name(&self, word: &str) -> bool {
        self.state.cur.ty == TokenType::Name && self.cur_text() == word
    }

    pub(crate) fn cur_text(&self) -> &'a str {
        self.state.cur.text(self.state.code())
    }

    pub(crate) fn next(&mut self) -> Result<()> {
        self.state.next_with(LexMode::Normal)
    }

    pub(crate) fn next_with(&mut self, mode: LexMode) -> Result<()> {
        self.state.next_with(mode)
    }

    pub(crate) fn eat(&mut self, ty: TokenType) -> Result<bool> {
        if self.is(ty) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, ty: TokenType) -> Result<()> {
        self.expect_with(ty, LexMode::Normal)
    }

    pub(crate) fn expect_with(&mut self, ty: TokenType, mode: LexMode) -> Result<()> {
        if self.is(ty) {
            self.next_with(mode)
        } else {
            Err(self.unexpected_expecting(ty))
        }
    }

    pub(crate) fn unexpected(&self) -> TransformError {
        let token = &self.state.cur;
        let message = if token.ty == TokenType::Eof {
            "Unexpected end of input".to_string()
        } else {
            format!("Unexpected token '{}'", token.text(self.code()))
        };
        TransformError::syntax_at(self.code(), token.start, message)
    }

    fn unexpected_expecting(&self, ty: TokenType) -> TransformError {
        let token = &self.state.cur;
        TransformError::syntax_at(
            self.code(),
            token.start,
            format!("Unexpected token, expected {:?}", ty),
        )
    }

    pub(crate) fn peek_token(&mut self) -> Result<Token> {
        self.state.peek_token()
    }

    pub(crate) fn peek_is(&mut self, ty: TokenType) -> Result<bool> {
        Ok(self.state.peek_token()?.ty == ty)
    }

    pub(crate) fn set_role(&mut self, role: IdentifierRole) {
        self.state.cur.identifier_role = Some(role);
    }

    /// Consume an identifier, tagging it with `role`
    pub(crate) fn eat_identifier(&mut self, role: IdentifierRole) -> Result<()> {
        if !self.is(TokenType::Name) {
            return Err(self.unexpected());
        }
        self.set_role(role);
        self.next()
    }

    /// Whether a statement may end here without a semicolon
    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(self.state.cur.ty, TokenType::Eof | TokenType::BraceR)
            || self.state.cur.newline_before
    }

    /// Consume a statement terminator, explicit or inserted
    pub(crate) fn semicolon(&mut self) -> Result<()> {
        if self.eat(TokenType::Semi)? || self.can_insert_semicolon() {
            return Ok(());
        }
        Err(self.unexpected())
    }

    // ---------- structural pairs ----------

    /// Consume an opening delimiter and give it a fresh context id
    pub(crate) fn open_context(&mut self, ty: TokenType) -> Result<u32> {
        if !self.is(ty) {
            return Err(self.unexpected_expecting(ty));
        }
        let id = self.state.push_context();
        self.state.cur.context_id = Some(id);
        self.next()?;
        Ok(id)
    }

    /// Consume the closer matching the innermost open context
    pub(crate) fn close_context(&mut self, ty: TokenType) -> Result<u32> {
        if !self.is(ty) {
            return Err(self.unexpected_expecting(ty));
        }
        let id = self
            .state
            .pop_context()
            .ok_or_else(|| TransformError::invariant("context stack underflow"))?;
        self.state.cur.context_id = Some(id);
        self.next()?;
        Ok(id)
    }

    // ---------- speculation ----------

    pub(crate) fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.state.restore(snapshot);
    }

    /// Run `f`; on failure undo everything it consumed and return `None`
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Option<T> {
        let snapshot = self.snapshot();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(snapshot);
                None
            }
        }
    }

    /// Run `f` with every consumed token marked as a type token
    pub(crate) fn in_type<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let old = self.state.is_type;
        self.state.is_type = true;
        let result = f(self);
        self.state.is_type = old;
        result
    }

    /// Mark every token from `start` on as part of a type region
    pub(crate) fn mark_types_from(&mut self, start: usize) {
        for token in &mut self.state.tokens[start..] {
            token.is_type = true;
        }
    }

    pub(crate) fn token_count(&self) -> usize {
        self.state.tokens.len()
    }

    /// Re-read a `/` or `/=` at an expression start as a regex literal
    pub(crate) fn rescan_regex(&mut self) -> Result<()> {
        self.state.rescan(|lexer: &mut Lexer<'a>, start| lexer.read_regex(start))
    }
}

#[cfg(test)]
mod tests;
