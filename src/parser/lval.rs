//! Binding patterns
//!
//! Identifiers, array and object destructuring, rest elements and defaults.
//! Each bound identifier is tagged with the declaration role the caller
//! passes in.

use super::Parser;
use super::token::{IdentifierRole, TokenType};
use crate::error::{Result, TransformError};

/// TypeScript parameter-property modifiers
const PARAM_MODIFIERS: &[&str] = &["public", "private", "protected", "readonly", "override"];

impl<'a> Parser<'a> {
    /// Identifier, `[...]` or `{...}`
    pub(crate) fn parse_binding_atom(&mut self, role: IdentifierRole) -> Result<()> {
        match self.state.cur.ty {
            TokenType::Name => self.eat_identifier(role),
            TokenType::BracketL => {
                self.next()?;
                self.parse_binding_list(TokenType::BracketR, role, true, false)?;
                self.expect(TokenType::BracketR)
            }
            TokenType::BraceL => self.parse_object_binding(role),
            _ => Err(TransformError::syntax_at(
                self.code(),
                self.state.cur.start,
                "Expected a binding identifier or pattern",
            )),
        }
    }

    /// Elements up to (not including) `close`
    ///
    /// `allow_empty` permits elided slots as in `[, b]`; `allow_modifiers`
    /// permits TypeScript parameter properties.
    pub(crate) fn parse_binding_list(
        &mut self,
        close: TokenType,
        role: IdentifierRole,
        allow_empty: bool,
        allow_modifiers: bool,
    ) -> Result<()> {
        while !self.is(close) {
            if allow_empty && self.is(TokenType::Comma) {
                self.next()?;
                continue;
            }
            let consumed_separator = if self.is(TokenType::Ellipsis) {
                self.next()?;
                self.parse_binding_atom(role)?;
                self.maybe_type_annotation()?;
                false
            } else {
                self.parse_binding_element(role, allow_modifiers)?
            };
            if !consumed_separator && !self.is(close) {
                self.expect(TokenType::Comma)?;
            }
        }
        Ok(())
    }

    /// `binding [?] [: Type] [= default]`
    ///
    /// Returns true when a TypeScript `this` parameter swallowed its
    /// trailing comma.
    pub(crate) fn parse_binding_element(
        &mut self,
        role: IdentifierRole,
        allow_modifiers: bool,
    ) -> Result<bool> {
        if self.typescript && self.is(TokenType::This) && self.peek_is(TokenType::Colon)? {
            return self.in_type(|p| {
                p.next()?;
                p.parse_type_annotation()?;
                p.eat(TokenType::Comma)
            });
        }

        if allow_modifiers && self.typescript {
            while self.state.cur.ty == TokenType::Name
                && PARAM_MODIFIERS.contains(&self.cur_text())
                && starts_binding(self.peek_token()?.ty)
            {
                self.in_type(|p| p.next())?;
            }
        }

        self.parse_binding_atom(role)?;
        if self.has_types() && self.is(TokenType::Question) {
            self.in_type(|p| p.next())?;
        }
        self.maybe_type_annotation()?;
        if self.eat(TokenType::Eq)? {
            self.parse_maybe_assign(false)?;
        }
        Ok(false)
    }

    /// `{ a, b: c, [k]: d = 1, ...rest }`
    fn parse_object_binding(&mut self, role: IdentifierRole) -> Result<()> {
        self.expect(TokenType::BraceL)?;
        while !self.is(TokenType::BraceR) {
            if self.is(TokenType::Ellipsis) {
                self.next()?;
                self.parse_binding_atom(role)?;
            } else {
                match self.state.cur.ty {
                    TokenType::BracketL => {
                        self.next()?;
                        self.parse_maybe_assign(false)?;
                        self.expect(TokenType::BracketR)?;
                        self.expect(TokenType::Colon)?;
                        self.parse_binding_element(role, false)?;
                    }
                    TokenType::String | TokenType::Num | TokenType::BigInt => {
                        self.next()?;
                        self.expect(TokenType::Colon)?;
                        self.parse_binding_element(role, false)?;
                    }
                    ty if ty.is_name_like() => {
                        if self.peek_is(TokenType::Colon)? {
                            self.next()?;
                            self.next()?;
                            self.parse_binding_element(role, false)?;
                        } else {
                            self.eat_identifier(role)?;
                            if self.eat(TokenType::Eq)? {
                                self.parse_maybe_assign(false)?;
                            }
                        }
                    }
                    _ => return Err(self.unexpected()),
                }
            }
            if !self.is(TokenType::BraceR) {
                self.expect(TokenType::Comma)?;
            }
        }
        self.next()
    }
}

fn starts_binding(ty: TokenType) -> bool {
    matches!(ty, TokenType::Name | TokenType::BracketL | TokenType::BraceL)
}
