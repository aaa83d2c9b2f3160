//! TypeScript and Flow type syntax
//!
//! Types are never interpreted, only skipped: every token consumed here is
//! stamped `is_type` so the erasing transformers can delete it wholesale.
//! The skipper understands just enough structure to find where a type ends.

use super::Parser;
use super::lexer::LexMode;
use super::token::TokenType;
use crate::error::Result;

impl<'a> Parser<'a> {
    /// `: T` after a binding, parameter list or class member
    pub(crate) fn parse_type_annotation(&mut self) -> Result<()> {
        self.in_type(|p| {
            p.expect(TokenType::Colon)?;
            p.parse_type_inner(true)
        })
    }

    pub(crate) fn maybe_type_annotation(&mut self) -> Result<bool> {
        if self.has_types() && self.is(TokenType::Colon) {
            self.parse_type_annotation()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Return type of a function: `: T`, Flow's `%checks` included
    pub(crate) fn maybe_return_type(&mut self) -> Result<()> {
        if !self.has_types() || !self.is(TokenType::Colon) {
            return Ok(());
        }
        self.in_type(|p| {
            p.next()?;
            if !(p.flow && p.is(TokenType::Modulo)) {
                p.parse_type_inner(true)?;
            }
            if p.flow && p.is(TokenType::Modulo) {
                p.next()?;
                if p.is_name("checks") {
                    p.next()?;
                }
            }
            Ok(())
        })
    }

    pub(crate) fn parse_type(&mut self) -> Result<()> {
        self.in_type(|p| p.parse_type_inner(true))
    }

    /// `<T, U extends V = W>` on a declaration
    pub(crate) fn maybe_type_parameters(&mut self) -> Result<()> {
        if self.has_types() && self.is(TokenType::LessThan) {
            self.in_type(|p| p.skip_angle_brackets())?;
        }
        Ok(())
    }

    /// Type arguments in expression position, `f<T>(x)`; only kept when a
    /// call or tagged template follows
    pub(crate) fn try_type_arguments_for_call(&mut self) -> bool {
        self.try_parse(|p| {
            p.in_type(|p| p.skip_angle_brackets())?;
            if p.is(TokenType::ParenL) || p.is(TokenType::BackQuote) {
                Ok(())
            } else {
                Err(p.unexpected())
            }
        })
        .is_some()
    }

    fn parse_type_inner(&mut self, allow_conditional: bool) -> Result<()> {
        loop {
            self.parse_type_operand()?;
            if self.is(TokenType::BitOr) || self.is(TokenType::BitAnd) {
                self.next()?;
                continue;
            }
            break;
        }
        if self.typescript
            && allow_conditional
            && self.is(TokenType::Extends)
            && !self.state.cur.newline_before
        {
            self.next()?;
            self.parse_type_inner(false)?;
            self.expect(TokenType::Question)?;
            self.parse_type_inner(true)?;
            self.expect(TokenType::Colon)?;
            self.parse_type_inner(true)?;
        }
        Ok(())
    }

    fn parse_type_operand(&mut self) -> Result<()> {
        while self.is(TokenType::BitOr) || self.is(TokenType::BitAnd) {
            self.next()?;
        }
        loop {
            if self.flow && self.is(TokenType::Question) {
                self.next()?;
            } else if self.is(TokenType::New) || self.is(TokenType::PlusMin) {
                self.next()?;
            } else if self.is_name("abstract") && self.peek_is(TokenType::New)? {
                self.next()?;
            } else if self.is_type_operator_prefix()? {
                self.next()?;
            } else {
                break;
            }
        }

        match self.state.cur.ty {
            TokenType::ParenL => {
                self.skip_balanced()?;
                if self.is(TokenType::Arrow) {
                    self.next()?;
                    return self.parse_type_inner(true);
                }
            }
            TokenType::LessThan => {
                self.skip_angle_brackets()?;
                if !self.is(TokenType::ParenL) {
                    return Err(self.unexpected());
                }
                self.skip_balanced()?;
                self.expect(TokenType::Arrow)?;
                return self.parse_type_inner(true);
            }
            TokenType::BraceL | TokenType::BracketL => self.skip_balanced()?,
            TokenType::BackQuote => self.skip_template_type()?,
            TokenType::Star => self.next()?,
            TokenType::Import => {
                self.next()?;
                if self.is(TokenType::ParenL) {
                    self.skip_balanced()?;
                }
                self.skip_qualified_name_tail()?;
            }
            TokenType::TypeOf => {
                self.next()?;
                if self.is(TokenType::Import) {
                    return self.parse_type_operand();
                }
                if !self.state.cur.ty.is_name_like() {
                    return Err(self.unexpected());
                }
                self.next()?;
                self.skip_qualified_name_tail()?;
            }
            TokenType::String | TokenType::Num | TokenType::BigInt => self.next()?,
            ty if ty.is_name_like() => {
                self.next()?;
                self.skip_qualified_name_tail()?;
            }
            _ => return Err(self.unexpected()),
        }

        // Array and indexed-access suffixes
        while self.is(TokenType::BracketL) && !self.state.cur.newline_before {
            self.skip_balanced()?;
        }

        // `x is T` predicates
        if self.is_name("is") && !self.state.cur.newline_before {
            self.next()?;
            self.parse_type_inner(true)?;
        }
        Ok(())
    }

    /// `keyof`, `unique`, `readonly`, `infer` and `asserts` used as prefixes
    fn is_type_operator_prefix(&mut self) -> Result<bool> {
        let word = match self.state.cur.ty {
            TokenType::Name => self.cur_text(),
            _ => return Ok(false),
        };
        if !matches!(word, "keyof" | "unique" | "readonly" | "infer" | "asserts") {
            return Ok(false);
        }
        let next = self.peek_token()?;
        Ok(!next.newline_before
            && (next.ty.is_name_like()
                || matches!(
                    next.ty,
                    TokenType::BraceL
                        | TokenType::BracketL
                        | TokenType::ParenL
                        | TokenType::String
                        | TokenType::Num
                )))
    }

    /// `.b.c<T>` after the first segment of a type reference
    fn skip_qualified_name_tail(&mut self) -> Result<()> {
        while self.is(TokenType::Dot) {
            self.next()?;
            if !self.state.cur.ty.is_name_like() {
                return Err(self.unexpected());
            }
            self.next()?;
        }
        if self.is(TokenType::LessThan) && !self.state.cur.newline_before {
            self.skip_angle_brackets()?;
        }
        Ok(())
    }

    /// Skip `<...>` including nested brackets
    pub(crate) fn skip_angle_brackets(&mut self) -> Result<()> {
        self.expect(TokenType::LessThan)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.state.cur.ty {
                TokenType::LessThan => {
                    depth += 1;
                    self.next()?;
                }
                TokenType::GreaterThan => {
                    depth -= 1;
                    self.next()?;
                }
                TokenType::ParenL | TokenType::BracketL | TokenType::BraceL => {
                    self.skip_balanced()?;
                }
                TokenType::BackQuote => self.skip_template_type()?,
                TokenType::Eof
                | TokenType::Semi
                | TokenType::ParenR
                | TokenType::BracketR
                | TokenType::BraceR => return Err(self.unexpected()),
                _ => self.next()?,
            }
        }
        Ok(())
    }

    /// Skip a bracketed group starting at `(`, `[` or `{`
    pub(crate) fn skip_balanced(&mut self) -> Result<()> {
        let mut stack = Vec::new();
        loop {
            match self.state.cur.ty {
                TokenType::ParenL => stack.push(TokenType::ParenR),
                TokenType::BracketL => stack.push(TokenType::BracketR),
                TokenType::BraceL => stack.push(TokenType::BraceR),
                TokenType::ParenR | TokenType::BracketR | TokenType::BraceR => {
                    if stack.pop() != Some(self.state.cur.ty) {
                        return Err(self.unexpected());
                    }
                }
                TokenType::BackQuote => {
                    self.skip_template_type()?;
                    continue;
                }
                TokenType::Eof => return Err(self.unexpected()),
                _ => {
                    if stack.is_empty() {
                        return Err(self.unexpected());
                    }
                }
            }
            self.next()?;
            if stack.is_empty() {
                return Ok(());
            }
        }
    }

    /// Template literal types, `` `prefix-${T}` ``
    fn skip_template_type(&mut self) -> Result<()> {
        self.expect_with(TokenType::BackQuote, LexMode::TemplateChunk)?;
        loop {
            self.expect_with(TokenType::Template, LexMode::TemplateEnd)?;
            if self.is(TokenType::BackQuote) {
                return self.next();
            }
            self.expect(TokenType::DollarBraceL)?;
            self.parse_type_inner(true)?;
            self.expect_with(TokenType::BraceR, LexMode::TemplateChunk)?;
        }
    }

    // ---------- type-only statements ----------

    /// `type A<T> = ...;` (and Flow's `opaque type A: S = T;`)
    pub(crate) fn parse_type_alias(&mut self) -> Result<()> {
        self.in_type(|p| {
            if p.is_name("opaque") {
                p.next()?;
            }
            p.next()?; // type
            p.eat_identifier(super::IdentifierRole::BlockScopedDeclaration)?;
            if p.is(TokenType::LessThan) {
                p.skip_angle_brackets()?;
            }
            if p.is(TokenType::Colon) {
                p.next()?;
                p.parse_type_inner(true)?;
            }
            if p.eat(TokenType::Eq)? {
                p.parse_type_inner(true)?;
            }
            p.semicolon()
        })
    }

    /// `interface A<T> extends B, C { ... }`
    pub(crate) fn parse_interface(&mut self) -> Result<()> {
        self.in_type(|p| {
            p.next()?; // interface
            p.eat_identifier(super::IdentifierRole::BlockScopedDeclaration)?;
            if p.is(TokenType::LessThan) {
                p.skip_angle_brackets()?;
            }
            if p.eat(TokenType::Extends)? {
                loop {
                    p.parse_type_inner(false)?;
                    if !p.eat(TokenType::Comma)? {
                        break;
                    }
                }
            }
            p.skip_balanced()
        })
    }

    /// Is the current `type` name the start of a type alias?
    pub(crate) fn at_type_alias(&mut self) -> Result<bool> {
        if !self.has_types() {
            return Ok(false);
        }
        if self.is_name("type") {
            let next = self.peek_token()?;
            return Ok(next.ty == TokenType::Name && !next.newline_before);
        }
        if self.flow && self.is_name("opaque") {
            let next = self.peek_token()?;
            return Ok(next.ty == TokenType::Name && next.text(self.code()) == "type");
        }
        Ok(false)
    }

    pub(crate) fn at_interface(&mut self) -> Result<bool> {
        if !self.has_types() || !self.is_name("interface") {
            return Ok(false);
        }
        let next = self.peek_token()?;
        Ok(next.ty == TokenType::Name && !next.newline_before)
    }
}
