//! Expressions
//!
//! Operator precedence is irrelevant to every transform, so binary
//! operators are consumed as a flat chain. What matters is recognising
//! where each expression ends, telling arrows from parenthesized
//! expressions and regexes from division, and tagging identifiers.

use super::Parser;
use super::lexer::LexMode;
use super::token::{IdentifierRole, Token, TokenType};
use crate::error::{Result, TransformError};

/// Can `token` begin an operand of `yield` or `await`?
fn starts_operand(token: &Token) -> bool {
    !token.newline_before
        && matches!(
            token.ty,
            TokenType::Name
                | TokenType::PrivateName
                | TokenType::Num
                | TokenType::BigInt
                | TokenType::String
                | TokenType::Regex
                | TokenType::BackQuote
                | TokenType::ParenL
                | TokenType::BracketL
                | TokenType::BraceL
                | TokenType::PlusMin
                | TokenType::Bang
                | TokenType::Tilde
                | TokenType::IncDec
                | TokenType::LessThan
                | TokenType::Slash
                | TokenType::This
                | TokenType::Super
                | TokenType::Function
                | TokenType::Class
                | TokenType::New
                | TokenType::Null
                | TokenType::True
                | TokenType::False
                | TokenType::TypeOf
                | TokenType::Void
                | TokenType::Delete
                | TokenType::Import
        )
}

impl<'a> Parser<'a> {
    /// Comma-separated expression
    pub(crate) fn parse_expression(&mut self) -> Result<()> {
        self.parse_expression_with(false)
    }

    /// `no_in` forbids a bare `in` operator, as in a `for (...;` head
    pub(crate) fn parse_expression_with(&mut self, no_in: bool) -> Result<()> {
        self.parse_maybe_assign(no_in)?;
        while self.eat(TokenType::Comma)? {
            self.parse_maybe_assign(no_in)?;
        }
        Ok(())
    }

    pub(crate) fn parse_maybe_assign(&mut self, no_in: bool) -> Result<()> {
        if self.is_name("yield") {
            self.next()?;
            if self.is(TokenType::Star) {
                self.next()?;
            }
            if starts_operand(&self.state.cur) {
                self.parse_maybe_assign(no_in)?;
            }
            return Ok(());
        }

        self.parse_maybe_conditional(no_in)?;
        if self.is(TokenType::Eq) || self.is(TokenType::Assign) {
            self.next()?;
            self.parse_maybe_assign(no_in)?;
        }
        Ok(())
    }

    fn parse_maybe_conditional(&mut self, no_in: bool) -> Result<()> {
        self.parse_expr_ops(no_in)?;
        if self.is(TokenType::Question) {
            self.next()?;
            self.parse_maybe_assign(false)?;
            self.expect(TokenType::Colon)?;
            self.parse_maybe_assign(no_in)?;
        }
        Ok(())
    }

    fn parse_expr_ops(&mut self, no_in: bool) -> Result<()> {
        self.parse_maybe_unary()?;
        loop {
            let ty = self.state.cur.ty;
            if ty == TokenType::In && no_in {
                break;
            }
            if ty.is_binary_operator() {
                self.next()?;
                self.parse_maybe_unary()?;
                continue;
            }
            if self.typescript
                && !self.state.cur.newline_before
                && (self.is_name("as") || self.is_name("satisfies"))
            {
                self.in_type(|p| {
                    p.next()?;
                    if p.is(TokenType::Const) {
                        p.next()
                    } else {
                        p.parse_type()
                    }
                })?;
                continue;
            }
            break;
        }
        Ok(())
    }

    pub(crate) fn parse_maybe_unary(&mut self) -> Result<()> {
        match self.state.cur.ty {
            TokenType::PlusMin
            | TokenType::Bang
            | TokenType::Tilde
            | TokenType::IncDec
            | TokenType::TypeOf
            | TokenType::Void
            | TokenType::Delete => {
                self.next()?;
                return self.parse_maybe_unary();
            }
            TokenType::Name if self.is_name("await") => {
                let next = self.peek_token()?;
                if starts_operand(&next) {
                    self.next()?;
                    return self.parse_maybe_unary();
                }
            }
            TokenType::LessThan if self.typescript && !self.jsx => {
                // `<T>x` assertion, unless this is a generic arrow
                if self.try_parse(|p| p.parse_generic_arrow()).is_some() {
                    return Ok(());
                }
                self.in_type(|p| p.skip_angle_brackets())?;
                return self.parse_maybe_unary();
            }
            _ => {}
        }

        self.parse_expr_subscripts()?;
        while self.is(TokenType::IncDec) && !self.state.cur.newline_before {
            self.next()?;
        }
        Ok(())
    }

    fn parse_expr_subscripts(&mut self) -> Result<()> {
        if self.parse_expr_atom()? {
            // Arrow functions take no subscripts
            return Ok(());
        }
        self.parse_subscripts(false)
    }

    /// Member accesses, calls and tagged templates after an atom
    fn parse_subscripts(&mut self, no_call: bool) -> Result<()> {
        loop {
            match self.state.cur.ty {
                TokenType::Dot => {
                    self.next()?;
                    self.parse_member_name()?;
                }
                TokenType::QuestionDot => {
                    self.next()?;
                    if self.is(TokenType::ParenL) {
                        self.parse_call_args()?;
                    } else if self.is(TokenType::BracketL) {
                        self.next()?;
                        self.parse_expression()?;
                        self.expect(TokenType::BracketR)?;
                    } else if self.is(TokenType::LessThan) && self.has_types() {
                        self.in_type(|p| p.skip_angle_brackets())?;
                        self.parse_call_args()?;
                    } else {
                        self.parse_member_name()?;
                    }
                }
                TokenType::BracketL => {
                    self.next()?;
                    self.parse_expression()?;
                    self.expect(TokenType::BracketR)?;
                }
                TokenType::ParenL if !no_call => self.parse_call_args()?,
                TokenType::BackQuote => self.parse_template()?,
                TokenType::Bang if self.typescript && !self.state.cur.newline_before => {
                    self.in_type(|p| p.next())?;
                }
                TokenType::LessThan if self.has_types() && !self.state.cur.newline_before => {
                    if !self.try_type_arguments_for_call() {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn parse_member_name(&mut self) -> Result<()> {
        if self.state.cur.ty.is_name_like() || self.is(TokenType::PrivateName) {
            self.next()
        } else {
            Err(self.unexpected())
        }
    }

    pub(crate) fn parse_call_args(&mut self) -> Result<()> {
        self.expect(TokenType::ParenL)?;
        while !self.is(TokenType::ParenR) {
            self.eat(TokenType::Ellipsis)?;
            self.parse_maybe_assign(false)?;
            if !self.is(TokenType::ParenR) {
                self.expect(TokenType::Comma)?;
            }
        }
        self.next()
    }

    /// Parse a primary expression; returns true when it was an arrow function
    fn parse_expr_atom(&mut self) -> Result<bool> {
        match self.state.cur.ty {
            TokenType::Name => self.parse_name_atom(),
            TokenType::Num
            | TokenType::BigInt
            | TokenType::String
            | TokenType::Regex
            | TokenType::Null
            | TokenType::True
            | TokenType::False
            | TokenType::This
            | TokenType::Super
            | TokenType::PrivateName => {
                self.next()?;
                Ok(false)
            }
            TokenType::Slash | TokenType::Assign if self.cur_text().starts_with('/') => {
                self.rescan_regex()?;
                self.next()?;
                Ok(false)
            }
            TokenType::BackQuote => {
                self.parse_template()?;
                Ok(false)
            }
            TokenType::ParenL => self.parse_paren_and_distinguish(),
            TokenType::BracketL => {
                self.next()?;
                while !self.is(TokenType::BracketR) {
                    if self.eat(TokenType::Comma)? {
                        continue;
                    }
                    self.eat(TokenType::Ellipsis)?;
                    self.parse_maybe_assign(false)?;
                    if !self.is(TokenType::BracketR) {
                        self.expect(TokenType::Comma)?;
                    }
                }
                self.next()?;
                Ok(false)
            }
            TokenType::BraceL => {
                self.parse_object_literal()?;
                Ok(false)
            }
            TokenType::Function => {
                self.parse_function(false, false)?;
                Ok(false)
            }
            TokenType::Class => {
                self.parse_class(false)?;
                Ok(false)
            }
            TokenType::New => {
                self.parse_new()?;
                Ok(false)
            }
            TokenType::Import => {
                self.next()?;
                if self.eat(TokenType::Dot)? {
                    self.parse_member_name()?;
                } else if self.is(TokenType::ParenL) {
                    self.parse_call_args()?;
                } else {
                    return Err(self.unexpected());
                }
                Ok(false)
            }
            TokenType::LessThan => self.parse_angle_atom(),
            TokenType::At => Err(TransformError::syntax_at(
                self.code(),
                self.state.cur.start,
                "Decorators are not supported",
            )),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_name_atom(&mut self) -> Result<bool> {
        if self.is_name("async") {
            let next = self.peek_token()?;
            if !next.newline_before {
                match next.ty {
                    TokenType::Function => {
                        self.next()?;
                        self.parse_function(false, true)?;
                        return Ok(false);
                    }
                    TokenType::Name => {
                        self.next()?;
                        self.parse_single_param_arrow()?;
                        return Ok(true);
                    }
                    TokenType::ParenL | TokenType::LessThan => {
                        let is_arrow = self
                            .try_parse(|p| {
                                p.next()?;
                                if p.is(TokenType::LessThan) {
                                    p.in_type(|p| p.skip_angle_brackets())?;
                                }
                                p.parse_arrow_params()
                            })
                            .is_some();
                        if is_arrow {
                            self.parse_arrow_body()?;
                            return Ok(true);
                        }
                    }
                    _ => {}
                }
            }
        }

        let next = self.peek_token()?;
        if next.ty == TokenType::Arrow && !next.newline_before {
            self.parse_single_param_arrow()?;
            return Ok(true);
        }
        self.eat_identifier(IdentifierRole::Access)?;
        Ok(false)
    }

    /// `x => body`
    fn parse_single_param_arrow(&mut self) -> Result<()> {
        self.state.scope_depth += 1;
        self.eat_identifier(IdentifierRole::FunctionScopedDeclaration)?;
        if !self.is(TokenType::Arrow) || self.state.cur.newline_before {
            return Err(self.unexpected());
        }
        self.parse_arrow_body()
    }

    /// Parameters, return type and the `=>`; leaves the scope depth raised
    fn parse_arrow_params(&mut self) -> Result<()> {
        self.state.scope_depth += 1;
        self.open_context(TokenType::ParenL)?;
        self.parse_binding_list(
            TokenType::ParenR,
            IdentifierRole::FunctionScopedDeclaration,
            false,
            false,
        )?;
        self.close_context(TokenType::ParenR)?;
        self.maybe_return_type()?;
        if self.is(TokenType::Arrow) && !self.state.cur.newline_before {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// `=> expr` or `=> { ... }`; lowers the scope depth raised by the params
    fn parse_arrow_body(&mut self) -> Result<()> {
        self.expect(TokenType::Arrow)?;
        if self.is(TokenType::BraceL) {
            self.parse_function_body()?;
        } else {
            self.parse_maybe_assign(false)?;
        }
        self.state.scope_depth -= 1;
        Ok(())
    }

    /// `<T>(x: T) => x`
    fn parse_generic_arrow(&mut self) -> Result<()> {
        self.in_type(|p| p.skip_angle_brackets())?;
        self.parse_arrow_params()?;
        self.parse_arrow_body()
    }

    /// `(`: arrow parameters when an `=>` follows, else a parenthesized expression
    fn parse_paren_and_distinguish(&mut self) -> Result<bool> {
        if self.try_parse(|p| p.parse_arrow_params()).is_some() {
            self.parse_arrow_body()?;
            return Ok(true);
        }
        self.next()?;
        self.parse_expression()?;
        if self.flow && self.is(TokenType::Colon) {
            // `(x: T)` type cast
            self.parse_type_annotation()?;
        }
        self.expect(TokenType::ParenR)?;
        Ok(false)
    }

    /// A `<` in operand position: JSX, or a generic arrow function
    fn parse_angle_atom(&mut self) -> Result<bool> {
        if !self.jsx {
            if self.has_types() {
                self.parse_generic_arrow()?;
                return Ok(true);
            }
            return Err(self.unexpected());
        }
        let snapshot = self.snapshot();
        match self.parse_jsx_element(LexMode::Normal) {
            Ok(()) => Ok(false),
            Err(err) => {
                if self.has_types() {
                    self.restore(snapshot);
                    if self.try_parse(|p| p.parse_generic_arrow()).is_some() {
                        return Ok(true);
                    }
                }
                Err(err)
            }
        }
    }

    /// `new X(...)`, `new X`, `new.target`
    fn parse_new(&mut self) -> Result<()> {
        self.next()?;
        if self.eat(TokenType::Dot)? {
            return self.parse_member_name();
        }
        if self.is(TokenType::New) {
            self.parse_new()?;
        } else {
            self.parse_expr_atom()?;
        }
        self.parse_subscripts(true)?;
        if self.is(TokenType::ParenL) {
            self.parse_call_args()?;
        }
        Ok(())
    }

    /// `` `a${b}c` ``
    pub(crate) fn parse_template(&mut self) -> Result<()> {
        self.expect_with(TokenType::BackQuote, LexMode::TemplateChunk)?;
        loop {
            self.expect_with(TokenType::Template, LexMode::TemplateEnd)?;
            if self.is(TokenType::BackQuote) {
                return self.next();
            }
            self.expect(TokenType::DollarBraceL)?;
            self.parse_expression()?;
            self.expect_with(TokenType::BraceR, LexMode::TemplateChunk)?;
        }
    }

    /// `{ a, b: 1, c() {}, get d() {}, [e]: 2, ...f }`
    ///
    /// The braces share a context id, which every non-computed key also
    /// carries so a key can be traced back to its object.
    fn parse_object_literal(&mut self) -> Result<()> {
        let object_id = self.open_context(TokenType::BraceL)?;
        while !self.is(TokenType::BraceR) {
            if self.is(TokenType::Ellipsis) {
                self.next()?;
                self.parse_maybe_assign(false)?;
            } else {
                self.parse_object_member(object_id)?;
            }
            if !self.is(TokenType::BraceR) {
                self.expect(TokenType::Comma)?;
            }
        }
        self.close_context(TokenType::BraceR)?;
        Ok(())
    }

    fn parse_object_member(&mut self, object_id: u32) -> Result<()> {
        let mut has_modifier = false;
        loop {
            if self.is(TokenType::Star) {
                self.next()?;
                has_modifier = true;
                continue;
            }
            if self.is_name("async") || self.is_name("get") || self.is_name("set") {
                let next = self.peek_token()?;
                let is_key = matches!(
                    next.ty,
                    TokenType::ParenL
                        | TokenType::Comma
                        | TokenType::Colon
                        | TokenType::BraceR
                        | TokenType::Eq
                        | TokenType::LessThan
                );
                if !is_key {
                    self.next()?;
                    has_modifier = true;
                    continue;
                }
            }
            break;
        }

        let mut is_shorthand = false;
        match self.state.cur.ty {
            TokenType::BracketL => {
                self.next()?;
                self.parse_maybe_assign(false)?;
                self.expect(TokenType::BracketR)?;
            }
            TokenType::String | TokenType::Num | TokenType::BigInt => {
                self.state.cur.context_id = Some(object_id);
                self.next()?;
            }
            ty if ty.is_name_like() => {
                let next = self.peek_token()?;
                is_shorthand = !has_modifier
                    && ty == TokenType::Name
                    && matches!(next.ty, TokenType::Comma | TokenType::BraceR | TokenType::Eq);
                let role = if is_shorthand {
                    IdentifierRole::ObjectShorthand
                } else {
                    IdentifierRole::ObjectKey
                };
                self.state.cur.identifier_role = Some(role);
                self.state.cur.context_id = Some(object_id);
                self.next()?;
            }
            _ => return Err(self.unexpected()),
        }

        if is_shorthand {
            // `{ a = 1 }` only appears in patterns
            if self.eat(TokenType::Eq)? {
                self.parse_maybe_assign(false)?;
            }
            return Ok(());
        }
        if self.is(TokenType::ParenL) || self.is(TokenType::LessThan) {
            self.state.scope_depth += 1;
            self.maybe_type_parameters()?;
            let start = self.token_count();
            self.parse_function_params_and_body(start, false)?;
            self.state.scope_depth -= 1;
            return Ok(());
        }
        self.expect(TokenType::Colon)?;
        self.parse_maybe_assign(false)
    }
}
