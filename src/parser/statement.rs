//! Statements, functions, classes and module declarations

use super::Parser;
use super::token::{IdentifierRole, TokenType};
use crate::error::{Result, TransformError};

/// Class member modifiers; TypeScript-only ones are erased
const CLASS_MODIFIERS: &[&str] = &[
    "static", "async", "get", "set", "accessor", "public", "private", "protected", "readonly",
    "abstract", "override", "declare",
];

fn is_ts_member_modifier(word: &str) -> bool {
    matches!(
        word,
        "public" | "private" | "protected" | "readonly" | "abstract" | "override" | "declare"
    )
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Result<()> {
        match self.state.cur.ty {
            TokenType::BraceL => self.parse_block(),
            TokenType::Semi => self.next(),
            TokenType::Var => self.parse_var_statement(IdentifierRole::FunctionScopedDeclaration),
            TokenType::Const => {
                if self.typescript && self.peek_token()?.text(self.code()) == "enum" {
                    return self.parse_enum();
                }
                self.parse_var_statement(IdentifierRole::BlockScopedDeclaration)
            }
            TokenType::Function => self.parse_function(true, false),
            TokenType::Class => self.parse_class(true),
            TokenType::If => {
                self.next()?;
                self.parse_paren_expression()?;
                self.parse_statement()?;
                if self.eat(TokenType::Else)? {
                    self.parse_statement()?;
                }
                Ok(())
            }
            TokenType::For => self.parse_for(),
            TokenType::While | TokenType::With => {
                self.next()?;
                self.parse_paren_expression()?;
                self.parse_statement()
            }
            TokenType::Do => {
                self.next()?;
                self.parse_statement()?;
                self.expect(TokenType::While)?;
                self.parse_paren_expression()?;
                // The semicolon after do-while is always optional
                self.eat(TokenType::Semi)?;
                Ok(())
            }
            TokenType::Return | TokenType::Throw => {
                self.next()?;
                if !self.is(TokenType::Semi) && !self.can_insert_semicolon() {
                    self.parse_expression()?;
                }
                self.semicolon()
            }
            TokenType::Break | TokenType::Continue => {
                self.next()?;
                if self.is(TokenType::Name) && !self.state.cur.newline_before {
                    self.next()?;
                }
                self.semicolon()
            }
            TokenType::Debugger => {
                self.next()?;
                self.semicolon()
            }
            TokenType::Try => self.parse_try(),
            TokenType::Switch => self.parse_switch(),
            TokenType::Import => {
                let next = self.peek_token()?;
                if matches!(next.ty, TokenType::ParenL | TokenType::Dot) {
                    self.parse_expression_statement()
                } else {
                    self.parse_import()
                }
            }
            TokenType::Export => self.parse_export(),
            TokenType::At => Err(TransformError::syntax_at(
                self.code(),
                self.state.cur.start,
                "Decorators are not supported",
            )),
            TokenType::Name => self.parse_name_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Statements starting with a contextual keyword or a label
    fn parse_name_statement(&mut self) -> Result<()> {
        let next = self.peek_token()?;
        let same_line = !next.newline_before;

        if next.ty == TokenType::Colon {
            self.next()?;
            self.next()?;
            return self.parse_statement();
        }

        match self.cur_text() {
            "let"
                if matches!(
                    next.ty,
                    TokenType::Name | TokenType::BracketL | TokenType::BraceL
                ) =>
            {
                return self.parse_var_statement(IdentifierRole::BlockScopedDeclaration);
            }
            "async" if next.ty == TokenType::Function && same_line => {
                self.next()?;
                return self.parse_function(true, true);
            }
            _ => {}
        }

        if !self.has_types() {
            return self.parse_expression_statement();
        }
        if self.at_type_alias()? {
            return self.parse_type_alias();
        }
        if self.at_interface()? {
            return self.parse_interface();
        }
        match self.cur_text() {
            "declare"
                if same_line
                    && (next.ty.is_name_like() || next.ty == TokenType::Class) =>
            {
                self.in_type(|p| {
                    p.next()?;
                    p.parse_statement()
                })
            }
            "abstract" if self.typescript && next.ty == TokenType::Class && same_line => {
                self.in_type(|p| p.next())?;
                self.parse_class(true)
            }
            "enum" if self.typescript && next.ty == TokenType::Name && same_line => {
                self.parse_enum()
            }
            "namespace" | "module"
                if self.typescript
                    && same_line
                    && matches!(next.ty, TokenType::Name | TokenType::String) =>
            {
                if !self.state.is_type {
                    return Err(TransformError::syntax_at(
                        self.code(),
                        self.state.cur.start,
                        "TypeScript namespaces are not supported",
                    ));
                }
                self.next()?;
                self.next()?;
                while self.eat(TokenType::Dot)? {
                    self.next()?;
                }
                if self.is(TokenType::BraceL) {
                    return self.skip_balanced();
                }
                self.semicolon()
            }
            "global" if self.state.is_type && next.ty == TokenType::BraceL => {
                self.next()?;
                self.parse_block()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Enums are only accepted as ambient declarations
    fn parse_enum(&mut self) -> Result<()> {
        if !self.state.is_type {
            return Err(TransformError::syntax_at(
                self.code(),
                self.state.cur.start,
                "TypeScript enums are not supported",
            ));
        }
        if self.is(TokenType::Const) {
            self.next()?;
        }
        self.next()?;
        self.eat_identifier(IdentifierRole::BlockScopedDeclaration)?;
        self.skip_balanced()
    }

    fn parse_expression_statement(&mut self) -> Result<()> {
        self.parse_expression()?;
        self.semicolon()
    }

    fn parse_paren_expression(&mut self) -> Result<()> {
        self.expect(TokenType::ParenL)?;
        self.parse_expression()?;
        self.expect(TokenType::ParenR)
    }

    pub(crate) fn parse_block(&mut self) -> Result<()> {
        self.expect(TokenType::BraceL)?;
        while !self.is(TokenType::BraceR) {
            if self.is(TokenType::Eof) {
                return Err(self.unexpected());
            }
            self.parse_statement()?;
        }
        self.next()
    }

    fn parse_var_statement(&mut self, role: IdentifierRole) -> Result<()> {
        self.next()?;
        self.parse_var_declarations(role, false)?;
        self.semicolon()
    }

    fn parse_var_declarations(&mut self, role: IdentifierRole, no_in: bool) -> Result<()> {
        loop {
            self.parse_binding_atom(role)?;
            if self.typescript && self.is(TokenType::Bang) {
                self.in_type(|p| p.next())?;
            }
            self.maybe_type_annotation()?;
            if self.eat(TokenType::Eq)? {
                self.parse_maybe_assign(no_in)?;
            }
            if !self.eat(TokenType::Comma)? {
                return Ok(());
            }
        }
    }

    fn parse_for(&mut self) -> Result<()> {
        self.next()?;
        if self.is_name("await") {
            self.next()?;
        }
        self.expect(TokenType::ParenL)?;

        if !self.is(TokenType::Semi) {
            let is_let = self.is_name("let")
                && matches!(
                    self.peek_token()?.ty,
                    TokenType::Name | TokenType::BracketL | TokenType::BraceL
                );
            if self.is(TokenType::Var) {
                self.next()?;
                self.parse_var_declarations(IdentifierRole::FunctionScopedDeclaration, true)?;
            } else if self.is(TokenType::Const) || is_let {
                self.next()?;
                self.parse_var_declarations(IdentifierRole::BlockScopedDeclaration, true)?;
            } else {
                self.parse_expression_with(true)?;
            }
        }

        if self.is(TokenType::In) || self.is_name("of") {
            self.next()?;
            self.parse_expression()?;
        } else {
            self.expect(TokenType::Semi)?;
            if !self.is(TokenType::Semi) {
                self.parse_expression()?;
            }
            self.expect(TokenType::Semi)?;
            if !self.is(TokenType::ParenR) {
                self.parse_expression()?;
            }
        }
        self.expect(TokenType::ParenR)?;
        self.parse_statement()
    }

    fn parse_try(&mut self) -> Result<()> {
        self.next()?;
        self.parse_block()?;
        if self.eat(TokenType::Catch)? {
            if self.eat(TokenType::ParenL)? {
                self.parse_binding_atom(IdentifierRole::BlockScopedDeclaration)?;
                self.maybe_type_annotation()?;
                self.expect(TokenType::ParenR)?;
            }
            self.parse_block()?;
        }
        if self.eat(TokenType::Finally)? {
            self.parse_block()?;
        }
        Ok(())
    }

    fn parse_switch(&mut self) -> Result<()> {
        self.next()?;
        self.parse_paren_expression()?;
        self.expect(TokenType::BraceL)?;
        while !self.is(TokenType::BraceR) {
            if self.eat(TokenType::Case)? {
                self.parse_expression()?;
                self.expect(TokenType::Colon)?;
            } else if self.eat(TokenType::Default)? {
                self.expect(TokenType::Colon)?;
            } else if self.is(TokenType::Eof) {
                return Err(self.unexpected());
            } else {
                self.parse_statement()?;
            }
        }
        self.next()
    }

    // ---------- functions ----------

    /// `function` declaration or expression; `async` has already been consumed
    pub(crate) fn parse_function(&mut self, is_statement: bool, is_async: bool) -> Result<()> {
        let start = self.token_count() - usize::from(is_async);
        self.expect(TokenType::Function)?;
        self.eat(TokenType::Star)?;
        if is_statement && self.is(TokenType::Name) {
            self.eat_identifier(IdentifierRole::FunctionScopedDeclaration)?;
        }
        self.state.scope_depth += 1;
        if !is_statement && self.is(TokenType::Name) {
            self.eat_identifier(IdentifierRole::FunctionScopedDeclaration)?;
        }
        self.maybe_type_parameters()?;
        self.parse_function_params_and_body(start, false)?;
        self.state.scope_depth -= 1;
        Ok(())
    }

    /// `(params): R { body }`; a body-less signature becomes a type region
    /// starting at `start`. Returns whether a body was present.
    pub(crate) fn parse_function_params_and_body(
        &mut self,
        start: usize,
        is_constructor: bool,
    ) -> Result<bool> {
        self.open_context(TokenType::ParenL)?;
        self.parse_binding_list(
            TokenType::ParenR,
            IdentifierRole::FunctionScopedDeclaration,
            false,
            is_constructor,
        )?;
        self.close_context(TokenType::ParenR)?;
        self.maybe_return_type()?;

        if self.is(TokenType::BraceL) {
            self.parse_function_body()?;
            return Ok(true);
        }
        if !self.has_types() {
            return Err(self.unexpected());
        }
        // Overload or ambient signature
        self.in_type(|p| p.semicolon())?;
        self.mark_types_from(start);
        Ok(false)
    }

    pub(crate) fn parse_function_body(&mut self) -> Result<()> {
        self.open_context(TokenType::BraceL)?;
        while !self.is(TokenType::BraceR) {
            if self.is(TokenType::Eof) {
                return Err(self.unexpected());
            }
            self.parse_statement()?;
        }
        self.close_context(TokenType::BraceR)?;
        Ok(())
    }

    // ---------- classes ----------

    /// The `class` keyword and both body braces share one context id
    pub(crate) fn parse_class(&mut self, is_statement: bool) -> Result<()> {
        let class_id = self.state.push_context();
        self.state.cur.context_id = Some(class_id);
        self.state.cur.is_expression = !is_statement;
        self.expect(TokenType::Class)?;

        if self.is(TokenType::Name) && !(self.has_types() && self.is_name("implements")) {
            if is_statement {
                self.eat_identifier(IdentifierRole::BlockScopedDeclaration)?;
            } else {
                self.next()?;
            }
        }
        self.maybe_type_parameters()?;

        if self.eat(TokenType::Extends)? {
            self.parse_maybe_unary()?;
            if self.has_types() && self.is(TokenType::LessThan) {
                self.in_type(|p| p.skip_angle_brackets())?;
            }
        }
        if self.has_types() && self.is_name("implements") {
            self.in_type(|p| {
                p.next()?;
                loop {
                    p.parse_type()?;
                    if !p.eat(TokenType::Comma)? {
                        return Ok(());
                    }
                }
            })?;
        }

        if !self.is(TokenType::BraceL) {
            return Err(self.unexpected());
        }
        self.state.cur.context_id = Some(class_id);
        self.next()?;
        self.state.scope_depth += 1;
        while !self.is(TokenType::BraceR) {
            if self.is(TokenType::Eof) {
                return Err(self.unexpected());
            }
            self.parse_class_member()?;
        }
        self.state.scope_depth -= 1;
        let id = self
            .state
            .pop_context()
            .ok_or_else(|| TransformError::invariant("class context missing"))?;
        self.state.cur.context_id = Some(id);
        self.next()
    }

    fn parse_class_member(&mut self) -> Result<()> {
        let member_start = self.token_count();
        if self.eat(TokenType::Semi)? {
            return Ok(());
        }
        if self.typescript && self.is(TokenType::BracketL) && self.at_index_signature()? {
            return self.in_type(|p| {
                p.skip_balanced()?;
                p.maybe_type_annotation()?;
                p.semicolon()
            });
        }
        if self.is_name("static") && self.peek_is(TokenType::BraceL)? {
            self.next()?;
            self.state.scope_depth += 1;
            self.parse_function_body()?;
            self.state.scope_depth -= 1;
            return Ok(());
        }

        let mut is_ambient = false;
        while self.is(TokenType::Name) && CLASS_MODIFIERS.contains(&self.cur_text()) {
            let next = self.peek_token()?;
            let is_key = matches!(
                next.ty,
                TokenType::ParenL
                    | TokenType::Eq
                    | TokenType::Semi
                    | TokenType::BraceR
                    | TokenType::Colon
                    | TokenType::LessThan
                    | TokenType::Question
                    | TokenType::Bang
                    | TokenType::Eof
            ) || (self.is_name("async") && next.newline_before);
            if is_key {
                break;
            }
            let word = self.cur_text();
            if self.typescript && is_ts_member_modifier(word) {
                if matches!(word, "declare" | "abstract") {
                    is_ambient = true;
                }
                self.in_type(|p| p.next())?;
            } else {
                self.next()?;
            }
        }
        self.eat(TokenType::Star)?;

        let is_constructor = self.is_name("constructor")
            || (self.is(TokenType::String)
                && self.cur_text().trim_matches(['"', '\'']) == "constructor");
        match self.state.cur.ty {
            TokenType::BracketL => {
                self.next()?;
                self.parse_maybe_assign(false)?;
                self.expect(TokenType::BracketR)?;
            }
            TokenType::String | TokenType::Num | TokenType::BigInt | TokenType::PrivateName => {
                self.next()?;
            }
            ty if ty.is_name_like() => self.next()?,
            _ => return Err(self.unexpected()),
        }
        if self.has_types() && (self.is(TokenType::Question) || self.is(TokenType::Bang)) {
            self.in_type(|p| p.next())?;
        }

        if self.is(TokenType::ParenL) || self.is(TokenType::LessThan) {
            self.state.scope_depth += 1;
            self.maybe_type_parameters()?;
            self.parse_function_params_and_body(member_start, is_constructor)?;
            self.state.scope_depth -= 1;
            return Ok(());
        }

        // Field
        self.maybe_type_annotation()?;
        if self.is(TokenType::Eq) {
            let eq_index = self.token_count();
            self.next()?;
            self.parse_maybe_assign(false)?;
            let rhs_end = self.token_count();
            self.state.tokens[eq_index].rhs_end_index = Some(rhs_end);
        }
        self.semicolon()?;
        if is_ambient {
            self.mark_types_from(member_start);
        }
        Ok(())
    }

    /// `[name: T]` in a class body
    fn at_index_signature(&mut self) -> Result<bool> {
        let snapshot = self.snapshot();
        self.next()?;
        let found = self.is(TokenType::Name) && {
            self.next()?;
            self.is(TokenType::Colon)
        };
        self.restore(snapshot);
        Ok(found)
    }

    // ---------- modules ----------

    fn parse_import(&mut self) -> Result<()> {
        if self.has_types() && self.at_type_only_import()? {
            return self.in_type(|p| p.parse_import_declaration());
        }
        self.parse_import_declaration()
    }

    /// `import type X from`, `import type { X }`, `import typeof X from`
    fn at_type_only_import(&mut self) -> Result<bool> {
        let snapshot = self.snapshot();
        self.next()?;
        let found = (self.is_name("type") || (self.flow && self.is(TokenType::TypeOf))) && {
            self.next()?;
            matches!(self.state.cur.ty, TokenType::BraceL | TokenType::Star)
                || (self.is(TokenType::Name) && !self.is_name("from"))
        };
        self.restore(snapshot);
        Ok(found)
    }

    fn parse_import_declaration(&mut self) -> Result<()> {
        self.expect(TokenType::Import)?;
        if self.is_name("type") && self.state.is_type {
            self.next()?;
        } else if self.is(TokenType::TypeOf) && self.state.is_type {
            self.next()?;
        }
        if self.is(TokenType::String) {
            self.next()?;
            return self.semicolon();
        }
        if self.is(TokenType::Name) {
            if self.peek_is(TokenType::Eq)? {
                return Err(TransformError::syntax_at(
                    self.code(),
                    self.state.cur.start,
                    "import = require() is not supported",
                ));
            }
            self.eat_identifier(IdentifierRole::BlockScopedDeclaration)?;
            if !self.eat(TokenType::Comma)? {
                return self.finish_import_source();
            }
        }
        if self.eat(TokenType::Star)? {
            if !self.is_name("as") {
                return Err(self.unexpected());
            }
            self.next()?;
            self.eat_identifier(IdentifierRole::BlockScopedDeclaration)?;
        } else if self.eat(TokenType::BraceL)? {
            while !self.is(TokenType::BraceR) {
                self.parse_import_specifier()?;
                if !self.is(TokenType::BraceR) {
                    self.expect(TokenType::Comma)?;
                }
            }
            self.next()?;
        } else {
            return Err(self.unexpected());
        }
        self.finish_import_source()
    }

    fn finish_import_source(&mut self) -> Result<()> {
        if !self.is_name("from") {
            return Err(self.unexpected());
        }
        self.next()?;
        self.expect(TokenType::String)?;
        self.semicolon()
    }

    /// `a`, `a as b`, `"a" as b`, or an inline `type a`
    fn parse_import_specifier(&mut self) -> Result<()> {
        if self.has_types() && (self.is_name("type") || self.is(TokenType::TypeOf)) {
            let next = self.peek_token()?;
            let next_text = next.text(self.code());
            if (next.ty.is_name_like() || next.ty == TokenType::String)
                && !(next_text == "as" && !self.is_typed_specifier_with_as()?)
            {
                return self.in_type(|p| {
                    p.next()?;
                    p.parse_plain_import_specifier()
                });
            }
        }
        self.parse_plain_import_specifier()
    }

    /// Distinguish `type as as x` (typed) from `type as x` (a binding named `type`)
    fn is_typed_specifier_with_as(&mut self) -> Result<bool> {
        let snapshot = self.snapshot();
        self.next()?;
        self.next()?;
        let typed = self.is_name("as") || self.is(TokenType::Comma) || self.is(TokenType::BraceR);
        self.restore(snapshot);
        Ok(typed)
    }

    fn parse_plain_import_specifier(&mut self) -> Result<()> {
        let next = self.peek_token()?;
        if next.ty == TokenType::Name && next.text(self.code()) == "as" {
            self.next()?;
            self.next()?;
        }
        self.eat_identifier(IdentifierRole::BlockScopedDeclaration)
    }

    fn parse_export(&mut self) -> Result<()> {
        let export_index = self.token_count();
        if self.has_types() && self.at_type_only_export()? {
            return self.in_type(|p| {
                p.next()?;
                p.parse_type_only_export_body()
            });
        }

        self.next()?;
        let is_var_declaration = matches!(self.state.cur.ty, TokenType::Var | TokenType::Const)
            || self.is_name("let");

        match self.state.cur.ty {
            TokenType::Star => {
                self.next()?;
                if self.is_name("as") {
                    self.next()?;
                    self.next()?;
                }
                self.finish_import_source()?;
            }
            TokenType::BraceL => self.parse_export_specifiers()?,
            TokenType::Default => {
                self.next()?;
                self.parse_export_default()?;
            }
            TokenType::Var => {
                self.parse_var_statement(IdentifierRole::FunctionScopedDeclaration)?;
            }
            TokenType::Const => {
                self.parse_var_statement(IdentifierRole::BlockScopedDeclaration)?;
            }
            TokenType::Function => self.parse_function(true, false)?,
            TokenType::Class => self.parse_class(true)?,
            TokenType::Eq if self.typescript => {
                return Err(TransformError::syntax_at(
                    self.code(),
                    self.state.cur.start,
                    "export = is not supported",
                ));
            }
            TokenType::Name => match self.cur_text() {
                "let" => self.parse_var_statement(IdentifierRole::BlockScopedDeclaration)?,
                "async" => {
                    self.next()?;
                    self.parse_function(true, true)?;
                }
                "abstract" if self.typescript => {
                    self.in_type(|p| p.next())?;
                    self.parse_class(true)?;
                }
                "enum" if self.typescript => self.parse_enum()?,
                _ => return Err(self.unexpected()),
            },
            _ => return Err(self.unexpected()),
        }

        let end = self.token_count();
        if is_var_declaration {
            self.state.tokens[export_index].rhs_end_index = Some(end);
        }
        let last = end - 1;
        let declaration_is_type = self.state.tokens[last].is_type
            && self.state.tokens.get(export_index + 1).is_some_and(|t| t.is_type);
        if declaration_is_type {
            // `export function f(): void;` overloads vanish entirely
            self.state.tokens[export_index].is_type = true;
        }
        Ok(())
    }

    fn parse_export_default(&mut self) -> Result<()> {
        if self.is(TokenType::Function) {
            return self.parse_function(true, false);
        }
        if self.is_name("async") && self.peek_is(TokenType::Function)? {
            self.next()?;
            return self.parse_function(true, true);
        }
        if self.is(TokenType::Class) {
            let next = self.peek_token()?;
            let named = next.ty == TokenType::Name && next.text(self.code()) != "implements";
            return self.parse_class(named);
        }
        if self.typescript && self.is_name("abstract") && self.peek_is(TokenType::Class)? {
            self.in_type(|p| p.next())?;
            return self.parse_class(true);
        }
        if self.at_interface()? {
            return self.parse_interface();
        }
        self.parse_maybe_assign(false)?;
        self.semicolon()
    }

    /// `{ a, b as c, type D }` with an optional `from "m"`
    fn parse_export_specifiers(&mut self) -> Result<()> {
        let list_start = self.token_count();
        self.expect(TokenType::BraceL)?;
        while !self.is(TokenType::BraceR) {
            let is_type_specifier = self.has_types()
                && self.is_name("type")
                && !matches!(
                    self.peek_token()?.ty,
                    TokenType::Comma | TokenType::BraceR
                )
                && self.peek_token()?.text(self.code()) != "as";
            if is_type_specifier {
                self.in_type(|p| {
                    p.next()?;
                    p.parse_export_specifier()
                })?;
            } else {
                self.parse_export_specifier()?;
            }
            if !self.is(TokenType::BraceR) {
                self.expect(TokenType::Comma)?;
            }
        }
        self.next()?;
        if self.is_name("from") {
            // Re-exported names are not local references
            for token in &mut self.state.tokens[list_start..] {
                token.identifier_role = None;
            }
            self.finish_import_source()
        } else {
            self.semicolon()
        }
    }

    fn parse_export_specifier(&mut self) -> Result<()> {
        if self.is(TokenType::Name) {
            self.set_role(IdentifierRole::Access);
        } else if !self.state.cur.ty.is_name_like() && !self.is(TokenType::String) {
            return Err(self.unexpected());
        }
        self.next()?;
        if self.is_name("as") {
            self.next()?;
            if !self.state.cur.ty.is_name_like() && !self.is(TokenType::String) {
                return Err(self.unexpected());
            }
            self.next()?;
        }
        Ok(())
    }

    fn at_type_only_export(&mut self) -> Result<bool> {
        let next = self.peek_token()?;
        if next.ty != TokenType::Name {
            return Ok(false);
        }
        Ok(match next.text(self.code()) {
            "type" | "interface" | "declare" | "opaque" => true,
            "as" => self.typescript,
            _ => false,
        })
    }

    /// Everything after `export` in an export that is erased whole
    fn parse_type_only_export_body(&mut self) -> Result<()> {
        if self.at_type_alias()? {
            return self.parse_type_alias();
        }
        if self.is_name("interface") {
            return self.parse_interface();
        }
        if self.is_name("declare") {
            self.next()?;
            return self.parse_statement();
        }
        if self.is_name("type") {
            self.next()?;
            if self.is(TokenType::BraceL) {
                self.skip_balanced()?;
            } else if self.eat(TokenType::Star)? {
                if self.is_name("as") {
                    self.next()?;
                    self.next()?;
                }
            } else {
                return Err(self.unexpected());
            }
            if self.is_name("from") {
                self.next()?;
                self.expect(TokenType::String)?;
            }
            return self.semicolon();
        }
        if self.is_name("as") {
            // `export as namespace X;`
            self.next()?;
            self.next()?;
            self.next()?;
            return self.semicolon();
        }
        Err(self.unexpected())
    }
}
