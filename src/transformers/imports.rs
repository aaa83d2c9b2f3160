//! ES module to CommonJS rewriting
//!
//! Import statements become `require` calls (through the resolver's
//! interop variables), references to imported bindings become property
//! accesses on those variables, and every export form becomes assignments
//! to `exports`.

use std::cell::RefCell;

use rustc_hash::FxHashSet;

use super::Transformer;
use super::import_processor::{ImportProcessor, unquote};
use super::root_transformer::RootTransformer;
use crate::error::{Result, TransformError};
use crate::options::{Options, Transform};
use crate::parser::{IdentifierRole, Token, TokenType};

pub struct ImportTransformer {
    /// Export assignments moved into the prefix, e.g. `exports.f = f;`
    hoisted_exports: RefCell<Vec<String>>,
    /// Top-level value declarations, consulted for `export {..}` under
    /// TypeScript where a name may only be a type
    declared_values: Option<FxHashSet<String>>,
    add_module_exports: bool,
}

impl ImportTransformer {
    pub fn new(code: &str, tokens: &[Token], options: &Options) -> Self {
        let declared_values = options
            .has(Transform::TypeScript)
            .then(|| collect_declared_values(code, tokens));
        ImportTransformer {
            hoisted_exports: RefCell::new(Vec::new()),
            declared_values,
            add_module_exports: options.has(Transform::AddModuleExports),
        }
    }

    fn processor<'r>(root: &'r mut RootTransformer<'_>) -> Result<&'r mut ImportProcessor> {
        root.import_processor
            .as_mut()
            .ok_or_else(|| TransformError::invariant("Import processor is not available."))
    }

    // ---------- imports ----------

    fn process_import(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        root.tokens.remove_initial_token()?;
        while !at_module_source(root) {
            if root.tokens.is_at_end() {
                return Err(TransformError::invariant("Expected a module source in import."));
            }
            root.tokens.remove_token()?;
        }
        let path = unquote(root.tokens.current_token_code()).to_string();
        let code = Self::processor(root)?.claim_import_code(&path);
        root.tokens.replace_token_trimming_left_whitespace(&code)?;
        if root.tokens.matches1(TokenType::Semi) {
            root.tokens.remove_token()?;
        }
        Ok(())
    }

    fn process_identifier(&self, root: &mut RootTransformer<'_>) -> Result<bool> {
        let token = root.tokens.current_token();
        let role = token.identifier_role;
        if !matches!(
            role,
            Some(IdentifierRole::Access | IdentifierRole::ObjectShorthand)
        ) {
            return Ok(false);
        }
        let name = root.tokens.identifier_name().into_owned();
        let Some(replacement) = Self::processor(root)?
            .get_identifier_replacement(&name)
            .map(str::to_string)
        else {
            return Ok(false);
        };

        if role == Some(IdentifierRole::ObjectShorthand) {
            root.tokens
                .replace_token(&format!("{}: {}", name, replacement))?;
            return Ok(true);
        }

        // A member expression as callee would change `this` for the call
        let tokens = &root.tokens;
        let index = tokens.current_index();
        let mut next = index + 1;
        while tokens.token_at(next).is_type {
            next += 1;
        }
        let is_callee = matches!(
            tokens.token_at(next).ty,
            TokenType::ParenL | TokenType::BackQuote
        );
        let after_new = index > 0 && tokens.token_at(index - 1).ty == TokenType::New;
        if is_callee && !after_new && replacement.contains('.') {
            root.tokens.replace_token(&format!("(0, {})", replacement))?;
        } else {
            root.tokens.replace_token(&replacement)?;
        }
        Ok(true)
    }

    // ---------- exports ----------

    fn process_export(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let tokens = &root.tokens;
        let after = next_non_type(root, tokens.current_index() + 1);
        let target = tokens.token_at(after);
        match target.ty {
            TokenType::Default => self.process_export_default(root, after),
            TokenType::Var | TokenType::Const => self.process_export_var(root),
            TokenType::Name if tokens.raw_code(target) == "let" => self.process_export_var(root),
            TokenType::Function => self.process_export_function(root),
            TokenType::Name
                if tokens.raw_code(target) == "async"
                    && tokens.matches_at(after + 1, &[TokenType::Function]) =>
            {
                self.process_export_function(root)
            }
            TokenType::Class => self.process_export_class(root, after),
            TokenType::BraceL => self.process_export_bindings(root),
            TokenType::Star => self.process_export_star(root),
            _ => Err(TransformError::invariant("Unrecognized export form.")),
        }
    }

    fn process_export_default(
        &self,
        root: &mut RootTransformer<'_>,
        default_index: usize,
    ) -> Result<()> {
        let tokens = &root.tokens;
        let start = next_non_type(root, default_index + 1);
        let start_token = tokens.token_at(start);

        let function_index = if tokens.matches_name_at(start, "async") {
            start + 1
        } else {
            start
        };
        if tokens.matches_at(function_index, &[TokenType::Function]) {
            let mut name_index = function_index + 1;
            if tokens.matches_at(name_index, &[TokenType::Star]) {
                name_index += 1;
            }
            if tokens.matches_at(name_index, &[TokenType::Name]) {
                self.remove_through(root, default_index)?;
                let name = self.process_named_function(root, name_index)?;
                self.hoisted_exports
                    .borrow_mut()
                    .push(format!("exports.default = {};", name));
                return Ok(());
            }
        }
        if start_token.ty == TokenType::Class && !start_token.is_expression {
            let name_index = start + 1;
            if tokens.matches_at(name_index, &[TokenType::Name])
                && !tokens.token_at(name_index).is_type
            {
                let name = tokens.identifier_name_at(name_index).into_owned();
                self.remove_through(root, default_index)?;
                self.process_class_at(root, start)?;
                root.tokens
                    .append_code(&format!(" exports.default = {};", name));
                return Ok(());
            }
        }

        root.tokens.replace_token("exports.default =")?;
        while root.tokens.current_index() <= default_index {
            root.tokens.remove_token()?;
        }
        Ok(())
    }

    fn process_export_function(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let tokens = &root.tokens;
        let mut name_index = tokens.current_index() + 1;
        while !tokens.matches_at(name_index, &[TokenType::Name])
            || tokens.matches_name_at(name_index, "async")
            || tokens.token_at(name_index).is_type
        {
            if tokens.token_at(name_index).ty == TokenType::ParenL
                || name_index >= tokens.tokens().len()
            {
                return Err(TransformError::invariant("Expected a name on exported function."));
            }
            name_index += 1;
        }
        root.tokens.remove_initial_token()?;
        let name = self.process_named_function(root, name_index)?;
        self.hoisted_exports
            .borrow_mut()
            .push(format!("exports.{} = {};", name, name));
        Ok(())
    }

    /// Emit a function declaration whose name is at `name_index`,
    /// returning the name
    fn process_named_function(
        &self,
        root: &mut RootTransformer<'_>,
        name_index: usize,
    ) -> Result<String> {
        while root.tokens.current_index() < name_index {
            root.process_token()?;
        }
        let name = root.tokens.identifier_name().into_owned();
        root.tokens.copy_token()?;

        let params = next_non_type(root, name_index + 1);
        let params_end = root
            .tokens
            .find_matching_context(params)
            .ok_or_else(|| {
                TransformError::invariant("Expected context ID on function parameters.")
            })?;
        let body = next_non_type(root, params_end + 1);
        let body_end = root
            .tokens
            .find_matching_context(body)
            .ok_or_else(|| TransformError::invariant("Expected context ID on function body."))?;
        while root.tokens.current_index() <= body_end {
            root.process_token()?;
        }
        Ok(name)
    }

    fn process_export_class(
        &self,
        root: &mut RootTransformer<'_>,
        class_index: usize,
    ) -> Result<()> {
        let tokens = &root.tokens;
        let name_index = class_index + 1;
        if !tokens.matches_at(name_index, &[TokenType::Name])
            || tokens.token_at(name_index).is_type
        {
            return Err(TransformError::invariant("Expected class to have a name when exported."));
        }
        let name = tokens.identifier_name_at(name_index).into_owned();
        root.tokens.remove_initial_token()?;
        self.process_class_at(root, class_index)?;
        root.tokens
            .append_code(&format!(" exports.{} = {};", name, name));
        Ok(())
    }

    /// Process up to the class keyword at `class_index`, then the class
    fn process_class_at(&self, root: &mut RootTransformer<'_>, class_index: usize) -> Result<()> {
        while root.tokens.current_index() < class_index {
            root.process_token()?;
        }
        root.process_class()
    }

    fn process_export_var(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let export_index = root.tokens.current_index();
        let end = root
            .tokens
            .current_token()
            .rhs_end_index
            .and_then(|end| end.checked_sub(1))
            .ok_or_else(|| {
                TransformError::invariant("Expected end index on exported declaration.")
            })?;
        root.tokens.remove_initial_token()?;
        while root.tokens.current_index() <= end {
            root.process_token()?;
        }

        let tokens = &root.tokens;
        let mut names: Vec<String> = Vec::new();
        for index in export_index + 1..=end {
            let token = tokens.token_at(index);
            let is_declaration = matches!(
                token.identifier_role,
                Some(
                    IdentifierRole::FunctionScopedDeclaration
                        | IdentifierRole::BlockScopedDeclaration
                )
            );
            if token.ty == TokenType::Name
                && is_declaration
                && !token.is_type
                && token.scope_depth == 0
            {
                let name = tokens.identifier_name_at(index).into_owned();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        let mut code = String::new();
        if tokens.token_at(end).ty != TokenType::Semi {
            code.push(';');
        }
        for name in &names {
            code.push_str(&format!(" exports.{} = {};", name, name));
        }
        root.tokens.append_code(&code);
        Ok(())
    }

    fn process_export_bindings(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let tokens = &root.tokens;
        let mut close = tokens.current_index() + 2;
        while !tokens.matches_at(close, &[TokenType::BraceR]) {
            if close >= tokens.tokens().len() {
                return Err(TransformError::invariant("Unterminated export specifiers."));
            }
            close += 1;
        }
        let source = next_non_type(root, close + 1);
        if tokens.matches_name_at(source, "from") {
            return self.process_reexport_bindings(root, source + 1);
        }

        root.tokens.remove_initial_token()?;
        let specifiers = collect_specifiers(root)?;
        if root.tokens.matches1(TokenType::Semi) {
            root.tokens.remove_token()?;
        }

        let mut statements = Vec::new();
        for (local, exported) in specifiers {
            let replacement = Self::processor(root)?
                .get_identifier_replacement(&local)
                .map(str::to_string);
            if replacement.is_none() {
                if let Some(declared) = &self.declared_values {
                    if !declared.contains(&local) {
                        continue;
                    }
                }
            }
            statements.push(format!(
                "{} = {};",
                export_target(&exported),
                replacement.unwrap_or(local)
            ));
        }
        root.tokens.append_code(&statements.join(" "));
        Ok(())
    }

    /// `export {a as b} from 'm'`: live getters on the module's bindings
    fn process_reexport_bindings(
        &self,
        root: &mut RootTransformer<'_>,
        source_index: usize,
    ) -> Result<()> {
        let path = unquote(root.tokens.raw_code(root.tokens.token_at(source_index))).to_string();
        root.tokens.remove_initial_token()?;
        let specifiers = collect_specifiers(root)?;
        while root.tokens.current_index() < source_index {
            root.tokens.remove_token()?;
        }

        let processor = Self::processor(root)?;
        let mut code = processor.claim_import_code(&path);
        let module = processor
            .module_name(&path)
            .ok_or_else(|| TransformError::invariant(format!("No module name for {}", path)))?
            .to_string();
        for (imported, exported) in specifiers {
            code.push_str(&format!(
                " Object.defineProperty(exports, {}, {{enumerable: true, get: function() {{ return {}.{}; }}}});",
                quote_name(&exported),
                module,
                imported
            ));
        }
        root.tokens.replace_token_trimming_left_whitespace(&code)?;
        if root.tokens.matches1(TokenType::Semi) {
            root.tokens.remove_token()?;
        }
        Ok(())
    }

    /// `export * from 'm'` and `export * as ns from 'm'`
    fn process_export_star(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let star = root.tokens.current_index() + 1;
        let namespace = if root.tokens.matches_name_at(star + 1, "as") {
            Some(root.tokens.identifier_name_at(star + 2).into_owned())
        } else {
            None
        };
        root.tokens.remove_initial_token()?;
        while !at_module_source(root) {
            if root.tokens.is_at_end() {
                return Err(TransformError::invariant("Expected a module source in export."));
            }
            root.tokens.remove_token()?;
        }
        let path = unquote(root.tokens.current_token_code()).to_string();

        let processor = Self::processor(root)?;
        let mut code = processor.claim_import_code(&path);
        let module = processor
            .module_name(&path)
            .ok_or_else(|| TransformError::invariant(format!("No module name for {}", path)))?
            .to_string();
        match namespace {
            Some(namespace) => code.push_str(&format!(" exports.{} = {};", namespace, module)),
            None => {
                let helper = processor
                    .export_star_helper()
                    .ok_or_else(|| TransformError::invariant("Missing export star helper."))?;
                code.push_str(&format!(" {}({});", helper, module));
            }
        }
        root.tokens.replace_token_trimming_left_whitespace(&code)?;
        if root.tokens.matches1(TokenType::Semi) {
            root.tokens.remove_token()?;
        }
        Ok(())
    }

    /// Remove the cursor's token through `last` inclusive
    fn remove_through(&self, root: &mut RootTransformer<'_>, last: usize) -> Result<()> {
        root.tokens.remove_initial_token()?;
        while root.tokens.current_index() <= last {
            root.tokens.remove_token()?;
        }
        Ok(())
    }
}

impl Transformer for ImportTransformer {
    fn process(&self, root: &mut RootTransformer<'_>) -> Result<bool> {
        let tokens = &root.tokens;
        let token = tokens.current_token();
        if token.is_type {
            return Ok(false);
        }
        match token.ty {
            TokenType::Import if token.scope_depth == 0 => {
                let next = tokens.token_at_relative_index(1).ty;
                if matches!(next, TokenType::ParenL | TokenType::Dot) {
                    return Ok(false);
                }
                self.process_import(root)?;
                Ok(true)
            }
            TokenType::Export if token.scope_depth == 0 => {
                self.process_export(root)?;
                Ok(true)
            }
            TokenType::Name | TokenType::JsxName => self.process_identifier(root),
            _ => Ok(false),
        }
    }

    fn prefix_code(&self, root: &RootTransformer<'_>) -> String {
        let mut prefix = String::new();
        if let Some(processor) = &root.import_processor {
            if processor.had_export {
                prefix.push_str("Object.defineProperty(exports, \"__esModule\", {value: true});");
            }
            prefix.push_str(&processor.helper_code());
        }
        for statement in self.hoisted_exports.borrow().iter() {
            prefix.push(' ');
            prefix.push_str(statement);
        }
        prefix
    }

    fn suffix_code(&self, root: &RootTransformer<'_>) -> String {
        match &root.import_processor {
            Some(processor)
                if self.add_module_exports
                    && processor.has_default_export
                    && !processor.has_named_exports =>
            {
                "\nmodule.exports = exports.default;\n".to_string()
            }
            _ => String::new(),
        }
    }
}

/// The cursor is on the quoted source of an import or export
fn at_module_source(root: &RootTransformer<'_>) -> bool {
    let tokens = &root.tokens;
    if !tokens.matches1(TokenType::String) || tokens.current_token().is_type {
        return false;
    }
    let index = tokens.current_index();
    index > 0
        && (tokens.matches_at(index - 1, &[TokenType::Import])
            || tokens.matches_name_at(index - 1, "from"))
}

fn next_non_type(root: &RootTransformer<'_>, mut index: usize) -> usize {
    while root.tokens.token_at(index).is_type {
        index += 1;
    }
    index
}

/// Remove `{ a, b as c }` at the cursor, returning `(local, exported)`
/// pairs. Type-only specifiers are dropped.
fn collect_specifiers(root: &mut RootTransformer<'_>) -> Result<Vec<(String, String)>> {
    let mut specifiers = Vec::new();
    if root.tokens.matches1(TokenType::BraceL) {
        root.tokens.remove_token()?;
    }
    loop {
        let token = root.tokens.current_token();
        match token.ty {
            TokenType::BraceR => {
                root.tokens.remove_token()?;
                return Ok(specifiers);
            }
            TokenType::Eof => {
                return Err(TransformError::invariant("Unterminated export specifiers."));
            }
            _ if token.is_type || token.ty == TokenType::Comma => root.tokens.remove_token()?,
            _ => {
                let local = specifier_name(root);
                root.tokens.remove_token()?;
                let mut exported = local.clone();
                if root.tokens.matches_name("as") && !root.tokens.current_token().is_type {
                    root.tokens.remove_token()?;
                    exported = specifier_name(root);
                    root.tokens.remove_token()?;
                }
                specifiers.push((local, exported));
            }
        }
    }
}

fn specifier_name(root: &RootTransformer<'_>) -> String {
    let tokens = &root.tokens;
    if tokens.matches1(TokenType::String) {
        tokens.current_token_code().to_string()
    } else {
        tokens.identifier_name().into_owned()
    }
}

/// `exports.name`, or `exports['a-b']` for a string export name
fn export_target(exported: &str) -> String {
    if exported.starts_with('"') || exported.starts_with('\'') {
        format!("exports[{}]", exported)
    } else {
        format!("exports.{}", exported)
    }
}

fn quote_name(name: &str) -> String {
    if name.starts_with('"') || name.starts_with('\'') {
        name.to_string()
    } else {
        format!("'{}'", name)
    }
}

/// Names of top-level value declarations outside import statements
fn collect_declared_values(code: &str, tokens: &[Token]) -> FxHashSet<String> {
    let mut declared = FxHashSet::default();
    let mut in_import = false;
    for (index, token) in tokens.iter().enumerate() {
        if token.is_type {
            continue;
        }
        if token.ty == TokenType::Import && token.scope_depth == 0 {
            let next = tokens.get(index + 1).map(|t| t.ty);
            in_import = !matches!(next, Some(TokenType::ParenL | TokenType::Dot));
            continue;
        }
        if in_import {
            if token.ty == TokenType::String {
                in_import = false;
            }
            continue;
        }
        let is_declaration = matches!(
            token.identifier_role,
            Some(IdentifierRole::FunctionScopedDeclaration | IdentifierRole::BlockScopedDeclaration)
        );
        if token.ty == TokenType::Name && is_declaration && token.scope_depth == 0 {
            declared.insert(token.text(code).to_string());
        }
    }
    declared
}
