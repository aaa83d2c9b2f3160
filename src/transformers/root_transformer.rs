//! Transform orchestrator
//!
//! Owns the token processor and the per-run helpers, drives the balanced
//! walk over the tokens, dispatches each token to the feature transformers
//! and rewrites classes itself. Assembles the final output from the
//! transformers' prefixes and suffixes around the rewritten body.

use std::rc::Rc;

use tracing::{debug, trace};

use super::class_info::{ClassInfo, get_class_info};
use super::display_name::ReactDisplayNameTransformer;
use super::flow::FlowTransformer;
use super::import_processor::ImportProcessor;
use super::imports::ImportTransformer;
use super::jsx::JsxTransformer;
use super::name_manager::NameManager;
use super::numeric_separator::NumericSeparatorTransformer;
use super::optional_catch_binding::OptionalCatchBindingTransformer;
use super::token_processor::TokenProcessor;
use super::typescript::TypeScriptTransformer;
use super::Transformer;
use crate::error::{Result, TransformError};
use crate::options::{Options, Transform};
use crate::parser::{Token, TokenType};
use crate::util::shebang_len;

pub struct RootTransformer<'a> {
    pub tokens: TokenProcessor<'a>,
    pub name_manager: NameManager,
    pub import_processor: Option<ImportProcessor>,
    pub options: &'a Options,
    transformers: Rc<[Box<dyn Transformer>]>,
    generated_variables: Vec<String>,
}

impl<'a> RootTransformer<'a> {
    pub fn new(code: &'a str, tokens: Vec<Token>, options: &'a Options) -> Result<Self> {
        let mut name_manager = NameManager::new(code, &tokens);
        let import_processor = if options.has(Transform::Imports) {
            Some(ImportProcessor::new(code, &tokens, options, &mut name_manager)?)
        } else {
            None
        };

        let mut transformers: Vec<Box<dyn Transformer>> = Vec::new();
        if options.has(Transform::Jsx) {
            transformers.push(Box::new(JsxTransformer::new(
                options,
                &tokens,
                &mut name_manager,
            )));
            transformers.push(Box::new(ReactDisplayNameTransformer::new(options)));
        }
        if options.has(Transform::Imports) {
            transformers.push(Box::new(ImportTransformer::new(code, &tokens, options)));
        }
        if options.has(Transform::Flow) {
            transformers.push(Box::new(FlowTransformer));
        }
        if options.has(Transform::TypeScript) {
            transformers.push(Box::new(TypeScriptTransformer));
        }
        transformers.push(Box::new(NumericSeparatorTransformer));
        transformers.push(Box::new(OptionalCatchBindingTransformer));

        Ok(RootTransformer {
            tokens: TokenProcessor::new(code, tokens),
            name_manager,
            import_processor,
            options,
            transformers: transformers.into(),
            generated_variables: Vec::new(),
        })
    }

    /// Rewrite the whole module
    pub fn transform(mut self) -> Result<String> {
        self.process_balanced_code()?;
        if !self.tokens.is_at_end() {
            return Err(TransformError::invariant("Unexpected closing token at top level."));
        }

        let transformers = Rc::clone(&self.transformers);
        let mut prefix = String::new();
        if self.options.has(Transform::Imports) {
            prefix.push_str("\"use strict\";");
        }
        for transformer in transformers.iter() {
            prefix.push_str(&transformer.prefix_code(&self));
        }
        for name in &self.generated_variables {
            prefix.push_str(&format!(" var {};", name));
        }
        let mut suffix = String::new();
        for transformer in transformers.iter() {
            suffix.push_str(&transformer.suffix_code(&self));
        }

        let code = self.tokens.code();
        let body = self.tokens.finish()?;
        let mut shebang = code[..shebang_len(code)].to_string();
        if !shebang.is_empty() && !shebang.ends_with('\n') {
            shebang.push('\n');
        }
        debug!(prefix = prefix.len(), suffix = suffix.len(), "assembled output");
        Ok(format!("{}{}{}{}", shebang, prefix, body, suffix))
    }

    /// Process tokens until a closing brace or paren would leave the
    /// current nesting level, or input ends. `${` counts as a brace.
    pub fn process_balanced_code(&mut self) -> Result<()> {
        let mut brace_depth = 0usize;
        let mut paren_depth = 0usize;
        while !self.tokens.is_at_end() {
            match self.tokens.current_token().ty {
                TokenType::BraceL | TokenType::DollarBraceL => brace_depth += 1,
                TokenType::BraceR => {
                    if brace_depth == 0 {
                        return Ok(());
                    }
                    brace_depth -= 1;
                }
                TokenType::ParenL => paren_depth += 1,
                TokenType::ParenR => {
                    if paren_depth == 0 {
                        return Ok(());
                    }
                    paren_depth -= 1;
                }
                _ => {}
            }
            self.process_token()?;
        }
        Ok(())
    }

    /// Handle the token at the cursor, consuming at least one token
    pub fn process_token(&mut self) -> Result<()> {
        let token = self.tokens.current_token();
        if token.ty == TokenType::Class && !token.is_type {
            return self.process_class();
        }
        let transformers = Rc::clone(&self.transformers);
        for transformer in transformers.iter() {
            if transformer.process(self)? {
                return Ok(());
            }
        }
        self.tokens.copy_token()
    }

    /// Remove a run of type tokens starting at the cursor
    pub fn process_possible_type_range(&mut self) -> Result<bool> {
        if !self.tokens.current_token().is_type {
            return Ok(false);
        }
        self.tokens.remove_initial_token()?;
        while self.tokens.current_token().is_type {
            self.tokens.remove_token()?;
        }
        Ok(true)
    }

    /// `(a): T\n=> a` must not keep a line break before `=>`, so the `)`
    /// moves next to the arrow.
    pub fn process_possible_arrow_param_end(&mut self) -> Result<bool> {
        let tokens = &self.tokens;
        if !tokens.matches(&[TokenType::ParenR, TokenType::Colon])
            || !tokens.token_at_relative_index(1).is_type
        {
            return Ok(false);
        }
        let mut next_non_type = tokens.current_index() + 1;
        while tokens.token_at(next_non_type).is_type {
            next_non_type += 1;
        }
        if !tokens.matches_at(next_non_type, &[TokenType::Arrow]) {
            return Ok(false);
        }
        self.tokens.remove_initial_token()?;
        while self.tokens.current_index() < next_non_type {
            self.tokens.remove_token()?;
        }
        self.tokens.replace_token_trimming_left_whitespace(") =>")?;
        Ok(true)
    }

    /// `async <T>(a) => a` loses its type parameters without leaving a
    /// gap between `async` and `(`.
    pub fn process_possible_async_arrow_with_type_params(&mut self) -> Result<bool> {
        let tokens = &self.tokens;
        let next = tokens.token_at_relative_index(1);
        if !tokens.matches_name("async")
            || tokens.current_token().is_type
            || next.ty != TokenType::LessThan
            || !next.is_type
        {
            return Ok(false);
        }
        let mut next_non_type = tokens.current_index() + 1;
        while tokens.token_at(next_non_type).is_type {
            next_non_type += 1;
        }
        if !tokens.matches_at(next_non_type, &[TokenType::ParenL]) {
            return Ok(false);
        }
        self.tokens.replace_token("async (")?;
        self.tokens.remove_initial_token()?;
        while self.tokens.current_index() < next_non_type {
            self.tokens.remove_token()?;
        }
        self.tokens.remove_token()?;
        // The `(` is gone, so the walk has to consume its `)` itself
        self.process_balanced_code()?;
        self.process_token()?;
        Ok(true)
    }

    /// Rewrite the class at the cursor: fields become constructor or
    /// trailing assignments.
    pub fn process_class(&mut self) -> Result<()> {
        let info = get_class_info(self)?;
        let needs_comma_expression =
            info.header.is_expression && !info.static_initializer_suffixes.is_empty();

        let mut class_name = info.header.class_name.clone();
        if needs_comma_expression {
            let name = self.name_manager.claim_free_name("_class");
            self.generated_variables.push(name.clone());
            self.tokens.append_code(&format!(" ({} =", name));
            class_name = Some(name);
        }
        trace!(name = ?class_name, fields = info.field_ranges.len(), "rewriting class");

        let context_id = self
            .tokens
            .current_token()
            .context_id
            .ok_or_else(|| TransformError::invariant("Expected class to have a context ID."))?;
        self.tokens.copy_expected_token(TokenType::Class)?;
        while !self
            .tokens
            .matches_context_id_and_type(TokenType::BraceL, context_id)
        {
            if self.tokens.is_at_end() {
                return Err(TransformError::invariant("Expected class body."));
            }
            self.process_token()?;
        }
        self.process_class_body(&info, context_id)?;

        if info.static_initializer_suffixes.is_empty() {
            return Ok(());
        }
        let class_name = class_name.ok_or_else(|| {
            TransformError::invariant("Expected class name for static initializers.")
        })?;
        let statements: Vec<String> = info
            .static_initializer_suffixes
            .iter()
            .map(|suffix| format!("{}{}", class_name, suffix))
            .collect();
        if needs_comma_expression {
            let mut code = String::from(", ");
            for statement in &statements {
                code.push_str(statement);
                code.push_str(", ");
            }
            code.push_str(&class_name);
            code.push(')');
            self.tokens.append_code(&code);
        } else {
            let code: Vec<String> = statements.iter().map(|s| format!("{};", s)).collect();
            self.tokens.append_code(&format!(" {}", code.join(" ")));
        }
        Ok(())
    }

    fn process_class_body(&mut self, info: &ClassInfo, class_context_id: u32) -> Result<()> {
        self.tokens.copy_expected_token(TokenType::BraceL)?;

        let needs_constructor_init = !info.initializer_statements.is_empty();
        let initializers_code = info.initializer_statements.join(";");
        if info.constructor_insert_pos.is_none() && needs_constructor_init {
            if info.header.has_superclass {
                let args = self.name_manager.claim_free_name("args");
                self.tokens.append_code(&format!(
                    "constructor(...{args}) {{ super(...{args}); {initializers_code}; }}"
                ));
            } else {
                self.tokens
                    .append_code(&format!("constructor() {{ {initializers_code}; }}"));
            }
        }

        let mut field_index = 0;
        while !self
            .tokens
            .matches_context_id_and_type(TokenType::BraceR, class_context_id)
        {
            if self.tokens.is_at_end() {
                return Err(TransformError::invariant("Unexpected end of input in class body."));
            }
            let index = self.tokens.current_index();
            match info.field_ranges.get(field_index) {
                Some(range) if range.start == index => {
                    self.tokens.remove_initial_token()?;
                    while self.tokens.current_index() < range.end {
                        self.tokens.remove_token()?;
                    }
                    field_index += 1;
                    continue;
                }
                _ => {}
            }
            if Some(index) == info.constructor_insert_pos {
                self.tokens.copy_token()?;
                if needs_constructor_init {
                    self.tokens.append_code(&format!(";{};", initializers_code));
                }
                continue;
            }
            self.process_token()?;
        }
        self.tokens.copy_expected_token(TokenType::BraceR)
    }
}
