//! Class field analysis
//!
//! Scans a class once, ahead of emitting it, to find out which members are
//! fields (to be deleted and re-emitted as assignments), where constructor
//! initializers go, and what must run after the class body for static
//! fields. Field initializers are transformed during the scan so nested
//! JSX, imports and classes inside them come out rewritten; the scan then
//! rewinds and the output it produced is discarded.

use tracing::trace;

use super::root_transformer::RootTransformer;
use crate::error::{Result, TransformError};
use crate::parser::TokenType;

/// Words that can precede a member name without being the name
const MEMBER_MODIFIERS: &[&str] = &["static", "async", "get", "set", "accessor"];

/// TypeScript modifiers that turn a constructor parameter into a property
const PARAM_PROPERTY_MODIFIERS: &[&str] =
    &["public", "private", "protected", "readonly", "override"];

#[derive(Debug, Clone)]
pub struct ClassHeaderInfo {
    pub is_expression: bool,
    pub class_name: Option<String>,
    pub has_superclass: bool,
}

/// Half-open `[start, end)` token range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub header: ClassHeaderInfo,
    /// Statements run at the start of the constructor, e.g. `this.x = 1`
    pub initializer_statements: Vec<String>,
    /// Appended to the class name after the body, e.g. `.y = 2`
    pub static_initializer_suffixes: Vec<String>,
    /// Token after which initializers are inserted; `None` means a
    /// constructor has to be synthesized
    pub constructor_insert_pos: Option<usize>,
    pub field_ranges: Vec<TokenRange>,
}

/// Analyze the class whose `class` keyword is at the cursor. The cursor
/// and output are left exactly as they were.
pub fn get_class_info(root: &mut RootTransformer<'_>) -> Result<ClassInfo> {
    let snapshot = root.tokens.snapshot();
    let result = scan_class(root);
    root.tokens.restore(snapshot);
    result
}

fn scan_class(root: &mut RootTransformer<'_>) -> Result<ClassInfo> {
    let header = process_class_header(root)?;
    let class_context_id = root
        .tokens
        .current_token()
        .context_id
        .ok_or_else(|| {
            TransformError::invariant("Expected non-null class context ID on class open-brace.")
        })?;
    root.tokens.next_token()?;

    let mut initializer_statements = Vec::new();
    let mut static_initializer_suffixes = Vec::new();
    let mut constructor_insert_pos = None;
    let mut field_ranges = Vec::new();

    while !root
        .tokens
        .matches_context_id_and_type(TokenType::BraceR, class_context_id)
    {
        if root.tokens.is_at_end() {
            return Err(TransformError::invariant("Unexpected end of input in class body."));
        }
        let tokens = &root.tokens;
        if tokens.current_token().is_type {
            root.tokens.next_token()?;
            continue;
        }
        if tokens.matches1(TokenType::Semi) {
            let index = tokens.current_index();
            field_ranges.push(TokenRange {
                start: index,
                end: index + 1,
            });
            root.tokens.next_token()?;
            continue;
        }
        if tokens.matches_name("static")
            && tokens.matches_at(tokens.current_index() + 1, &[TokenType::BraceL])
        {
            // Static block: `static` then a context-stamped body
            root.tokens.next_token()?;
            skip_past_matching_context(root)?;
            continue;
        }

        let statement_start = root.tokens.current_index();
        let mut is_static = false;
        while is_member_modifier(root) {
            if root.tokens.matches_name("static") {
                is_static = true;
            }
            root.tokens.next_token()?;
        }

        if root.tokens.matches_name("constructor") {
            let (statements, insert_pos) = process_constructor(root)?;
            initializer_statements.splice(0..0, statements);
            constructor_insert_pos = Some(insert_pos);
            continue;
        }

        if root.tokens.matches1(TokenType::PrivateName) {
            skip_member(root)?;
            continue;
        }

        let name_code = get_name_code(root)?;
        skip_types(root)?;
        if root.tokens.matches1(TokenType::ParenL) {
            skip_method_rest(root)?;
            continue;
        }

        if root.tokens.matches1(TokenType::Eq) {
            let value_end = root
                .tokens
                .current_token()
                .rhs_end_index
                .ok_or_else(|| {
                    TransformError::invariant("Expected rhs_end_index on class field assignment.")
                })?;
            root.tokens.next_token()?;
            let result_start = root.tokens.result_len();
            while root.tokens.current_index() < value_end {
                root.process_token()?;
            }
            let expression_code = root.tokens.code_since(result_start).trim_start().to_string();
            if is_static {
                static_initializer_suffixes.push(format!("{} = {}", name_code, expression_code));
            } else {
                initializer_statements.push(format!("this{} = {}", name_code, expression_code));
            }
        }
        field_ranges.push(TokenRange {
            start: statement_start,
            end: root.tokens.current_index(),
        });
    }

    trace!(
        fields = field_ranges.len(),
        initializers = initializer_statements.len(),
        statics = static_initializer_suffixes.len(),
        "class scanned"
    );
    Ok(ClassInfo {
        header,
        initializer_statements,
        static_initializer_suffixes,
        constructor_insert_pos,
        field_ranges,
    })
}

/// Read the class name and superclass, stopping on the body's `{`
fn process_class_header(root: &mut RootTransformer<'_>) -> Result<ClassHeaderInfo> {
    let class_token = root.tokens.current_token();
    let context_id = class_token
        .context_id
        .ok_or_else(|| TransformError::invariant("Expected class to have a context ID."))?;
    let is_expression = class_token.is_expression;
    root.tokens.next_token()?;

    let mut class_name = None;
    if root.tokens.matches1(TokenType::Name) && !root.tokens.current_token().is_type {
        class_name = Some(root.tokens.identifier_name().into_owned());
    }
    let mut has_superclass = false;
    while !root
        .tokens
        .matches_context_id_and_type(TokenType::BraceL, context_id)
    {
        if root.tokens.is_at_end() {
            return Err(TransformError::invariant("Expected class body."));
        }
        if root.tokens.matches1(TokenType::Extends) && !root.tokens.current_token().is_type {
            has_superclass = true;
        }
        root.tokens.next_token()?;
    }
    Ok(ClassHeaderInfo {
        is_expression,
        class_name,
        has_superclass,
    })
}

/// Is the cursor on a modifier (rather than the member name itself)?
fn is_member_modifier(root: &RootTransformer<'_>) -> bool {
    let tokens = &root.tokens;
    let token = tokens.current_token();
    if token.is_type && token.ty == TokenType::Name {
        return true;
    }
    if token.ty == TokenType::Star {
        return true;
    }
    if token.ty != TokenType::Name || !MEMBER_MODIFIERS.contains(&tokens.raw_code(token)) {
        return false;
    }
    let next = tokens.token_at(tokens.current_index() + 1);
    !matches!(
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
    )
}

/// The member name as a property access suffix: `.x`, `['x']`, `[1]` or
/// the computed `[expr]` as written.
fn get_name_code(root: &mut RootTransformer<'_>) -> Result<String> {
    let token = root.tokens.current_token();
    let (ty, start) = (token.ty, token.start);
    match ty {
        TokenType::BracketL => {
            let mut depth = 0usize;
            loop {
                let token = root.tokens.current_token();
                match token.ty {
                    TokenType::BracketL => depth += 1,
                    TokenType::BracketR => {
                        depth -= 1;
                        if depth == 0 {
                            let end = token.end;
                            root.tokens.next_token()?;
                            return Ok(root.tokens.code()[start..end].to_string());
                        }
                    }
                    TokenType::Eof => {
                        return Err(TransformError::invariant(
                            "Unterminated computed class member name.",
                        ));
                    }
                    _ => {}
                }
                root.tokens.next_token()?;
            }
        }
        TokenType::String | TokenType::Num | TokenType::BigInt => {
            let code = format!("[{}]", root.tokens.current_token_code());
            root.tokens.next_token()?;
            Ok(code)
        }
        _ => {
            let code = format!(".{}", root.tokens.identifier_name());
            root.tokens.next_token()?;
            Ok(code)
        }
    }
}

fn skip_types(root: &mut RootTransformer<'_>) -> Result<()> {
    while root.tokens.current_token().is_type {
        root.tokens.next_token()?;
    }
    Ok(())
}

/// From a context-stamped opener, move just past its closer
fn skip_past_matching_context(root: &mut RootTransformer<'_>) -> Result<()> {
    let close = root
        .tokens
        .find_matching_context(root.tokens.current_index())
        .ok_or_else(|| TransformError::invariant("Expected a matching context token."))?;
    while root.tokens.current_index() <= close {
        root.tokens.next_token()?;
    }
    Ok(())
}

/// Skip a method's parameter list, return type and body
fn skip_method_rest(root: &mut RootTransformer<'_>) -> Result<()> {
    skip_past_matching_context(root)?;
    skip_types(root)?;
    if root.tokens.matches1(TokenType::BraceL) {
        skip_past_matching_context(root)?;
    }
    Ok(())
}

/// Skip a member left as is, like `#x = 1;` or `#m() {}`
fn skip_member(root: &mut RootTransformer<'_>) -> Result<()> {
    root.tokens.next_token()?;
    skip_types(root)?;
    if root.tokens.matches1(TokenType::ParenL) {
        return skip_method_rest(root);
    }
    if root.tokens.matches1(TokenType::Eq) {
        let value_end = root
            .tokens
            .current_token()
            .rhs_end_index
            .ok_or_else(|| {
                TransformError::invariant("Expected rhs_end_index on class field assignment.")
            })?;
        while root.tokens.current_index() < value_end {
            root.tokens.next_token()?;
        }
    }
    if root.tokens.matches1(TokenType::Semi) {
        root.tokens.next_token()?;
    }
    Ok(())
}

/// Collect `this.x = x` for parameter properties and find where field
/// initializers go: right after the body's `{`, or after the first
/// `super(...)` call.
fn process_constructor(root: &mut RootTransformer<'_>) -> Result<(Vec<String>, usize)> {
    root.tokens.next_token()?;
    skip_types(root)?;
    let params_start = root.tokens.current_index();
    let params_end = root
        .tokens
        .find_matching_context(params_start)
        .ok_or_else(|| {
            TransformError::invariant("Expected context ID on constructor parameters.")
        })?;

    let mut statements = Vec::new();
    let mut index = params_start + 1;
    while index < params_end {
        let tokens = &root.tokens;
        let token = tokens.token_at(index);
        let is_modifier =
            token.is_type && PARAM_PROPERTY_MODIFIERS.contains(&tokens.raw_code(token));
        if !is_modifier {
            index += 1;
            continue;
        }
        while tokens.token_at(index).is_type
            && PARAM_PROPERTY_MODIFIERS.contains(&tokens.raw_code(tokens.token_at(index)))
        {
            index += 1;
        }
        if !tokens.matches_at(index, &[TokenType::Name]) || tokens.token_at(index).is_type {
            return Err(TransformError::invariant(
                "Expected identifier after access modifiers in constructor arg.",
            ));
        }
        let name = tokens.identifier_name_at(index);
        statements.push(format!("this.{} = {}", name, name));
        index += 1;
    }
    while root.tokens.current_index() <= params_end {
        root.tokens.next_token()?;
    }
    skip_types(root)?;

    let body_start = root.tokens.current_index();
    let body_end = root
        .tokens
        .find_matching_context(body_start)
        .ok_or_else(|| TransformError::invariant("Expected context ID on constructor body."))?;
    let mut insert_pos = body_start;
    let tokens = &root.tokens;
    let mut index = body_start + 1;
    while index < body_end {
        if tokens.matches_at(index, &[TokenType::Super, TokenType::ParenL]) {
            let mut depth = 0usize;
            let mut close = index + 1;
            while close < body_end {
                match tokens.token_at(close).ty {
                    TokenType::ParenL => depth += 1,
                    TokenType::ParenR => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                close += 1;
            }
            insert_pos = close;
            break;
        }
        index += 1;
    }
    while root.tokens.current_index() <= body_end {
        root.tokens.next_token()?;
    }
    Ok((statements, insert_pos))
}
