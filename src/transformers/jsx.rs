//! JSX to factory calls
//!
//! `<div a="1">hi</div>` becomes `React.createElement('div', {a: "1",}, "hi")`.
//! Text runs are normalized the way React does it, and every removed text
//! run leaves behind the same number of line breaks so the output keeps
//! the input's line numbers.

use super::Transformer;
use super::jsx_entities;
use super::name_manager::NameManager;
use super::root_transformer::RootTransformer;
use crate::error::{Result, TransformError};
use crate::options::Options;
use crate::parser::{Token, TokenType};

/// A pragma split at its first dot: `React.createElement` is base `React`
/// with suffix `.createElement`
#[derive(Debug, Clone)]
struct Pragma {
    base: String,
    suffix: String,
}

impl Pragma {
    fn parse(pragma: &str) -> Self {
        match pragma.find('.') {
            Some(dot) => Pragma {
                base: pragma[..dot].to_string(),
                suffix: pragma[dot..].to_string(),
            },
            None => Pragma {
                base: pragma.to_string(),
                suffix: String::new(),
            },
        }
    }

    /// The base may be an imported binding that the import pass renames
    fn resolve(&self, root: &RootTransformer<'_>) -> String {
        let base = root
            .import_processor
            .as_ref()
            .and_then(|processor| processor.get_identifier_replacement(&self.base))
            .unwrap_or(&self.base);
        format!("{}{}", base, self.suffix)
    }
}

pub struct JsxTransformer {
    pragma: Pragma,
    fragment_pragma: Pragma,
    file_path: Option<String>,
    /// Variable holding the file name for `__source`, when debug props are on
    filename_var: Option<String>,
}

impl JsxTransformer {
    pub fn new(options: &Options, tokens: &[Token], name_manager: &mut NameManager) -> Self {
        let has_jsx = tokens.iter().any(|t| t.ty == TokenType::JsxTagStart);
        let filename_var = match &options.file_path {
            Some(_) if has_jsx => Some(name_manager.claim_free_name("_jsxFileName")),
            _ => None,
        };
        JsxTransformer {
            pragma: Pragma::parse(&options.jsx_pragma),
            fragment_pragma: Pragma::parse(&options.jsx_fragment_pragma),
            file_path: options.file_path.clone(),
            filename_var,
        }
    }

    fn dev_props(&self, root: &mut RootTransformer<'_>, element_start: usize) -> Option<String> {
        let filename_var = self.filename_var.as_ref()?;
        let line = root.tokens.line_number_for_index(element_start);
        Some(format!(
            "__self: this, __source: {{fileName: {}, lineNumber: {}}}",
            filename_var, line
        ))
    }

    fn process_jsx_tag(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let element_start = root.tokens.current_token().start;
        let factory = self.pragma.resolve(root);
        root.tokens.replace_token(&format!("{}(", factory))?;

        if root.tokens.matches1(TokenType::JsxTagEnd) {
            // Fragment
            let fragment = self.fragment_pragma.resolve(root);
            root.tokens.replace_token(&format!("{}, null", fragment))?;
            self.process_children(root)?;
            return self.process_closing_tag(root);
        }

        self.process_tag_intro(root)?;
        self.process_props(root, element_start)?;
        if root.tokens.matches(&[TokenType::Slash, TokenType::JsxTagEnd]) {
            root.tokens.replace_token("")?;
            root.tokens.replace_token(")")?;
            Ok(())
        } else if root.tokens.matches1(TokenType::JsxTagEnd) {
            root.tokens.replace_token("")?;
            self.process_children(root)?;
            self.process_closing_tag(root)
        } else {
            Err(TransformError::invariant("Expected either /> or > at the end of the tag."))
        }
    }

    /// Drop `</name>` and close the call in its place
    fn process_closing_tag(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        while !root.tokens.matches1(TokenType::JsxTagEnd) {
            if root.tokens.is_at_end() {
                return Err(TransformError::invariant("Unterminated JSX closing tag."));
            }
            root.tokens.replace_token("")?;
        }
        root.tokens.replace_token(")")
    }

    /// The element name: a lowercase single name is an intrinsic element
    /// and becomes a string, everything else stays a reference.
    fn process_tag_intro(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let tokens = &root.tokens;
        let start = tokens.current_index();
        let mut intro_end = start + 1;
        while tokens.token_at(intro_end).is_type
            || !(tokens.matches_at(intro_end - 1, &[TokenType::JsxName, TokenType::JsxName])
                || tokens.matches_at(intro_end, &[TokenType::BraceL])
                || tokens.matches_at(intro_end, &[TokenType::JsxTagEnd])
                || tokens.matches_at(intro_end, &[TokenType::Slash, TokenType::JsxTagEnd]))
        {
            if intro_end >= tokens.tokens().len() {
                return Err(TransformError::invariant("Unterminated JSX tag."));
            }
            intro_end += 1;
        }

        if intro_end == start + 1 {
            let name = tokens.identifier_name();
            if name.starts_with(|c: char| c.is_ascii_lowercase()) {
                let quoted = format!("'{}'", name);
                root.tokens.replace_token(&quoted)?;
            }
        } else if intro_end == start + 3
            && tokens.matches_at(start, &[TokenType::JsxName, TokenType::Colon, TokenType::JsxName])
        {
            let quoted = format!(
                "'{}:{}'",
                tokens.identifier_name_at(start),
                tokens.identifier_name_at(start + 2)
            );
            root.tokens.replace_token(&quoted)?;
            root.tokens.remove_token()?;
            root.tokens.remove_token()?;
        }
        while root.tokens.current_index() < intro_end {
            root.process_token()?;
        }
        Ok(())
    }

    fn process_props(&self, root: &mut RootTransformer<'_>, element_start: usize) -> Result<()> {
        let dev_props = self.dev_props(root, element_start);
        if !root.tokens.matches1(TokenType::JsxName) && !root.tokens.matches1(TokenType::BraceL) {
            match &dev_props {
                Some(dev_props) => root.tokens.append_code(&format!(", {{{}}}", dev_props)),
                None => root.tokens.append_code(", null"),
            }
            return Ok(());
        }

        root.tokens.append_code(", {");
        loop {
            if root.tokens.matches1(TokenType::JsxName) {
                self.process_prop_key_name(root)?;
                if root.tokens.matches1(TokenType::Eq) {
                    root.tokens.replace_token(": ")?;
                    if root.tokens.matches1(TokenType::BraceL) {
                        self.process_expression_container(root)?;
                    } else if root.tokens.matches1(TokenType::JsxTagStart) {
                        self.process_jsx_tag(root)?;
                    } else {
                        self.process_string_prop_value(root)?;
                    }
                } else {
                    root.tokens.append_code(": true");
                }
            } else if root.tokens.matches1(TokenType::BraceL) {
                // Spread attribute, copied into the object as is
                self.process_expression_container(root)?;
            } else {
                break;
            }
            root.tokens.append_code(",");
        }
        match &dev_props {
            Some(dev_props) => root.tokens.append_code(&format!(" {}}}", dev_props)),
            None => root.tokens.append_code("}"),
        }
        Ok(())
    }

    /// `{expr}` with the braces dropped
    fn process_expression_container(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        root.tokens.replace_token("")?;
        root.process_balanced_code()?;
        root.tokens.replace_token("")
    }

    fn process_prop_key_name(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let tokens = &root.tokens;
        if tokens.matches(&[TokenType::JsxName, TokenType::Colon, TokenType::JsxName]) {
            let index = tokens.current_index();
            let key = format!(
                "'{}:{}'",
                tokens.identifier_name_at(index),
                tokens.identifier_name_at(index + 2)
            );
            root.tokens.replace_token(&key)?;
            root.tokens.remove_token()?;
            return root.tokens.remove_token();
        }
        let name = tokens.identifier_name();
        if name.contains('-') {
            let key = format!("'{}'", name);
            root.tokens.replace_token(&key)
        } else {
            root.tokens.copy_token()
        }
    }

    fn process_string_prop_value(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let raw = root.tokens.current_token_code();
        let value = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
        let code = format!(
            "{}{}",
            format_jsx_string_value_literal(value),
            format_jsx_text_replacement(value)
        );
        root.tokens.replace_token(&code)
    }

    fn process_children(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        loop {
            if root.tokens.matches(&[TokenType::JsxTagStart, TokenType::Slash]) {
                return Ok(());
            }
            if root.tokens.matches(&[TokenType::BraceL, TokenType::BraceR]) {
                // Empty container, usually a comment
                root.tokens.replace_token("")?;
                root.tokens.replace_token("")?;
            } else if root.tokens.matches1(TokenType::BraceL) {
                root.tokens.replace_token(", ")?;
                root.process_balanced_code()?;
                root.tokens.replace_token("")?;
            } else if root.tokens.matches1(TokenType::JsxTagStart) {
                root.tokens.append_code(", ");
                self.process_jsx_tag(root)?;
            } else if root.tokens.matches1(TokenType::JsxText) {
                self.process_child_text(root)?;
            } else {
                return Err(TransformError::invariant(
                    "Unexpected token when processing JSX children.",
                ));
            }
        }
    }

    fn process_child_text(&self, root: &mut RootTransformer<'_>) -> Result<()> {
        let text = root.tokens.current_token_code();
        let literal = format_jsx_text_literal(text);
        let replacement = format_jsx_text_replacement(text);
        if literal == "\"\"" {
            root.tokens.replace_token(&replacement)
        } else {
            root.tokens
                .replace_token(&format!(", {}{}", literal, replacement))
        }
    }
}

impl Transformer for JsxTransformer {
    fn process(&self, root: &mut RootTransformer<'_>) -> Result<bool> {
        if !root.tokens.matches1(TokenType::JsxTagStart) {
            return Ok(false);
        }
        self.process_jsx_tag(root)?;
        Ok(true)
    }

    fn prefix_code(&self, _root: &RootTransformer<'_>) -> String {
        match (&self.filename_var, &self.file_path) {
            (Some(var), Some(path)) => format!("const {} = {};", var, json_string(path.clone())),
            _ => String::new(),
        }
    }
}

fn json_string(value: String) -> String {
    serde_json::Value::String(value).to_string()
}

/// String literal for a JSX text child.
///
/// Whitespace containing a line break is dropped, except that a single
/// space separates two non-blank lines. Whitespace on the first and last
/// line, next to the tags, is kept.
pub fn format_jsx_text_literal(text: &str) -> String {
    let mut result = String::new();
    let mut whitespace = String::new();
    let mut in_initial_line_whitespace = false;
    let mut seen_non_whitespace = false;
    let mut i = 0;
    while i < text.len() {
        let Some(c) = text[i..].chars().next() else {
            break;
        };
        match c {
            ' ' | '\t' | '\r' => {
                if !in_initial_line_whitespace {
                    whitespace.push(c);
                }
            }
            '\n' => {
                whitespace.clear();
                in_initial_line_whitespace = true;
            }
            _ => {
                if seen_non_whitespace && in_initial_line_whitespace {
                    result.push(' ');
                }
                result.push_str(&whitespace);
                whitespace.clear();
                if c == '&' {
                    let (entity, next) = process_entity(text, i + 1);
                    result.push_str(&entity);
                    i = next;
                    seen_non_whitespace = true;
                    in_initial_line_whitespace = false;
                    continue;
                }
                result.push(c);
                seen_non_whitespace = true;
                in_initial_line_whitespace = false;
            }
        }
        i += c.len_utf8();
    }
    if !in_initial_line_whitespace {
        result.push_str(&whitespace);
    }
    json_string(result)
}

/// String literal for a quoted attribute value: a line break followed by
/// indentation collapses to one space.
pub fn format_jsx_string_value_literal(text: &str) -> String {
    let mut result = String::new();
    let mut i = 0;
    while i < text.len() {
        let Some(c) = text[i..].chars().next() else {
            break;
        };
        match c {
            '\n' => {
                let rest = &text[i + 1..];
                if rest.starts_with(char::is_whitespace) {
                    result.push(' ');
                    let skipped = rest.len() - rest.trim_start().len();
                    i += 1 + skipped;
                    continue;
                }
                result.push('\n');
            }
            '&' => {
                let (entity, next) = process_entity(text, i + 1);
                result.push_str(&entity);
                i = next;
                continue;
            }
            _ => result.push(c),
        }
        i += c.len_utf8();
    }
    json_string(result)
}

/// Newlines and trailing spaces standing in for a removed text run
pub fn format_jsx_text_replacement(text: &str) -> String {
    let mut newlines = 0;
    let mut spaces = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            spaces = 0;
        } else if c == ' ' {
            spaces += 1;
        }
    }
    format!("{}{}", "\n".repeat(newlines), " ".repeat(spaces))
}

/// Decode the character reference after the `&` at `after_amp - 1`.
/// Returns the text to emit and where to continue. An unknown reference
/// yields just `&`, resuming right after it.
fn process_entity(text: &str, after_amp: usize) -> (String, usize) {
    let bytes = text.as_bytes();
    let mut i = after_amp;
    let mut entity = None;

    if bytes.get(i) == Some(&b'#') {
        i += 1;
        let radix = if bytes.get(i) == Some(&b'x') {
            i += 1;
            16
        } else {
            10
        };
        let digits_start = i;
        while i < bytes.len() && (bytes[i] as char).is_digit(radix) {
            i += 1;
        }
        if bytes.get(i) == Some(&b';') && i > digits_start {
            entity = u32::from_str_radix(&text[digits_start..i], radix)
                .ok()
                .and_then(char::from_u32);
            i += 1;
        }
    } else {
        let mut count = 0;
        while i < bytes.len() && count < 10 {
            count += 1;
            let ch = bytes[i];
            i += 1;
            if ch == b';' {
                entity = text
                    .get(after_amp..i - 1)
                    .and_then(jsx_entities::lookup);
                break;
            }
        }
    }

    match entity {
        Some(c) => (c.to_string(), i),
        None => ("&".to_string(), after_amp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_literal_trims_lines() {
        assert_eq!(format_jsx_text_literal("hello"), "\"hello\"");
        assert_eq!(format_jsx_text_literal("\n  "), "\"\"");
        assert_eq!(format_jsx_text_literal("\n  a\n  b\n"), "\"a b\"");
        assert_eq!(format_jsx_text_literal(" a "), "\" a \"");
        assert_eq!(format_jsx_text_literal("a\n\n\n b"), "\"a b\"");
    }

    #[test]
    fn test_entities() {
        assert_eq!(format_jsx_text_literal("&amp;"), "\"&\"");
        assert_eq!(format_jsx_text_literal("&#65;"), "\"A\"");
        assert_eq!(format_jsx_text_literal("&#x41;"), "\"A\"");
        assert_eq!(format_jsx_text_literal("a &lt; b"), "\"a < b\"");
    }

    #[test]
    fn test_unresolved_entity_keeps_text() {
        assert_eq!(format_jsx_text_literal("&zzz;"), "\"&zzz;\"");
        assert_eq!(format_jsx_text_literal("&#;"), "\"&#;\"");
        assert_eq!(format_jsx_text_literal("a & b"), "\"a & b\"");
        // No `;` within ten characters
        assert_eq!(format_jsx_text_literal("&abcdefghijkl;"), "\"&abcdefghijkl;\"");
    }

    #[test]
    fn test_string_value_literal() {
        assert_eq!(format_jsx_string_value_literal("a\n   b"), "\"a b\"");
        assert_eq!(format_jsx_string_value_literal("a\nb"), "\"a\\nb\"");
        assert_eq!(format_jsx_string_value_literal("&quot;"), "\"\\\"\"");
    }

    #[test]
    fn test_text_replacement() {
        assert_eq!(format_jsx_text_replacement("hello"), "");
        assert_eq!(format_jsx_text_replacement("a\n  b  "), "\n    ");
        assert_eq!(format_jsx_text_replacement("\n\n"), "\n\n");
    }

    #[test]
    fn test_pragma_parse() {
        let pragma = Pragma::parse("React.createElement");
        assert_eq!(pragma.base, "React");
        assert_eq!(pragma.suffix, ".createElement");
        let pragma = Pragma::parse("h");
        assert_eq!(pragma.base, "h");
        assert_eq!(pragma.suffix, "");
    }
}
