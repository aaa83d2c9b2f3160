//! Inferred `displayName` for React classes
//!
//! `const Foo = React.createClass({...})` gets `displayName: 'Foo'` added
//! to its spec object, unless the object already names itself. The name
//! comes from the assignment target, the enclosing object key, or for a
//! default export from the file name.

use super::Transformer;
use super::root_transformer::RootTransformer;
use crate::error::{Result, TransformError};
use crate::options::Options;
use crate::parser::{IdentifierRole, TokenType};

pub struct ReactDisplayNameTransformer {
    file_path: Option<String>,
}

impl ReactDisplayNameTransformer {
    pub fn new(options: &Options) -> Self {
        ReactDisplayNameTransformer {
            file_path: options.file_path.clone(),
        }
    }

    fn try_process_create_class_call(
        &self,
        root: &mut RootTransformer<'_>,
        start: usize,
    ) -> Result<()> {
        let Some(display_name) = self.find_display_name(root, start) else {
            return Ok(());
        };
        if !class_needs_display_name(root)? {
            return Ok(());
        }
        root.tokens.copy_expected_token(TokenType::ParenL)?;
        root.tokens.copy_expected_token(TokenType::BraceL)?;
        root.tokens
            .append_code(&format!("displayName: '{}',", display_name));
        root.process_balanced_code()?;
        root.tokens.copy_expected_token(TokenType::BraceR)?;
        root.tokens.copy_expected_token(TokenType::ParenR)
    }

    fn find_display_name(&self, root: &RootTransformer<'_>, start: usize) -> Option<String> {
        let tokens = &root.tokens;
        let before = start.checked_sub(2)?;
        if tokens.matches_at(before, &[TokenType::Name, TokenType::Eq]) {
            return Some(tokens.identifier_name_at(before).into_owned());
        }
        if tokens.token_at(before).identifier_role == Some(IdentifierRole::ObjectKey) {
            return Some(tokens.identifier_name_at(before).into_owned());
        }
        if tokens.matches_at(before, &[TokenType::Export, TokenType::Default]) {
            return Some(self.display_name_from_file_path());
        }
        None
    }

    /// `components/Foo.js` gives `Foo`, `components/Foo/index.js` gives `Foo`
    fn display_name_from_file_path(&self) -> String {
        let path = self.file_path.as_deref().unwrap_or("unknown");
        let segments: Vec<&str> = path.split('/').collect();
        let file_name = segments.last().copied().unwrap_or(path);
        let base = match file_name.rfind('.') {
            Some(dot) => &file_name[..dot],
            None => file_name,
        };
        if base == "index" && segments.len() >= 2 && !segments[segments.len() - 2].is_empty() {
            segments[segments.len() - 2].to_string()
        } else {
            base.to_string()
        }
    }
}

impl Transformer for ReactDisplayNameTransformer {
    fn process(&self, root: &mut RootTransformer<'_>) -> Result<bool> {
        let tokens = &root.tokens;
        let start = tokens.current_index();
        if !tokens.matches1(TokenType::Name) || tokens.current_token().is_type {
            return Ok(false);
        }

        if tokens.identifier_name() == "createReactClass" {
            let replacement = root
                .import_processor
                .as_ref()
                .and_then(|processor| processor.get_identifier_replacement("createReactClass"))
                .map(|name| format!("(0, {})", name));
            match replacement {
                Some(replacement) => root.tokens.replace_token(&replacement)?,
                None => root.tokens.copy_token()?,
            }
            self.try_process_create_class_call(root, start)?;
            return Ok(true);
        }

        if tokens.matches(&[TokenType::Name, TokenType::Dot, TokenType::Name])
            && tokens.identifier_name() == "React"
            && tokens.identifier_name_at(start + 2) == "createClass"
        {
            let react = root
                .import_processor
                .as_ref()
                .and_then(|processor| processor.get_identifier_replacement("React"))
                .unwrap_or("React")
                .to_string();
            root.tokens.replace_token(&react)?;
            root.tokens.copy_token()?;
            root.tokens.copy_token()?;
            self.try_process_create_class_call(root, start)?;
            return Ok(true);
        }
        Ok(false)
    }
}

/// `({...})` with no `displayName` key of its own and no other argument
fn class_needs_display_name(root: &RootTransformer<'_>) -> Result<bool> {
    let tokens = &root.tokens;
    if !tokens.matches(&[TokenType::ParenL, TokenType::BraceL]) {
        return Ok(false);
    }
    let object_start = tokens.current_index() + 1;
    let object_id = tokens
        .token_at(object_start)
        .context_id
        .ok_or_else(|| {
            TransformError::invariant("Expected non-null context ID on object open-brace.")
        })?;

    let mut index = object_start + 1;
    loop {
        let token = tokens.token_at(index);
        if token.ty == TokenType::Eof {
            return Err(TransformError::invariant(
                "Unexpected end of input when processing React class.",
            ));
        }
        if token.ty == TokenType::BraceR && token.context_id == Some(object_id) {
            index += 1;
            break;
        }
        if token.context_id == Some(object_id)
            && token.identifier_role == Some(IdentifierRole::ObjectKey)
            && tokens.identifier_name_at(index) == "displayName"
        {
            return Ok(false);
        }
        index += 1;
    }
    Ok(tokens.matches_at(index, &[TokenType::ParenR])
        || tokens.matches_at(index, &[TokenType::Comma, TokenType::ParenR]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_path(path: Option<&str>) -> ReactDisplayNameTransformer {
        ReactDisplayNameTransformer {
            file_path: path.map(str::to_string),
        }
    }

    #[test]
    fn test_display_name_from_file_path() {
        assert_eq!(with_path(Some("src/Foo.js")).display_name_from_file_path(), "Foo");
        assert_eq!(with_path(Some("src/Bar/index.jsx")).display_name_from_file_path(), "Bar");
        assert_eq!(with_path(Some("index.js")).display_name_from_file_path(), "index");
        assert_eq!(with_path(None).display_name_from_file_path(), "unknown");
    }
}
