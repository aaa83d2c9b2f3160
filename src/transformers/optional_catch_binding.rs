//! `catch {` to `catch (e) {`

use super::Transformer;
use super::root_transformer::RootTransformer;
use crate::error::Result;
use crate::parser::TokenType;

pub struct OptionalCatchBindingTransformer;

impl Transformer for OptionalCatchBindingTransformer {
    fn process(&self, root: &mut RootTransformer<'_>) -> Result<bool> {
        if !root.tokens.matches(&[TokenType::Catch, TokenType::BraceL]) {
            return Ok(false);
        }
        root.tokens.copy_token()?;
        let name = root.name_manager.claim_free_name("e");
        root.tokens.append_code(&format!(" ({})", name));
        Ok(true)
    }
}
