//! `1_000_000` to `1000000`

use super::Transformer;
use super::root_transformer::RootTransformer;
use crate::error::Result;
use crate::parser::TokenType;

pub struct NumericSeparatorTransformer;

impl Transformer for NumericSeparatorTransformer {
    fn process(&self, root: &mut RootTransformer<'_>) -> Result<bool> {
        if !root.tokens.matches1(TokenType::Num) && !root.tokens.matches1(TokenType::BigInt) {
            return Ok(false);
        }
        let code = root.tokens.current_token_code();
        if !code.contains('_') {
            return Ok(false);
        }
        root.tokens.replace_token(&code.replace('_', ""))?;
        Ok(true)
    }
}
