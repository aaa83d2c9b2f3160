//! TypeScript syntax removal
//!
//! Everything the scanner marked as a type region is deleted. Parameter
//! properties are handled by the class rewrite, and unused imports by the
//! import resolver.

use super::Transformer;
use super::root_transformer::RootTransformer;
use crate::error::Result;

pub struct TypeScriptTransformer;

impl Transformer for TypeScriptTransformer {
    fn process(&self, root: &mut RootTransformer<'_>) -> Result<bool> {
        Ok(root.process_possible_arrow_param_end()?
            || root.process_possible_async_arrow_with_type_params()?
            || root.process_possible_type_range()?)
    }
}
