//! Flow annotation removal

use super::Transformer;
use super::root_transformer::RootTransformer;
use crate::error::Result;

pub struct FlowTransformer;

impl Transformer for FlowTransformer {
    fn process(&self, root: &mut RootTransformer<'_>) -> Result<bool> {
        Ok(root.process_possible_arrow_param_end()? || root.process_possible_type_range()?)
    }
}
