//! Token-stream transformers
//!
//! The [`RootTransformer`] walks the annotated tokens once through a
//! [`TokenProcessor`] and offers each token to the feature transformers in
//! registration order. The first one that handles the token wins.

pub mod class_info;
pub mod display_name;
pub mod flow;
pub mod import_processor;
pub mod imports;
pub mod jsx;
pub mod name_manager;
pub mod numeric_separator;
pub mod optional_catch_binding;
pub mod root_transformer;
pub mod token_processor;
pub mod typescript;

mod jsx_entities;

use crate::error::Result;

pub use root_transformer::RootTransformer;
pub use token_processor::TokenProcessor;

/// A feature-specific rewrite over the token stream.
///
/// State that changes while processing lives behind `Cell`/`RefCell`, since
/// the root hands out `&self` while it is itself borrowed mutably.
pub trait Transformer {
    /// Handle the token at the cursor. Returns `false` to pass it on.
    fn process(&self, root: &mut RootTransformer<'_>) -> Result<bool>;

    /// Code emitted before the module body
    fn prefix_code(&self, _root: &RootTransformer<'_>) -> String {
        String::new()
    }

    /// Code emitted after the module body
    fn suffix_code(&self, _root: &RootTransformer<'_>) -> String {
        String::new()
    }
}
