//! jstrip - a token-level JavaScript transpiler
//!
//! Rewrites JSX, TypeScript and Flow type syntax, ES modules, class fields,
//! numeric separators and optional catch bindings into plain JavaScript.
//! There is no syntax tree: the scanner annotates tokens in one pass and
//! the transformers patch the token stream directly, so untouched source
//! comes out byte for byte.
//!
//! # Example
//! ```
//! use jstrip::{Options, Transform, transform};
//!
//! let options = Options::new(&[Transform::Jsx]);
//! let output = transform("<div>hi</div>;", &options).unwrap();
//! assert_eq!(output.code, "React.createElement('div', null, \"hi\");");
//! ```

// Configuration and errors
pub mod error;
pub mod options;

// Scanner/parser
pub mod parser;

// Token-stream rewriting
pub mod transformers;

// Utilities
pub mod util;

use tracing::debug;

pub use error::{Result, TransformError};
pub use options::{Options, Transform};
use transformers::RootTransformer;

/// Result of a transform run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
}

/// Transform `code` with the extensions enabled in `options`.
///
/// The options are validated before anything is scanned. Any failure
/// aborts the run with no partial output.
pub fn transform(code: &str, options: &Options) -> Result<TransformOutput> {
    options.validate()?;
    debug!(transforms = ?options.transforms, len = code.len(), "transform start");

    let tokens = parser::parse(code, options)?;
    let root = RootTransformer::new(code, tokens, options)?;
    let code = root.transform()?;

    debug!(len = code.len(), "transform done");
    Ok(TransformOutput { code })
}
