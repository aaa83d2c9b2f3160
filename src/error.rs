//! Error types for the transform pipeline.

use thiserror::Error;

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Fatal condition that aborts a transform run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Malformed input at a known source offset
    #[error("{message} ({pos})")]
    Syntax { pos: usize, message: String },

    /// Token stream broke an assumption a transformer relies on
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Unsupported combination of options
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TransformError {
    /// Create a syntax error at the given byte offset.
    pub fn syntax(pos: usize, message: impl Into<String>) -> Self {
        TransformError::Syntax {
            pos,
            message: message.into(),
        }
    }

    /// Create a syntax error whose message also carries `line:column`.
    pub fn syntax_at(code: &str, pos: usize, message: impl AsRef<str>) -> Self {
        let (line, column) = crate::util::line_and_column(code, pos);
        TransformError::Syntax {
            pos,
            message: format!("{} ({}:{})", message.as_ref(), line, column),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        TransformError::Invariant(message.into())
    }

    /// Source offset of the failure, if it has one.
    pub fn pos(&self) -> Option<usize> {
        match self {
            TransformError::Syntax { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_at_reports_line_and_column() {
        let err = TransformError::syntax_at("a\nbc", 3, "Unexpected token");
        assert_eq!(err.pos(), Some(3));
        assert_eq!(err.to_string(), "Unexpected token (2:2) (3)");
    }

    #[test]
    fn test_config_error_has_no_position() {
        let err = TransformError::Config("bad".to_string());
        assert_eq!(err.pos(), None);
        assert_eq!(err.to_string(), "Invalid configuration: bad");
    }
}
