//! Transform configuration

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TransformError};

/// A syntax extension that can be enabled for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    Imports,
    Flow,
    TypeScript,
    Jsx,
    AddModuleExports,
}

impl Transform {
    pub fn as_str(self) -> &'static str {
        match self {
            Transform::Imports => "imports",
            Transform::Flow => "flow",
            Transform::TypeScript => "typescript",
            Transform::Jsx => "jsx",
            Transform::AddModuleExports => "add-module-exports",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transform {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "imports" => Ok(Transform::Imports),
            "flow" => Ok(Transform::Flow),
            "typescript" => Ok(Transform::TypeScript),
            "jsx" => Ok(Transform::Jsx),
            "add-module-exports" => Ok(Transform::AddModuleExports),
            other => Err(TransformError::Config(format!("Unknown transform: {}", other))),
        }
    }
}

/// Options for one transform run
#[derive(Debug, Clone)]
pub struct Options {
    /// Enabled syntax extensions
    pub transforms: Vec<Transform>,
    /// Source path; when set, JSX elements get `__self`/`__source` props
    pub file_path: Option<String>,
    /// Factory called for each JSX element
    pub jsx_pragma: String,
    /// Component used for `<>...</>`
    pub jsx_fragment_pragma: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            transforms: Vec::new(),
            file_path: None,
            jsx_pragma: "React.createElement".to_string(),
            jsx_fragment_pragma: "React.Fragment".to_string(),
        }
    }
}

impl Options {
    pub fn new(transforms: &[Transform]) -> Self {
        Options {
            transforms: transforms.to_vec(),
            ..Options::default()
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Parse a comma-separated list such as `"jsx,imports"`.
    pub fn parse_transforms(list: &str) -> Result<Vec<Transform>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Transform::from_str)
            .collect()
    }

    pub fn has(&self, transform: Transform) -> bool {
        self.transforms.contains(&transform)
    }

    /// Reject combinations the pipeline cannot handle.
    pub fn validate(&self) -> Result<()> {
        if self.has(Transform::TypeScript) && !self.has(Transform::Imports) {
            return Err(TransformError::Config(
                "the typescript transform requires the imports transform".to_string(),
            ));
        }
        if self.has(Transform::TypeScript) && self.has(Transform::Flow) {
            return Err(TransformError::Config(
                "the flow and typescript transforms cannot be combined".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transforms() {
        let transforms = Options::parse_transforms("jsx, imports,add-module-exports").unwrap();
        assert_eq!(
            transforms,
            vec![Transform::Jsx, Transform::Imports, Transform::AddModuleExports]
        );
        assert!(Options::parse_transforms("jsx,es6").is_err());
    }

    #[test]
    fn test_typescript_requires_imports() {
        let err = Options::new(&[Transform::TypeScript]).validate().unwrap_err();
        assert!(matches!(err, TransformError::Config(_)));
        assert!(Options::new(&[Transform::TypeScript, Transform::Imports])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_flow_and_typescript_conflict() {
        let options = Options::new(&[Transform::TypeScript, Transform::Imports, Transform::Flow]);
        assert!(options.validate().is_err());
    }
}
