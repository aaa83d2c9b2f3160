//! Fresh identifier allocation
//!
//! Knows every identifier spelled in the input, so generated names such as
//! `_class` or `_react` never capture or shadow user code. One instance per
//! transform run.

use rustc_hash::FxHashSet;

use crate::parser::{Token, TokenType};

pub struct NameManager {
    used_names: FxHashSet<String>,
}

impl NameManager {
    pub fn new(code: &str, tokens: &[Token]) -> Self {
        let used_names = tokens
            .iter()
            .filter(|t| matches!(t.ty, TokenType::Name | TokenType::JsxName))
            .map(|t| t.text(code).to_string())
            .collect();
        NameManager { used_names }
    }

    /// Reserve `base`, or `base2`, `base3`, ... if it is taken
    pub fn claim_free_name(&mut self, base: &str) -> String {
        let name = self.find_free_name(base);
        self.used_names.insert(name.clone());
        name
    }

    fn find_free_name(&self, base: &str) -> String {
        if !self.used_names.contains(base) {
            return base.to_string();
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}{}", base, suffix);
            if !self.used_names.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::parser::parse;

    #[test]
    fn test_claim_free_name() {
        let code = "var _class = 1, _class2 = 2;";
        let tokens = parse(code, &Options::default()).unwrap();
        let mut names = NameManager::new(code, &tokens);
        assert_eq!(names.claim_free_name("_class"), "_class3");
        assert_eq!(names.claim_free_name("_class"), "_class4");
        assert_eq!(names.claim_free_name("e"), "e");
        assert_eq!(names.claim_free_name("e"), "e2");
    }
}
