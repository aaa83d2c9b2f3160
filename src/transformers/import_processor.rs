//! Import binding resolver
//!
//! Pre-scans the module's top-level `import` and `export ... from`
//! statements before any output is produced. Each module path gets one
//! interop variable (`_react` for `'react'`), each imported binding a
//! replacement expression (`_react.default`, `_react.useState`). With
//! TypeScript, bindings that are only referenced from type positions are
//! dropped, and an import left without bindings emits nothing.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::name_manager::NameManager;
use crate::error::{Result, TransformError};
use crate::options::{Options, Transform};
use crate::parser::{IdentifierRole, Token, TokenType};

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").unwrap());

#[derive(Debug, Default)]
struct ImportInfo {
    /// Quoted path as written, used in the emitted `require`
    raw_path: String,
    default_names: Vec<String>,
    wildcard_names: Vec<String>,
    /// `(imported, local)`
    named_imports: Vec<(String, String)>,
    had_bindings: bool,
    has_reexport: bool,
    has_star_export: bool,
}

impl ImportInfo {
    fn is_empty(&self) -> bool {
        self.default_names.is_empty()
            && self.wildcard_names.is_empty()
            && self.named_imports.is_empty()
            && !self.has_reexport
    }
}

/// Runtime helpers emitted at most once, under fresh names
#[derive(Debug, Default)]
struct Helpers {
    interop_wildcard: Option<String>,
    interop_default: Option<String>,
    export_star: Option<String>,
}

pub struct ImportProcessor {
    /// Paths in first-seen order
    paths: Vec<String>,
    infos: FxHashMap<String, ImportInfo>,
    module_names: FxHashMap<String, String>,
    import_code: FxHashMap<String, String>,
    claimed_paths: FxHashSet<String>,
    identifier_replacements: FxHashMap<String, String>,
    helpers: Helpers,
    pub had_export: bool,
    pub has_default_export: bool,
    pub has_named_exports: bool,
}

impl ImportProcessor {
    pub fn new(
        code: &str,
        tokens: &[Token],
        options: &Options,
        name_manager: &mut NameManager,
    ) -> Result<Self> {
        let mut processor = ImportProcessor {
            paths: Vec::new(),
            infos: FxHashMap::default(),
            module_names: FxHashMap::default(),
            import_code: FxHashMap::default(),
            claimed_paths: FxHashSet::default(),
            identifier_replacements: FxHashMap::default(),
            helpers: Helpers::default(),
            had_export: false,
            has_default_export: false,
            has_named_exports: false,
        };
        processor.scan(code, tokens)?;
        if options.has(Transform::TypeScript) {
            processor.prune_type_only_bindings(code, tokens, options);
        }
        processor.generate_replacements(name_manager);
        Ok(processor)
    }

    fn info_mut(&mut self, raw_path: &str) -> &mut ImportInfo {
        let path = unquote(raw_path).to_string();
        if !self.infos.contains_key(&path) {
            self.paths.push(path.clone());
        }
        let info = self.infos.entry(path).or_default();
        info.raw_path = raw_path.to_string();
        info
    }

    fn scan(&mut self, code: &str, tokens: &[Token]) -> Result<()> {
        for (index, token) in tokens.iter().enumerate() {
            if token.is_type || token.scope_depth != 0 {
                continue;
            }
            match token.ty {
                TokenType::Import => {
                    let next = tokens.get(index + 1).map(|t| t.ty);
                    if !matches!(next, Some(TokenType::ParenL | TokenType::Dot)) {
                        self.scan_import(code, &statement_tokens(tokens, index + 1, true))?;
                    }
                }
                TokenType::Export => {
                    self.had_export = true;
                    self.scan_export(code, &statement_tokens(tokens, index + 1, false))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn scan_import(&mut self, code: &str, toks: &[&Token]) -> Result<()> {
        let text = |k: usize| toks.get(k).map_or("", |t| t.text(code));
        let ty = |k: usize| toks.get(k).map_or(TokenType::Eof, |t| t.ty);
        let malformed = || TransformError::invariant("Malformed import statement");

        if ty(0) == TokenType::String {
            self.info_mut(text(0));
            return Ok(());
        }

        let mut default_name = None;
        let mut wildcard_name = None;
        let mut named = Vec::new();
        let mut k = 0;
        if ty(k) == TokenType::Name && (ty(k + 1) == TokenType::Comma || text(k + 1) == "from") {
            default_name = Some(text(k).to_string());
            k += 1;
            if ty(k) == TokenType::Comma {
                k += 1;
            }
        }
        if ty(k) == TokenType::Star {
            wildcard_name = Some(text(k + 2).to_string());
            k += 3;
        } else if ty(k) == TokenType::BraceL {
            k += 1;
            while ty(k) != TokenType::BraceR {
                match ty(k) {
                    TokenType::Comma => k += 1,
                    TokenType::Eof => return Err(malformed()),
                    _ => {
                        let imported = unquote(text(k)).to_string();
                        if text(k + 1) == "as" {
                            named.push((imported, text(k + 2).to_string()));
                            k += 3;
                        } else {
                            named.push((imported.clone(), imported));
                            k += 1;
                        }
                    }
                }
            }
            k += 1;
        }
        if text(k) != "from" || ty(k + 1) != TokenType::String {
            return Err(malformed());
        }

        let info = self.info_mut(text(k + 1));
        info.had_bindings |= default_name.is_some() || wildcard_name.is_some() || !named.is_empty();
        info.default_names.extend(default_name);
        info.wildcard_names.extend(wildcard_name);
        info.named_imports.extend(named);
        Ok(())
    }

    fn scan_export(&mut self, code: &str, toks: &[&Token]) -> Result<()> {
        let text = |k: usize| toks.get(k).map_or("", |t| t.text(code));
        let ty = |k: usize| toks.get(k).map_or(TokenType::Eof, |t| t.ty);

        match ty(0) {
            TokenType::Default => self.has_default_export = true,
            TokenType::Star => {
                self.has_named_exports = true;
                let source = if text(1) == "as" { 4 } else { 2 };
                let info = self.info_mut(text(source));
                info.has_reexport = true;
                info.has_star_export |= source == 2;
            }
            TokenType::BraceL => {
                let mut k = 1;
                while ty(k) != TokenType::BraceR && ty(k) != TokenType::Eof {
                    if ty(k) == TokenType::Comma {
                        k += 1;
                        continue;
                    }
                    let exported = if text(k + 1) == "as" {
                        k += 2;
                        text(k)
                    } else {
                        text(k)
                    };
                    if unquote(exported) == "default" {
                        self.has_default_export = true;
                    } else {
                        self.has_named_exports = true;
                    }
                    k += 1;
                }
                if text(k + 1) == "from" && ty(k + 2) == TokenType::String {
                    self.info_mut(text(k + 2)).has_reexport = true;
                }
            }
            _ => self.has_named_exports = true,
        }
        Ok(())
    }

    /// Drop bindings never used as a value
    fn prune_type_only_bindings(&mut self, code: &str, tokens: &[Token], options: &Options) {
        let mut used: FxHashSet<&str> = tokens
            .iter()
            .filter(|t| {
                !t.is_type
                    && matches!(
                        t.identifier_role,
                        Some(IdentifierRole::Access | IdentifierRole::ObjectShorthand)
                    )
            })
            .map(|t| t.text(code))
            .collect();
        if tokens.iter().any(|t| t.ty == TokenType::JsxTagStart) {
            used.insert(pragma_base(&options.jsx_pragma));
            used.insert(pragma_base(&options.jsx_fragment_pragma));
        }
        for info in self.infos.values_mut() {
            info.default_names.retain(|name| used.contains(name.as_str()));
            info.wildcard_names.retain(|name| used.contains(name.as_str()));
            info.named_imports.retain(|(_, local)| used.contains(local.as_str()));
        }
    }

    fn generate_replacements(&mut self, name_manager: &mut NameManager) {
        for path in &self.paths {
            let Some(info) = self.infos.get(path) else {
                continue;
            };
            if info.is_empty() {
                // A fully elided import disappears; a bare one still runs
                let code = if info.had_bindings {
                    String::new()
                } else {
                    format!("require({});", info.raw_path)
                };
                self.import_code.insert(path.clone(), code);
                continue;
            }

            let name = name_manager.claim_free_name(&module_base_name(path));
            let only_default = info.wildcard_names.is_empty()
                && info.named_imports.is_empty()
                && !info.has_reexport;
            let helper = if only_default {
                self.helpers
                    .interop_default
                    .get_or_insert_with(|| name_manager.claim_free_name("_interopRequireDefault"))
                    .clone()
            } else {
                self.helpers
                    .interop_wildcard
                    .get_or_insert_with(|| name_manager.claim_free_name("_interopRequireWildcard"))
                    .clone()
            };
            if info.has_star_export && self.helpers.export_star.is_none() {
                self.helpers.export_star = Some(name_manager.claim_free_name("_exportStar"));
            }
            trace!(path = %path, name = %name, "import binding");

            self.import_code.insert(
                path.clone(),
                format!("var {} = {}(require({}));", name, helper, info.raw_path),
            );
            for local in &info.default_names {
                self.identifier_replacements
                    .insert(local.clone(), format!("{}.default", name));
            }
            for local in &info.wildcard_names {
                self.identifier_replacements.insert(local.clone(), name.clone());
            }
            for (imported, local) in &info.named_imports {
                self.identifier_replacements
                    .insert(local.clone(), format!("{}.{}", name, imported));
            }
            self.module_names.insert(path.clone(), name);
        }
    }

    /// The emitted expression for an imported binding
    pub fn get_identifier_replacement(&self, name: &str) -> Option<&str> {
        self.identifier_replacements.get(name).map(String::as_str)
    }

    /// The interop variable for a module path
    pub fn module_name(&self, path: &str) -> Option<&str> {
        self.module_names.get(path).map(String::as_str)
    }

    pub fn export_star_helper(&self) -> Option<&str> {
        self.helpers.export_star.as_deref()
    }

    /// The `require` code for `path`, only the first time it is asked for
    pub fn claim_import_code(&mut self, path: &str) -> String {
        if !self.claimed_paths.insert(path.to_string()) {
            return String::new();
        }
        self.import_code.get(path).cloned().unwrap_or_default()
    }

    /// Definitions of the helpers the module needs
    pub fn helper_code(&self) -> String {
        let mut code = String::new();
        if let Some(name) = &self.helpers.interop_wildcard {
            code.push_str(&format!(
                " function {}(obj) {{ if (obj && obj.__esModule) {{ return obj; }} else {{ var newObj = {{}}; if (obj != null) {{ for (var key in obj) {{ if (Object.prototype.hasOwnProperty.call(obj, key)) {{ newObj[key] = obj[key]; }} }} }} newObj.default = obj; return newObj; }} }}",
                name
            ));
        }
        if let Some(name) = &self.helpers.interop_default {
            code.push_str(&format!(
                " function {}(obj) {{ return obj && obj.__esModule ? obj : {{ default: obj }}; }}",
                name
            ));
        }
        if let Some(name) = &self.helpers.export_star {
            code.push_str(&format!(
                " function {}(obj) {{ Object.keys(obj).forEach(function(key) {{ if (key === \"default\" || key === \"__esModule\") {{ return; }} Object.defineProperty(exports, key, {{enumerable: true, get: function() {{ return obj[key]; }}}}); }}); }}",
                name
            ));
        }
        code
    }
}

/// Non-type tokens of one module statement, through its source string.
/// Declarations only need their first token.
fn statement_tokens(tokens: &[Token], start: usize, name_continues: bool) -> Vec<&Token> {
    let mut out: Vec<&Token> = Vec::new();
    for token in tokens[start.min(tokens.len())..].iter().filter(|t| !t.is_type) {
        if token.ty == TokenType::Semi {
            break;
        }
        let after_from = out.len() > 1
            && out.last().is_some_and(|prev| prev.ty == TokenType::Name)
            && token.ty == TokenType::String;
        out.push(token);
        if token.ty == TokenType::String && (out.len() == 1 || after_from) {
            break;
        }
        if out.len() == 1 {
            let continues = match token.ty {
                TokenType::BraceL | TokenType::Star => true,
                TokenType::Name => name_continues,
                _ => false,
            };
            if !continues {
                break;
            }
        }
    }
    out
}

/// Strip the quotes of a string token
pub fn unquote(raw: &str) -> &str {
    if raw.len() >= 2 && (raw.starts_with('"') || raw.starts_with('\'')) {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// `./components/my-button.js` → `_mybuttonjs`
fn module_base_name(path: &str) -> String {
    let last = path.rsplit('/').next().unwrap_or(path);
    format!("_{}", NON_WORD_RE.replace_all(last, ""))
}

/// `React.createElement` → `React`
pub fn pragma_base(pragma: &str) -> &str {
    pragma.split('.').next().unwrap_or(pragma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn processor(code: &str, transforms: &[Transform]) -> ImportProcessor {
        let options = Options::new(transforms);
        let tokens = parse(code, &options).unwrap();
        let mut names = NameManager::new(code, &tokens);
        ImportProcessor::new(code, &tokens, &options, &mut names).unwrap()
    }

    #[test]
    fn test_module_base_name() {
        assert_eq!(module_base_name("react"), "_react");
        assert_eq!(module_base_name("./components/my-button.js"), "_mybuttonjs");
    }

    #[test]
    fn test_replacements() {
        let mut imports = processor(
            "import React, {useState as use, b} from 'react';\nimport * as ns from './ns';",
            &[Transform::Imports],
        );
        assert_eq!(imports.get_identifier_replacement("React"), Some("_react.default"));
        assert_eq!(imports.get_identifier_replacement("use"), Some("_react.useState"));
        assert_eq!(imports.get_identifier_replacement("b"), Some("_react.b"));
        assert_eq!(imports.get_identifier_replacement("ns"), Some("_ns"));
        assert_eq!(imports.get_identifier_replacement("other"), None);
        assert_eq!(
            imports.claim_import_code("react"),
            "var _react = _interopRequireWildcard(require('react'));"
        );
        assert_eq!(imports.claim_import_code("react"), "");
    }

    #[test]
    fn test_default_only_uses_default_interop() {
        let mut imports = processor("import a from 'a';", &[Transform::Imports]);
        assert_eq!(
            imports.claim_import_code("a"),
            "var _a = _interopRequireDefault(require('a'));"
        );
    }

    #[test]
    fn test_bare_import() {
        let mut imports = processor("import './style.css';", &[Transform::Imports]);
        assert_eq!(imports.claim_import_code("./style.css"), "require('./style.css');");
    }

    #[test]
    fn test_type_only_bindings_are_elided() {
        let code = "import {A, b} from './m';\nimport C from './c';\nlet x: A = b; let y: C;";
        let mut imports = processor(code, &[Transform::TypeScript, Transform::Imports]);
        assert_eq!(imports.get_identifier_replacement("A"), None);
        assert_eq!(imports.get_identifier_replacement("b"), Some("_m.b"));
        assert_eq!(imports.claim_import_code("./c"), "");
    }

    #[test]
    fn test_export_flags() {
        let imports = processor("export default 1;", &[Transform::Imports]);
        assert!(imports.had_export);
        assert!(imports.has_default_export);
        assert!(!imports.has_named_exports);

        let imports = processor("export const a = 1;\nexport * from 'm';", &[Transform::Imports]);
        assert!(imports.has_named_exports);
        assert_eq!(imports.module_name("m"), Some("_m"));
        assert!(imports.export_star_helper().is_some());
    }
}
