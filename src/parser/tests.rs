use super::*;
use crate::options::{Options, Transform};

fn scan(code: &str, transforms: &[Transform]) -> Vec<Token> {
    parse(code, &Options::new(transforms)).unwrap()
}

fn scan_err(code: &str, transforms: &[Transform]) -> String {
    parse(code, &Options::new(transforms)).unwrap_err().to_string()
}

fn find<'t>(tokens: &'t [Token], code: &str, text: &str) -> &'t Token {
    tokens
        .iter()
        .find(|t| t.text(code) == text)
        .unwrap_or_else(|| panic!("no token {:?}", text))
}

fn type_texts<'c>(tokens: &[Token], code: &'c str) -> Vec<&'c str> {
    tokens.iter().filter(|t| t.is_type).map(|t| t.text(code)).collect()
}

#[test]
fn test_declaration_roles() {
    let code = "var a = 1; let {b, c: d} = e; function f(g) { return g; }";
    let tokens = scan(code, &[]);
    let role = |i: usize| tokens[i].identifier_role;
    let index = |text: &str| tokens.iter().position(|t| t.text(code) == text).unwrap();

    assert_eq!(role(index("a")), Some(IdentifierRole::FunctionScopedDeclaration));
    assert_eq!(role(index("b")), Some(IdentifierRole::BlockScopedDeclaration));
    assert_eq!(role(index("c")), None);
    assert_eq!(role(index("d")), Some(IdentifierRole::BlockScopedDeclaration));
    assert_eq!(role(index("e")), Some(IdentifierRole::Access));
    assert_eq!(role(index("f")), Some(IdentifierRole::FunctionScopedDeclaration));
    assert_eq!(role(index("g")), Some(IdentifierRole::FunctionScopedDeclaration));
    let uses: Vec<_> = tokens
        .iter()
        .filter(|t| t.text(code) == "g")
        .map(|t| t.identifier_role)
        .collect();
    assert_eq!(uses[1], Some(IdentifierRole::Access));
}

#[test]
fn test_regex_versus_division() {
    let code = "x = a / b / c; y = /ab+c/g.test(z);";
    let tokens = scan(code, &[]);
    let regexes: Vec<_> = tokens
        .iter()
        .filter(|t| t.ty == TokenType::Regex)
        .map(|t| t.text(code))
        .collect();
    assert_eq!(regexes, vec!["/ab+c/g"]);
}

#[test]
fn test_template_tokens() {
    let code = "`a${b}c`";
    let types: Vec<_> = scan(code, &[]).iter().map(|t| t.ty).collect();
    assert_eq!(
        types,
        vec![
            TokenType::BackQuote,
            TokenType::Template,
            TokenType::DollarBraceL,
            TokenType::Name,
            TokenType::BraceR,
            TokenType::Template,
            TokenType::BackQuote,
        ]
    );
}

#[test]
fn test_object_keys_share_object_context() {
    let code = "o = {a, b: 1, c() {}};";
    let tokens = scan(code, &[]);
    let open = find(&tokens, code, "{");
    let a = find(&tokens, code, "a");
    let b = find(&tokens, code, "b");
    let c = find(&tokens, code, "c");
    assert!(open.context_id.is_some());
    assert_eq!(a.identifier_role, Some(IdentifierRole::ObjectShorthand));
    assert_eq!(b.identifier_role, Some(IdentifierRole::ObjectKey));
    assert_eq!(c.identifier_role, Some(IdentifierRole::ObjectKey));
    assert_eq!(a.context_id, open.context_id);
    assert_eq!(b.context_id, open.context_id);
}

#[test]
fn test_class_context_and_field_initializer() {
    let code = "class A extends B { x = 1; static y = 2; m() {} }";
    let tokens = scan(code, &[]);
    let class_id = tokens[0].context_id;
    assert_eq!(tokens[0].ty, TokenType::Class);
    assert!(class_id.is_some());
    assert!(!tokens[0].is_expression);

    let open = tokens.iter().position(|t| t.ty == TokenType::BraceL).unwrap();
    assert_eq!(tokens[open].context_id, class_id);
    assert_eq!(tokens.last().unwrap().context_id, class_id);

    let eq = tokens.iter().position(|t| t.ty == TokenType::Eq).unwrap();
    assert_eq!(tokens[eq - 1].text(code), "x");
    assert_eq!(tokens[eq].rhs_end_index, Some(eq + 2));
    assert_eq!(tokens[eq + 2].ty, TokenType::Semi);
}

#[test]
fn test_class_expression_flag() {
    let code = "const A = class {};";
    let tokens = scan(code, &[]);
    assert!(find(&tokens, code, "class").is_expression);
}

#[test]
fn test_arrow_parameters() {
    let code = "const f = (a, b) => a + b;";
    let tokens = scan(code, &[]);
    let a = &tokens[4];
    assert_eq!(a.text(code), "a");
    assert_eq!(a.identifier_role, Some(IdentifierRole::FunctionScopedDeclaration));
    assert_eq!(a.scope_depth, 1);
    let open = find(&tokens, code, "(");
    let close = find(&tokens, code, ")");
    assert!(open.context_id.is_some());
    assert_eq!(open.context_id, close.context_id);
    assert_eq!(find(&tokens, code, "f").scope_depth, 0);
}

#[test]
fn test_export_declaration_end() {
    let code = "export const a = 1, b = 2;";
    let tokens = scan(code, &[Transform::Imports]);
    assert_eq!(tokens[0].rhs_end_index, Some(tokens.len()));
    assert_eq!(tokens[0].context_id, None);
}

#[test]
fn test_exported_declarations_keep_brace_contexts() {
    let code = "export const o = {a: 1}
export function f() {}
export class C {}";
    let tokens = scan(code, &[Transform::Imports]);
    for (open, close) in [(4, 8), (14, 15), (19, 20)] {
        assert_eq!(tokens[open].text(code), "{");
        assert_eq!(tokens[close].text(code), "}");
        assert!(tokens[open].context_id.is_some());
        assert_eq!(tokens[open].context_id, tokens[close].context_id);
    }
    assert_eq!(tokens[0].rhs_end_index, Some(9));
    assert_eq!(tokens[9].rhs_end_index, None);
}

#[test]
fn test_typescript_annotations_are_types() {
    let code = "let x: number = 1; function f<T>(a?: T): void {}";
    let tokens = scan(code, &[Transform::TypeScript, Transform::Imports]);
    assert_eq!(
        type_texts(&tokens, code),
        vec![":", "number", "<", "T", ">", "?", ":", "T", ":", "void"]
    );
}

#[test]
fn test_typescript_statements_are_types() {
    let code = "interface I { a: string }\ntype T = I | null;\ndeclare enum E { A }\nlet y = 1;";
    let tokens = scan(code, &[Transform::TypeScript, Transform::Imports]);
    let values: Vec<_> = tokens.iter().filter(|t| !t.is_type).map(|t| t.text(code)).collect();
    assert_eq!(values, vec!["let", "y", "=", "1", ";"]);
}

#[test]
fn test_typescript_expression_types() {
    let code = "a!.b; c as Array<number>; f<string>(d);";
    let tokens = scan(code, &[Transform::TypeScript, Transform::Imports]);
    assert_eq!(
        type_texts(&tokens, code),
        vec!["!", "as", "Array", "<", "number", ">", "<", "string", ">"]
    );
}

#[test]
fn test_less_than_stays_an_operator() {
    let code = "if (a < b) c(d > e);";
    let tokens = scan(code, &[Transform::TypeScript, Transform::Imports]);
    assert!(type_texts(&tokens, code).is_empty());
}

#[test]
fn test_overload_signature_is_type() {
    let code = "function f(a: string): void;\nfunction f(a) {}";
    let tokens = scan(code, &[Transform::TypeScript, Transform::Imports]);
    let first_semi = tokens.iter().position(|t| t.ty == TokenType::Semi).unwrap();
    assert!(tokens[..=first_semi].iter().all(|t| t.is_type));
    assert!(!tokens[first_semi + 1].is_type);
}

#[test]
fn test_flow_type_import() {
    let code = "import type { A } from './a';\nimport b from './b';";
    let tokens = scan(code, &[Transform::Flow, Transform::Imports]);
    let semi = tokens.iter().position(|t| t.ty == TokenType::Semi).unwrap();
    assert!(tokens[..=semi].iter().all(|t| t.is_type));
    assert!(tokens[semi + 1..].iter().all(|t| !t.is_type));
}

#[test]
fn test_inline_type_import_specifiers() {
    let ts = [Transform::TypeScript, Transform::Imports];
    let code = "import {type A, b, type C as D} from './m';";
    let tokens = scan(code, &ts);
    assert_eq!(type_texts(&tokens, code), vec!["type", "A", "type", "C", "as", "D"]);
    // `type as x` imports a binding named `type` under the name `x`
    let code = "import {type as x} from './m';";
    assert!(type_texts(&scan(code, &ts), code).is_empty());
}

#[test]
fn test_jsx_tokens() {
    let code = "<div a=\"1\">hi {x}</div>;";
    let types: Vec<_> = scan(code, &[Transform::Jsx]).iter().map(|t| t.ty).collect();
    assert_eq!(
        types,
        vec![
            TokenType::JsxTagStart,
            TokenType::JsxName,
            TokenType::JsxName,
            TokenType::Eq,
            TokenType::String,
            TokenType::JsxTagEnd,
            TokenType::JsxText,
            TokenType::BraceL,
            TokenType::Name,
            TokenType::BraceR,
            TokenType::JsxTagStart,
            TokenType::Slash,
            TokenType::JsxName,
            TokenType::JsxTagEnd,
            TokenType::Semi,
        ]
    );
}

#[test]
fn test_jsx_component_name_is_reference() {
    let code = "<Foo.Bar><div /></Foo.Bar>;";
    let tokens = scan(code, &[Transform::Jsx]);
    assert_eq!(find(&tokens, code, "Foo").identifier_role, Some(IdentifierRole::Access));
    assert_eq!(find(&tokens, code, "div").identifier_role, None);
}

#[test]
fn test_jsx_errors() {
    assert!(scan_err("<div></span>;", &[Transform::Jsx])
        .contains("Expected corresponding JSX closing tag for <div>"));
    assert!(scan_err("<div>", &[Transform::Jsx]).contains("Unterminated JSX contents"));
}

#[test]
fn test_missing_statement_terminator() {
    assert!(scan_err("a b c;", &[]).contains("Unexpected token 'b' (1:3)"));
    assert!(scan_err("let 1 = 2;", &[]).contains("Unexpected token '1' (1:5)"));
    assert!(scan_err("x = 1 y = 2", &[]).contains("Unexpected token 'y'"));
}

#[test]
fn test_inserted_semicolons() {
    // Line breaks, closing braces and end of input all end a statement
    let code = "a\nb\nfunction f() { return 1 }\nc";
    assert_eq!(scan(code, &[]).len(), 11);
    assert_eq!(scan("do x(); while (y) z()", &[]).len(), 12);
}

#[test]
fn test_unsupported_syntax_errors() {
    let ts = [Transform::TypeScript, Transform::Imports];
    assert!(scan_err("enum E { A }", &ts).contains("TypeScript enums are not supported"));
    assert!(scan_err("@dec class A {}", &[]).contains("Decorators are not supported"));
}

#[test]
fn test_scope_depth_in_function_bodies() {
    let code = "function f() { var inner; }\nvar outer;";
    let tokens = scan(code, &[]);
    assert_eq!(find(&tokens, code, "inner").scope_depth, 1);
    assert_eq!(find(&tokens, code, "outer").scope_depth, 0);
}
