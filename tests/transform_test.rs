//! End-to-end transform tests

use jstrip::{Options, Transform, TransformError, transform};

fn run(code: &str, transforms: &[Transform]) -> String {
    transform(code, &Options::new(transforms)).unwrap().code
}

const WILDCARD_HELPER: &str = "function _interopRequireWildcard(obj)";
const DEFAULT_HELPER: &str = " function _interopRequireDefault(obj) { return obj && obj.__esModule ? obj : { default: obj }; }";

// ---------- passthrough ----------

#[test]
fn test_plain_code_is_unchanged() {
    let code = "let a = 1;\n// comment\nfunction f() { return a ?? `x${a}`; }\n";
    assert_eq!(run(code, &[]), code);
    assert_eq!(run(code, &[Transform::Jsx]), code);
}

#[test]
fn test_numeric_separator_and_catch_binding() {
    let code = "let n = 1_000_000;\ntry { f(); } catch { g(); }";
    assert_eq!(
        run(code, &[]),
        "let n = 1000000;\ntry { f(); } catch (e) { g(); }"
    );
}

// ---------- jsx ----------

#[test]
fn test_jsx_props() {
    assert_eq!(
        run("<Foo a=\"1\" b/>;", &[Transform::Jsx]),
        "React.createElement(Foo, { a: \"1\", b: true,});"
    );
}

#[test]
fn test_jsx_text_child() {
    assert_eq!(
        run("<div>hello</div>;", &[Transform::Jsx]),
        "React.createElement('div', null, \"hello\");"
    );
}

#[test]
fn test_jsx_whitespace_only_child_keeps_lines() {
    assert_eq!(
        run("<a>\n  </a>;", &[Transform::Jsx]),
        "React.createElement('a', null\n  );"
    );
}

#[test]
fn test_jsx_entities() {
    assert_eq!(
        run("<p>&amp; &#65;&#x41; &zzz;</p>;", &[Transform::Jsx]),
        "React.createElement('p', null, \"& AA &zzz;\"  );"
    );
}

#[test]
fn test_jsx_fragment_with_children_and_spread() {
    assert_eq!(
        run("<>{a}<b c={d} {...e} /></>;", &[Transform::Jsx]),
        "React.createElement(React.Fragment, null, a, React.createElement('b', { c: d, ...e,} ));"
    );
}

#[test]
fn test_jsx_dev_props() {
    let options = Options::new(&[Transform::Jsx]).with_file_path("src/app.js");
    assert_eq!(
        transform("<div />", &options).unwrap().code,
        "const _jsxFileName = \"src/app.js\";React.createElement('div', {__self: this, __source: {fileName: _jsxFileName, lineNumber: 1}} )"
    );
}

#[test]
fn test_jsx_dev_props_in_class_fields() {
    let options = Options::new(&[Transform::Jsx]).with_file_path("a.js");
    let code = "class A {\n  m() { return <b />; }\n  x = <i />;\n}";
    let output = transform(code, &options).unwrap().code;
    assert!(output.contains("this.x = React.createElement('i', {__self: this, __source: {fileName: _jsxFileName, lineNumber: 3}} ); }\n  m()"));
    assert!(output.contains("lineNumber: 2}} ); }\n  \n}"));
}

#[test]
fn test_jsx_mismatched_closing_tag() {
    let result = transform("<div></span>;", &Options::new(&[Transform::Jsx]));
    assert!(matches!(result, Err(TransformError::Syntax { .. })));
}

#[test]
fn test_display_name() {
    assert_eq!(
        run("var Foo = React.createClass({\n  render() {}\n});", &[Transform::Jsx]),
        "var Foo = React.createClass({displayName: 'Foo',\n  render() {}\n});"
    );
}

// ---------- classes ----------

#[test]
fn test_class_fields_with_superclass() {
    assert_eq!(
        run("class A extends B {\n  x = 1;\n  y;\n}", &[]),
        "class A extends B {constructor(...args) { super(...args); this.x = 1; }\n  \n  \n}"
    );
}

#[test]
fn test_class_expression_static_field() {
    assert_eq!(
        run("const C = class { static s = 1; };", &[]),
        " var _class;const C = (_class = class {  }, _class.s = 1, _class);"
    );
}

#[test]
fn test_parameter_properties() {
    assert_eq!(
        run(
            "class P {\n  constructor(private a: number) {}\n}",
            &[Transform::TypeScript, Transform::Imports]
        ),
        "\"use strict\";class P {\n  constructor( a) {;this.a = a;}\n}"
    );
}

// ---------- types ----------

#[test]
fn test_typescript_annotations_removed() {
    assert_eq!(
        run(
            "let x: number = 1;\nfunction f(a?: string): void {}\n",
            &[Transform::TypeScript, Transform::Imports]
        ),
        "\"use strict\";let x = 1;\nfunction f(a) {}\n"
    );
}

#[test]
fn test_typescript_requires_imports() {
    let result = transform("let x = 1;", &Options::new(&[Transform::TypeScript]));
    assert!(matches!(result, Err(TransformError::Config(_))));
}

#[test]
fn test_flow_annotations_removed() {
    assert_eq!(
        run("function f(x: number): string { return x; }", &[Transform::Flow]),
        "function f(x) { return x; }"
    );
}

#[test]
fn test_arrow_return_type_removed() {
    assert_eq!(
        run("const g = (a: number): number =>\n a;", &[Transform::Flow]),
        "const g = (a) =>\n a;"
    );
}

#[test]
fn test_type_only_import_elided() {
    assert_eq!(
        run(
            "import type {T} from './t';\nlet y: T;",
            &[Transform::TypeScript, Transform::Imports]
        ),
        "\"use strict\";\nlet y;"
    );
}

#[test]
fn test_unused_import_binding_elided() {
    let output = run(
        "import {A, b} from './m';\nlet x: A = b;",
        &[Transform::TypeScript, Transform::Imports],
    );
    assert!(output.ends_with("var _m = _interopRequireWildcard(require('./m'));\nlet x = _m.b;"));
}

// ---------- modules ----------

#[test]
fn test_imports_rewritten() {
    let output = run(
        "import React from 'react';\nimport {useState} from 'react';\nuseState(0);\nReact.render();\n",
        &[Transform::Imports],
    );
    assert!(output.starts_with("\"use strict\";"));
    assert!(output.contains(WILDCARD_HELPER));
    assert!(output.ends_with(
        "var _react = _interopRequireWildcard(require('react'));\n\n(0, _react.useState)(0);\n_react.default.render();\n"
    ));
}

#[test]
fn test_shorthand_property_uses_import() {
    let output = run("import {a} from 'x';\nconst o = {a};", &[Transform::Imports]);
    assert!(output.ends_with("\nconst o = {a: _x.a};"));
}

#[test]
fn test_jsx_pragma_resolves_through_imports() {
    let output = run(
        "import React from 'react';\n<div />;",
        &[Transform::Jsx, Transform::Imports],
    );
    assert!(output.contains(DEFAULT_HELPER));
    assert!(output.ends_with(
        "var _react = _interopRequireDefault(require('react'));\n_react.default.createElement('div', null );"
    ));
}

#[test]
fn test_exports() {
    assert_eq!(
        run(
            "export const a = 1, b = 2;\nexport function f() {}\nexport default a;\n",
            &[Transform::Imports]
        ),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); exports.f = f; const a = 1, b = 2; exports.a = a; exports.b = b;\n function f() {}\nexports.default = a;\n"
    );
}

#[test]
fn test_export_class() {
    assert_eq!(
        run("export class A { x = 1; }", &[Transform::Imports]),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); class A {constructor() { this.x = 1; }  } exports.A = A;"
    );
}

#[test]
fn test_export_functions() {
    assert_eq!(
        run(
            "export function add(a, b) { return a + b; }\nadd(1, 2);",
            &[Transform::Imports]
        ),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); exports.add = add; function add(a, b) { return a + b; }\nadd(1, 2);"
    );
    assert_eq!(
        run("export async function g() {}", &[Transform::Imports]),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); exports.g = g; async function g() {}"
    );
    assert_eq!(
        run("export default function f() { return 1; }", &[Transform::Imports]),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); exports.default = f; function f() { return 1; }"
    );
}

#[test]
fn test_export_object_declaration() {
    assert_eq!(
        run("export const o = {a: 1}\nlet p = {};", &[Transform::Imports]),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); const o = {a: 1}; exports.o = o;\nlet p = {};"
    );
}

#[test]
fn test_export_default_anonymous_class_with_static() {
    assert_eq!(
        run("export default class { static x = 1 }", &[Transform::Imports]),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); var _class;exports.default = (_class = class {  }, _class.x = 1, _class)"
    );
}

#[test]
fn test_export_default_named_class() {
    assert_eq!(
        run("export default class A { x = 1 }", &[Transform::Imports]),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); class A {constructor() { this.x = 1; }  } exports.default = A;"
    );
}

#[test]
fn test_exported_class_needs_name() {
    let result = transform("export class {}", &Options::new(&[Transform::Imports]));
    assert!(matches!(result, Err(TransformError::Invariant(_))));
}

#[test]
fn test_statement_syntax_errors() {
    for code in ["a b c;", "let 1 = 2;", "var 1 = 2;"] {
        let result = transform(code, &Options::default());
        assert!(matches!(result, Err(TransformError::Syntax { .. })), "{}", code);
    }
}

#[test]
fn test_reexports() {
    let output = run(
        "const a = 1;\nexport {a as b};\nexport {c} from './c';\nexport * from './d';",
        &[Transform::Imports],
    );
    assert!(output.contains("function _exportStar(obj)"));
    assert!(output.ends_with(
        "const a = 1;\nexports.b = a;\nvar _c = _interopRequireWildcard(require('./c')); Object.defineProperty(exports, 'c', {enumerable: true, get: function() { return _c.c; }});\nvar _d = _interopRequireWildcard(require('./d')); _exportStar(_d);"
    ));
}

#[test]
fn test_add_module_exports() {
    assert_eq!(
        run("export default 42;", &[Transform::Imports, Transform::AddModuleExports]),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true});exports.default = 42;\nmodule.exports = exports.default;\n"
    );
}

#[test]
fn test_shebang_stays_first() {
    let output = run("#!/usr/bin/env node\nimport a from 'a';\na();", &[Transform::Imports]);
    assert!(output.starts_with("#!/usr/bin/env node\n\"use strict\";"));
    assert!(output.ends_with("var _a = _interopRequireDefault(require('a'));\n(0, _a.default)();"));
}
