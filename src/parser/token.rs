//! Annotated tokens
//!
//! The scanner never builds a tree. Instead every token carries the small set
//! of facts the transformers need: whether it belongs to a type region, how an
//! identifier is used, and a context id shared with its structural partner.

/// Token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Literals and names
    Name,
    PrivateName,
    Num,
    BigInt,
    String,
    Regex,
    Template,

    // JSX
    JsxName,
    JsxText,
    JsxTagStart,
    JsxTagEnd,

    // Punctuation
    BracketL,    // [
    BracketR,    // ]
    BraceL,      // {
    BraceR,      // }
    ParenL,      // (
    ParenR,      // )
    Comma,       // ,
    Semi,        // ;
    Colon,       // :
    Dot,         // .
    Question,    // ?
    QuestionDot, // ?.
    Arrow,       // =>
    Ellipsis,    // ...
    BackQuote,   // `
    DollarBraceL, // ${
    At,          // @

    // Operators
    Eq,                // =
    Assign,            // += -= ... ??= &&= ||=
    IncDec,            // ++ --
    Bang,              // !
    Tilde,             // ~
    PlusMin,           // + -
    Star,              // *
    Slash,             // /
    Modulo,            // %
    Exponent,          // **
    LessThan,          // <
    GreaterThan,       // >
    Relational,        // <= >=
    Equality,          // == != === !==
    BitShift,          // << >> >>>
    BitOr,             // |
    BitXor,            // ^
    BitAnd,            // &
    LogicalOr,         // ||
    LogicalAnd,        // &&
    NullishCoalescing, // ??

    // Keywords
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    InstanceOf,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    TypeOf,
    Var,
    Void,
    While,
    With,

    Eof,
}

impl TokenType {
    /// Map reserved words to their keyword type.
    pub fn keyword(word: &str) -> Option<TokenType> {
        let ty = match word {
            "break" => TokenType::Break,
            "case" => TokenType::Case,
            "catch" => TokenType::Catch,
            "class" => TokenType::Class,
            "const" => TokenType::Const,
            "continue" => TokenType::Continue,
            "debugger" => TokenType::Debugger,
            "default" => TokenType::Default,
            "delete" => TokenType::Delete,
            "do" => TokenType::Do,
            "else" => TokenType::Else,
            "export" => TokenType::Export,
            "extends" => TokenType::Extends,
            "false" => TokenType::False,
            "finally" => TokenType::Finally,
            "for" => TokenType::For,
            "function" => TokenType::Function,
            "if" => TokenType::If,
            "import" => TokenType::Import,
            "in" => TokenType::In,
            "instanceof" => TokenType::InstanceOf,
            "new" => TokenType::New,
            "null" => TokenType::Null,
            "return" => TokenType::Return,
            "super" => TokenType::Super,
            "switch" => TokenType::Switch,
            "this" => TokenType::This,
            "throw" => TokenType::Throw,
            "true" => TokenType::True,
            "try" => TokenType::Try,
            "typeof" => TokenType::TypeOf,
            "var" => TokenType::Var,
            "void" => TokenType::Void,
            "while" => TokenType::While,
            "with" => TokenType::With,
            _ => return None,
        };
        Some(ty)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenType::Break
                | TokenType::Case
                | TokenType::Catch
                | TokenType::Class
                | TokenType::Const
                | TokenType::Continue
                | TokenType::Debugger
                | TokenType::Default
                | TokenType::Delete
                | TokenType::Do
                | TokenType::Else
                | TokenType::Export
                | TokenType::Extends
                | TokenType::False
                | TokenType::Finally
                | TokenType::For
                | TokenType::Function
                | TokenType::If
                | TokenType::Import
                | TokenType::In
                | TokenType::InstanceOf
                | TokenType::New
                | TokenType::Null
                | TokenType::Return
                | TokenType::Super
                | TokenType::Switch
                | TokenType::This
                | TokenType::Throw
                | TokenType::True
                | TokenType::Try
                | TokenType::TypeOf
                | TokenType::Var
                | TokenType::Void
                | TokenType::While
                | TokenType::With
        )
    }

    /// Names and keywords, i.e. anything usable as a property key.
    pub fn is_name_like(self) -> bool {
        self == TokenType::Name || self.is_keyword()
    }

    /// Binary operators that continue an expression.
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenType::PlusMin
                | TokenType::Star
                | TokenType::Slash
                | TokenType::Modulo
                | TokenType::Exponent
                | TokenType::LessThan
                | TokenType::GreaterThan
                | TokenType::Relational
                | TokenType::Equality
                | TokenType::BitShift
                | TokenType::BitOr
                | TokenType::BitXor
                | TokenType::BitAnd
                | TokenType::LogicalOr
                | TokenType::LogicalAnd
                | TokenType::NullishCoalescing
                | TokenType::InstanceOf
                | TokenType::In
        )
    }
}

/// How an identifier token is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRole {
    /// A reference to a binding
    Access,
    /// Declared by `var`, a function name or a parameter
    FunctionScopedDeclaration,
    /// Declared by `let`, `const`, `class`, `import` or a catch clause
    BlockScopedDeclaration,
    /// `{a}` in an object literal: both the key and a reference
    ObjectShorthand,
    /// A plain key in an object literal
    ObjectKey,
}

impl IdentifierRole {
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            IdentifierRole::FunctionScopedDeclaration | IdentifierRole::BlockScopedDeclaration
        )
    }
}

/// A token with its transform-time annotations
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Part of a TypeScript/Flow type region
    pub is_type: bool,
    pub identifier_role: Option<IdentifierRole>,
    /// Shared by the tokens of one matched structural pair
    pub context_id: Option<u32>,
    /// Function nesting level the token was scanned at
    pub scope_depth: u32,
    /// For `class`: the class is used as a value
    pub is_expression: bool,
    /// For the `=` of a class field: index of the first token past the
    /// initializer. For `export` of a variable declaration: index of the
    /// first token past the declaration.
    pub rhs_end_index: Option<usize>,
    /// A line break separates this token from the previous one
    pub newline_before: bool,
}

impl Token {
    pub fn new(ty: TokenType, start: usize, end: usize) -> Self {
        Token {
            ty,
            start,
            end,
            is_type: false,
            identifier_role: None,
            context_id: None,
            scope_depth: 0,
            is_expression: false,
            rhs_end_index: None,
            newline_before: false,
        }
    }

    /// Raw source text of the token.
    pub fn text<'a>(&self, code: &'a str) -> &'a str {
        &code[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenType::keyword("class"), Some(TokenType::Class));
        assert_eq!(TokenType::keyword("let"), None);
        assert_eq!(TokenType::keyword("async"), None);
        assert!(TokenType::Default.is_name_like());
        assert!(!TokenType::Comma.is_name_like());
    }

    #[test]
    fn test_token_text() {
        let code = "let x = 1;";
        let token = Token::new(TokenType::Name, 4, 5);
        assert_eq!(token.text(code), "x");
    }
}
