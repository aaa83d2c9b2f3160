//! Mutable scan state shared by every parsing capability
//!
//! Lexing, lvalue parsing, type skipping and JSX parsing all operate on this
//! one record. Tokens are appended as the parser moves past them, which is
//! when the type-region flag and scope depth are stamped.

use super::lexer::{LexMode, Lexer};
use super::token::Token;
use crate::error::Result;

pub struct State<'a> {
    pub lexer: Lexer<'a>,
    /// Finished tokens, in source order
    pub tokens: Vec<Token>,
    /// The lookahead token; not yet part of `tokens`
    pub cur: Token,
    /// Tokens consumed now belong to a type annotation
    pub is_type: bool,
    pub scope_depth: u32,
    next_context_id: u32,
    context_stack: Vec<u32>,
}

/// Everything needed to undo a speculative parse
#[derive(Debug, Clone)]
pub struct Snapshot {
    pos: usize,
    token_count: usize,
    cur: Token,
    is_type: bool,
    scope_depth: u32,
    next_context_id: u32,
    context_stack: Vec<u32>,
}

impl<'a> State<'a> {
    pub fn new(code: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(code);
        let cur = lexer.next_token(false)?;
        Ok(State {
            lexer,
            tokens: Vec::new(),
            cur,
            is_type: false,
            scope_depth: 0,
            next_context_id: 1,
            context_stack: Vec::new(),
        })
    }

    pub fn code(&self) -> &'a str {
        self.lexer.code
    }

    /// Finish the current token and read the next one in `mode`
    pub fn next_with(&mut self, mode: LexMode) -> Result<()> {
        let next = self.lexer.read_token(mode, self.is_type)?;
        let mut token = std::mem::replace(&mut self.cur, next);
        token.is_type |= self.is_type;
        token.scope_depth = self.scope_depth;
        self.tokens.push(token);
        Ok(())
    }

    /// Replace the lookahead with a token re-read from `start` by `read`
    pub fn rescan(
        &mut self,
        read: impl FnOnce(&mut Lexer<'a>, usize) -> Result<Token>,
    ) -> Result<()> {
        let start = self.cur.start;
        let newline_before = self.cur.newline_before;
        let mut token = read(&mut self.lexer, start)?;
        token.newline_before = newline_before;
        self.cur = token;
        Ok(())
    }

    /// Peek at the token after the lookahead without consuming anything
    pub fn peek_token(&mut self) -> Result<Token> {
        let saved = self.lexer.pos();
        let token = self.lexer.next_token(self.is_type);
        self.lexer.set_pos(saved);
        token
    }

    /// Open a tracked construct and return its fresh context id
    pub fn push_context(&mut self) -> u32 {
        let id = self.next_context_id;
        self.next_context_id += 1;
        self.context_stack.push(id);
        id
    }

    /// Close the innermost tracked construct
    pub fn pop_context(&mut self) -> Option<u32> {
        self.context_stack.pop()
    }

    /// Allocate an id without opening a construct
    pub fn fresh_context_id(&mut self) -> u32 {
        let id = self.next_context_id;
        self.next_context_id += 1;
        id
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.lexer.pos(),
            token_count: self.tokens.len(),
            cur: self.cur.clone(),
            is_type: self.is_type,
            scope_depth: self.scope_depth,
            next_context_id: self.next_context_id,
            context_stack: self.context_stack.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.lexer.set_pos(snapshot.pos);
        self.tokens.truncate(snapshot.token_count);
        self.cur = snapshot.cur;
        self.is_type = snapshot.is_type;
        self.scope_depth = snapshot.scope_depth;
        self.next_context_id = snapshot.next_context_id;
        self.context_stack = snapshot.context_stack;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::TokenType;

    #[test]
    fn test_tokens_pushed_on_advance() {
        let mut state = State::new("a + b").unwrap();
        assert!(state.tokens.is_empty());
        state.next_with(LexMode::Normal).unwrap();
        assert_eq!(state.tokens.len(), 1);
        assert_eq!(state.cur.ty, TokenType::PlusMin);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut state = State::new("a b c").unwrap();
        let snapshot = state.snapshot();
        state.next_with(LexMode::Normal).unwrap();
        state.push_context();
        state.next_with(LexMode::Normal).unwrap();
        state.restore(snapshot);
        assert!(state.tokens.is_empty());
        assert_eq!(state.cur.start, 0);
        assert_eq!(state.pop_context(), None);
    }

    #[test]
    fn test_type_flag_stamped_on_push() {
        let mut state = State::new("x y").unwrap();
        state.is_type = true;
        state.next_with(LexMode::Normal).unwrap();
        assert!(state.tokens[0].is_type);
    }
}
