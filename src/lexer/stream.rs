//! Cursor over a tokenized source file.
//!
//! The stream always ends with an `EOF` token, and advancing past it keeps
//! returning that token, so callers never have to deal with running off the
//! end of the vector.

use super::tokens::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let position = tokens.last().map(|token| token.position.clone()).unwrap_or_else(crate::Position::null);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                position,
            });
        }

        TokenStream { tokens, pos: 0 }
    }

    /// The next unconsumed token.
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// The token after `current`, without consuming anything.
    pub fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// Consumes the current token and returns it.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Steps back over the most recently consumed token.
    pub fn back_up(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn at_eof(&self) -> bool {
        self.current_kind() == TokenKind::EOF
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Advances until a token of `kind` is current (or EOF is reached).
    pub fn skip_to(&mut self, kind: TokenKind) {
        while !self.at_eof() && self.current_kind() != kind {
            self.pos += 1;
        }
    }

    /// Advances past the next token of `kind`.
    pub fn skip_past(&mut self, kind: TokenKind) {
        self.skip_to(kind);
        self.advance();
    }

    /// Advances past the close brace matching the most recently opened block.
    ///
    /// Braces opened after the cursor are balanced before the matching one is found.
    pub fn skip_to_closing_curly(&mut self) {
        let mut depth = 0;
        while !self.at_eof() {
            match self.advance().kind {
                TokenKind::OpenCurly => depth += 1,
                TokenKind::CloseCurly if depth == 0 => return,
                TokenKind::CloseCurly => depth -= 1,
                _ => {}
            }
        }
    }

    /// Every token that starts on source row `row`, in order.
    pub fn row(&self, row: u32) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|token| token.kind != TokenKind::EOF && token.position.row == row)
            .collect()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
