use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("while", TokenKind::While);
        map.insert("var", TokenKind::Var);
        map.insert("func", TokenKind::Func);
        map.insert("etch", TokenKind::Etch);
        map.insert("read", TokenKind::Read);
        map.insert("return", TokenKind::Return);
        map.insert("import", TokenKind::Import);
        map.insert("export", TokenKind::Export);
        map.insert("from", TokenKind::From);
        map.insert("as", TokenKind::As);
        map.insert("true", TokenKind::Bool);
        map.insert("false", TokenKind::Bool);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    Integer,
    String,
    Bool,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Dot,
    DotDot,
    At,
    Semicolon,
    Colon,
    Comma,

    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    If,
    Else,
    For,
    In,
    While,
    Var,
    Func,
    Etch,
    Read,
    Return,
    Import,
    Export,
    From,
    As,
}

impl TokenKind {
    /// Whether a token of this kind can be the last token of an operand.
    /// Used by the lexer to tell `x-1` apart from `x = -1`.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::Integer
                | TokenKind::String
                | TokenKind::Bool
                | TokenKind::Identifier
                | TokenKind::CloseParen
                | TokenKind::CloseBracket
                | TokenKind::CloseCurly
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Token {
    /// The token as it appeared in the source, used to rebuild a line for diagnostics.
    pub fn source_text(&self) -> String {
        match self.kind {
            TokenKind::String => format!("{:?}", self.value),
            TokenKind::EOF => String::new(),
            _ => self.value.clone(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier | TokenKind::Number | TokenKind::Integer | TokenKind::String => {
                write!(f, "{} ({})", self.kind, self.value)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}
