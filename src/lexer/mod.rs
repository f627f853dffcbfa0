//! Lexical analysis.
//!
//! Converts source text into a position-tagged token sequence and wraps it
//! in a [`stream::TokenStream`] for the parser. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of keywords, identifiers, literals and operators
//! - Row/column tracking for diagnostics
//! - Comments, shebang lines and whitespace

pub mod lexer;
pub mod stream;
pub mod tokens;
