//! Parser state and the per-file parse entry point.
//!
//! Parsing never stops at the first error. Failing productions record a
//! diagnostic and return its index as the `Err` of a [`ParseResult`]; the
//! statement parser turns that into an error statement, resynchronizes the
//! token stream and carries on with the next statement.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    ast::statements::BlockStmt,
    errors::{diagnostics::Diagnostics, errors::ErrorImpl},
    lexer::{
        stream::TokenStream,
        tokens::{Token, TokenKind},
    },
    module::resolve::resolve,
};

use super::{
    context::{ParseContext, SourceFile},
    stmt::parse_stmt,
};

/// Either a parsed node or the index of the diagnostic explaining why there is none.
pub type ParseResult<T> = Result<T, usize>;

/// The main parser structure that maintains parsing state.
pub struct Parser<'ctx> {
    /// The tokens of the file being parsed
    stream: TokenStream,
    /// Absolute path of the file being parsed
    file: PathBuf,
    /// Diagnostics raised so far in this file
    diagnostics: Diagnostics,
    /// State shared by every file reachable from the entry module
    context: &'ctx mut ParseContext,
}

impl<'ctx> Parser<'ctx> {
    pub fn new(tokens: Vec<Token>, file: PathBuf, context: &'ctx mut ParseContext) -> Self {
        Parser {
            stream: TokenStream::new(tokens),
            file,
            diagnostics: Diagnostics::new(),
            context,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.stream.current()
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.stream.current_kind()
    }

    /// Consumes the current token and returns it.
    pub fn advance(&mut self) -> Token {
        self.stream.advance()
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        !self.stream.at_eof()
    }

    pub fn token_index(&self) -> usize {
        self.stream.position()
    }

    /// Records a diagnostic without interrupting the current production.
    pub fn report(&mut self, error: ErrorImpl, token: &Token) -> usize {
        self.diagnostics.push(error, token)
    }

    /// Records a diagnostic against the current token and fails the production.
    pub fn fail<T>(&mut self, error: ErrorImpl) -> ParseResult<T> {
        let token = self.current_token().clone();
        Err(self.report(error, &token))
    }

    /// Expects a token of the specified kind, failing with `message` otherwise.
    pub fn expect_error(&mut self, expected_kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.current_token_kind() != expected_kind {
            let token = self.current_token().value.clone();
            return self.fail(ErrorImpl::UnexpectedTokenDetailed {
                token,
                message: String::from(message),
            });
        }

        Ok(self.advance())
    }

    /// Expects a token of the specified kind with the default error.
    pub fn expect(&mut self, expected_kind: TokenKind) -> ParseResult<Token> {
        if self.current_token_kind() != expected_kind {
            let token = self.current_token().value.clone();
            return self.fail(ErrorImpl::UnexpectedToken { token });
        }

        Ok(self.advance())
    }

    /// Skips the rest of a statement that failed to parse.
    ///
    /// Stops after the next `;`, after a skipped `{ ... }` block, or in front of
    /// a `}` that closes the enclosing block.
    pub fn synchronize(&mut self) {
        loop {
            match self.current_token_kind() {
                TokenKind::EOF | TokenKind::CloseCurly => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::OpenCurly => {
                    self.advance();
                    self.stream.skip_to_closing_curly();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Resolves an import written in this file, records the graph edge and
    /// parses the target if no other import got to it first.
    ///
    /// A target that is already in the graph is either parsed or still being
    /// parsed further up the stack (an import cycle); both are skipped here.
    pub fn import_module(&mut self, target: &str, token: &Token) -> PathBuf {
        let directory = self.file.parent().map(Path::to_path_buf).unwrap_or_default();
        let resolved = resolve(&directory, target);
        let already_known = self.context.graph.contains(&resolved);
        self.context.graph.add(&self.file, &resolved);

        if already_known {
            debug!(module = %resolved.display(), "import already parsed or in progress");
            return resolved;
        }

        if let Err(error) = self.context.load_import(&resolved) {
            self.report(
                ErrorImpl::ImportFailed {
                    path: String::from(target),
                    reason: error.to_string(),
                },
                token,
            );
        }

        resolved
    }
}

/// Parses a whole file into its root block.
///
/// Always produces a block; the returned [`SourceFile`] carries the
/// diagnostics that decide whether the block may be evaluated.
pub fn parse(tokens: Vec<Token>, file: &Path, context: &mut ParseContext) -> (BlockStmt, SourceFile) {
    let mut parser = Parser::new(tokens, file.to_path_buf(), context);
    let mut body = vec![];

    while parser.has_tokens() {
        let start = parser.token_index();
        body.push(parse_stmt(&mut parser));

        if parser.token_index() == start {
            parser.advance();
        }
    }

    let Parser {
        stream,
        file,
        diagnostics,
        ..
    } = parser;

    (
        BlockStmt { body },
        SourceFile {
            path: file,
            stream,
            diagnostics,
        },
    )
}
