use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{
            BlockStmt, ErrorStmt, EtchStmt, ExportStmt, ExpressionStmt, ForStmt, IfStmt,
            ImportStmt, ReadStmt, ReturnStmt, WhileStmt,
        },
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
};

use super::{
    expr::parse_expr,
    parser::{ParseResult, Parser},
};

/// Parses one statement, substituting an error statement if it fails.
pub fn parse_stmt(parser: &mut Parser) -> Stmt {
    match parse_stmt_inner(parser) {
        Ok(stmt) => stmt,
        Err(diagnostic) => {
            parser.synchronize();
            Stmt::Error(ErrorStmt { diagnostic })
        }
    }
}

fn parse_stmt_inner(parser: &mut Parser) -> ParseResult<Stmt> {
    match parser.current_token_kind() {
        TokenKind::OpenCurly => Ok(Stmt::Block(parse_block_stmt(parser)?)),
        TokenKind::If => parse_if_stmt(parser),
        TokenKind::While => parse_while_stmt(parser),
        TokenKind::For => parse_for_stmt(parser),
        TokenKind::Etch => parse_etch_stmt(parser),
        TokenKind::Read => parse_read_stmt(parser),
        TokenKind::Return => parse_return_stmt(parser),
        TokenKind::Import => parse_import_stmt(parser),
        TokenKind::Export => parse_export_stmt(parser),
        _ => parse_expression_stmt(parser),
    }
}

/// Function literals end with their body, so their `;` is optional.
fn expect_terminator(parser: &mut Parser, expression: &Expr) -> ParseResult<()> {
    if let Expr::Function(_) = expression {
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        }
        return Ok(());
    }

    parser.expect_error(TokenKind::Semicolon, "expected ';' to end the statement")?;
    Ok(())
}

fn parse_expression_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    let expression = parse_expr(parser)?;
    expect_terminator(parser, &expression)?;

    Ok(Stmt::Expression(ExpressionStmt { expression }))
}

pub fn parse_block_stmt(parser: &mut Parser) -> ParseResult<BlockStmt> {
    parser.expect(TokenKind::OpenCurly)?;
    let mut body = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return parser.fail(ErrorImpl::UnexpectedTokenDetailed {
                token: String::from("EOF"),
                message: String::from("expected '}' to close the block"),
            });
        }

        let start = parser.token_index();
        body.push(parse_stmt(parser));

        if parser.token_index() == start {
            parser.advance();
        }
    }

    parser.advance();
    Ok(BlockStmt { body })
}

pub fn parse_if_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    parser.advance();

    let condition = parse_expr(parser)?;
    let then_body = parse_stmt(parser);

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body: Box::new(then_body),
        else_body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    parser.advance();

    let condition = parse_expr(parser)?;
    let body = parse_stmt(parser);

    Ok(Stmt::While(WhileStmt {
        condition,
        body: Box::new(body),
    }))
}

/// `for name in iterable [step n] body`
pub fn parse_for_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    parser.advance();

    let identifier = parser.expect_error(TokenKind::Identifier, "expected a loop variable")?.value;
    parser.expect_error(TokenKind::In, "expected 'in' after the loop variable")?;
    let iterable = parse_expr(parser)?;

    let mut step = 1;
    if parser.current_token_kind() == TokenKind::Identifier && parser.current_token().value == "step" {
        parser.advance();
        let token = parser.expect_error(TokenKind::Integer, "expected an integer step")?;

        match token.value.parse::<usize>() {
            Ok(value) if value > 0 => step = value,
            _ => {
                parser.report(ErrorImpl::InvalidStep { step: token.value.clone() }, &token);
            }
        }
    }

    let body = parse_stmt(parser);

    Ok(Stmt::For(ForStmt {
        identifier,
        iterable,
        step,
        body: Box::new(body),
    }))
}

pub fn parse_etch_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    parser.advance();
    let mut expressions = vec![parse_expr(parser)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        expressions.push(parse_expr(parser)?);
    }

    parser.expect_error(TokenKind::Semicolon, "expected ';' to end the statement")?;
    Ok(Stmt::Etch(EtchStmt { expressions }))
}

/// `read name [, prompt];`
pub fn parse_read_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    parser.advance();
    let identifier = parser.expect_error(TokenKind::Identifier, "expected a variable to read into")?.value;

    let prompt = if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        Some(parse_expr(parser)?)
    } else {
        None
    };

    parser.expect_error(TokenKind::Semicolon, "expected ';' to end the statement")?;
    Ok(Stmt::Read(ReadStmt { identifier, prompt }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    parser.advance();

    let value = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser)?)
    };

    parser.expect_error(TokenKind::Semicolon, "expected ';' to end the statement")?;
    Ok(Stmt::Return(ReturnStmt { value }))
}

/// `import a, b from "path";`
pub fn parse_import_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    parser.advance();
    let mut names = vec![parser.expect_error(TokenKind::Identifier, "expected a name to import")?.value];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        names.push(parser.expect_error(TokenKind::Identifier, "expected a name to import")?.value);
    }

    parser.expect_error(TokenKind::From, "expected 'from' after the imported names")?;
    let from = parser.expect_error(TokenKind::String, "expected the module path as a string")?;
    parser.expect_error(TokenKind::Semicolon, "expected ';' to end the statement")?;

    let resolved = parser.import_module(&from.value, &from);

    Ok(Stmt::Import(ImportStmt {
        names,
        from: from.value,
        resolved,
    }))
}

/// `export expr [as name];`
pub fn parse_export_stmt(parser: &mut Parser) -> ParseResult<Stmt> {
    parser.advance();
    let expression = parse_expr(parser)?;

    let name = if parser.current_token_kind() == TokenKind::As {
        parser.advance();
        parser.expect_error(TokenKind::Identifier, "expected a name after 'as'")?.value
    } else {
        let inferred = match &expression {
            Expr::Function(function) => function.name.clone(),
            Expr::VarDecl(declaration) => Some(declaration.identifier.clone()),
            Expr::Symbol(symbol) => Some(symbol.value.clone()),
            _ => None,
        };

        match inferred {
            Some(name) => name,
            None => {
                let kind = String::from(expression.kind_name());
                return parser.fail(ErrorImpl::ExportWithoutName { kind });
            }
        }
    };

    expect_terminator(parser, &expression)?;
    Ok(Stmt::Export(ExportStmt { expression, name }))
}
