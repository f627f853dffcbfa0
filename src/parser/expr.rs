//! Expression parsing.
//!
//! A primary is parsed first, then the next token decides whether it is the
//! left operand of a binary operator, a callee, or an assignment target.
//! Binary expressions are built right-recursively and then re-associated by
//! [`order_operations`].

use std::{collections::BTreeMap, rc::Rc};

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::{
    ast::{
        ast::Expr,
        expressions::{
            ArrayExpr, AssignmentExpr, BinaryExpr, BooleanExpr, CallExpr, FunctionExpr,
            GroupExpr, IntegerExpr, NumberExpr, ObjectExpr, Parameter, StringExpr, SymbolExpr,
            VarDeclExpr,
        },
        types::DataType,
    },
    errors::errors::ErrorImpl,
    lexer::tokens::{Token, TokenKind},
};

use super::{
    lookups::{rotates_over, OPERATOR_LOOKUP},
    parser::{ParseResult, Parser},
    stmt::parse_stmt,
    types::{parse_data_type, parse_type_annotation},
};

pub fn parse_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let primary = parse_primary_expr(parser)?;
    parse_postfix_expr(parser, primary)
}

/// Decides what follows a complete operand.
fn parse_postfix_expr(parser: &mut Parser, left: Expr) -> ParseResult<Expr> {
    let kind = parser.current_token_kind();

    if let Some(operator) = OPERATOR_LOOKUP.get(&kind).copied() {
        parser.advance();
        let right = parse_expr(parser)?;

        return Ok(Expr::Binary(order_operations(BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })));
    }

    match kind {
        TokenKind::Assignment => parse_assignment_expr(parser, left),
        TokenKind::OpenParen => {
            let call = parse_call_expr(parser, left)?;
            parse_postfix_expr(parser, call)
        }
        _ => Ok(left),
    }
}

/// Re-associates `left OP right` after `right` was parsed first.
///
/// When the right child is itself an operation that binds looser than `OP`
/// (or equally, for left-associative operators), the child is lifted above
/// `OP`: `a * (b + c)` becomes `(a * b) + c`. The demoted node is ordered
/// again because its new right operand may be another operation.
pub fn order_operations(operation: BinaryExpr) -> BinaryExpr {
    let BinaryExpr {
        left,
        operator,
        right,
    } = operation;

    match *right {
        Expr::Binary(child) if rotates_over(operator, child.operator) => {
            let demoted = order_operations(BinaryExpr {
                left,
                operator,
                right: child.left,
            });

            BinaryExpr {
                left: Box::new(Expr::Binary(demoted)),
                operator: child.operator,
                right: child.right,
            }
        }
        right => BinaryExpr {
            left,
            operator,
            right: Box::new(right),
        },
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> ParseResult<Expr> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Number => {
            parser.advance();
            match token.value.parse::<f64>() {
                Ok(value) => Ok(Expr::Number(NumberExpr { value })),
                Err(_) => Err(parser.report(ErrorImpl::NumberParseError { token: token.value.clone() }, &token)),
            }
        }
        TokenKind::Integer => {
            parser.advance();
            match token.value.parse::<BigInt>() {
                Ok(value) => Ok(Expr::Integer(IntegerExpr { value })),
                Err(_) => Err(parser.report(ErrorImpl::NumberParseError { token: token.value.clone() }, &token)),
            }
        }
        TokenKind::String => {
            parser.advance();
            Ok(Expr::String(StringExpr { value: token.value }))
        }
        TokenKind::Bool => {
            parser.advance();
            Ok(Expr::Boolean(BooleanExpr {
                value: token.value == "true",
            }))
        }
        TokenKind::Identifier => {
            parser.advance();
            Ok(Expr::Symbol(SymbolExpr { value: token.value }))
        }
        TokenKind::OpenParen => parse_group_expr(parser),
        TokenKind::OpenBracket => parse_array_expr(parser),
        TokenKind::OpenCurly => parse_object_expr(parser),
        TokenKind::Var => parse_var_decl_expr(parser),
        TokenKind::Func => parse_function_expr(parser),
        _ => parser.fail(ErrorImpl::UnexpectedTokenDetailed {
            token: token.value,
            message: String::from("expected an expression"),
        }),
    }
}

fn parse_group_expr(parser: &mut Parser) -> ParseResult<Expr> {
    parser.advance();
    let expression = parse_expr(parser)?;
    parser.expect_error(TokenKind::CloseParen, "expected ')' to close the group")?;

    Ok(Expr::Group(GroupExpr {
        expression: Box::new(expression),
    }))
}

fn parse_array_expr(parser: &mut Parser) -> ParseResult<Expr> {
    parser.advance();
    let mut elements = vec![];

    while parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_expr(parser)?);

        if parser.current_token_kind() != TokenKind::CloseBracket {
            parser.expect_error(TokenKind::Comma, "expected ',' or ']' in array literal")?;
        }
    }

    parser.advance();
    Ok(Expr::Array(ArrayExpr { elements }))
}

fn parse_object_expr(parser: &mut Parser) -> ParseResult<Expr> {
    parser.advance();
    let mut fields = BTreeMap::new();

    while parser.current_token_kind() != TokenKind::CloseCurly {
        let key = parser.expect_error(TokenKind::Identifier, "expected a field name")?;
        parser.expect_error(TokenKind::Colon, "expected ':' after a field name")?;
        let value = parse_expr(parser)?;
        fields.insert(key.value, value);

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect_error(TokenKind::Comma, "expected ',' or '}' in object literal")?;
        }
    }

    parser.advance();
    Ok(Expr::Object(ObjectExpr { fields }))
}

pub fn parse_call_expr(parser: &mut Parser, callee: Expr) -> ParseResult<Expr> {
    parser.advance();
    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect_error(TokenKind::Comma, "expected ',' or ')' in argument list")?;
        }
    }

    parser.advance();
    Ok(Expr::Call(CallExpr {
        callee: Box::new(callee),
        arguments,
    }))
}

pub fn parse_assignment_expr(parser: &mut Parser, target: Expr) -> ParseResult<Expr> {
    let assignee = match target {
        Expr::Symbol(symbol) => symbol.value,
        other => {
            return parser.fail(ErrorImpl::InvalidAssignmentTarget {
                token: String::from(other.kind_name()),
            })
        }
    };

    parser.advance();
    let value = parse_expr(parser)?;

    Ok(Expr::Assignment(AssignmentExpr {
        assignee,
        value: Box::new(value),
    }))
}

/// `var (type) name [= value]`
pub fn parse_var_decl_expr(parser: &mut Parser) -> ParseResult<Expr> {
    parser.advance();
    let data_type = parse_type_annotation(parser, false)?;
    let name = parser.expect_error(TokenKind::Identifier, "expected identifier during variable declaration")?;

    if DataType::from_name(&name.value).is_some() {
        parser.report(ErrorImpl::ReservedWord { word: name.value.clone() }, &name);
    }

    let value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        let value_token = parser.current_token().clone();
        let value = parse_expr(parser)?;
        Some(Box::new(check_declared_type(parser, data_type, value, &value_token)))
    } else {
        None
    };

    Ok(Expr::VarDecl(VarDeclExpr {
        identifier: name.value,
        data_type,
        value,
    }))
}

/// Shallow check of an initializer against the declared type.
///
/// Only literals are checked; anything whose kind is decided at run time
/// passes. An integer literal in a `num` slot becomes a number literal.
fn check_declared_type(parser: &mut Parser, data_type: DataType, value: Expr, token: &Token) -> Expr {
    match (data_type, &value) {
        (DataType::Num, Expr::Integer(integer)) => Expr::Number(NumberExpr {
            value: integer.value.to_f64().unwrap_or(f64::NAN),
        }),
        (DataType::Num, Expr::Number(_))
        | (DataType::Int, Expr::Integer(_))
        | (DataType::Str, Expr::String(_))
        | (DataType::Bool, Expr::Boolean(_))
        | (DataType::Arr, Expr::Array(_))
        | (DataType::Obj, Expr::Object(_))
        | (DataType::Func, Expr::Function(_))
        | (_, Expr::Binary(_))
        | (_, Expr::Call(_))
        | (_, Expr::Group(_))
        | (_, Expr::Symbol(_))
        | (_, Expr::Assignment(_)) => value,
        (expected, received) => {
            parser.report(
                ErrorImpl::TypeMatchError {
                    expected: expected.to_string(),
                    received: String::from(received.kind_name()),
                },
                token,
            );
            value
        }
    }
}

/// `func (return type) [name] (type name, ...) body`
pub fn parse_function_expr(parser: &mut Parser) -> ParseResult<Expr> {
    parser.advance();
    let return_type = parse_type_annotation(parser, true)?;

    let name = if parser.current_token_kind() == TokenKind::Identifier {
        Some(parser.advance().value)
    } else {
        None
    };

    parser.expect_error(TokenKind::OpenParen, "expected '(' to start the parameter list")?;
    let mut parameters = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        let data_type = parse_data_type(parser, false)?;
        let name = parser.expect_error(TokenKind::Identifier, "expected a parameter name")?;
        parameters.push(Parameter {
            name: name.value,
            data_type,
        });

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect_error(TokenKind::Comma, "expected ',' or ')' in parameter list")?;
        }
    }

    parser.advance();
    let body = parse_stmt(parser);

    Ok(Expr::Function(Rc::new(FunctionExpr {
        name,
        return_type,
        parameters,
        body: Box::new(body),
    })))
}
