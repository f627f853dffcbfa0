use crate::{
    ast::types::DataType,
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
};

use super::parser::{ParseResult, Parser};

/// Parses a parenthesized type tag such as `(num)`.
pub fn parse_type_annotation(parser: &mut Parser, allow_void: bool) -> ParseResult<DataType> {
    parser.expect_error(TokenKind::OpenParen, "expected '(' before a data type")?;
    let data_type = parse_data_type(parser, allow_void)?;
    parser.expect_error(TokenKind::CloseParen, "expected ')' after a data type")?;

    Ok(data_type)
}

/// Parses a bare type tag. `func` is a keyword, every other tag is an identifier.
pub fn parse_data_type(parser: &mut Parser, allow_void: bool) -> ParseResult<DataType> {
    let token = parser.current_token().clone();

    let data_type = match token.kind {
        TokenKind::Func => DataType::Func,
        TokenKind::Identifier => match DataType::from_name(&token.value) {
            Some(data_type) => data_type,
            None => return parser.fail(ErrorImpl::UnknownType { type_: token.value }),
        },
        _ => {
            return parser.fail(ErrorImpl::UnexpectedTokenDetailed {
                token: token.value,
                message: String::from("expected a data type"),
            })
        }
    };

    if data_type == DataType::Void && !allow_void {
        return parser.fail(ErrorImpl::UnexpectedTokenDetailed {
            token: token.value,
            message: String::from("void is only valid as a function return type"),
        });
    }

    parser.advance();
    Ok(data_type)
}
