use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A lexing or parsing error at a source position.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::ReservedWord { .. } => "ReservedWord",
            ErrorImpl::InvalidAssignmentTarget { .. } => "InvalidAssignmentTarget",
            ErrorImpl::InvalidStep { .. } => "InvalidStep",
            ErrorImpl::ExportWithoutName { .. } => "ExportWithoutName",
            ErrorImpl::ImportFailed { .. } => "ImportFailed",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Declared type `{}` does not match initializer ({})",
                expected, received
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::ReservedWord { word } => ErrorTip::Suggestion(format!(
                "Cannot use variable name `{}` as it is a reserved word",
                word
            )),
            ErrorImpl::InvalidAssignmentTarget { .. } => ErrorTip::Suggestion(String::from(
                "Expected left side of assignment to be an identifier",
            )),
            ErrorImpl::InvalidStep { step } => ErrorTip::Suggestion(format!(
                "Loop step `{}` must be a positive integer",
                step
            )),
            ErrorImpl::ExportWithoutName { kind } => ErrorTip::Suggestion(format!(
                "Cannot infer an export name from a {}, add `as <name>`",
                kind
            )),
            ErrorImpl::ImportFailed { path, reason } => {
                ErrorTip::Suggestion(format!("Could not load `{}`: {}", path, reason))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.internal_error, self.position.row, self.position.col
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("declared type does not match initializer: expected {expected}, received {received}")]
    TypeMatchError { expected: String, received: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("cannot use variable name {word:?} as it is a reserved word")]
    ReservedWord { word: String },
    #[error("expected left side of assignment to be an identifier, found {token:?}")]
    InvalidAssignmentTarget { token: String },
    #[error("invalid loop step {step:?}")]
    InvalidStep { step: String },
    #[error("export of a {kind} needs an explicit name")]
    ExportWithoutName { kind: String },
    #[error("failed to import {path:?}: {reason}")]
    ImportFailed { path: String, reason: String },
}
