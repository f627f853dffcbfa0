//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use std::path::{Path, PathBuf};

use crate::{
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl, ErrorTip},
        module::{ImportCycle, RunError},
        runtime::RuntimeError,
    },
    lexer::{lexer::tokenize, stream::TokenStream},
    Position,
};

fn position(row: u32, col: u32, length: u32) -> Position {
    Position { row, col, length }
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "$".to_string(),
        },
        position(3, 7, 1),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position(), &position(3, 7, 1));
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_display_includes_location() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        position(4, 2, 1),
    );

    assert_eq!(error.to_string(), "unexpected token: \"}\" at 4:2");
}

#[test]
fn test_type_mismatch_tip() {
    let error = Error::new(
        ErrorImpl::TypeMatchError {
            expected: "str".to_string(),
            received: "integer literal".to_string(),
        },
        Position::null(),
    );

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(
        error.get_tip().to_string(),
        "Declared type `str` does not match initializer (integer literal)"
    );
}

#[test]
fn test_reserved_word_tip() {
    let error = Error::new(
        ErrorImpl::ReservedWord {
            word: "num".to_string(),
        },
        Position::null(),
    );

    assert_eq!(error.get_error_name(), "ReservedWord");
    assert!(error.get_tip().to_string().contains("`num`"));
}

#[test]
fn test_export_without_name_tip() {
    let error = Error::new(
        ErrorImpl::ExportWithoutName {
            kind: "binary expression".to_string(),
        },
        Position::null(),
    );

    assert_eq!(error.get_error_name(), "ExportWithoutName");
    assert!(error.get_tip().to_string().contains("as <name>"));
}

#[test]
fn test_diagnostics_push_returns_indices() {
    let tokens = tokenize("var (num) x = ;").unwrap();
    let mut diagnostics = Diagnostics::new();
    assert!(!diagnostics.has_errors());

    let first = diagnostics.push(ErrorImpl::UnexpectedToken { token: ";".to_string() }, &tokens[6]);
    let second = diagnostics.push(ErrorImpl::InvalidStep { step: "0".to_string() }, &tokens[0]);

    assert_eq!((first, second), (0, 1));
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.get(0).unwrap().token.value, ";");
    assert_eq!(diagnostics.get(1).unwrap().error.get_error_name(), "InvalidStep");
}

#[test]
fn test_render_points_at_token() {
    let tokens = tokenize("etch 1;\n    var (num) x = \"a\";").unwrap();
    let offending = tokens
        .iter()
        .find(|token| token.value == "a")
        .cloned()
        .unwrap();
    let stream = TokenStream::new(tokens);

    let mut diagnostics = Diagnostics::new();
    diagnostics.push(
        ErrorImpl::TypeMatchError {
            expected: "num".to_string(),
            received: "string literal".to_string(),
        },
        &offending,
    );

    let rendered = diagnostics.render(Path::new("main.etch"), &stream);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines[0],
        "Error: TypeMatchError (Declared type `num` does not match initializer (string literal))"
    );
    assert_eq!(lines[1], "-> main.etch");
    assert_eq!(lines[2], "  |");
    assert_eq!(lines[3], "2 | var (num) x = \"a\";");
    assert_eq!(lines[4], "  | --------------^^^");
}

#[test]
fn test_import_cycle_display() {
    let cycle = ImportCycle {
        path: vec![PathBuf::from("a.etch"), PathBuf::from("b.etch"), PathBuf::from("c.etch")],
    };

    assert_eq!(
        cycle.to_string(),
        "import cycle found: a.etch -> b.etch -> c.etch -> a.etch"
    );
}

#[test]
fn test_run_error_wraps_runtime_errors() {
    let error: RunError = RuntimeError::DivisionByZero {
        operator: "%".to_string(),
    }
    .into();

    assert_eq!(error.to_string(), "eval error: division by zero in '%'");
}

#[test]
fn test_runtime_error_messages() {
    let error = RuntimeError::MissingExport {
        symbol: "y".to_string(),
        module: "lib.etch".to_string(),
    };
    assert_eq!(error.to_string(), "symbol 'y' is not exported from lib.etch");

    let error = RuntimeError::IndexOutOfRange {
        index: "3".to_string(),
        length: 3,
    };
    assert_eq!(error.to_string(), "index 3 is out of range for length 3");
}
