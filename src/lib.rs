#![allow(clippy::module_inception)]

use std::{
    io::{BufRead, Write},
    path::Path,
};

use crate::{
    errors::module::{ImportCycle, LoadError, RunError},
    evaluator::evaluator::Evaluator,
    parser::context::ParseContext,
};

pub mod ast;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod macros;
pub mod module;
pub mod parser;

extern crate regex;

/// A token's place in its source file. Rows and columns start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub row: u32,
    pub col: u32,
    pub length: u32,
}

impl Position {
    pub fn null() -> Self {
        Position {
            row: 0,
            col: 0,
            length: 0,
        }
    }
}

/// Reads, tokenizes and parses `entry` and everything it imports.
pub fn load(entry: &Path) -> Result<ParseContext, LoadError> {
    ParseContext::load(entry)
}

/// Rejects a loaded program that has an import cycle or any parse diagnostics.
///
/// Cycles are reported first; nothing is evaluated in either case.
pub fn check(context: &ParseContext) -> Result<(), RunError> {
    let cycle = context.find_cycles();
    if !cycle.is_empty() {
        return Err(ImportCycle { path: cycle }.into());
    }

    if context.has_errors() {
        return Err(RunError::Diagnostics {
            count: context.diagnostic_count(),
            rendered: context.render_diagnostics(),
        });
    }

    Ok(())
}

/// Loads, checks and evaluates the program rooted at `entry`.
pub fn run(entry: &Path, output: &mut dyn Write, input: &mut dyn BufRead) -> Result<(), RunError> {
    let mut context = load(entry)?;
    check(&context)?;

    let entry = context.entry_path().to_path_buf();
    Evaluator::new(&mut context.graph, output, input).evaluate_module(&entry)?;
    Ok(())
}

pub(crate) fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_remove_starting_whitespace() {
        let (line, removed) = super::remove_starting_whitespace("    etch x;");
        assert_eq!(line, "etch x;");
        assert_eq!(removed, 4);

        let (line, removed) = super::remove_starting_whitespace("etch x;");
        assert_eq!(line, "etch x;");
        assert_eq!(removed, 0);
    }
}
