//! Per-file collection of parse diagnostics and their terminal rendering.

use std::path::Path;

use crate::{
    lexer::{stream::TokenStream, tokens::Token},
    remove_starting_whitespace,
};

use super::errors::{Error, ErrorImpl, ErrorTip};

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub error: Error,
    pub token: Token,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Records a diagnostic against `token` and returns its index.
    pub fn push(&mut self, error_impl: ErrorImpl, token: &Token) -> usize {
        self.entries.push(Diagnostic {
            error: Error::new(error_impl, token.position.clone()),
            token: token.clone(),
        });
        self.entries.len() - 1
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Diagnostic> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Renders every diagnostic in order, each followed by a blank line.
    pub fn render(&self, file: &Path, stream: &TokenStream) -> String {
        self.entries
            .iter()
            .map(|diagnostic| render_diagnostic(diagnostic, file, stream) + "\n")
            .collect()
    }
}

/// Rebuilds a source row by placing each token at its recorded column.
fn reconstruct_row(tokens: &[&Token]) -> String {
    let mut line = String::new();
    for token in tokens {
        let column = token.position.col.saturating_sub(1) as usize;
        let width = line.chars().count();
        if width < column {
            line.push_str(&" ".repeat(column - width));
        } else if width > column {
            line.push(' ');
        }
        line.push_str(&token.source_text());
    }
    line
}

fn render_diagnostic(diagnostic: &Diagnostic, file: &Path, stream: &TokenStream) -> String {
    /*
        Error: name (tip)
        -> main.etch
           |
        20 | var (num) a = "a";
           | --------------^^^
    */
    let error = &diagnostic.error;
    let position = error.get_position();
    let mut rendered = String::new();

    match error.get_tip() {
        ErrorTip::None => rendered.push_str(&format!("Error: {}\n", error.get_error_name())),
        tip => rendered.push_str(&format!("Error: {} ({})\n", error.get_error_name(), tip)),
    }
    rendered.push_str(&format!("-> {}\n", file.display()));

    let line_string = position.row.to_string();
    let padding = line_string.len() + 2;
    rendered.push_str(&format!("{:>padding$}\n", "|"));

    let line_text = reconstruct_row(&stream.row(position.row));
    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    rendered.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let dashes = (position.col.saturating_sub(1) as usize).saturating_sub(removed_whitespace);
    let carets = position.length.max(1) as usize;
    rendered.push_str(&format!(
        "{:>padding$} {}{}",
        "|",
        "-".repeat(dashes),
        "^".repeat(carets)
    ));

    rendered
}
