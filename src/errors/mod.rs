//! Error types and error reporting.
//!
//! The language has two taxonomies that never mix:
//!
//! - Parse diagnostics (`errors`, `diagnostics`): collected per file, rendered with the offending row
//! - Runtime errors (`runtime`): fail fast, the first one ends evaluation
//!
//! `module` holds the errors raised while loading files and checking the import graph.

pub mod diagnostics;
pub mod errors;
pub mod module;
pub mod runtime;

#[cfg(test)]
mod tests;
