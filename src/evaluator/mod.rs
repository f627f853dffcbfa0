//! Tree-walking evaluator.
//!
//! Executes a module's AST against scopes stored in an arena. It handles:
//!
//! - Statement execution, including early return through nested blocks and loops
//! - Expression evaluation over the closed set of runtime [`value::Value`] kinds
//! - Closures, which keep the index of the scope they were defined in
//! - Operator dispatch and the string/array intrinsics
//! - Import and export between modules of one [`crate::module::graph::ImportGraph`]

pub mod evaluator;
pub mod expr;
pub mod intrinsics;
pub mod operators;
pub mod scope;
pub mod stmt;
pub mod value;

#[cfg(test)]
mod tests;
