//! Parser module for building the Abstract Syntax Tree (AST).
//!
//! A recursive-descent parser with one token of lookahead. It handles:
//!
//! - Statement parsing (control flow, printing, input, imports and exports)
//! - Expression parsing with precedence fixed up by tree rotation
//! - Shallow declared-type checks on `var` initializers
//! - Error recovery: diagnostics are collected and parsing continues
//! - Loading imported files into the shared [`context::ParseContext`]

pub mod context;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
