use std::path::PathBuf;

use super::ast::{Expr, Stmt};

/// Block Statement
/// A brace-delimited list of statements; also the root of every module.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
}

/// Expression Statement
/// Variable declarations and named function literals appear here as well.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
}

/// For Statement
/// `for name in iterable [step n] body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub identifier: String,
    pub iterable: Expr,
    pub step: usize,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
}

/// Etch Statement
/// Prints its expressions space-separated, followed by a newline.
#[derive(Debug, Clone, PartialEq)]
pub struct EtchStmt {
    pub expressions: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadStmt {
    pub identifier: String,
    pub prompt: Option<Expr>,
}

/// Import Statement
/// `from` is the path as written, `resolved` the absolute path found while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub names: Vec<String>,
    pub from: String,
    pub resolved: PathBuf,
}

/// Export Statement
/// `name` is either the explicit alias or the name inferred from the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportStmt {
    pub expression: Expr,
    pub name: String,
}

/// Error Statement
/// Stands in for a statement that failed to parse. `diagnostic` indexes the file's diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorStmt {
    pub diagnostic: usize,
}
