use std::collections::BTreeMap;

use num_bigint::BigInt;

use super::{
    ast::{Expr, Stmt},
    types::{DataType, Operator},
};

// LITERALS

/// Number Expression
/// Represents a floating point literal in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    pub value: f64,
}

/// Integer Expression
/// Represents an arbitrary-precision integer literal in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerExpr {
    pub value: BigInt,
}

/// String Expression
/// Represents a string literal in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub value: String,
}

/// Boolean Expression
/// Represents a boolean literal in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub value: bool,
}

/// Symbol Expression
/// Represents an identifier in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
}

/// Object Expression
/// Maps field names to their (unevaluated) expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    pub fields: BTreeMap<String, Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
}

/// Group Expression
/// A parenthesized expression. Groups are never re-associated by precedence ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupExpr {
    pub expression: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub data_type: DataType,
}

/// Function Expression
/// A function literal. When it carries a name, evaluating it also binds that name.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub name: Option<String>,
    pub return_type: DataType,
    pub parameters: Vec<Parameter>,
    pub body: Box<Stmt>,
}

// OPERATIONS

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// Binary Expression
/// Also covers index (`@`), range (`..`), member access (`.`) and compound assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Operator,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub assignee: String,
    pub value: Box<Expr>,
}

/// Variable Declaration Expression
/// `var (type) name [= value]`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclExpr {
    pub identifier: String,
    pub data_type: DataType,
    pub value: Option<Box<Expr>>,
}
