use std::rc::Rc;

use super::{
    expressions::{
        ArrayExpr, AssignmentExpr, BinaryExpr, BooleanExpr, CallExpr, FunctionExpr, GroupExpr,
        IntegerExpr, NumberExpr, ObjectExpr, StringExpr, SymbolExpr, VarDeclExpr,
    },
    statements::{
        BlockStmt, ErrorStmt, EtchStmt, ExportStmt, ExpressionStmt, ForStmt, IfStmt, ImportStmt,
        ReadStmt, ReturnStmt, WhileStmt,
    },
};

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStmt),
    Expression(ExpressionStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Etch(EtchStmt),
    Read(ReadStmt),
    Import(ImportStmt),
    Export(ExportStmt),
    Error(ErrorStmt),
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    Integer(IntegerExpr),
    String(StringExpr),
    Boolean(BooleanExpr),
    Symbol(SymbolExpr),
    Object(ObjectExpr),
    Array(ArrayExpr),
    Group(GroupExpr),
    Function(Rc<FunctionExpr>),
    Call(CallExpr),
    Binary(BinaryExpr),
    Assignment(AssignmentExpr),
    VarDecl(VarDeclExpr),
}

impl Expr {
    /// A short label for the kind of expression, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number literal",
            Expr::Integer(_) => "integer literal",
            Expr::String(_) => "string literal",
            Expr::Boolean(_) => "boolean literal",
            Expr::Symbol(_) => "identifier",
            Expr::Object(_) => "object literal",
            Expr::Array(_) => "array literal",
            Expr::Group(_) => "group",
            Expr::Function(_) => "function literal",
            Expr::Call(_) => "function call",
            Expr::Binary(_) => "operation",
            Expr::Assignment(_) => "assignment",
            Expr::VarDecl(_) => "variable declaration",
        }
    }
}
