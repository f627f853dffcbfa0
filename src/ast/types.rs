//! Type tags and operator tags used by the AST.
//!
//! The language is dynamically typed: a [`DataType`] is only a declared tag
//! on variables, parameters and function returns. It drives the shallow
//! literal check in the parser and the int-to-num widening at run time.

use std::fmt::Display;

/// The declared type tag of a variable, parameter or function return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Num,
    Int,
    Str,
    Bool,
    Arr,
    Obj,
    Func,
    Void,
}

impl DataType {
    pub fn from_name(name: &str) -> Option<DataType> {
        match name {
            "num" => Some(DataType::Num),
            "int" => Some(DataType::Int),
            "str" => Some(DataType::Str),
            "bool" => Some(DataType::Bool),
            "arr" => Some(DataType::Arr),
            "obj" => Some(DataType::Obj),
            "func" => Some(DataType::Func),
            "void" => Some(DataType::Void),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Num => "num",
            DataType::Int => "int",
            DataType::Str => "str",
            DataType::Bool => "bool",
            DataType::Arr => "arr",
            DataType::Obj => "obj",
            DataType::Func => "func",
            DataType::Void => "void",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Binary operator tags. Index, range and member access are operators too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Index,  // @
    Range,  // ..
    Member, // .

    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Less => "<",
            Operator::LessEquals => "<=",
            Operator::Greater => ">",
            Operator::GreaterEquals => ">=",
            Operator::Index => "@",
            Operator::Range => "..",
            Operator::Member => ".",
            Operator::AddAssign => "+=",
            Operator::SubtractAssign => "-=",
            Operator::MultiplyAssign => "*=",
            Operator::DivideAssign => "/=",
            Operator::ModuloAssign => "%=",
        }
    }

    /// For `+=` and friends, the arithmetic operator applied before assigning.
    pub fn compound_base(&self) -> Option<Operator> {
        match self {
            Operator::AddAssign => Some(Operator::Add),
            Operator::SubtractAssign => Some(Operator::Subtract),
            Operator::MultiplyAssign => Some(Operator::Multiply),
            Operator::DivideAssign => Some(Operator::Divide),
            Operator::ModuloAssign => Some(Operator::Modulo),
            _ => None,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
