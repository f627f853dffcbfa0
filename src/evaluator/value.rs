use std::{cell::RefCell, collections::BTreeMap, fmt::Display, rc::Rc};

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::{
    ast::{expressions::FunctionExpr, types::DataType},
    errors::runtime::RuntimeError,
};

use super::scope::{ScopeHandle, ScopeId};

/// Object fields are shared: every copy of an object value sees the same map.
pub type Fields = Rc<RefCell<BTreeMap<String, Value>>>;

/// A fully evaluated value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Integer(BigInt),
    String(String),
    Boolean(bool),
    Array(Vec<Value>),
    Object(Fields),
    Function(FunctionValue),
    /// The value of an unbound name or of a function that returned nothing.
    Absent,
}

/// A function literal paired with the scope it was evaluated in.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub literal: Rc<FunctionExpr>,
    pub captured: Rc<ScopeHandle>,
}

impl FunctionValue {
    pub fn scope(&self) -> ScopeId {
        self.captured.id()
    }

    pub fn name(&self) -> &str {
        self.literal.name.as_deref().unwrap_or("<anonymous>")
    }

    pub fn arity(&self) -> usize {
        self.literal.parameters.len()
    }
}

impl Value {
    pub fn object(fields: BTreeMap<String, Value>) -> Value {
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "num",
            Value::Integer(_) => "int",
            Value::String(_) => "str",
            Value::Boolean(_) => "bool",
            Value::Array(_) => "arr",
            Value::Object(_) => "obj",
            Value::Function(_) => "func",
            Value::Absent => "nil",
        }
    }

    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Number(_) => Some(DataType::Num),
            Value::Integer(_) => Some(DataType::Int),
            Value::String(_) => Some(DataType::Str),
            Value::Boolean(_) => Some(DataType::Bool),
            Value::Array(_) => Some(DataType::Arr),
            Value::Object(_) => Some(DataType::Obj),
            Value::Function(_) => Some(DataType::Func),
            Value::Absent => None,
        }
    }

    /// Kind and rendering together, for error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Absent => String::from("nil"),
            Value::String(value) => format!("str {:?}", value),
            other => format!("{} {}", other.kind_name(), other),
        }
    }

    /// Numeric view of a num or int, used when the two kinds are mixed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            Value::Integer(value) => Some(value.to_f64().unwrap_or(f64::NAN)),
            _ => None,
        }
    }

    /// Fits the value into a slot declared as `data_type`.
    ///
    /// An int widens into a num slot and an absent value fits anywhere.
    pub fn coerce(self, data_type: DataType) -> Result<Value, RuntimeError> {
        match (data_type, self) {
            (_, Value::Absent) => Ok(Value::Absent),
            (DataType::Num, Value::Integer(value)) => Ok(Value::Number(value.to_f64().unwrap_or(f64::NAN))),
            (data_type, value) if value.data_type() == Some(data_type) => Ok(value),
            (data_type, value) => Err(RuntimeError::TypeMismatch {
                expected: data_type.to_string(),
                received: String::from(value.kind_name()),
            }),
        }
    }
}

fn write_joined<'v, I>(f: &mut std::fmt::Formatter<'_>, items: I) -> std::fmt::Result
where
    I: Iterator<Item = (Option<&'v String>, &'v Value)>,
{
    for (position, (key, value)) in items.enumerate() {
        if position > 0 {
            write!(f, ", ")?;
        }
        match key {
            Some(key) => write!(f, "{}: {}", key, value)?,
            None => write!(f, "{}", value)?,
        }
    }
    Ok(())
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{:.6}", value),
            Value::Integer(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Array(elements) => {
                write!(f, "[")?;
                write_joined(f, elements.iter().map(|element| (None, element)))?;
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                write_joined(f, fields.borrow().iter().map(|(key, value)| (Some(key), value)))?;
                write!(f, "}}")
            }
            Value::Function(function) => {
                write!(f, "func ({}) {}", function.literal.return_type, function.name())
            }
            Value::Absent => write!(f, "nil"),
        }
    }
}
