//! Built-in functions and the intrinsic members of strings and arrays.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

use crate::{
    ast::{ast::Expr, types::DataType},
    errors::runtime::RuntimeError,
};

use super::{
    evaluator::Evaluator,
    expr::{call_function, eval_arguments},
    scope::ScopeId,
    value::{FunctionValue, Value},
};

/// Free functions resolved by name before any scope lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Builtin {
    Len,
    Int,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "len" => Some(Builtin::Len),
            "int" => Some(Builtin::Int),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Int => "int",
        }
    }
}

pub fn call_builtin(builtin: Builtin, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    let argument = single_argument(builtin.name(), arguments)?;

    match (builtin, argument) {
        (Builtin::Len, Value::String(string)) => Ok(length(string.chars().count())),
        (Builtin::Len, Value::Array(elements)) => Ok(length(elements.len())),
        (Builtin::Int, Value::Integer(integer)) => Ok(Value::Integer(integer)),
        (Builtin::Int, Value::Number(number)) => BigInt::from_f64(number.trunc())
            .map(Value::Integer)
            .ok_or_else(|| RuntimeError::InvalidArgument {
                function: String::from("int"),
                message: format!("{} has no integer value", number),
            }),
        (builtin, other) => Err(RuntimeError::InvalidArgument {
            function: String::from(builtin.name()),
            message: format!("unsupported argument {}", other.describe()),
        }),
    }
}

fn single_argument(function: &str, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    let received = arguments.len();
    match <[Value; 1]>::try_from(arguments) {
        Ok([argument]) => Ok(argument),
        Err(_) => Err(RuntimeError::ArityMismatch {
            function: String::from(function),
            expected: 1,
            received,
        }),
    }
}

fn length(length: usize) -> Value {
    Value::Integer(BigInt::from(length))
}

/// `receiver.member` where `receiver` is not an object.
pub fn eval_intrinsic(evaluator: &mut Evaluator, receiver: Value, member: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
    match member {
        Expr::Symbol(symbol) => property(&receiver, &symbol.value),
        Expr::Call(call) => {
            let name = match call.callee.as_ref() {
                Expr::Symbol(symbol) => symbol.value.as_str(),
                other => return Err(unknown_member(other.kind_name(), &receiver)),
            };
            let arguments = eval_arguments(evaluator, &call.arguments, scope)?;

            match receiver {
                Value::String(string) => string_method(&string, name, arguments),
                Value::Array(elements) => array_method(evaluator, elements, name, arguments),
                other => Err(unknown_member(name, &other)),
            }
        }
        other => Err(unknown_member(other.kind_name(), &receiver)),
    }
}

fn unknown_member(member: &str, receiver: &Value) -> RuntimeError {
    RuntimeError::UnknownMember {
        member: String::from(member),
        receiver: String::from(receiver.kind_name()),
    }
}

fn property(receiver: &Value, name: &str) -> Result<Value, RuntimeError> {
    match (receiver, name) {
        (Value::String(string), "length") => Ok(length(string.chars().count())),
        (Value::Array(elements), "length") => Ok(length(elements.len())),
        (receiver, name) => Err(unknown_member(name, receiver)),
    }
}

fn expect_no_arguments(method: &str, arguments: &[Value]) -> Result<(), RuntimeError> {
    if !arguments.is_empty() {
        return Err(RuntimeError::ArityMismatch {
            function: String::from(method),
            expected: 0,
            received: arguments.len(),
        });
    }
    Ok(())
}

/// Reads `(start[, end])` as a half-open range within `0..=length`.
fn bounds(method: &str, arguments: &[Value], length: usize) -> Result<(usize, usize), RuntimeError> {
    if arguments.is_empty() || arguments.len() > 2 {
        return Err(RuntimeError::ArityMismatch {
            function: String::from(method),
            expected: 2,
            received: arguments.len(),
        });
    }

    let index = |value: &Value| match value {
        Value::Integer(integer) => Ok(integer.clone()),
        other => Err(RuntimeError::InvalidArgument {
            function: String::from(method),
            message: format!("expected an int index, received {}", other.describe()),
        }),
    };

    let start = index(&arguments[0])?;
    let end = match arguments.get(1) {
        Some(end) => index(end)?,
        None => BigInt::from(length),
    };

    match (start.to_usize(), end.to_usize()) {
        (Some(start), Some(end)) if start <= end && end <= length => Ok((start, end)),
        _ => Err(RuntimeError::IndexOutOfRange {
            index: format!("{}..{}", start, end),
            length,
        }),
    }
}

fn string_method(string: &str, name: &str, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    match name {
        "toUpperCase" => {
            expect_no_arguments(name, &arguments)?;
            Ok(Value::String(string.to_uppercase()))
        }
        "toLowerCase" => {
            expect_no_arguments(name, &arguments)?;
            Ok(Value::String(string.to_lowercase()))
        }
        "toArray" => {
            expect_no_arguments(name, &arguments)?;
            Ok(Value::Array(
                string
                    .chars()
                    .map(|character| Value::String(character.to_string()))
                    .collect(),
            ))
        }
        "substr" => {
            let characters: Vec<char> = string.chars().collect();
            let (start, end) = bounds(name, &arguments, characters.len())?;
            Ok(Value::String(characters[start..end].iter().collect()))
        }
        _ => Err(RuntimeError::UnknownMember {
            member: String::from(name),
            receiver: String::from("str"),
        }),
    }
}

fn array_method(evaluator: &mut Evaluator, elements: Vec<Value>, name: &str, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    match name {
        "slice" => {
            let (start, end) = bounds(name, &arguments, elements.len())?;
            Ok(Value::Array(elements[start..end].to_vec()))
        }
        "map" => {
            let callback = expect_callback(name, arguments)?;
            if callback.literal.return_type == DataType::Void {
                return Err(RuntimeError::VoidCallback {
                    method: String::from(name),
                });
            }
            Ok(Value::Array(apply_callback(evaluator, &callback, elements)?))
        }
        "forEach" => {
            let callback = expect_callback(name, arguments)?;
            apply_callback(evaluator, &callback, elements)?;
            Ok(Value::Absent)
        }
        _ => Err(RuntimeError::UnknownMember {
            member: String::from(name),
            receiver: String::from("arr"),
        }),
    }
}

fn expect_callback(method: &str, arguments: Vec<Value>) -> Result<FunctionValue, RuntimeError> {
    match single_argument(method, arguments)? {
        Value::Function(function) if function.arity() <= 3 => Ok(function),
        Value::Function(function) => Err(RuntimeError::InvalidArgument {
            function: String::from(method),
            message: format!("callback takes at most 3 parameters, {} declares {}", function.name(), function.arity()),
        }),
        other => Err(RuntimeError::InvalidArgument {
            function: String::from(method),
            message: format!("expected a function, received {}", other.describe()),
        }),
    }
}

/// Calls `callback` with as many of (element, index, length) as it declares.
fn apply_callback(evaluator: &mut Evaluator, callback: &FunctionValue, elements: Vec<Value>) -> Result<Vec<Value>, RuntimeError> {
    let total = elements.len();
    let mut results = Vec::with_capacity(total);

    for (index, element) in elements.into_iter().enumerate() {
        let arguments = vec![element, length(index), length(total)];
        let arguments = arguments.into_iter().take(callback.arity()).collect();
        results.push(call_function(evaluator, callback, arguments)?);
    }

    Ok(results)
}
