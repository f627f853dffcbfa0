//! Binary operators over evaluated values.
//!
//! Dispatch is on the runtime kinds of both operands. Every combination not
//! listed here is an [`RuntimeError::UnsupportedOperation`].

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};

use crate::{ast::types::Operator, errors::runtime::RuntimeError};

use super::value::Value;

pub fn apply_operator(operator: Operator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match operator {
        Operator::Add => add(left, right),
        Operator::Subtract | Operator::Multiply | Operator::Divide => arithmetic(operator, left, right),
        Operator::Modulo => modulo(left, right),
        Operator::Equals | Operator::NotEquals => equality(operator, left, right),
        Operator::Less | Operator::LessEquals | Operator::Greater | Operator::GreaterEquals => {
            ordering(operator, left, right)
        }
        Operator::Index => index(left, right),
        Operator::Range => range(left, right),
        _ => Err(unsupported(operator, &left, &right)),
    }
}

fn unsupported(operator: Operator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::UnsupportedOperation {
        operator: operator.to_string(),
        left: left.describe(),
        right: right.describe(),
    }
}

fn add(left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
        (Value::String(a), Value::Number(_) | Value::Integer(_)) => Ok(Value::String(format!("{}{}", a, right))),
        (Value::Number(_) | Value::Integer(_), Value::String(b)) => Ok(Value::String(format!("{}{}", left, b))),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(Value::Number(a + b)),
            _ => Err(unsupported(Operator::Add, &left, &right)),
        },
    }
}

/// `-`, `*` and `/`. Two ints stay exact; any num operand makes the result a num.
fn arithmetic(operator: Operator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    if let (Value::Integer(a), Value::Integer(b)) = (&left, &right) {
        return match operator {
            Operator::Subtract => Ok(Value::Integer(a - b)),
            Operator::Multiply => Ok(Value::Integer(a * b)),
            _ if b.is_zero() => Err(division_by_zero(operator)),
            _ => Ok(Value::Integer(a / b)),
        };
    }

    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => match operator {
            Operator::Subtract => Ok(Value::Number(a - b)),
            Operator::Multiply => Ok(Value::Number(a * b)),
            _ if b == 0.0 => Err(division_by_zero(operator)),
            _ => Ok(Value::Number(a / b)),
        },
        _ => Err(unsupported(operator, &left, &right)),
    }
}

fn division_by_zero(operator: Operator) -> RuntimeError {
    RuntimeError::DivisionByZero {
        operator: operator.to_string(),
    }
}

fn modulo(left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (&left, &right) {
        (Value::Integer(_), Value::Integer(b)) if b.is_zero() => Err(division_by_zero(Operator::Modulo)),
        (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a % b)),
        _ => Err(unsupported(Operator::Modulo, &left, &right)),
    }
}

/// Only values of the same scalar kind compare equal or unequal.
fn equality(operator: Operator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let equal = match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        _ => return Err(unsupported(operator, &left, &right)),
    };

    Ok(Value::Boolean(if operator == Operator::Equals { equal } else { !equal }))
}

fn ordering(operator: Operator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let order = match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        _ => match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(unsupported(operator, &left, &right)),
        },
    };

    let result = match order {
        None => false,
        Some(order) => match operator {
            Operator::Less => order == Ordering::Less,
            Operator::LessEquals => order != Ordering::Greater,
            Operator::Greater => order == Ordering::Greater,
            _ => order != Ordering::Less,
        },
    };

    Ok(Value::Boolean(result))
}

/// `arr @ i` and `str @ i`, with `0 <= i < length`.
fn index(left: Value, right: Value) -> Result<Value, RuntimeError> {
    let position = match &right {
        Value::Integer(position) => position,
        _ => return Err(unsupported(Operator::Index, &left, &right)),
    };

    let out_of_range = |length: usize| RuntimeError::IndexOutOfRange {
        index: position.to_string(),
        length,
    };

    match &left {
        Value::Array(elements) => position
            .to_usize()
            .and_then(|position| elements.get(position))
            .cloned()
            .ok_or_else(|| out_of_range(elements.len())),
        Value::String(string) => position
            .to_usize()
            .and_then(|position| string.chars().nth(position))
            .map(|character| Value::String(character.to_string()))
            .ok_or_else(|| out_of_range(string.chars().count())),
        _ => Err(unsupported(Operator::Index, &left, &right)),
    }
}

/// `a..b` walks from `a` toward `b` one step at a time, excluding `b`.
/// Equal bounds give the one-element array `[a]`.
fn range(left: Value, right: Value) -> Result<Value, RuntimeError> {
    let (start, end) = match (&left, &right) {
        (Value::Integer(start), Value::Integer(end)) => (start, end),
        _ => return Err(unsupported(Operator::Range, &left, &right)),
    };

    if start == end {
        return Ok(Value::Array(vec![Value::Integer(start.clone())]));
    }

    let step = if start < end { BigInt::one() } else { -BigInt::one() };
    let mut current = start.clone();
    let mut values = vec![];

    while &current != end {
        values.push(Value::Integer(current.clone()));
        current += &step;
    }

    Ok(Value::Array(values))
}
