use std::{collections::BTreeMap, rc::Rc};

use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryExpr, CallExpr, FunctionExpr, ObjectExpr, VarDeclExpr},
        types::{DataType, Operator},
    },
    errors::runtime::RuntimeError,
};

use super::{
    evaluator::Evaluator,
    intrinsics::{call_builtin, eval_intrinsic, Builtin},
    operators::apply_operator,
    scope::ScopeId,
    stmt::eval_stmt,
    value::{Fields, FunctionValue, Value},
};

/// Reduces an expression to a value.
pub fn eval_expr(evaluator: &mut Evaluator, expression: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
    match expression {
        Expr::Number(number) => Ok(Value::Number(number.value)),
        Expr::Integer(integer) => Ok(Value::Integer(integer.value.clone())),
        Expr::String(string) => Ok(Value::String(string.value.clone())),
        Expr::Boolean(boolean) => Ok(Value::Boolean(boolean.value)),
        Expr::Symbol(symbol) => Ok(evaluator
            .scopes
            .get(scope, &symbol.value)
            .cloned()
            .unwrap_or(Value::Absent)),
        Expr::Object(object) => eval_object(evaluator, object, scope),
        Expr::Array(array) => {
            let mut elements = Vec::with_capacity(array.elements.len());
            for element in &array.elements {
                elements.push(eval_expr(evaluator, element, scope)?);
            }
            Ok(Value::Array(elements))
        }
        Expr::Group(group) => eval_expr(evaluator, &group.expression, scope),
        Expr::Function(function) => Ok(eval_function(evaluator, function, scope)),
        Expr::Call(call) => eval_call(evaluator, call, scope),
        Expr::Binary(binary) => eval_binary(evaluator, binary, scope),
        Expr::Assignment(assignment) => {
            if evaluator.scopes.get(scope, &assignment.assignee).is_none() {
                return Err(RuntimeError::UndeclaredVariable {
                    name: assignment.assignee.clone(),
                });
            }

            let value = eval_expr(evaluator, &assignment.value, scope)?;
            evaluator.scopes.assign(scope, &assignment.assignee, value.clone());
            Ok(value)
        }
        Expr::VarDecl(declaration) => eval_var_decl(evaluator, declaration, scope),
    }
}

/// Evaluates every field once; the resulting object is shared by all its copies.
fn eval_object(evaluator: &mut Evaluator, object: &ObjectExpr, scope: ScopeId) -> Result<Value, RuntimeError> {
    let mut fields = BTreeMap::new();
    for (name, expression) in &object.fields {
        fields.insert(name.clone(), eval_expr(evaluator, expression, scope)?);
    }
    Ok(Value::object(fields))
}

/// Captures `scope`; a named literal also binds its own name there.
fn eval_function(evaluator: &mut Evaluator, function: &Rc<FunctionExpr>, scope: ScopeId) -> Value {
    let value = Value::Function(FunctionValue {
        literal: Rc::clone(function),
        captured: evaluator.scopes.capture(scope),
    });

    if let Some(name) = &function.name {
        evaluator.scopes.define(scope, name, value.clone());
    }
    value
}

fn eval_var_decl(evaluator: &mut Evaluator, declaration: &VarDeclExpr, scope: ScopeId) -> Result<Value, RuntimeError> {
    let value = match &declaration.value {
        Some(expression) => eval_expr(evaluator, expression, scope)?,
        None => Value::Absent,
    };

    let value = value.coerce(declaration.data_type)?;
    evaluator.scopes.declare(scope, &declaration.identifier, value.clone())?;
    Ok(value)
}

pub fn eval_call(evaluator: &mut Evaluator, call: &CallExpr, scope: ScopeId) -> Result<Value, RuntimeError> {
    if let Expr::Symbol(symbol) = call.callee.as_ref() {
        if let Some(builtin) = Builtin::from_name(&symbol.value) {
            let arguments = eval_arguments(evaluator, &call.arguments, scope)?;
            return call_builtin(builtin, arguments);
        }
    }

    let function = match eval_expr(evaluator, &call.callee, scope)? {
        Value::Function(function) => function,
        other => {
            return Err(RuntimeError::NotCallable {
                callee: other.describe(),
            })
        }
    };

    if function.arity() != call.arguments.len() {
        return Err(RuntimeError::ArityMismatch {
            function: String::from(function.name()),
            expected: function.arity(),
            received: call.arguments.len(),
        });
    }

    let arguments = eval_arguments(evaluator, &call.arguments, scope)?;
    call_function(evaluator, &function, arguments)
}

pub fn eval_arguments(evaluator: &mut Evaluator, arguments: &[Expr], scope: ScopeId) -> Result<Vec<Value>, RuntimeError> {
    let mut values = Vec::with_capacity(arguments.len());
    for argument in arguments {
        values.push(eval_expr(evaluator, argument, scope)?);
    }
    Ok(values)
}

/// Runs `function` in a new call scope whose parent is the scope it captured.
///
/// Arguments are coerced to the parameter types. The result is the value that
/// a `return` left on the call scope, coerced to the declared return type.
pub fn call_function(evaluator: &mut Evaluator, function: &FunctionValue, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
    let literal = Rc::clone(&function.literal);
    let frame = evaluator.scopes.child(function.scope());
    let result = run_call(evaluator, &literal, arguments, frame);
    evaluator.scopes.release(frame);
    result
}

fn run_call(evaluator: &mut Evaluator, literal: &FunctionExpr, arguments: Vec<Value>, frame: ScopeId) -> Result<Value, RuntimeError> {
    for (parameter, argument) in literal.parameters.iter().zip(arguments) {
        let value = argument.coerce(parameter.data_type)?;
        evaluator.scopes.define(frame, &parameter.name, value);
    }

    eval_stmt(evaluator, &literal.body, frame)?;
    let returned = evaluator.scopes.take_return(frame).unwrap_or(Value::Absent);

    match literal.return_type {
        DataType::Void => Ok(Value::Absent),
        data_type => returned.coerce(data_type),
    }
}

fn eval_binary(evaluator: &mut Evaluator, binary: &BinaryExpr, scope: ScopeId) -> Result<Value, RuntimeError> {
    if binary.operator == Operator::Member {
        return eval_member(evaluator, &binary.left, &binary.right, scope);
    }

    if let Some(base) = binary.operator.compound_base() {
        return eval_compound_assignment(evaluator, binary, base, scope);
    }

    let left = eval_expr(evaluator, &binary.left, scope)?;
    let right = eval_expr(evaluator, &binary.right, scope)?;
    apply_operator(binary.operator, left, right)
}

/// `name OP= value`, with `name` already bound somewhere on the chain.
fn eval_compound_assignment(evaluator: &mut Evaluator, binary: &BinaryExpr, base: Operator, scope: ScopeId) -> Result<Value, RuntimeError> {
    let name = match binary.left.as_ref() {
        Expr::Symbol(symbol) => &symbol.value,
        _ => {
            return Err(RuntimeError::InvalidAssignmentTarget {
                operator: binary.operator.to_string(),
            })
        }
    };

    let current = evaluator
        .scopes
        .get(scope, name)
        .cloned()
        .ok_or_else(|| RuntimeError::UndeclaredVariable { name: name.clone() })?;

    let right = eval_expr(evaluator, &binary.right, scope)?;
    let result = apply_operator(base, current, right)?;
    evaluator.scopes.assign(scope, name, result.clone());
    Ok(result)
}

/// `left.right`: object field access, or an intrinsic when `left` is not an object.
fn eval_member(evaluator: &mut Evaluator, left: &Expr, right: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
    match eval_expr(evaluator, left, scope)? {
        Value::Object(fields) => eval_object_member(evaluator, &fields, right, scope),
        receiver => eval_intrinsic(evaluator, receiver, right, scope),
    }
}

fn eval_object_member(evaluator: &mut Evaluator, fields: &Fields, right: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
    match right {
        Expr::Symbol(symbol) => Ok(fields
            .borrow()
            .get(&symbol.value)
            .cloned()
            .unwrap_or(Value::Absent)),
        Expr::Assignment(assignment) => {
            let value = eval_expr(evaluator, &assignment.value, scope)?;
            fields.borrow_mut().insert(assignment.assignee.clone(), value.clone());
            Ok(value)
        }
        other => eval_in_projection(evaluator, fields, other, scope),
    }
}

/// Evaluates `expression` in a scope whose variables are the object's fields.
///
/// Calls such as `o.greet()` and chains such as `o.inner.x` resolve against
/// the fields first. Bindings the expression changed are written back.
fn eval_in_projection(evaluator: &mut Evaluator, fields: &Fields, expression: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
    let snapshot = fields.borrow().clone();
    let projected = evaluator.scopes.child(scope);
    for (name, value) in &snapshot {
        evaluator.scopes.define(projected, name, value.clone());
    }

    let result = eval_expr(evaluator, expression, projected);

    let changed: Vec<(String, Value)> = evaluator
        .scopes
        .locals(projected)
        .filter(|(name, value)| snapshot.get(*name) != Some(*value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    fields.borrow_mut().extend(changed);

    evaluator.scopes.release(projected);
    result
}
