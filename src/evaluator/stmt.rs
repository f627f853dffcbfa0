use crate::{
    ast::{
        ast::Stmt,
        statements::{BlockStmt, EtchStmt, ForStmt, IfStmt, ReadStmt, WhileStmt},
    },
    errors::runtime::RuntimeError,
};

use super::{
    evaluator::Evaluator,
    expr::eval_expr,
    scope::ScopeId,
    value::Value,
};

/// Executes one statement in `scope`.
///
/// A `return` leaves its value on `scope`; blocks and loops move it outward
/// until it reaches the function call or module that is waiting for it.
pub fn eval_stmt(evaluator: &mut Evaluator, statement: &Stmt, scope: ScopeId) -> Result<(), RuntimeError> {
    match statement {
        Stmt::Block(block) => eval_block(evaluator, block, scope),
        Stmt::Expression(statement) => {
            eval_expr(evaluator, &statement.expression, scope)?;
            Ok(())
        }
        Stmt::If(statement) => eval_if(evaluator, statement, scope),
        Stmt::While(statement) => eval_while(evaluator, statement, scope),
        Stmt::For(statement) => eval_for(evaluator, statement, scope),
        Stmt::Return(statement) => {
            let value = match &statement.value {
                Some(expression) => eval_expr(evaluator, expression, scope)?,
                None => Value::Absent,
            };
            evaluator.scopes.set_return(scope, value);
            Ok(())
        }
        Stmt::Etch(statement) => eval_etch(evaluator, statement, scope),
        Stmt::Read(statement) => eval_read(evaluator, statement, scope),
        Stmt::Import(_) => Err(RuntimeError::MisplacedModuleStatement {
            statement: String::from("import"),
        }),
        Stmt::Export(_) => Err(RuntimeError::MisplacedModuleStatement {
            statement: String::from("export"),
        }),
        Stmt::Error(_) => Err(RuntimeError::UnparsedStatement),
    }
}

/// Moves a pending return value from `inner` to `outer`, reporting whether there was one.
fn propagate_return(evaluator: &mut Evaluator, inner: ScopeId, outer: ScopeId) -> bool {
    match evaluator.scopes.take_return(inner) {
        Some(value) => {
            evaluator.scopes.set_return(outer, value);
            true
        }
        None => false,
    }
}

pub fn eval_block(evaluator: &mut Evaluator, block: &BlockStmt, scope: ScopeId) -> Result<(), RuntimeError> {
    let inner = evaluator.scopes.child(scope);
    let result = run_block(evaluator, block, inner, scope);
    evaluator.scopes.release(inner);
    result
}

fn run_block(evaluator: &mut Evaluator, block: &BlockStmt, inner: ScopeId, outer: ScopeId) -> Result<(), RuntimeError> {
    for statement in &block.body {
        eval_stmt(evaluator, statement, inner)?;
        if propagate_return(evaluator, inner, outer) {
            break;
        }
    }
    Ok(())
}

fn expect_condition(value: Value, statement: &str) -> Result<bool, RuntimeError> {
    match value {
        Value::Boolean(condition) => Ok(condition),
        other => Err(RuntimeError::NonBooleanCondition {
            statement: String::from(statement),
            received: String::from(other.kind_name()),
        }),
    }
}

fn eval_if(evaluator: &mut Evaluator, statement: &IfStmt, scope: ScopeId) -> Result<(), RuntimeError> {
    let condition = eval_expr(evaluator, &statement.condition, scope)?;

    if expect_condition(condition, "if")? {
        eval_stmt(evaluator, &statement.then_body, scope)
    } else if let Some(else_body) = &statement.else_body {
        eval_stmt(evaluator, else_body, scope)
    } else {
        Ok(())
    }
}

/// Every iteration shares one loop scope, so a `var` directly in a non-block
/// body collides with itself on the second pass.
fn eval_while(evaluator: &mut Evaluator, statement: &WhileStmt, scope: ScopeId) -> Result<(), RuntimeError> {
    let inner = evaluator.scopes.child(scope);
    let result = run_while(evaluator, statement, inner, scope);
    evaluator.scopes.release(inner);
    result
}

fn run_while(evaluator: &mut Evaluator, statement: &WhileStmt, inner: ScopeId, outer: ScopeId) -> Result<(), RuntimeError> {
    loop {
        let condition = eval_expr(evaluator, &statement.condition, inner)?;
        if !expect_condition(condition, "while")? {
            return Ok(());
        }

        eval_stmt(evaluator, &statement.body, inner)?;
        if propagate_return(evaluator, inner, outer) {
            return Ok(());
        }
    }
}

/// Each iteration gets a fresh scope holding the loop variable.
fn eval_for(evaluator: &mut Evaluator, statement: &ForStmt, scope: ScopeId) -> Result<(), RuntimeError> {
    let items = match eval_expr(evaluator, &statement.iterable, scope)? {
        Value::Array(elements) => elements,
        Value::String(string) => string
            .chars()
            .map(|character| Value::String(character.to_string()))
            .collect(),
        other => {
            return Err(RuntimeError::NotIterable {
                received: other.describe(),
            })
        }
    };

    for item in items.into_iter().step_by(statement.step.max(1)) {
        let inner = evaluator.scopes.child(scope);
        evaluator.scopes.define(inner, &statement.identifier, item);

        let result = eval_stmt(evaluator, &statement.body, inner);
        let returned = propagate_return(evaluator, inner, scope);
        evaluator.scopes.release(inner);

        result?;
        if returned {
            break;
        }
    }

    Ok(())
}

fn eval_etch(evaluator: &mut Evaluator, statement: &EtchStmt, scope: ScopeId) -> Result<(), RuntimeError> {
    let mut rendered = Vec::with_capacity(statement.expressions.len());
    for expression in &statement.expressions {
        rendered.push(eval_expr(evaluator, expression, scope)?.to_string());
    }

    evaluator.write_line(&rendered.join(" "))
}

fn eval_read(evaluator: &mut Evaluator, statement: &ReadStmt, scope: ScopeId) -> Result<(), RuntimeError> {
    if let Some(prompt) = &statement.prompt {
        let prompt = eval_expr(evaluator, prompt, scope)?.to_string();
        evaluator.write_prompt(&prompt)?;
    }

    let line = evaluator.read_line()?;
    evaluator.scopes.set(scope, &statement.identifier, Value::String(line));
    Ok(())
}
