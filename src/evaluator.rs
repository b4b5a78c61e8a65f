//! The evaluator: a recursive walk over a [`Value`] tree that
//! dispatches, in order, on special forms, the built-in table, and
//! user-defined operations.

use crate::builtins;
use crate::env::{Environment, Locals, Operation};
use crate::error::EvalError;
use crate::special_forms;
use crate::value::Value;

/// Evaluate `value` under `locals` (searched innermost-first) and the
/// environment's globals/operations.
pub fn eval(value: Value, locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    log::trace!("eval: {value}");
    match value {
        Value::Symbol(name) => env
            .lookup(locals, &name)
            .ok_or(EvalError::UnassignedVariable(name)),
        Value::Cons(..) => eval_form(value, locals, env),
        // Integer, Float, Ratio, Str, Bool, and Nil self-evaluate.
        other => Ok(other),
    }
}

/// Evaluate a (non-empty) list form: resolve its head and dispatch.
fn eval_form(value: Value, locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let (mut items, _dotted_tail) = value.list_parts();
    if items.is_empty() {
        return Ok(Value::Nil);
    }
    let head = items.remove(0);

    match head {
        // A constructed-then-applied form: evaluate the head in place,
        // then re-dispatch the rebuilt list. This is what lets
        // `((if t 'car 'cdr) lst)` work.
        Value::Cons(..) => {
            let evaluated_head = eval(head, locals, env)?;
            items.insert(0, evaluated_head);
            eval_form(Value::list(items), locals, env)
        }
        Value::Symbol(name) => {
            if let Some(special) = special_forms::lookup(&name) {
                special(&items, locals, env)
            } else if let Some(builtin) = builtins::lookup(&name) {
                let args = items
                    .into_iter()
                    .map(|item| eval(item, locals, env))
                    .collect::<Result<Vec<_>, _>>()?;
                builtin(&args)
            } else if let Some(op) = env.find_operation(&name).cloned() {
                call_operation(&op, items, locals, env)
            } else {
                Err(EvalError::UndefinedFunction(name))
            }
        }
        other => Err(EvalError::UndefinedFunction(other.to_string())),
    }
}

/// Resolve a call to a user-defined operation: check arity, evaluate
/// arguments under the caller's locals, then run the body under a
/// fresh local stack (globals stay shared). Errors from the body are
/// wrapped with the operation's name.
fn call_operation(
    op: &Operation,
    arg_exprs: Vec<Value>,
    locals: &mut Locals,
    env: &mut Environment,
) -> Result<Value, EvalError> {
    if arg_exprs.len() != op.params.len() {
        return Err(EvalError::TooManyArguments);
    }

    let evaluated = arg_exprs
        .into_iter()
        .map(|expr| eval(expr, locals, env))
        .collect::<Result<Vec<_>, _>>()?;

    let mut call_locals: Locals = op.params.iter().cloned().zip(evaluated).collect();

    let mut result = Value::Nil;
    for expr in &op.body {
        result = eval(expr.clone(), &mut call_locals, env)
            .map_err(|e| e.in_function(&op.name))?;
    }
    Ok(result)
}
