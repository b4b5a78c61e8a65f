//! The special-form dispatch table: `quote`, `if`, `cond`, `defun`,
//! `setf`, `let`, `let*`, `list`, `eval`, and `apply`.
//!
//! Special forms receive their sub-forms unevaluated and decide for
//! themselves what to evaluate and in what order — the opposite
//! contract from [`crate::builtins`], whose entries always see a
//! fully-evaluated argument list. Keeping the two tables apart is what
//! stops an evaluation-order rule from leaking between them.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::builtins;
use crate::env::{extend, Environment, Locals, Operation};
use crate::error::EvalError;
use crate::evaluator::eval;
use crate::value::Value;

/// A special form's signature: unevaluated sub-forms in, a value or
/// error out, with full access to locals and globals.
pub type SpecialFormFn = fn(&[Value], &mut Locals, &mut Environment) -> Result<Value, EvalError>;

lazy_static! {
    static ref SPECIAL_FORMS: HashMap<&'static str, SpecialFormFn> = {
        let mut m: HashMap<&'static str, SpecialFormFn> = HashMap::new();
        m.insert("quote", quote);
        m.insert("if", lisp_if);
        m.insert("cond", cond);
        m.insert("defun", defun);
        m.insert("setf", setf);
        m.insert("let", lisp_let);
        m.insert("let*", lisp_let_star);
        m.insert("list", list);
        m.insert("eval", lisp_eval);
        m.insert("apply", apply);
        m
    };
}

/// Look up a special form by name.
pub fn lookup(name: &str) -> Option<SpecialFormFn> {
    SPECIAL_FORMS.get(name).copied()
}

fn arg(args: &[Value], idx: usize) -> Value {
    args.get(idx).cloned().unwrap_or(Value::Nil)
}

fn eval_body(body: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let mut result = Value::Nil;
    for expr in body {
        result = eval(expr.clone(), locals, env)?;
    }
    Ok(result)
}

fn param_name(v: &Value) -> Result<String, EvalError> {
    match v {
        Value::Symbol(s) => Ok(s.clone()),
        Value::Nil => Ok("nil".to_string()),
        _ => Err(EvalError::BadArgumentList),
    }
}

/// Return the argument unevaluated.
fn quote(args: &[Value], _locals: &mut Locals, _env: &mut Environment) -> Result<Value, EvalError> {
    Ok(arg(args, 0))
}

/// Evaluate the condition; take the then-branch if truthy (non-nil,
/// not boolean false), else the else-branch if present, else `nil`.
fn lisp_if(args: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let cond = eval(arg(args, 0), locals, env)?;
    if cond.is_truthy() {
        match args.get(1) {
            Some(then_expr) => eval(then_expr.clone(), locals, env),
            None => Ok(Value::Nil),
        }
    } else {
        match args.get(2) {
            Some(else_expr) => eval(else_expr.clone(), locals, env),
            None => Ok(Value::Nil),
        }
    }
}

/// Evaluate `(predicate expr)` clauses in order; return the first
/// truthy clause's `expr`; if none match, `nil` (there is no separate
/// boolean-false atom — see `Value::Bool`).
fn cond(args: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    for clause in args {
        let (parts, _) = clause.list_parts();
        let predicate = parts.first().cloned().unwrap_or(Value::Nil);
        let predicate_val = eval(predicate, locals, env)?;
        if predicate_val.is_truthy() {
            return match parts.get(1) {
                Some(expr) => eval(expr.clone(), locals, env),
                None => Ok(Value::Nil),
            };
        }
    }
    Ok(Value::Nil)
}

/// Record a user-defined operation and return `nil`.
fn defun(args: &[Value], _locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let name = match args.first() {
        Some(Value::Symbol(s)) => s.clone(),
        _ => return Err(EvalError::BadArgumentList),
    };

    let (param_values, tail) = arg(args, 1).list_parts();
    if !tail.is_nil() {
        return Err(EvalError::BadArgumentList);
    }
    let params = param_values
        .iter()
        .map(param_name)
        .collect::<Result<Vec<_>, _>>()?;

    let body: Vec<Value> = args.get(2..).map(<[Value]>::to_vec).unwrap_or_default();
    if body.is_empty() {
        return Err(EvalError::BadArgumentList);
    }

    env.define_operation(Operation { name, params, body });
    Ok(Value::Nil)
}

/// Evaluate the value expression, then update whichever binding `setf`
/// finds: a shadowed local, else an existing global, else a new
/// global. Returns the new value.
fn setf(args: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let name = match args.first() {
        Some(Value::Symbol(s)) => s.clone(),
        _ => return Err(EvalError::Custom("setf requires a symbol".to_string())),
    };
    let value = eval(arg(args, 1), locals, env)?;
    Ok(env.setf(locals, &name, value))
}

fn bindings_of(args: &[Value], locals: &mut Locals, env: &mut Environment, sequential: bool) -> Result<Locals, EvalError> {
    let (binding_exprs, _) = arg(args, 0).list_parts();
    let mut scratch = locals.clone();
    let mut pairs = Vec::new();
    for binding in &binding_exprs {
        let (parts, _) = binding.list_parts();
        let name = match parts.first() {
            Some(Value::Symbol(s)) => s.clone(),
            _ => return Err(EvalError::BadArgumentList),
        };
        let expr = parts.get(1).cloned().unwrap_or(Value::Nil);
        // `let` evaluates every value expression in the outer scope;
        // `let*` lets each binding see the ones before it.
        let value = if sequential {
            eval(expr, &mut scratch, env)?
        } else {
            eval(expr, locals, env)?
        };
        if sequential {
            scratch.push((name.clone(), value.clone()));
        }
        pairs.push((name, value));
    }
    Ok(extend(locals, pairs))
}

/// `let`: bind all values simultaneously (evaluated in the outer
/// scope), then evaluate the body.
fn lisp_let(args: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let mut inner = bindings_of(args, locals, env, false)?;
    eval_body(&args[1.min(args.len())..], &mut inner, env)
}

/// `let*`: bind sequentially, so later bindings see earlier ones.
fn lisp_let_star(args: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let mut inner = bindings_of(args, locals, env, true)?;
    eval_body(&args[1.min(args.len())..], &mut inner, env)
}

/// Evaluate every argument and build a proper list.
fn list(args: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let items = args
        .iter()
        .cloned()
        .map(|expr| eval(expr, locals, env))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::list(items))
}

/// Evaluate the argument, then evaluate the result again.
fn lisp_eval(args: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let once = eval(arg(args, 0), locals, env)?;
    eval(once, locals, env)
}

/// Evaluate both the function expression and the argument-list
/// expression; the function must resolve to a built-in's name (often
/// via a quoted symbol like `#'cons`), which is then invoked on the
/// already-evaluated argument list.
fn apply(args: &[Value], locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    let f_val = eval(arg(args, 0), locals, env)?;
    let args_val = eval(arg(args, 1), locals, env)?;

    let name = match &f_val {
        Value::Symbol(s) => s.clone(),
        other => return Err(EvalError::UndefinedFunction(other.to_string())),
    };
    let call_args = args_val
        .as_proper_list()
        .ok_or_else(|| EvalError::NotAList(args_val.to_string()))?;

    builtins::lookup(&name)
        .ok_or_else(|| EvalError::UndefinedFunction(name.clone()))
        .and_then(|builtin| builtin(&call_args))
}
