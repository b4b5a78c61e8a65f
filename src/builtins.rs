//! The built-in table: arithmetic, comparisons, and the list-algebra
//! library. Every built-in receives an already-evaluated argument
//! list — none of them touch locals or globals, which is exactly why
//! they live in a dispatch table distinct from [`crate::special_forms`].

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::EvalError;
use crate::value::Value;

/// A built-in's signature: a slice of already-evaluated arguments in,
/// a value or error out.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, BuiltinFn> = {
        let mut m: HashMap<&'static str, BuiltinFn> = HashMap::new();
        m.insert("+", add);
        m.insert("-", sub);
        m.insert("*", mul);
        m.insert("/", div);
        m.insert("<", lt);
        m.insert(">", gt);
        m.insert("oddp", oddp);
        m.insert("equal", equal);
        m.insert("symbolp", symbolp);
        m.insert("cons", cons);
        m.insert("car", head);
        m.insert("first", head);
        m.insert("cdr", tail);
        m.insert("rest", tail);
        m.insert("nth", nth);
        m.insert("nthcdr", nthcdr);
        m.insert("last", last);
        m.insert("append", append);
        m.insert("reverse", reverse);
        m.insert("member", member);
        m.insert("intersection", intersection);
        m.insert("union", union);
        m.insert("set-difference", set_difference);
        m.insert("subsetp", subsetp);
        m.insert("max", max);
        m.insert("min", min);
        m.insert("length", length);
        m
    };
}

/// Look up a built-in by name.
pub fn lookup(name: &str) -> Option<BuiltinFn> {
    BUILTINS.get(name).copied()
}

fn wrong_type(op: &str) -> EvalError {
    EvalError::WrongType { op: op.to_string() }
}

/// There is no boolean-false atom (spec §3): a predicate that fails
/// returns `Nil`, the one false value, not a second falsy variant.
fn bool_value(b: bool) -> Value {
    if b {
        Value::t()
    } else {
        Value::Nil
    }
}

fn arg(args: &[Value], idx: usize) -> Value {
    args.get(idx).cloned().unwrap_or(Value::Nil)
}

fn as_usize(v: &Value, op: &str) -> Result<usize, EvalError> {
    match v {
        Value::Integer(n) if *n >= 0 => Ok(*n as usize),
        _ => Err(wrong_type(op)),
    }
}

fn proper_list_arg(args: &[Value], idx: usize) -> Result<Vec<Value>, EvalError> {
    let v = arg(args, idx);
    v.as_proper_list()
        .ok_or_else(|| EvalError::NotAList(v.to_string()))
}

// --- Arithmetic ------------------------------------------------------

/// `+` requires every operand to be an `Integer`.
fn add(args: &[Value]) -> Result<Value, EvalError> {
    let mut sum = 0i64;
    for a in args {
        match a {
            Value::Integer(n) => sum += n,
            _ => return Err(wrong_type("+")),
        }
    }
    Ok(Value::Integer(sum))
}

/// One argument negates; two Integers subtract exactly; anything else
/// falls through to a float difference; a list second operand errors.
fn sub(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [a] => match a {
            Value::Integer(n) => Ok(Value::Integer(-n)),
            other => other
                .as_f64()
                .map(|x| Value::Float(-x))
                .ok_or_else(|| wrong_type("-")),
        },
        [a, b] => {
            if !b.is_atom() || b.is_nil() {
                return Err(wrong_type("-"));
            }
            match (a, b) {
                (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(x - y)),
                _ => {
                    let x = a.as_f64().ok_or_else(|| wrong_type("-"))?;
                    let y = b.as_f64().ok_or_else(|| wrong_type("-"))?;
                    Ok(Value::Float(x - y))
                }
            }
        }
        _ => Err(wrong_type("-")),
    }
}

/// Integer x Integer is an Integer product; any other operand makes
/// the whole product a Float.
fn mul(args: &[Value]) -> Result<Value, EvalError> {
    if args.iter().all(Value::is_int) {
        let mut product = 1i64;
        for a in args {
            if let Value::Integer(n) = a {
                product *= n;
            }
        }
        Ok(Value::Integer(product))
    } else {
        let mut product = 1.0;
        for a in args {
            product *= a.as_f64().ok_or_else(|| wrong_type("*"))?;
        }
        Ok(Value::Float(product))
    }
}

/// Integer / Integer produces an exact (unreduced) `Ratio`; anything
/// else divides as floats.
fn div(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [Value::Integer(x), Value::Integer(y)] => Ok(Value::Ratio(*x, *y)),
        [a, b] => {
            let x = a.as_f64().ok_or_else(|| wrong_type("/"))?;
            let y = b.as_f64().ok_or_else(|| wrong_type("/"))?;
            Ok(Value::Float(x / y))
        }
        _ => Err(wrong_type("/")),
    }
}

fn chain_compare(args: &[Value], op: &str, cmp: fn(f64, f64) -> bool) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(wrong_type(op));
    }
    let nums = args
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| wrong_type(op)))
        .collect::<Result<Vec<_>, _>>()?;
    let ordered = nums.windows(2).all(|w| cmp(w[0], w[1]));
    Ok(bool_value(ordered))
}

/// Compares through the float projection of both sides.
fn lt(args: &[Value]) -> Result<Value, EvalError> {
    chain_compare(args, "<", |a, b| a < b)
}

fn gt(args: &[Value]) -> Result<Value, EvalError> {
    chain_compare(args, ">", |a, b| a > b)
}

fn oddp(args: &[Value]) -> Result<Value, EvalError> {
    match arg(args, 0) {
        Value::Integer(n) => Ok(bool_value(n % 2 != 0)),
        _ => Err(wrong_type("oddp")),
    }
}

/// True when both sides are numerically-equal Integers, or else when
/// their printed forms match.
fn equal(args: &[Value]) -> Result<Value, EvalError> {
    let a = arg(args, 0);
    let b = arg(args, 1);
    let eq = match (&a, &b) {
        (Value::Integer(x), Value::Integer(y)) => x == y,
        _ => a.to_string() == b.to_string(),
    };
    Ok(bool_value(eq))
}

fn symbolp(args: &[Value]) -> Result<Value, EvalError> {
    Ok(bool_value(arg(args, 0).is_symbol()))
}

// --- List library ----------------------------------------------------

fn head_of(v: &Value) -> Result<Value, EvalError> {
    match v {
        Value::Nil => Ok(Value::Nil),
        Value::Cons(h, _) => Ok((**h).clone()),
        other => Err(EvalError::NotAList(other.to_string())),
    }
}

fn tail_of(v: &Value) -> Result<Value, EvalError> {
    match v {
        Value::Nil => Ok(Value::Nil),
        Value::Cons(_, t) => Ok((**t).clone()),
        other => Err(EvalError::NotAList(other.to_string())),
    }
}

/// `cons h t` needs no branching between proper-list and dotted-pair
/// construction: a `Cons` with a list tail already prints as a proper
/// list, and one with an atom tail already prints dotted.
fn cons(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::cons(arg(args, 0), arg(args, 1)))
}

fn head(args: &[Value]) -> Result<Value, EvalError> {
    head_of(&arg(args, 0))
}

fn tail(args: &[Value]) -> Result<Value, EvalError> {
    tail_of(&arg(args, 0))
}

/// 0-indexed; `nthcdr 0` returns the list unchanged; running off the
/// end of a proper list returns `nil`; landing on a dotted tail
/// returns the dotted atom. The starting value itself must be a list
/// (`nil` or a cons), matching spec §7's `<value> is not a list` error.
fn nthcdr(args: &[Value]) -> Result<Value, EvalError> {
    let n = as_usize(&arg(args, 0), "nthcdr")?;
    let start = arg(args, 1);
    if start.is_atom() && !start.is_nil() {
        return Err(EvalError::NotAList(start.to_string()));
    }
    let mut cur = start;
    for _ in 0..n {
        cur = match cur {
            Value::Cons(_, t) => (*t).clone(),
            other => other,
        };
    }
    Ok(cur)
}

/// Same walk as `nthcdr`, but returns the element rather than the
/// remaining tail.
fn nth(args: &[Value]) -> Result<Value, EvalError> {
    let n = as_usize(&arg(args, 0), "nth")?;
    let mut cur = arg(args, 1);
    for _ in 0..n {
        cur = match cur {
            Value::Cons(_, t) => (*t).clone(),
            other => other,
        };
    }
    match cur {
        Value::Cons(h, _) => Ok((*h).clone()),
        other => Ok(other),
    }
}

/// For a proper list, the final cons wrapped back up as a singleton
/// list; for a dotted list, the final cons itself (carrying the
/// dotted atom).
fn last(args: &[Value]) -> Result<Value, EvalError> {
    let mut cur = arg(args, 0);
    loop {
        match cur {
            Value::Nil => return Ok(Value::Nil),
            Value::Cons(ref h, ref t) => match t.as_ref() {
                Value::Cons(_, _) => {
                    let next = (**t).clone();
                    cur = next;
                }
                Value::Nil => return Ok(Value::list(vec![(**h).clone()])),
                _ => return Ok(cur.clone()),
            },
            other => return Err(EvalError::NotAList(other.to_string())),
        }
    }
}

/// `nil` on either side short-circuits to the other side; otherwise
/// the first list's elements are copied onto a fresh spine ending in
/// the second argument, never mutating the caller's list (see the
/// `append` sharing note in DESIGN.md).
fn append(args: &[Value]) -> Result<Value, EvalError> {
    let l1 = arg(args, 0);
    let l2 = arg(args, 1);
    if l1.is_nil() {
        return Ok(l2);
    }
    if l2.is_nil() {
        return Ok(l1);
    }
    let items = l1
        .as_proper_list()
        .ok_or_else(|| EvalError::NotAList(l1.to_string()))?;
    Ok(Value::dotted_list(items, l2))
}

fn reverse(args: &[Value]) -> Result<Value, EvalError> {
    let items = proper_list_arg(args, 0)?;
    Ok(Value::list(items.into_iter().rev().collect()))
}

/// Returns the tail of `l` starting at the first element whose printed
/// form matches `x`, or `nil` if none does.
fn member(args: &[Value]) -> Result<Value, EvalError> {
    let needle = arg(args, 0).to_string();
    let mut cur = arg(args, 1);
    loop {
        match cur {
            Value::Cons(ref h, ref t) => {
                if h.to_string() == needle {
                    return Ok(cur.clone());
                }
                let next = (**t).clone();
                cur = next;
            }
            _ => return Ok(Value::Nil),
        }
    }
}

fn contains(haystack: &[Value], needle: &Value) -> bool {
    let needle = needle.to_string();
    haystack.iter().any(|v| v.to_string() == needle)
}

/// Preserves the order of first occurrence in the first argument.
fn intersection(args: &[Value]) -> Result<Value, EvalError> {
    let a = proper_list_arg(args, 0)?;
    let b = proper_list_arg(args, 1)?;
    Ok(Value::list(
        a.into_iter().filter(|x| contains(&b, x)).collect(),
    ))
}

/// Preserves the first argument's order, then appends any elements of
/// the second argument not already present, in their original order.
fn union(args: &[Value]) -> Result<Value, EvalError> {
    let a = proper_list_arg(args, 0)?;
    let b = proper_list_arg(args, 1)?;
    let mut result = a.clone();
    for item in b {
        if !contains(&a, &item) {
            result.push(item);
        }
    }
    Ok(Value::list(result))
}

fn set_difference(args: &[Value]) -> Result<Value, EvalError> {
    let a = proper_list_arg(args, 0)?;
    let b = proper_list_arg(args, 1)?;
    Ok(Value::list(
        a.into_iter().filter(|x| !contains(&b, x)).collect(),
    ))
}

fn subsetp(args: &[Value]) -> Result<Value, EvalError> {
    let a = proper_list_arg(args, 0)?;
    let b = proper_list_arg(args, 1)?;
    Ok(bool_value(a.iter().all(|x| contains(&b, x))))
}

fn as_ints(args: &[Value], op: &str) -> Result<Vec<i64>, EvalError> {
    args.iter()
        .map(|v| match v {
            Value::Integer(n) => Ok(*n),
            _ => Err(wrong_type(op)),
        })
        .collect()
}

fn max(args: &[Value]) -> Result<Value, EvalError> {
    as_ints(args, "max")?
        .into_iter()
        .max()
        .map(Value::Integer)
        .ok_or_else(|| wrong_type("max"))
}

fn min(args: &[Value]) -> Result<Value, EvalError> {
    as_ints(args, "min")?
        .into_iter()
        .min()
        .map(Value::Integer)
        .ok_or_else(|| wrong_type("min"))
}

fn length(args: &[Value]) -> Result<Value, EvalError> {
    let items = proper_list_arg(args, 0)?;
    Ok(Value::Integer(items.len() as i64))
}
