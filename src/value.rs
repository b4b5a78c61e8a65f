//! The value model shared by the reader and the evaluator.
//!
//! A [`Value`] is a tagged variant: numbers (integer, float, ratio),
//! symbols, strings, the two distinguished atoms `t` and `nil`, and
//! `Cons` cells. Cons cells are immutable and their arms are
//! reference-counted so sub-lists can be shared between bindings
//! without copying; see the design note on `append` sharing in
//! DESIGN.md for why that matters.

use std::fmt;
use std::rc::Rc;

/// A Lisp value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit IEEE float.
    Float(f64),
    /// Exact rational, stored unreduced.
    Ratio(i64, i64),
    /// An identifier.
    Symbol(String),
    /// A string literal.
    Str(String),
    /// The distinguished true atom `t`. There is no boolean-false
    /// variant: per spec §3's Data Model, `Nil` alone is the false
    /// value (and the empty list), so every predicate/comparison
    /// returns either `Bool` or `Nil`, never a second falsy atom.
    Bool,
    /// The empty list / false.
    Nil,
    /// A cons cell: `head` followed by `tail`.
    Cons(Rc<Value>, Rc<Value>),
}

impl Value {
    /// Build a single cons cell.
    pub fn cons(head: Value, tail: Value) -> Value {
        Value::Cons(Rc::new(head), Rc::new(tail))
    }

    /// Build a proper list from a `Vec`, terminated by `nil`.
    pub fn list(items: Vec<Value>) -> Value {
        Value::dotted_list(items, Value::Nil)
    }

    /// Build a list from `items`, terminated by `tail` instead of `nil`.
    /// When `tail` is itself `nil` or a list, the result is a proper list;
    /// otherwise the result is a dotted pair.
    pub fn dotted_list(items: Vec<Value>, tail: Value) -> Value {
        items
            .into_iter()
            .rev()
            .fold(tail, |acc, item| Value::cons(item, acc))
    }

    /// The constant boolean-true atom `t`.
    pub fn t() -> Value {
        Value::Bool
    }

    /// True for any value that is not a `Cons` (includes `Nil`).
    pub fn is_atom(&self) -> bool {
        !matches!(self, Value::Cons(..))
    }

    /// True for `Integer`.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// True for `Symbol`.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    /// True for `Str`.
    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// True for `Nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// True when this value is `Nil` or a cons chain terminated by `Nil`.
    /// A dotted pair (cons terminated by a non-nil atom) is not a list.
    pub fn is_list(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Cons(_, tail) => tail.is_list(),
            _ => false,
        }
    }

    /// Whether a value is treated as true by `if`/`cond`: anything other
    /// than `nil`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil)
    }

    /// Coerce a number to `f64`, per the `floatVal()` projection used by
    /// arithmetic and comparisons. Returns `None` for non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            Value::Ratio(n, d) => Some(*n as f64 / *d as f64),
            _ => None,
        }
    }

    /// Split a cons chain into its elements and final tail. For a proper
    /// list the tail is `Nil`; for a dotted list it is the trailing atom.
    /// Elements are cloned (cons cells are shared, not consumed).
    pub fn list_parts(&self) -> (Vec<Value>, Value) {
        let mut items = Vec::new();
        let mut cur = self;
        loop {
            match cur {
                Value::Cons(head, tail) => {
                    items.push((**head).clone());
                    cur = tail;
                }
                other => return (items, other.clone()),
            }
        }
    }

    /// Collect a proper list's elements. Returns `None` if the value is
    /// not a list (i.e. it is a dotted pair or a non-nil atom).
    pub fn as_proper_list(&self) -> Option<Vec<Value>> {
        let (items, tail) = self.list_parts();
        if tail.is_nil() {
            Some(items)
        } else {
            None
        }
    }
}

/// Normalize a float to the shortest decimal containing a `.`; if that
/// form exceeds 7 characters, collapse to 1 digit after the decimal.
fn format_float(x: f64) -> String {
    let mut s = format!("{x}");
    if !s.contains('.') {
        s.push('.');
        s.push('0');
    }
    if s.len() > 7 {
        s = format!("{:.1}", x);
    }
    s
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Ratio(n, d) => write!(f, "{n}/{d}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool => write!(f, "t"),
            Value::Nil => write!(f, "nil"),
            Value::Cons(head, tail) => {
                write!(f, "({head}")?;
                let mut rest = tail;
                loop {
                    match rest.as_ref() {
                        Value::Nil => break,
                        Value::Cons(h2, t2) => {
                            write!(f, " {h2}")?;
                            rest = t2;
                        }
                        other => {
                            write!(f, " . {other}")?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
        }
    }
}
