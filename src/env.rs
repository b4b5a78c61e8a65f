//! The two-layer environment: a mutable global layer plus a local
//! layer threaded explicitly through evaluation.
//!
//! Locals are **not** stored on [`Environment`]. Extending them for
//! `let`/`let*`/function calls must never leak back to the caller, so
//! they are represented as a plain `Vec` that every extension
//! clones-and-appends rather than mutates in place — a frame chain
//! realized as a persistent vector instead of a mutable push/pop scope
//! stack.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use crate::value::Value;

/// A single (name, value) binding introduced by `let`, `let*`, or a
/// function call. The innermost binding is last.
pub type Locals = Vec<(String, Value)>;

/// A user-defined operation created by `defun`: a name, parameter
/// list, and one or more body expressions.
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Value>,
}

/// The mutable global layer plus the function-namespace table. Kept
/// separate from variable bindings so `(defun foo ...)` and `(setf foo
/// ...)` never collide, giving this interpreter the usual Lisp-2
/// dispatch order: variables and operations live in different tables.
///
/// `#[wasm_bindgen]` makes this an opaque handle a JS embedder can hold
/// onto across calls.
#[wasm_bindgen]
pub struct Environment {
    globals: HashMap<String, Value>,
    operations: HashMap<String, Operation>,
}

impl Environment {
    /// Build an environment with the standard seeded globals: `pi`,
    /// `t`, and `nil`.
    pub fn new() -> Self {
        let mut globals = HashMap::new();
        globals.insert("pi".to_string(), Value::Float(3.14159));
        globals.insert("t".to_string(), Value::t());
        globals.insert("nil".to_string(), Value::Nil);
        Environment {
            globals,
            operations: HashMap::new(),
        }
    }

    /// Build an environment with only the bare globals, skipping any
    /// further prelude seeding a future caller might add. Used by the
    /// REPL's `--no-prelude` flag; today it is equivalent to `new`
    /// since there is no prelude beyond `pi`/`t`/`nil`.
    pub fn bare() -> Self {
        Self::new()
    }

    /// Look up a symbol: locals first, then globals.
    pub fn lookup(&self, locals: &Locals, name: &str) -> Option<Value> {
        locals
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .or_else(|| self.globals.get(name).cloned())
    }

    /// `setf`: update a shadowed local binding if one exists, else an
    /// existing global, else create a new global. Returns the value
    /// that was set.
    pub fn setf(&mut self, locals: &mut Locals, name: &str, value: Value) -> Value {
        if let Some(slot) = locals.iter_mut().rev().find(|(n, _)| n == name) {
            slot.1 = value.clone();
            return value;
        }
        self.globals.insert(name.to_string(), value.clone());
        value
    }

    /// Record a user-defined operation. Redefining a name replaces the
    /// earlier definition (most-recent wins) — see DESIGN.md.
    pub fn define_operation(&mut self, op: Operation) {
        if self.operations.contains_key(&op.name) {
            log::debug!("redefining operation {}", op.name);
        }
        self.operations.insert(op.name.clone(), op);
    }

    /// Find a user-defined operation by name.
    pub fn find_operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Extend `locals` with a batch of simultaneous bindings (`let`), or
/// build a fresh stack for a function call. Never mutates `locals` in
/// place; returns a new `Vec` so the caller's view is untouched.
pub fn extend(locals: &Locals, bindings: Vec<(String, Value)>) -> Locals {
    let mut extended = locals.clone();
    extended.extend(bindings);
    extended
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_pi_t_and_nil() {
        let env = Environment::new();
        let locals: Locals = Vec::new();
        assert_eq!(env.lookup(&locals, "pi"), Some(Value::Float(3.14159)));
        assert_eq!(env.lookup(&locals, "t"), Some(Value::t()));
        assert_eq!(env.lookup(&locals, "nil"), Some(Value::Nil));
    }

    #[test]
    fn locals_shadow_globals_without_mutating_caller() {
        let env = Environment::new();
        let outer: Locals = vec![];
        let inner = extend(&outer, vec![("pi".to_string(), Value::Integer(3))]);
        assert_eq!(env.lookup(&inner, "pi"), Some(Value::Integer(3)));
        assert_eq!(env.lookup(&outer, "pi"), Some(Value::Float(3.14159)));
    }

    #[test]
    fn setf_prefers_shadowed_local_over_global() {
        let mut env = Environment::new();
        let mut locals = extend(&vec![], vec![("x".to_string(), Value::Integer(1))]);
        env.setf(&mut locals, "x", Value::Integer(2));
        assert_eq!(env.lookup(&locals, "x"), Some(Value::Integer(2)));
        // No global "x" was created.
        let empty: Locals = vec![];
        assert_eq!(env.lookup(&empty, "x"), None);
    }

    #[test]
    fn redefining_an_operation_replaces_it() {
        let mut env = Environment::new();
        env.define_operation(Operation {
            name: "f".to_string(),
            params: vec![],
            body: vec![Value::Integer(1)],
        });
        env.define_operation(Operation {
            name: "f".to_string(),
            params: vec![],
            body: vec![Value::Integer(2)],
        });
        assert_eq!(
            env.find_operation("f").unwrap().body,
            vec![Value::Integer(2)]
        );
    }
}
