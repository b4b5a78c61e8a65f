//! # corelisp
//!
//! The core of a small Common-Lisp-flavored interpreter: a reader that
//! turns surface text into a single [`Value`] tree, and an evaluator
//! that reduces that tree under an [`Environment`] of globals and
//! user-defined operations plus an explicit local-binding stack.
//!
//! The REPL loop, a golden-test harness, and any wider logging
//! configuration are external collaborators: they hand a source string
//! to [`parse`], the resulting value to [`eval`], and print whatever
//! [`print`] renders. This crate only supplies the three calls and the
//! value model underneath them.

#![warn(missing_docs)]

pub mod builtins;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod special_forms;
pub mod value;

use wasm_bindgen::prelude::*;

pub use env::{Environment, Locals};
pub use error::{EvalError, ReadError};
pub use value::Value;

/// Build an interpreter handle with its globals seeded: `pi`, `t`,
/// `nil`.
pub fn init() -> Environment {
    Environment::new()
}

/// Parse a single top-level expression out of `source`.
pub fn parse(source: &str) -> Result<Value, ReadError> {
    parser::parse(source)
}

/// Evaluate `expr` under `locals` and `env`.
pub fn eval(expr: Value, locals: &mut Locals, env: &mut Environment) -> Result<Value, EvalError> {
    evaluator::eval(expr, locals, env)
}

/// Render a value the way the reader could read it back.
pub fn print(value: &Value) -> String {
    value.to_string()
}

/// Parse then evaluate a source string in one call, surfacing any
/// failure as `Error! `-prefixed text. This is the single entry point a
/// WASM embedder needs.
#[wasm_bindgen]
pub fn parse_eval_print(input: String, env: &mut Environment) -> String {
    let mut locals = Locals::new();
    match parse(&input) {
        Ok(expr) => match eval(expr, &mut locals, env) {
            Ok(value) => print(&value),
            Err(e) => error::surface(&e),
        },
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_str(src: &str, env: &mut Environment) -> Result<Value, EvalError> {
        let mut locals = Locals::new();
        eval(parse(src).unwrap(), &mut locals, env)
    }

    #[test]
    fn end_to_end_interpreter_scenarios() {
        let mut env = init();
        assert_eq!(print(&eval_str("(+ 2 3)", &mut env).unwrap()), "5");
        assert_eq!(
            print(&eval_str("(/ (* 2 11) (+ 1 6))", &mut env).unwrap()),
            "22/7"
        );
        assert_eq!(print(&eval_str("(oddp (+ 1 6))", &mut env).unwrap()), "t");
        assert_eq!(
            print(&eval_str("(defun square (n) (* n n))", &mut env).unwrap()),
            "nil"
        );
        assert_eq!(print(&eval_str("(square 2)", &mut env).unwrap()), "4");
        assert_eq!(
            print(&eval_str("(list 'buy (* 27 34) 'bagels)", &mut env).unwrap()),
            "(buy 918 bagels)"
        );
        assert_eq!(
            print(&eval_str("(cons '(a b c) 'd)", &mut env).unwrap()),
            "((a b c) . d)"
        );
        assert_eq!(
            print(&eval_str("(append '(friends romans) '(and countrymen))", &mut env).unwrap()),
            "(friends romans and countrymen)"
        );
        assert_eq!(
            print(
                &eval_str(
                    "(defun compare (x y) (cond ((equal x y) 'same) ((< x y) 'less) ((> x y) 'more)))",
                    &mut env
                )
                .unwrap()
            ),
            "nil"
        );
        assert_eq!(print(&eval_str("(compare 4 4)", &mut env).unwrap()), "same");
        assert_eq!(
            print(&eval_str("(setf vowels '(a e i o u))", &mut env).unwrap()),
            "(a e i o u)"
        );
        assert_eq!(print(&eval_str("(length vowels)", &mut env).unwrap()), "5");
        assert_eq!(
            print(&eval_str("(apply #'cons '(as (you like it)))", &mut env).unwrap()),
            "(as you like it)"
        );
        assert_eq!(print(&eval_str("(if nil 'happy)", &mut env).unwrap()), "nil");
    }

    #[test]
    fn oddp_of_a_list_surfaces_with_error_bang_prefix() {
        let mut env = init();
        let err = eval_str("(oddp '(+ 1 2))", &mut env).unwrap_err();
        assert_eq!(error::surface(&err), "Error! Wrong type input to oddp");
    }
}
