//! A thin read-eval-print loop over the public library API: it only
//! ever calls [`crate::parse`], [`crate::eval`], and [`crate::print`].
//!
//! Also handles loading a script file given as a command-line
//! argument: split the file into top-level forms, then run each one
//! through the same three calls.

use std::io::{self, Write};

use crate::env::{Environment, Locals};
use crate::error::surface;
use crate::{eval, parse, print};

/// Run an interactive session on stdin/stdout until EOF.
pub fn repl(env: &mut Environment) {
    loop {
        print!("corelisp> ");
        if io::stdout().flush().is_err() {
            return;
        }
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => return,
            Ok(_) => {}
            Err(e) => {
                eprintln!("corelisp: {e}");
                continue;
            }
        }
        let line = buf.trim_end();
        if !line.is_empty() {
            run_one(line, env);
        }
    }
}

fn run_one(source: &str, env: &mut Environment) {
    let mut locals = Locals::new();
    match parse(source) {
        Ok(expr) => match eval(expr, &mut locals, env) {
            Ok(value) => println!("{}", print(&value)),
            Err(e) => eprintln!("{}", surface(&e)),
        },
        Err(e) => eprintln!("{e}"),
    }
}

/// Load and evaluate every top-level form in `source` in order,
/// printing each result the way an interactive session would. Lines
/// beginning with `;` are comments and are skipped, so a script can
/// narrate itself without those lines being parsed as forms.
pub fn run_source(source: &str, env: &mut Environment) {
    let stripped: String = source
        .lines()
        .filter(|line| !line.trim_start().starts_with(';'))
        .collect::<Vec<_>>()
        .join("\n");

    for form in split_top_level_forms(&stripped) {
        run_one(form, env);
    }
}

/// Split `source` into top-level form spans by tracking paren depth,
/// skipping past any leading quote marks (`'`, `#'`) first so a
/// top-level `'(a b)` is kept as one span rather than breaking on its
/// inner whitespace.
fn split_top_level_forms(source: &str) -> Vec<&str> {
    let mut forms = Vec::new();
    let bytes = source.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && (bytes[i] as char).is_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let start = i;

        let mut probe = i;
        loop {
            if bytes.get(probe) == Some(&b'\'') {
                probe += 1;
            } else if bytes.get(probe) == Some(&b'#') && bytes.get(probe + 1) == Some(&b'\'') {
                probe += 2;
            } else {
                break;
            }
        }

        if bytes.get(probe) == Some(&b'(') {
            let mut depth = 0i32;
            let mut j = probe;
            while j < bytes.len() {
                match bytes[j] {
                    b'(' => depth += 1,
                    b')' => {
                        depth -= 1;
                        if depth == 0 {
                            j += 1;
                            break;
                        }
                    }
                    _ => {}
                }
                j += 1;
            }
            i = j;
        } else {
            let mut j = probe;
            while j < bytes.len() && !(bytes[j] as char).is_whitespace() {
                j += 1;
            }
            i = j.max(probe);
        }

        forms.push(&source[start..i]);
    }
    forms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn splits_two_independent_forms() {
        let forms = split_top_level_forms("(setf x 1) (setf y 2)");
        assert_eq!(forms, vec!["(setf x 1)", "(setf y 2)"]);
    }

    #[test]
    fn keeps_a_quoted_list_as_one_span() {
        let forms = split_top_level_forms("(setf vowels '(a e i o u)) (length vowels)");
        assert_eq!(
            forms,
            vec!["(setf vowels '(a e i o u))", "(length vowels)"]
        );
    }

    #[test]
    fn run_source_skips_comment_lines() {
        let mut env = Environment::new();
        run_source("; this is a comment\n(setf x 1)", &mut env);
        let mut locals = Locals::new();
        let result = eval(parse("x").unwrap(), &mut locals, &mut env).unwrap();
        assert_eq!(result, Value::Integer(1));
    }
}
