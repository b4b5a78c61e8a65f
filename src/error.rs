//! The single textual error channel described by the interpreter's error
//! taxonomy: every failure is a variant here, and `Display` renders the
//! exact conventional prefix callers match against.

use std::fmt;

/// All errors the evaluator or a built-in can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A built-in received an argument of the wrong type.
    WrongType {
        /// The operator name, e.g. `"+"` or `"oddp"`.
        op: String,
    },
    /// A symbol had no binding in locals or globals.
    UnassignedVariable(String),
    /// Dispatch reached the end of special forms, built-ins, and
    /// user-defined operations without a match.
    UndefinedFunction(String),
    /// A user-defined operation was called with the wrong number of
    /// arguments.
    TooManyArguments,
    /// `defun`'s parameter list contained something other than symbols.
    BadArgumentList,
    /// A list-only built-in (`append`, `reverse`, `last`, `nthcdr`, ...)
    /// was applied to a non-list.
    NotAList(String),
    /// An error raised while evaluating a user-defined operation's body,
    /// wrapping the underlying failure.
    InFunction {
        /// The operation's name.
        name: String,
        /// The error that occurred inside its body.
        inner: Box<EvalError>,
    },
    /// Any other failure, carrying its own pre-formatted message.
    Custom(String),
}

impl EvalError {
    /// Wrap `self` as having occurred inside the body of the named
    /// user-defined operation: `Error in function <name>: <underlying>`.
    pub fn in_function(self, name: &str) -> EvalError {
        EvalError::InFunction {
            name: name.to_string(),
            inner: Box::new(self),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::WrongType { op } => write!(f, "Wrong type input to {op}"),
            EvalError::UnassignedVariable(name) => write!(f, "{name} unassigned variable"),
            EvalError::UndefinedFunction(name) => write!(f, "'{name}' undefined function"),
            EvalError::TooManyArguments => write!(f, "Too many arguments"),
            EvalError::BadArgumentList => write!(f, "Bad argument list"),
            EvalError::NotAList(printed) => write!(f, "{printed} is not a list"),
            EvalError::InFunction { name, inner } => {
                write!(f, "Error in function {name}: {inner}")
            }
            EvalError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Prefix an error's rendered text with `Error! ` unless it already
/// starts with `Error`, as a top-level caller reporting a failure would.
pub fn surface(err: &EvalError) -> String {
    let text = err.to_string();
    if text.starts_with("Error") {
        text
    } else {
        format!("Error! {text}")
    }
}

/// Failure mode for the reader. Spec §4.1 leaves malformed input
/// undefined behavior; this only exists so entry points can return a
/// `Result` instead of panicking on obviously-broken input (unbalanced
/// parentheses, an empty source string).
#[derive(Debug, Clone, PartialEq)]
pub struct ReadError(pub String);

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ReadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_adds_prefix_once() {
        let err = EvalError::UnassignedVariable("x".into());
        assert_eq!(surface(&err), "Error! x unassigned variable");
    }

    #[test]
    fn surface_does_not_double_prefix_wrapped_errors() {
        let err = EvalError::WrongType {
            op: "oddp".to_string(),
        }
        .in_function("test");
        assert_eq!(surface(&err), "Error in function test: Wrong type input to oddp");
    }
}
