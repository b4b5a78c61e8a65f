//! End-to-end coverage through the public `parse`/`eval`/`print` API
//! only, exercising the scenario table and a handful of error paths.

use corelisp::env::Locals;
use corelisp::error::surface;
use corelisp::{eval, init, parse, print};

fn run(src: &str, locals: &mut Locals, env: &mut corelisp::Environment) -> String {
    match eval(parse(src).unwrap(), locals, env) {
        Ok(value) => print(&value),
        Err(e) => surface(&e),
    }
}

#[test]
fn arithmetic_and_numeric_tower() {
    let mut env = init();
    let mut locals = Locals::new();
    assert_eq!(run("(+ 2 3)", &mut locals, &mut env), "5");
    assert_eq!(run("(- 10 4)", &mut locals, &mut env), "6");
    assert_eq!(run("(* 6 7)", &mut locals, &mut env), "42");
    assert_eq!(run("(/ (* 2 11) (+ 1 6))", &mut locals, &mut env), "22/7");
    assert_eq!(run("(/ 10.0 4)", &mut locals, &mut env), "2.5");
    assert_eq!(run("(oddp (+ 1 6))", &mut locals, &mut env), "t");
    assert_eq!(run("(oddp 4)", &mut locals, &mut env), "nil");
}

#[test]
fn defun_and_calling_a_user_operation() {
    let mut env = init();
    let mut locals = Locals::new();
    assert_eq!(run("(defun square (n) (* n n))", &mut locals, &mut env), "nil");
    assert_eq!(run("(square 2)", &mut locals, &mut env), "4");
    assert_eq!(run("(square 9)", &mut locals, &mut env), "81");
}

#[test]
fn cond_based_three_way_comparison() {
    let mut env = init();
    let mut locals = Locals::new();
    run(
        "(defun compare (x y) (cond ((equal x y) 'same) ((< x y) 'less) ((> x y) 'more)))",
        &mut locals,
        &mut env,
    );
    assert_eq!(run("(compare 4 4)", &mut locals, &mut env), "same");
    assert_eq!(run("(compare 3 4)", &mut locals, &mut env), "less");
    assert_eq!(run("(compare 9 4)", &mut locals, &mut env), "more");
}

#[test]
fn setf_then_length_of_a_global() {
    let mut env = init();
    let mut locals = Locals::new();
    assert_eq!(
        run("(setf vowels '(a e i o u))", &mut locals, &mut env),
        "(a e i o u)"
    );
    assert_eq!(run("(length vowels)", &mut locals, &mut env), "5");
}

#[test]
fn apply_a_quoted_function_name() {
    let mut env = init();
    let mut locals = Locals::new();
    assert_eq!(
        run("(apply #'cons '(as (you like it)))", &mut locals, &mut env),
        "(as you like it)"
    );
}

#[test]
fn list_building_and_append() {
    let mut env = init();
    let mut locals = Locals::new();
    assert_eq!(
        run("(list 'buy (* 27 34) 'bagels)", &mut locals, &mut env),
        "(buy 918 bagels)"
    );
    assert_eq!(
        run("(append '(friends romans) '(and countrymen))", &mut locals, &mut env),
        "(friends romans and countrymen)"
    );
}

#[test]
fn if_with_missing_else_is_nil() {
    let mut env = init();
    let mut locals = Locals::new();
    assert_eq!(run("(if nil 'happy)", &mut locals, &mut env), "nil");
    assert_eq!(run("(if t 'happy)", &mut locals, &mut env), "happy");
}

#[test]
fn let_and_let_star_scoping() {
    let mut env = init();
    let mut locals = Locals::new();
    assert_eq!(run("(let ((x 1) (y 2)) (+ x y))", &mut locals, &mut env), "3");
    assert_eq!(run("(let* ((x 1) (y (+ x 1))) y)", &mut locals, &mut env), "2");
}

#[test]
fn error_cases_surface_with_the_error_bang_prefix() {
    let mut env = init();
    let mut locals = Locals::new();
    assert_eq!(
        run("(oddp '(+ 1 2))", &mut locals, &mut env),
        "Error! Wrong type input to oddp"
    );
    assert_eq!(
        run("boing", &mut locals, &mut env),
        "Error! boing unassigned variable"
    );
    assert_eq!(
        run("(frobnicate 1)", &mut locals, &mut env),
        "Error! 'frobnicate' undefined function"
    );
}

#[test]
fn error_inside_a_user_operation_names_the_operation() {
    let mut env = init();
    let mut locals = Locals::new();
    run("(defun boom () (oddp 'x))", &mut locals, &mut env);
    assert_eq!(
        run("(boom)", &mut locals, &mut env),
        "Error in function boom: Wrong type input to oddp"
    );
}

#[test]
fn redefining_an_operation_replaces_its_behavior() {
    let mut env = init();
    let mut locals = Locals::new();
    run("(defun f (x) (+ x 1))", &mut locals, &mut env);
    assert_eq!(run("(f 5)", &mut locals, &mut env), "6");
    run("(defun f (x) (+ x 100))", &mut locals, &mut env);
    assert_eq!(run("(f 5)", &mut locals, &mut env), "105");
}
