//! Unit tests for the interpreter.
//!
//! Programs run straight from the parser, without the semantic checker, so
//! runtime errors can be observed directly.

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        types::Type,
    },
    config::Config,
    errors::errors::{Error, ErrorImpl, ErrorKind},
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::parser::parse,
};

use super::{environment::Environment, interpreter::Interpreter, value::Value};

fn program(source: &str) -> Program {
    parse(tokenize(source).unwrap(), &Config::default()).unwrap()
}

fn run_with(source: &str, config: Config) -> (Vec<String>, Result<(), Error>) {
    let program = program(source);
    let mut interpreter = Interpreter::new(config);
    let result = interpreter.execute(&program);
    (interpreter.take_output(), result)
}

fn output(source: &str) -> Vec<String> {
    let (output, result) = run_with(source, Config::default());
    assert!(result.is_ok(), "unexpected error: {:?}", result);
    output
}

fn failure(source: &str) -> ErrorImpl {
    let (_, result) = run_with(source, Config::default());
    result.unwrap_err().get_impl().clone()
}

#[test]
fn test_print_formats() {
    assert_eq!(
        output("print(5); print(2.5); print(\"hi\"); print(true); print([1, 2]); print([0.5]);"),
        vec!["5", "2.50", "hi", "true", "[1, 2]", "[0.50]"]
    );
}

#[test]
fn test_arithmetic_promotes_to_float() {
    assert_eq!(output("print(1 + 2 * 3);"), vec!["7.00"]);
    assert_eq!(output("print((1 + 2) * 3); print(10 - 4 - 3);"), vec!["9.00", "3.00"]);
    assert_eq!(output("print(7 % 3);"), vec!["1.00"]);
}

#[test]
fn test_stores_coerce_to_declared_type() {
    assert_eq!(output("var i: Int = 7 / 2; print(i);"), vec!["3"]);
    assert_eq!(output("var f: Float = 1; print(f);"), vec!["1.00"]);
    assert_eq!(output("var n = 4; n = n / 3; print(n);"), vec!["1"]);
    assert_eq!(output("var a: [Float] = [1, 2]; print(a);"), vec!["[1.00, 2.00]"]);
}

#[test]
fn test_unary_operators() {
    assert_eq!(
        output("print(-3); print(!0); print(!true); print(!2.5);"),
        vec!["-3.00", "true", "false", "false"]
    );
    assert!(matches!(
        failure("print(-\"x\");"),
        ErrorImpl::NonNumericOperand { .. }
    ));
}

#[test]
fn test_comparisons_produce_bools() {
    assert_eq!(
        output("print(1 < 2); print(2.0 >= 3); print(1 == 1.0); print(true != false);"),
        vec!["true", "false", "true", "true"]
    );
}

#[test]
fn test_chained_assignment() {
    assert_eq!(
        output("var a: Int = 0; var b: Int = 0; a = b = 3; print(a); print(b);"),
        vec!["3", "3"]
    );
}

#[test]
fn test_while_loop_and_globals() {
    let program = program("var i: Int = 0; while (i < 3) { i = i + 1; print(i); }");
    let mut interpreter = Interpreter::new(Config::default());

    interpreter.execute(&program).unwrap();

    assert_eq!(interpreter.output(), ["1", "2", "3"]);
    assert_eq!(interpreter.global("i"), Some(Value::Int(3)));
    assert!(interpreter.call_stack().is_empty());
}

#[test]
fn test_for_loop() {
    assert_eq!(
        output("for (var i = 0; i < 3; i = i + 1) { print(i); }"),
        vec!["0", "1", "2"]
    );
}

#[test]
fn test_block_scoping() {
    assert_eq!(
        output("var x = 1; { var x = 2; print(x); } print(x);"),
        vec!["2", "1"]
    );
    assert_eq!(output("var x = 1; { x = 5; } print(x);"), vec!["5"]);
    assert!(matches!(
        failure("{ var inner = 1; } print(inner);"),
        ErrorImpl::UndefinedVariable { variable } if variable == "inner"
    ));
}

#[test]
fn test_loop_iterations_get_fresh_scopes() {
    assert_eq!(
        output("var i = 0; while (i < 2) { var t = i * 10; print(t); i = i + 1; }"),
        vec!["0.00", "10.00"]
    );
}

#[test]
fn test_recursive_function() {
    assert_eq!(
        output(
            "fn factorial(n: Int) -> Int {
                 if (n <= 1) { return 1; }
                 return n * factorial(n - 1);
             }
             print(factorial(5));"
        ),
        vec!["120"]
    );
}

#[test]
fn test_call_before_declaration() {
    assert_eq!(
        output("print(twice(4)); fn twice(n: Int) -> Int { return n * 2; }"),
        vec!["8"]
    );
}

#[test]
fn test_functions_see_globals_not_caller_locals() {
    assert_eq!(
        output("var g = 1; fn read() -> Int { return g; } { var g = 5; print(read()); }"),
        vec!["1"]
    );
}

#[test]
fn test_return_unwinds_nested_loops() {
    let source = "fn first() -> Int {
                      var i = 0;
                      while (true) {
                          for (var j = 0; j < 10; j = j + 1) {
                              if (j == 2) { return i * 10 + j; }
                              print(j);
                          }
                          i = i + 1;
                      }
                      return 0;
                  }
                  print(first());";

    assert_eq!(output(source), vec!["0", "1", "2"]);
}

#[test]
fn test_top_level_return_is_ignored() {
    assert_eq!(output("print(1); return; print(2);"), vec!["1", "2"]);
}

#[test]
fn test_short_circuit() {
    let source = "fn boom() -> Bool { print(\"boom\"); return true; }
                  print(false && boom());
                  print(true || boom());
                  print(1 && boom());";

    assert_eq!(output(source), vec!["false", "true", "boom", "true"]);
}

#[test]
fn test_output_before_error_is_kept() {
    let (output, result) = run_with("print(1); print(1 / 0); print(2);", Config::default());

    assert_eq!(output, vec!["1"]);
    let error = result.unwrap_err();
    assert_eq!(*error.get_impl(), ErrorImpl::DivisionByZero);
    assert_eq!(error.kind(), ErrorKind::Runtime);
    assert_eq!(error.get_position().line(), 1);
}

#[test]
fn test_modulo_by_zero() {
    assert_eq!(failure("print(5 % 0);"), ErrorImpl::DivisionByZero);
}

#[test]
fn test_variable_errors() {
    assert!(matches!(
        failure("var x: Int; print(x);"),
        ErrorImpl::UninitializedVariable { variable } if variable == "x"
    ));
    assert!(matches!(
        failure("ghost = 1;"),
        ErrorImpl::UndefinedVariable { variable } if variable == "ghost"
    ));
}

#[test]
fn test_call_errors() {
    assert_eq!(
        failure("fn f(a: Int) { } f();"),
        ErrorImpl::WrongArgumentCount {
            function: "f".to_string(),
            expected: 1,
            received: 0,
        }
    );
    assert!(matches!(failure("missing();"), ErrorImpl::UndefinedFunction { .. }));
    assert!(matches!(failure("fn f() { } var x = f();"), ErrorImpl::VoidValue { .. }));
    assert!(matches!(
        failure("fn f() -> Int { return \"x\"; } print(f());"),
        ErrorImpl::NonScalarReturn { .. }
    ));
}

#[test]
fn test_void_call_as_statement() {
    assert_eq!(output("fn hello() { print(\"hello\"); } hello();"), vec!["hello"]);
}

#[test]
fn test_runtime_type_errors() {
    assert!(matches!(
        failure("var s: String = 1;"),
        ErrorImpl::TypeMismatch { .. }
    ));
    assert!(matches!(
        failure("if (\"yes\") { }"),
        ErrorImpl::InvalidCondition { found } if found == "String"
    ));
    assert_eq!(
        failure("print(\"a\" + 1);"),
        ErrorImpl::NonNumericOperand {
            operator: "+".to_string(),
            found: "String".to_string(),
        }
    );
}

#[test]
fn test_recursion_limit() {
    let program = program("fn down(n: Int) -> Int { return down(n + 1); } print(down(0));");
    let mut interpreter = Interpreter::new(Config::default().with_max_call_depth(10));

    let error = interpreter.execute(&program).unwrap_err();

    assert_eq!(*error.get_impl(), ErrorImpl::RecursionLimit { limit: 10 });
    assert_eq!(interpreter.error_trace.len(), 10);
    assert!(interpreter.call_stack().is_empty());
}

#[test]
fn test_execute_resets_state() {
    let program = program("var count = 0; count = count + 1; print(count);");
    let mut interpreter = Interpreter::new(Config::default());

    interpreter.execute(&program).unwrap();
    interpreter.execute(&program).unwrap();

    assert_eq!(interpreter.output(), ["1"]);
}

#[test]
fn test_value_coercion() {
    assert_eq!(Value::Float(2.9).coerce(&Type::Int), Ok(Value::Int(2)));
    assert_eq!(Value::Float(-2.9).coerce(&Type::Int), Ok(Value::Int(-2)));
    assert_eq!(Value::Int(2).coerce(&Type::Float), Ok(Value::Float(2.0)));
    assert_eq!(Value::Bool(true).coerce(&Type::Unknown), Ok(Value::Bool(true)));
    assert!(Value::Bool(true).coerce(&Type::Int).is_err());
    assert!(Value::String("1".to_string()).coerce(&Type::Float).is_err());
}

#[test]
fn test_out_of_range_int_store() {
    assert_eq!(
        failure("var i: Int = 10000000000 * 10000000000;"),
        ErrorImpl::IntegerOverflow {
            value: "1e20".to_string(),
        }
    );
    assert_eq!(
        output("var i: Int = 1000000000 * 1000000000; print(i);"),
        vec!["1000000000000000000"]
    );

    assert!(Value::Float(1e300).coerce(&Type::Int).is_err());
    assert!(Value::Float(f64::NAN).coerce(&Type::Int).is_err());
    assert!(Value::Float(f64::INFINITY).coerce(&Type::Int).is_err());
    assert!(Value::Float(9.2e18).coerce(&Type::Int).is_ok());
}

#[test]
fn test_unsupported_operator_is_a_runtime_error() {
    let mut program = program("print(1 + 2);");
    if let Stmt::Print(print) = &mut program.body[0] {
        if let Expr::Binary(binary) = &mut print.value {
            binary.operator.kind = TokenKind::Dot;
            binary.operator.lexeme = String::from(".");
        }
    }

    let mut interpreter = Interpreter::new(Config::default());
    let error = interpreter.execute(&program).unwrap_err();

    assert_eq!(
        *error.get_impl(),
        ErrorImpl::UnsupportedOperator {
            operator: ".".to_string(),
        }
    );
    assert_eq!(error.kind(), ErrorKind::Runtime);
}

#[test]
fn test_environment_chain() {
    let globals = Environment::new_global();
    globals
        .borrow_mut()
        .declare("x", Some(Type::Int), Some(Value::Int(1)))
        .unwrap();

    let child = Environment::new_child(&globals);
    child.borrow_mut().declare("y", None, Some(Value::Float(0.5))).unwrap();

    assert_eq!(child.borrow().get("x"), Ok(Value::Int(1)));
    assert_eq!(child.borrow_mut().assign("x", Value::Float(4.7)), Ok(Value::Int(4)));
    assert_eq!(globals.borrow().get("x"), Ok(Value::Int(4)));
    assert!(globals.borrow().get("y").is_err());
    assert_eq!(
        child.borrow().binding("y").and_then(|binding| binding.declared.clone()),
        Some(Type::Float)
    );
}
