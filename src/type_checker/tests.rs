//! Unit tests for the semantic checker.

use crate::{
    ast::types::Type,
    config::Config,
    errors::errors::{Diagnostic, Severity},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Position,
};

use super::{
    symbol_table::{Symbol, SymbolKind, SymbolTable},
    type_checker::TypeChecker,
};

fn check(source: &str) -> Vec<Diagnostic> {
    let program = parse(tokenize(source).unwrap(), &Config::default()).unwrap();
    TypeChecker::new().check(&program)
}

fn messages(source: &str) -> Vec<String> {
    check(source)
        .into_iter()
        .map(|diagnostic| diagnostic.message)
        .collect()
}

fn assert_clean(source: &str) {
    let diagnostics = check(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
}

fn symbol(name: &str) -> Symbol {
    Symbol {
        name: name.to_string(),
        ty: Type::Int,
        kind: SymbolKind::Variable,
        declared_at: Position(1, 1),
    }
}

#[test]
fn test_symbol_table_scopes() {
    let mut table = SymbolTable::new();
    table.declare(symbol("x")).unwrap();

    table.enter_scope();
    assert!(table.lookup("x").is_some());
    assert!(table.lookup_current("x").is_none());
    table.declare(symbol("x")).unwrap();
    table.declare(symbol("y")).unwrap();
    assert_eq!(table.declare(symbol("y")), Err(Position(1, 1)));
    table.exit_scope();

    assert!(table.lookup("y").is_none());
    assert_eq!(table.depth(), 1);

    // The global scope is never popped
    table.exit_scope();
    assert!(table.lookup("x").is_some());
}

#[test]
fn test_valid_program_has_no_diagnostics() {
    assert_clean(
        "var i: Int = 0;
         while (i < 3) { i = i + 1; print(i); }
         fn factorial(n: Int) -> Int {
             if (n <= 1) { return 1; } else { return n * factorial(n - 1); }
         }
         print(factorial(5));",
    );
}

#[test]
fn test_redeclaration_in_same_scope() {
    let diagnostics = check("var x = 1;\nvar x = 2;");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert!(diagnostics[0].message.contains("`x` is already declared"));
    assert_eq!((diagnostics[0].line(), diagnostics[0].column()), (2, 1));
}

#[test]
fn test_shadowing_in_inner_scope_is_allowed() {
    assert_clean("var x = 1; { var x = 2; print(x); }");
}

#[test]
fn test_block_variables_do_not_leak() {
    let messages = messages("while (true) { var inner = 1; } print(inner);");
    assert_eq!(messages, vec!["variable `inner` used before declaration"]);
}

#[test]
fn test_sibling_blocks_may_reuse_names() {
    assert_clean(
        "var i = 0;
         while (i < 1) { var t = 1; i = i + 1; }
         while (i < 2) { var t = 2; i = i + 1; }
         if (true) { var t = 3; } else { var t = 4; }",
    );
}

#[test]
fn test_use_before_declaration() {
    assert_eq!(
        messages("print(y); var y = 1;"),
        vec!["variable `y` used before declaration"]
    );
    assert_eq!(
        messages("var z = z;"),
        vec!["variable `z` used before declaration"]
    );
}

#[test]
fn test_duplicate_function() {
    let messages = messages("fn f() { } fn f() { }");
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("function `f` is already declared"));
}

#[test]
fn test_calls_may_precede_declarations() {
    assert_clean("print(twice(2)); fn twice(n: Int) -> Int { return n * 2; }");
}

#[test]
fn test_arity_mismatch() {
    assert_eq!(
        messages("fn add(a: Int, b: Int) -> Int { return a + b; } print(add(1));"),
        vec!["function `add` expects 2 argument(s), found 1"]
    );
}

#[test]
fn test_argument_types_must_match_exactly() {
    assert_eq!(
        messages("fn half(x: Float) -> Float { return x / 2.0; } print(half(3));"),
        vec!["argument 1 of `half` expects Float, found Int"]
    );
}

#[test]
fn test_call_to_unknown_function() {
    assert_eq!(messages("nope(1);"), vec!["function `nope` is not declared"]);
}

#[test]
fn test_calling_a_variable() {
    let messages = messages("var x = 1; x();");
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("not a function"));
}

#[test]
fn test_binary_operands_must_match() {
    assert_eq!(
        messages("var a: Int = 1; var b: Float = 2.0; print(a + b);"),
        vec!["operands of `+` have mismatched types Int and Float"]
    );
}

#[test]
fn test_arithmetic_needs_numbers() {
    assert_eq!(
        messages("print(\"a\" * \"b\");"),
        vec!["operator `*` expects numeric operands, found String"]
    );
    assert_clean("print(true == false); print(!1);");
}

#[test]
fn test_loop_conditions() {
    assert_eq!(
        messages("while (\"yes\") { }"),
        vec!["condition of `while` must be Bool or Int, found String"]
    );
    assert_eq!(
        messages("for (var x = 0.5; x; x = x + 1.0) { }"),
        vec!["condition of `for` must be Bool or Int, found Float"]
    );
    assert_clean("var n = 3; while (n) { n = n - 1; }");
}

#[test]
fn test_for_loop_variable_is_scoped() {
    assert_eq!(
        messages("for (var i = 0; i < 3; i = i + 1) { print(i); } print(i);"),
        vec!["variable `i` used before declaration"]
    );
}

#[test]
fn test_array_literals() {
    assert_eq!(messages("var a = [];"), vec!["array literal cannot be empty"]);
    assert_eq!(
        messages("var a = [1, \"two\"];"),
        vec!["array elements must share one type, found Int and String"]
    );
    assert_eq!(
        messages("var a: [String] = [1, 2];"),
        vec!["array initializer of `a` has element type Int, declared String"]
    );
    assert_clean("var a: [Float] = [1.5, 2.5]; print(a);");
}

#[test]
fn test_declared_type_checks() {
    assert_eq!(
        messages("var s: String = 1;"),
        vec!["cannot initialize `s` of type String with a value of type Int"]
    );
    assert_clean("var f: Float = 1; var i: Int = 2.5;");
    assert_eq!(
        messages("var b: Bool = true; b = 3;"),
        vec!["cannot assign a value of type Int to `b` of type Bool"]
    );
    assert_eq!(
        messages("ghost = 1;"),
        vec!["assignment to undeclared variable `ghost`"]
    );
}

#[test]
fn test_return_checks() {
    assert_eq!(
        messages("fn f() -> Int { return; }"),
        vec!["function `f` must return a value of type Int"]
    );
    assert_eq!(
        messages("fn g() { return 1; }"),
        vec!["function `g` returns Void but a value of type Int is returned"]
    );
    assert_eq!(
        messages("fn h() -> Bool { return \"no\"; }"),
        vec!["function `h` returns Bool, found String"]
    );
}

#[test]
fn test_scalar_only_returns() {
    let messages = messages("fn name() -> String { return \"x\"; }");
    assert_eq!(
        messages,
        vec!["function `name` can only return Int, Float, Bool or Void, found String"]
    );
}

#[test]
fn test_top_level_return_is_a_warning() {
    let diagnostics = check("return 1;");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert!(!diagnostics[0].is_error());
}

#[test]
fn test_void_call_used_as_value() {
    assert_eq!(
        messages("fn hello() { print(1); } var x = hello();"),
        vec!["call to `hello` does not produce a value"]
    );
    assert_clean("fn hello() { print(1); } hello();");
}

#[test]
fn test_function_body_sees_parameters_and_globals() {
    assert_clean("var base = 10; fn add(n: Int) -> Int { return n + base; } print(add(1));");
    assert_eq!(
        messages("fn f(a: Int, a: Int) { }").len(),
        1
    );
}

#[test]
fn test_function_locals_do_not_leak() {
    assert_eq!(
        messages("fn f() { var local = 1; } print(local);"),
        vec!["variable `local` used before declaration"]
    );
}

#[test]
fn test_structs() {
    assert_clean("struct Point { x: Float, y: Float } fn origin(p: Point) { } var p: struct Point;");
    assert_eq!(messages("var p: Missing;"), vec!["unknown type `Missing`"]);
    assert_eq!(
        messages("struct A { x: Int } struct A { y: Int }"),
        vec!["struct `A` is already declared"]
    );
    assert_eq!(
        messages("struct B { x: Int, x: Float }"),
        vec!["field `x` is declared twice in struct `B`"]
    );
}

#[test]
fn test_unknown_types_do_not_cascade() {
    // One root cause, one diagnostic
    assert_eq!(
        messages("var y = missing + 1; print(y * 2); print(y + 1.5);"),
        vec!["variable `missing` used before declaration"]
    );
}

#[test]
fn test_check_is_idempotent() {
    let source = "var x = 1; var x = 2; print(y); fn f(a: Int) { } f();";
    let program = parse(tokenize(source).unwrap(), &Config::default()).unwrap();

    let mut type_checker = TypeChecker::new();
    let first = type_checker.check(&program);
    let second = type_checker.check(&program);

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_arithmetic_initializer_infers_float() {
    assert_eq!(
        messages("var x = 1 + 2; var y: Int = 1; print(x + y);"),
        vec!["operands of `+` have mismatched types Float and Int"]
    );
    assert_clean("var x = 1 + 2; var f: Float = 0.5; print(x * f);");
    assert_clean("var n = -3; var m: Float = 1.0; print(n < m);");
    assert_clean("var xs = [1 * 2, 4 / 2]; var ys: [Float] = xs;");
    assert_clean("var i = 4; var j: Int = 5; print(i + j);");
}
