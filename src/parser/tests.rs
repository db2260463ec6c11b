//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable declarations
//! - Function and struct declarations
//! - Expressions, precedence and associativity
//! - Control flow statements
//! - Syntax errors

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::Number,
        types::TypeAnnotation,
    },
    config::Config,
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<Program, Error> {
    parse(tokenize(source).unwrap(), &Config::default())
}

fn parse_ok(source: &str) -> Program {
    parse_source(source).unwrap()
}

fn parse_err(source: &str) -> Error {
    parse_source(source).unwrap_err()
}

/// Returns the expression of a program made of a single expression statement.
fn single_expr(source: &str) -> Expr {
    let program = parse_ok(source);
    match program.body.into_iter().next() {
        Some(Stmt::Expression(stmt)) => stmt.expression,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

fn render(expr: &Expr) -> String {
    match expr {
        Expr::Number(number) => match number.value {
            Number::Int(value) => value.to_string(),
            Number::Float(value) => format!("{:?}", value),
        },
        Expr::String(string) => format!("{:?}", string.value),
        Expr::Boolean(boolean) => boolean.value.to_string(),
        Expr::Symbol(symbol) => symbol.value.clone(),
        Expr::Array(array) => {
            let elements: Vec<String> = array.elements.iter().map(render).collect();
            format!("[{}]", elements.join(", "))
        }
        Expr::Binary(binary) => format!(
            "({} {} {})",
            render(&binary.left),
            binary.operator.lexeme,
            render(&binary.right)
        ),
        Expr::Prefix(prefix) => format!("({}{})", prefix.operator.lexeme, render(&prefix.right_expr)),
        Expr::Call(call) => {
            let arguments: Vec<String> = call.arguments.iter().map(render).collect();
            format!("{}({})", call.callee, arguments.join(", "))
        }
        Expr::Assignment(assignment) => {
            format!("({} = {})", assignment.assignee, render(&assignment.value))
        }
    }
}

#[test]
fn test_parse_empty_program() {
    assert!(parse_ok("").body.is_empty());
    assert!(parse_ok("** only a comment").body.is_empty());
}

#[test]
fn test_parse_without_eof_token() {
    let mut tokens = tokenize("print(1);").unwrap();
    tokens.pop();

    let program = parse(tokens, &Config::default()).unwrap();
    assert_eq!(program.body.len(), 1);
}

#[test]
fn test_parse_variable_declaration() {
    let program = parse_ok("var x: Int = 42;");

    let Stmt::VarDecl(decl) = &program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.identifier, "x");
    assert_eq!(decl.explicit_type, Some(TypeAnnotation::Int));
    assert!(decl.assigned_value.is_some());
}

#[test]
fn test_parse_declaration_forms() {
    assert!(parse_source("var x;").is_ok());
    assert!(parse_source("var x: Float;").is_ok());
    assert!(parse_source("var x = 1.5;").is_ok());
}

#[test]
fn test_parse_type_annotations() {
    let program = parse_ok("var a: [Int]; var b: (Int, [Float]); var c: Point; var d: struct Point;");
    let types: Vec<TypeAnnotation> = program
        .body
        .iter()
        .map(|stmt| match stmt {
            Stmt::VarDecl(decl) => decl.explicit_type.clone().unwrap(),
            _ => panic!("expected declarations only"),
        })
        .collect();

    assert_eq!(types[0], TypeAnnotation::Array(Box::new(TypeAnnotation::Int)));
    assert_eq!(
        types[1],
        TypeAnnotation::Tuple(vec![
            TypeAnnotation::Int,
            TypeAnnotation::Array(Box::new(TypeAnnotation::Float))
        ])
    );
    assert_eq!(types[2], TypeAnnotation::Named(String::from("Point")));
    assert_eq!(types[3], TypeAnnotation::Named(String::from("Point")));
}

#[test]
fn test_parse_number_literals() {
    let Expr::Number(int) = single_expr("42;") else {
        panic!("expected a number");
    };
    assert_eq!(int.value, Number::Int(42));

    let Expr::Number(float) = single_expr("2.5;") else {
        panic!("expected a number");
    };
    assert_eq!(float.value, Number::Float(2.5));
}

#[test]
fn test_parse_integer_overflow() {
    let error = parse_err("var x = 99999999999999999999;");
    assert!(matches!(error.get_impl(), ErrorImpl::NumberParseError { .. }));
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(render(&single_expr("1 + 2 * 3;")), "(1 + (2 * 3))");
    assert_eq!(render(&single_expr("1 * 2 + 3;")), "((1 * 2) + 3)");
}

#[test]
fn test_same_precedence_is_left_associative() {
    assert_eq!(render(&single_expr("10 - 4 - 3;")), "((10 - 4) - 3)");
    assert_eq!(render(&single_expr("8 / 4 / 2;")), "((8 / 4) / 2)");
}

#[test]
fn test_precedence_ladder() {
    assert_eq!(
        render(&single_expr("a || b && c == d < e + f * g;")),
        "(a || (b && (c == (d < (e + (f * g))))))"
    );
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(render(&single_expr("(1 + 2) * 3;")), "((1 + 2) * 3)");
}

#[test]
fn test_unary_operators() {
    assert_eq!(render(&single_expr("-a * b;")), "((-a) * b)");
    assert_eq!(render(&single_expr("!a && b;")), "((!a) && b)");
    assert_eq!(render(&single_expr("- -1;")), "(-(-1))");
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(render(&single_expr("a = b = 3;")), "(a = (b = 3))");
    assert_eq!(render(&single_expr("a = b + 1;")), "(a = (b + 1))");
}

#[test]
fn test_assignment_requires_identifier() {
    let error = parse_err("a + b = 3;");
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidAssignmentTarget));

    let error = parse_err("1 = 2;");
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidAssignmentTarget));
}

#[test]
fn test_parse_calls() {
    assert_eq!(render(&single_expr("f();")), "f()");
    assert_eq!(render(&single_expr("f(1, g(2), x + 1);")), "f(1, g(2), (x + 1))");
    assert_eq!(render(&single_expr("-f(2);")), "(-f(2))");
}

#[test]
fn test_trailing_comma_in_arguments_is_an_error() {
    let error = parse_err("f(1, 2,);");
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedToken {
            expected: String::from("expression"),
            found: String::from(")"),
        }
    );
}

#[test]
fn test_trailing_comma_in_parameters_is_an_error() {
    let error = parse_err("fn f(a: Int,) { }");
    assert_eq!(error.get_error_name(), "SyntaxError");
}

#[test]
fn test_array_literals() {
    assert_eq!(render(&single_expr("[1, 2, 3];")), "[1, 2, 3]");
    assert_eq!(render(&single_expr("[];")), "[]");
    assert!(parse_source("[1, 2,];").is_err());
}

#[test]
fn test_parse_if_else_chain() {
    let program = parse_ok("if (x > 0) { print(1); } else if (x < 0) { print(2); } else { print(3); }");

    let Stmt::If(if_stmt) = &program.body[0] else {
        panic!("expected an if statement");
    };
    let else_body = if_stmt.else_body.as_ref().unwrap();
    assert!(matches!(else_body.body[0], Stmt::If(_)));
}

#[test]
fn test_parse_loops() {
    assert!(parse_source("while (i < 10) { i = i + 1; }").is_ok());
    assert!(parse_source("for (var i: Int = 0; i < 3; i = i + 1) { print(i); }").is_ok());
    assert!(parse_source("for (i = 0; i < 3; i = i + 1) { }").is_ok());
    assert!(parse_source("loop (true) { }").is_ok());
}

#[test]
fn test_conditions_need_parentheses() {
    let error = parse_err("while x < 10 { }");
    assert_eq!(error.get_position().col(), 7);
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_ok("fn add(a: Int, b: Int) -> Int { return a + b; }");

    let Stmt::FnDecl(function) = &program.body[0] else {
        panic!("expected a function");
    };
    assert_eq!(function.identifier, "add");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.return_type, Some(TypeAnnotation::Int));
    assert_eq!(function.body.body.len(), 1);
}

#[test]
fn test_functions_only_at_top_level() {
    let error = parse_err("fn outer() { fn inner() { } }");
    assert_eq!(error.get_error_name(), "SyntaxError");
    assert!(parse_source("{ fn f() { } }").is_err());
}

#[test]
fn test_parse_struct_declaration() {
    let program = parse_ok("struct Point { x: Float, y: Float }");

    let Stmt::StructDecl(declaration) = &program.body[0] else {
        panic!("expected a struct");
    };
    assert_eq!(declaration.name, "Point");
    assert_eq!(declaration.fields.len(), 2);
}

#[test]
fn test_missing_semicolon_reports_expected_and_found() {
    let error = parse_err("var x = 1\nprint(x);");
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedToken {
            expected: String::from("`;`"),
            found: String::from("print"),
        }
    );
    assert_eq!((error.get_position().line(), error.get_position().col()), (2, 1));
}

#[test]
fn test_unclosed_block() {
    let error = parse_err("if (x) { print(x);");
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedToken {
            expected: TokenKind::CloseCurly.describe(),
            found: String::from("EOF"),
        }
    );
}

#[test]
fn test_nesting_limit() {
    let config = Config::default().with_max_nesting_depth(16);
    let source = format!("var x = {}1{};", "(".repeat(40), ")".repeat(40));

    let error = parse(tokenize(&source).unwrap(), &config).unwrap_err();
    assert_eq!(error.get_error_name(), "RecursionLimit");

    let shallow = format!("var x = {}1{};", "(".repeat(4), ")".repeat(4));
    assert!(parse(tokenize(&shallow).unwrap(), &config).is_ok());
}

#[test]
fn test_flat_operator_chain_counts_toward_nesting_limit() {
    let long_chain = format!("print(1{});", " + 1".repeat(20_000));
    let error = parse(tokenize(&long_chain).unwrap(), &Config::default()).unwrap_err();
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::NestingTooDeep { limit: 256 }
    );

    // Depth is released once a chain is folded, so chains in sequence are fine
    let chain = format!("print(1{});\n", " * 2".repeat(100));
    let program = parse(tokenize(&chain.repeat(10)).unwrap(), &Config::default()).unwrap();
    assert_eq!(program.body.len(), 10);
}

#[test]
fn test_leaf_count_matches_leaf_tokens() {
    let sources = [
        "1 + 2 * 3;",
        "a = b = 3;",
        "f(x, -y, [1, 2], \"s\") || !true;",
        "(((a)));",
        "[];",
    ];

    for source in sources {
        let leaves = tokenize(source)
            .unwrap()
            .iter()
            .filter(|token| token.kind.is_leaf())
            .count();

        assert_eq!(single_expr(source).leaf_count(), leaves, "{}", source);
    }
}
