//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Diagnostic, Error, ErrorImpl, ErrorKind, ErrorTip, Severity};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(1, 10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.kind(), ErrorKind::Lexical);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: "`;`".to_string(),
            found: "}".to_string(),
        },
        Position(3, 7),
    );

    assert_eq!(error.get_position().line(), 3);
    assert_eq!(error.get_position().col(), 7);
}

#[test]
fn test_syntax_error_carries_expected_and_found() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: "`)`".to_string(),
            found: ",".to_string(),
        },
        Position(1, 1),
    );

    assert_eq!(error.get_error_name(), "SyntaxError");
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.get_tip().to_string(), "Expected `)`, found `,`");
}

#[test]
fn test_runtime_error_kinds() {
    let runtime = [
        ErrorImpl::DivisionByZero,
        ErrorImpl::UndefinedVariable {
            variable: "x".to_string(),
        },
        ErrorImpl::UninitializedVariable {
            variable: "x".to_string(),
        },
        ErrorImpl::WrongArgumentCount {
            function: "f".to_string(),
            expected: 2,
            received: 1,
        },
        ErrorImpl::RecursionLimit { limit: 10 },
        ErrorImpl::IntegerOverflow {
            value: "1e300".to_string(),
        },
        ErrorImpl::UnsupportedOperator {
            operator: ".".to_string(),
        },
    ];

    for error in runtime {
        assert_eq!(error.kind(), ErrorKind::Runtime);
    }
}

#[test]
fn test_nesting_limit_is_reported_as_recursion_limit() {
    let error = Error::new(ErrorImpl::NestingTooDeep { limit: 8 }, Position(1, 1));
    assert_eq!(error.get_error_name(), "RecursionLimit");
    assert_eq!(error.kind(), ErrorKind::Syntax);
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_position() {
    let error = Error::new(ErrorImpl::DivisionByZero, Position(4, 12));
    assert_eq!(error.to_string(), "DivisionByZero at 4:12: division by zero");
}

#[test]
fn test_diagnostic_accessors() {
    let diagnostic = Diagnostic::error("variable 'x' already declared", Position(2, 5));
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.line(), 2);
    assert_eq!(diagnostic.column(), 5);
    assert!(diagnostic.is_error());

    let warning = Diagnostic::warning("return at top level", Position(1, 1));
    assert!(!warning.is_error());
    assert_eq!(warning.to_string(), "warning at 1:1: return at top level");
}
