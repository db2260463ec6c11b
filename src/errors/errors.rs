use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A fatal error raised by the lexer, the parser or the interpreter.
///
/// Semantic problems are never represented by this type while checking; they
/// are collected as [`Diagnostic`]s instead. The only semantic `Error` is the
/// one produced when a strict pipeline refuses to execute a program.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        self.internal_error.kind()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnexpectedToken { .. } => "SyntaxError",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::NestingTooDeep { .. } => "RecursionLimit",
            ErrorImpl::SemanticErrors { .. } => "SemanticErrors",
            ErrorImpl::UndefinedVariable { .. } => "UndefinedVariable",
            ErrorImpl::UninitializedVariable { .. } => "UninitializedVariable",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::NonNumericOperand { .. } => "NonNumericOperand",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::WrongArgumentCount { .. } => "WrongArgumentCount",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::InvalidCondition { .. } => "InvalidCondition",
            ErrorImpl::NonScalarReturn { .. } => "NonScalarReturn",
            ErrorImpl::VoidValue { .. } => "VoidValue",
            ErrorImpl::RecursionLimit { .. } => "RecursionLimit",
            ErrorImpl::IntegerOverflow { .. } => "IntegerOverflow",
            ErrorImpl::UnsupportedOperator { .. } => "UnsupportedOperator",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("String literal is missing its closing `\"`"))
            }
            ErrorImpl::UnexpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "Expected {}, found `{}`",
                expected, found
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only a plain variable name can appear on the left of `=`",
            )),
            ErrorImpl::NestingTooDeep { limit } => ErrorTip::Suggestion(format!(
                "Expressions and blocks may nest at most {} levels deep",
                limit
            )),
            ErrorImpl::SemanticErrors { count } => ErrorTip::Suggestion(format!(
                "{} semantic error(s) reported, run with --lenient to execute anyway",
                count
            )),
            ErrorImpl::UndefinedVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` is not defined", variable))
            }
            ErrorImpl::UninitializedVariable { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is read before it was assigned a value",
                variable
            )),
            ErrorImpl::UndefinedFunction { function } => {
                ErrorTip::Suggestion(format!("Function `{}` is not defined", function))
            }
            ErrorImpl::NonNumericOperand { operator, found } => ErrorTip::Suggestion(format!(
                "Operator `{}` needs numeric operands, found `{}`",
                operator, found
            )),
            ErrorImpl::DivisionByZero => {
                ErrorTip::Suggestion(String::from("The right-hand side evaluated to zero"))
            }
            ErrorImpl::WrongArgumentCount {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected a value of type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::InvalidCondition { found } => ErrorTip::Suggestion(format!(
                "Conditions must be Bool or numeric, found `{}`",
                found
            )),
            ErrorImpl::NonScalarReturn { function } => ErrorTip::Suggestion(format!(
                "Function `{}` can only return Int, Float or Bool values",
                function
            )),
            ErrorImpl::VoidValue { function } => ErrorTip::Suggestion(format!(
                "Function `{}` finished without returning a value",
                function
            )),
            ErrorImpl::RecursionLimit { limit } => ErrorTip::Suggestion(format!(
                "Call depth exceeded {} frames, is the recursion unbounded?",
                limit
            )),
            ErrorImpl::IntegerOverflow { value } => ErrorTip::Suggestion(format!(
                "`{}` does not fit in an Int, declare the variable as Float",
                value
            )),
            ErrorImpl::UnsupportedOperator { operator } => {
                ErrorTip::Suggestion(format!("Operator `{}` cannot be evaluated here", operator))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.get_error_name(), self.position, self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// The pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
    Runtime,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken { expected: String, found: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("left-hand side of assignment must be an identifier")]
    InvalidAssignmentTarget,
    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("{count} semantic error(s) prevent execution")]
    SemanticErrors { count: usize },
    #[error("undefined variable {variable:?}")]
    UndefinedVariable { variable: String },
    #[error("variable {variable:?} used before being initialized")]
    UninitializedVariable { variable: String },
    #[error("undefined function {function:?}")]
    UndefinedFunction { function: String },
    #[error("operator {operator:?} requires numeric operands, found {found}")]
    NonNumericOperand { operator: String, found: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("function {function:?} expects {expected} arguments, received {received}")]
    WrongArgumentCount {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("type mismatch: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("condition must be Bool or numeric, found {found}")]
    InvalidCondition { found: String },
    #[error("function {function:?} must return a scalar value")]
    NonScalarReturn { function: String },
    #[error("function {function:?} did not return a value")]
    VoidValue { function: String },
    #[error("call depth exceeded {limit} frames")]
    RecursionLimit { limit: usize },
    #[error("{value} is out of range for Int")]
    IntegerOverflow { value: String },
    #[error("unsupported operator {operator:?}")]
    UnsupportedOperator { operator: String },
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::UnrecognisedToken { .. } | ErrorImpl::UnterminatedString => {
                ErrorKind::Lexical
            }
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::InvalidAssignmentTarget
            | ErrorImpl::NestingTooDeep { .. } => ErrorKind::Syntax,
            ErrorImpl::SemanticErrors { .. } => ErrorKind::Semantic,
            _ => ErrorKind::Runtime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A non-fatal finding of the semantic checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub position: Position,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, position: Position) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            position,
        }
    }

    pub fn warning(message: impl Into<String>, position: Position) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            position,
        }
    }

    pub fn line(&self) -> u32 {
        self.position.line()
    }

    pub fn column(&self) -> u32 {
        self.position.col()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.severity, self.position, self.message)
    }
}
