#![allow(clippy::module_inception)]

use std::{fmt::Display, fs, panic, path::Path, thread};

use tracing::{debug, error, warn};

use crate::{
    ast::ast::Program,
    config::{CheckPolicy, Config},
    errors::errors::{Diagnostic, Error, ErrorImpl, ErrorTip},
    interpreter::interpreter::Interpreter,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::TypeChecker,
};

pub mod ast;
pub mod config;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A 1-based `(line, column)` location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position(pub u32, pub u32);

impl Position {
    pub fn null() -> Self {
        Position(0, 0)
    }

    pub fn line(&self) -> u32 {
        self.0
    }

    pub fn col(&self) -> u32 {
        self.1
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// The outcome of running one program through the whole pipeline.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Everything the semantic checker reported, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// One entry per executed `print`.
    pub output: Vec<String>,
    /// The fatal error that stopped the pipeline, if any.
    pub error: Option<Error>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_error())
    }
}

/// Tokenizes and parses source text into a program.
pub fn parse_source(source: &str, config: &Config) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized");

    let program = parse(tokens, config)?;
    debug!(statements = program.body.len(), "parsed");

    Ok(program)
}

/// Runs source text through tokenizer, parser, checker and interpreter.
///
/// Syntax errors stop the pipeline before checking. Semantic diagnostics stop
/// it before execution only under [`CheckPolicy::Strict`]. Output printed
/// before a runtime error is kept in the report.
///
/// The pipeline runs on its own thread with a stack of
/// [`Config::stack_size`] bytes, so the call and nesting limits are reached
/// before the native stack runs out, whatever the caller's stack.
pub fn run_source(source: &str, config: &Config) -> RunReport {
    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name(String::from("jam-pipeline"))
            .stack_size(config.stack_size)
            .spawn_scoped(scope, || run_pipeline(source, config));

        match worker {
            Ok(handle) => match handle.join() {
                Ok(report) => report,
                Err(payload) => panic::resume_unwind(payload),
            },
            Err(err) => {
                warn!(%err, "could not start the pipeline thread, running on the current one");
                run_pipeline(source, config)
            }
        }
    })
}

fn run_pipeline(source: &str, config: &Config) -> RunReport {
    let mut report = RunReport::default();

    let program = match parse_source(source, config) {
        Ok(program) => program,
        Err(err) => {
            error!(%err, "parsing failed");
            report.error = Some(err);
            return report;
        }
    };

    let mut type_checker = TypeChecker::new();
    report.diagnostics = type_checker.check(&program);
    debug!(diagnostics = report.diagnostics.len(), "checked");

    let error_count = report.error_diagnostics().count();
    if error_count > 0 && config.check_policy == CheckPolicy::Strict {
        let position = report
            .error_diagnostics()
            .next()
            .map(|diagnostic| diagnostic.position)
            .unwrap_or_default();

        report.error = Some(Error::new(
            ErrorImpl::SemanticErrors { count: error_count },
            position,
        ));
        return report;
    }

    let mut interpreter = Interpreter::new(config.clone());
    if let Err(err) = interpreter.execute(&program) {
        report.error = Some(err);
    }
    report.output = interpreter.take_output();

    report
}

/// Reads a script from disk and runs it with [`run_source`].
pub fn run_file(path: impl AsRef<Path>, config: &Config) -> std::io::Result<RunReport> {
    let source = fs::read_to_string(path)?;
    Ok(run_source(&source, config))
}

/// Renders a fatal error with the offending source line and a caret.
///
/// ```text
/// Error: SyntaxError (Expected `;`, found `}`)
/// -> script.jam
///    |
/// 20 | var a = 1
///    | ---------^
/// ```
pub fn render_error(error: &Error, source: &str, file_name: &str) -> String {
    let position = error.get_position();
    let mut rendered = String::new();

    if let ErrorTip::None = error.get_tip() {
        rendered.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        rendered.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    rendered.push_str(&format!("-> {}\n", file_name));

    let line_text = match (position.line() as usize).checked_sub(1) {
        Some(index) => source.lines().nth(index),
        None => None,
    };

    let Some(line_text) = line_text else {
        return rendered;
    };

    let line_string = position.line().to_string();
    let padding = line_string.len() + 2;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    rendered.push_str(&format!("{:>padding$}\n", "|"));
    rendered.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = (position.col() as usize).saturating_sub(removed_whitespace).max(1);
    rendered.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    rendered
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (&string[start..], start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_points_at_column() {
        let error = Error::new(ErrorImpl::DivisionByZero, Position(2, 11));
        let rendered = render_error(&error, "var a = 1;\n  print(a / 0);", "demo.jam");

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Error: DivisionByZero (The right-hand side evaluated to zero)");
        assert_eq!(lines[1], "-> demo.jam");
        assert_eq!(lines[3], "2 | print(a / 0);");
        assert_eq!(lines[4], "  | --------^");
    }

    #[test]
    fn test_render_error_without_source_line() {
        let error = Error::new(ErrorImpl::UnterminatedString, Position::null());
        let rendered = render_error(&error, "", "demo.jam");

        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position(3, 14).to_string(), "3:14");
    }
}
