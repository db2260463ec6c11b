use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::{
    ast::{
        ast::{Program, Stmt},
        statements::FnDeclStmt,
    },
    config::Config,
    errors::errors::Error,
    Position,
};

use super::{
    environment::{Environment, EnvironmentLink},
    stmt::{exec_stmt, Flow},
    value::Value,
};

/// An active function call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrame {
    pub function: String,
    pub called_at: Position,
}

/// Tree-walking evaluator for a checked [`Program`].
///
/// Functions are looked up by name in a table filled before any top-level
/// statement runs, so calls may appear before the declaration they refer to.
/// Every `print` is captured in [`Interpreter::output`].
pub struct Interpreter<'ast> {
    pub globals: EnvironmentLink,
    pub functions: HashMap<&'ast str, &'ast FnDeclStmt>,
    pub call_stack: Vec<CallFrame>,
    pub output: Vec<String>,
    pub config: Config,
    /// Call frames that were active when the last runtime error was raised,
    /// innermost last.
    pub error_trace: Vec<CallFrame>,
}

impl<'ast> Interpreter<'ast> {
    pub fn new(config: Config) -> Self {
        Interpreter {
            globals: Environment::new_global(),
            functions: HashMap::new(),
            call_stack: vec![],
            output: vec![],
            config,
            error_trace: vec![],
        }
    }

    fn reset(&mut self) {
        self.globals = Environment::new_global();
        self.functions.clear();
        self.call_stack.clear();
        self.output.clear();
        self.error_trace.clear();
    }

    /// Runs a program from a clean global state.
    ///
    /// Output produced before a runtime error stays available. Evaluation
    /// recurses on the caller's stack; [`crate::run_source`] provides one
    /// sized for [`Config::max_call_depth`].
    pub fn execute(&mut self, program: &'ast Program) -> Result<(), Error> {
        self.reset();

        for function in program.functions() {
            // First declaration wins; duplicates are reported by the checker
            self.functions
                .entry(function.identifier.as_str())
                .or_insert(function);
        }
        debug!(functions = self.functions.len(), "registered functions");

        let globals = self.globals.clone();
        for stmt in &program.body {
            if matches!(stmt, Stmt::FnDecl(_) | Stmt::StructDecl(_)) {
                continue;
            }

            match exec_stmt(self, stmt, &globals) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Returned(_)) => {
                    warn!(position = %stmt.get_span().start, "return outside of a function is ignored");
                }
                Err(err) => {
                    let trace: Vec<String> = self
                        .error_trace
                        .iter()
                        .map(|frame| format!("{} (called at {})", frame.function, frame.called_at))
                        .collect();
                    error!(%err, trace = ?trace, "runtime error");
                    return Err(err);
                }
            }
        }

        debug!(lines = self.output.len(), "program finished");
        Ok(())
    }

    /// The current value of a global variable, if it is declared and initialized.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.borrow().get(name).ok()
    }

    pub fn call_stack(&self) -> &[CallFrame] {
        &self.call_stack
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub(crate) fn emit(&mut self, line: String) {
        if self.config.echo_output {
            println!("{}", line);
        }
        self.output.push(line);
    }
}
