//! Pipeline configuration.
//!
//! A [`Config`] is handed to the parser and the interpreter for every run, so
//! several programs can be executed in one process with different settings.

/// What to do when the semantic checker reports errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckPolicy {
    /// Refuse to execute a program with error diagnostics.
    #[default]
    Strict,
    /// Report diagnostics and execute anyway.
    Lenient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub check_policy: CheckPolicy,
    /// Maximum number of active function calls.
    pub max_call_depth: usize,
    /// Maximum nesting of expressions and statements accepted by the parser.
    pub max_nesting_depth: usize,
    /// Also write printed lines to stdout, not only to the captured output.
    pub echo_output: bool,
    /// Stack size in bytes of the thread [`crate::run_source`] runs on. Must
    /// hold `max_call_depth` nested calls.
    pub stack_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            check_policy: CheckPolicy::Strict,
            max_call_depth: 1000,
            max_nesting_depth: 256,
            echo_output: false,
            stack_size: 64 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn lenient() -> Self {
        Config::default().with_check_policy(CheckPolicy::Lenient)
    }

    pub fn with_check_policy(mut self, check_policy: CheckPolicy) -> Self {
        self.check_policy = check_policy;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }

    pub fn with_echo_output(mut self, echo_output: bool) -> Self {
        self.echo_output = echo_output;
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }
}
