//! Type checking and semantic analysis module.
//!
//! This module performs type checking and semantic analysis on the AST.
//! It never rewrites the tree and never aborts; it walks it while:
//!
//! - Verifying type correctness of expressions and statements
//! - Resolving variable, function and struct references
//! - Checking call arity and argument types
//! - Managing a stack of lexical scopes
//! - Detecting redeclarations and use of undeclared variables
//!
//! Every finding is collected as a diagnostic. Whether diagnostics block
//! execution is decided by the pipeline, not here.

pub mod expr;
pub mod symbol_table;
pub mod type_checker;

#[cfg(test)]
mod tests;
