//! Error types and error handling for the interpreter.
//!
//! This module defines the error types used throughout the pipeline.
//! It includes:
//!
//! - Fatal errors with source position information
//! - Specific error variants for the lexer, parser and interpreter
//! - Non-fatal diagnostics produced by the semantic checker
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
