//! Tree-walking execution of a parsed program.
//!
//! Values live in chained environments; each block, loop iteration and call
//! gets its own. A `return` unwinds through [`stmt::Flow`] rather than through
//! errors, and every runtime failure is an [`crate::errors::errors::Error`]
//! positioned at the expression that caused it.

pub mod environment;
pub mod expr;
pub mod interpreter;
pub mod stmt;
pub mod value;

#[cfg(test)]
mod tests;
