/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Program`, `Stmt` and `Expr` sum types
/// - expressions: Payloads of the expression variants
/// - statements: Payloads of the statement variants
/// - types: Type annotations as written and resolved types
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
