use crate::Span;

use super::{
    expressions::{
        ArrayLiteralExpr, AssignmentExpr, BinaryExpr, BooleanExpr, CallExpr, NumberExpr,
        PrefixExpr, StringExpr, SymbolExpr,
    },
    statements::{
        BlockStmt, ExpressionStmt, FnDeclStmt, ForStmt, IfStmt, PrintStmt, ReturnStmt,
        StructDeclStmt, VarDeclStmt, WhileStmt,
    },
};

/// A parsed source file: its top-level statements in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FnDeclStmt> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::FnDecl(function) => Some(function),
            _ => None,
        })
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructDeclStmt> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::StructDecl(declaration) => Some(declaration),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExpressionStmt),
    Block(BlockStmt),
    VarDecl(VarDeclStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Print(PrintStmt),
    FnDecl(FnDeclStmt),
    StructDecl(StructDeclStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Block(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Print(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::StructDecl(stmt) => &stmt.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    String(StringExpr),
    Boolean(BooleanExpr),
    Symbol(SymbolExpr),
    Array(ArrayLiteralExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Call(CallExpr),
    Assignment(AssignmentExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Boolean(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Array(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
        }
    }

    /// Number of literal and identifier tokens this expression was built from.
    /// Callee and assignee names count as identifiers.
    pub fn leaf_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::String(_) | Expr::Boolean(_) | Expr::Symbol(_) => 1,
            Expr::Array(array) => array.elements.iter().map(Expr::leaf_count).sum(),
            Expr::Binary(binary) => binary.left.leaf_count() + binary.right.leaf_count(),
            Expr::Prefix(prefix) => prefix.right_expr.leaf_count(),
            Expr::Call(call) => 1 + call.arguments.iter().map(Expr::leaf_count).sum::<usize>(),
            Expr::Assignment(assignment) => 1 + assignment.value.leaf_count(),
        }
    }
}
