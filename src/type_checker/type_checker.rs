use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        statements::{BlockStmt, FnDeclStmt, ForStmt, IfStmt, ReturnStmt, StructDeclStmt, VarDeclStmt, WhileStmt},
        types::{Type, TypeAnnotation},
    },
    errors::errors::Diagnostic,
    Position,
};

use super::{
    expr::{check_expr, check_value, evaluated_type},
    symbol_table::{Symbol, SymbolKind, SymbolTable},
};

/// The function whose body is being checked.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

/// Static checker over a parsed [`Program`].
///
/// Checking never fails: every problem becomes a [`Diagnostic`] and the walk
/// continues. All state is rebuilt by [`TypeChecker::check`], so one checker
/// can be reused across programs and re-running it gives the same result.
#[derive(Debug, Default)]
pub struct TypeChecker {
    pub symbols: SymbolTable,
    pub structs: HashMap<String, Type>,
    pub diagnostics: Vec<Diagnostic>,
    pub current_function: Option<FunctionContext>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker::default()
    }

    fn reset(&mut self) {
        self.symbols = SymbolTable::new();
        self.structs.clear();
        self.diagnostics.clear();
        self.current_function = None;
    }

    /// Checks a whole program and returns its diagnostics in discovery order.
    pub fn check(&mut self, program: &Program) -> Vec<Diagnostic> {
        self.reset();

        declare_structs(self, program);
        declare_functions(self, program);

        for stmt in &program.body {
            check_stmt(self, stmt);
        }

        debug!(
            diagnostics = self.diagnostics.len(),
            "semantic check finished"
        );
        self.diagnostics.clone()
    }

    pub fn error(&mut self, message: impl Into<String>, position: Position) {
        let diagnostic = Diagnostic::error(message, position);
        warn!(%diagnostic, "semantic error");
        self.diagnostics.push(diagnostic);
    }

    pub fn warning(&mut self, message: impl Into<String>, position: Position) {
        let diagnostic = Diagnostic::warning(message, position);
        warn!(%diagnostic, "semantic warning");
        self.diagnostics.push(diagnostic);
    }

    /// Resolves an annotation, reporting struct names that are not declared.
    pub fn resolve_type(&mut self, annotation: &TypeAnnotation, position: Position) -> Type {
        match self.try_resolve_type(annotation) {
            Ok(ty) => ty,
            Err(name) => {
                self.error(format!("unknown type `{}`", name), position);
                Type::Unknown
            }
        }
    }

    /// Resolves an annotation, returning the first unknown struct name on failure.
    pub fn try_resolve_type(&self, annotation: &TypeAnnotation) -> Result<Type, String> {
        Ok(match annotation {
            TypeAnnotation::Int => Type::Int,
            TypeAnnotation::Float => Type::Float,
            TypeAnnotation::Bool => Type::Bool,
            TypeAnnotation::String => Type::String,
            TypeAnnotation::Void => Type::Void,
            TypeAnnotation::Array(element) => Type::Array(Box::new(self.try_resolve_type(element)?)),
            TypeAnnotation::Tuple(elements) => Type::Tuple(
                elements
                    .iter()
                    .map(|element| self.try_resolve_type(element))
                    .collect::<Result<Vec<Type>, String>>()?,
            ),
            TypeAnnotation::Named(name) => match self.structs.get(name) {
                Some(ty) => ty.clone(),
                None => return Err(name.clone()),
            },
        })
    }

    pub fn declare(&mut self, name: &str, ty: Type, kind: SymbolKind, position: Position) {
        let symbol = Symbol {
            name: name.to_string(),
            ty,
            kind,
            declared_at: position,
        };

        if let Err(previous) = self.symbols.declare(symbol) {
            let what = match kind {
                SymbolKind::Function => "function",
                SymbolKind::Parameter => "parameter",
                SymbolKind::Variable => "variable",
            };
            self.error(
                format!("{} `{}` is already declared in this scope (first declared at {})", what, name, previous),
                position,
            );
        }
    }

    /// Runs `check` inside a fresh scope that is discarded afterwards.
    pub fn scoped(&mut self, check: impl FnOnce(&mut TypeChecker)) {
        self.symbols.enter_scope();
        check(self);
        self.symbols.exit_scope();
    }
}

/// Values may be stored where a type is expected when the types match or
/// both are numeric, since every store converts to the declared type.
pub fn is_assignable(expected: &Type, found: &Type) -> bool {
    expected.compatible_with(found) || (expected.is_numeric() && found.is_numeric())
}

/// Registers every struct before anything else so declarations may refer to
/// structs defined later in the file.
fn declare_structs(type_checker: &mut TypeChecker, program: &Program) {
    let declarations: Vec<&StructDeclStmt> = program.structs().collect();

    for declaration in &declarations {
        if type_checker.structs.contains_key(&declaration.name) {
            type_checker.error(
                format!("struct `{}` is already declared", declaration.name),
                declaration.span.start,
            );
            continue;
        }

        type_checker
            .structs
            .insert(declaration.name.clone(), Type::Struct(declaration.name.clone(), vec![]));
    }

    for declaration in &declarations {
        let mut fields: Vec<(String, Type)> = vec![];

        for (field, annotation) in &declaration.fields {
            if fields.iter().any(|(name, _)| name == field) {
                type_checker.error(
                    format!("field `{}` is declared twice in struct `{}`", field, declaration.name),
                    declaration.span.start,
                );
                continue;
            }

            let ty = type_checker.resolve_type(annotation, declaration.span.start);
            fields.push((field.clone(), ty));
        }

        type_checker
            .structs
            .insert(declaration.name.clone(), Type::Struct(declaration.name.clone(), fields));
    }
}

/// Declares every top-level function so calls may precede the declaration.
///
/// Unknown types are reported later, when the declaration itself is checked.
fn declare_functions(type_checker: &mut TypeChecker, program: &Program) {
    for function in program.functions() {
        let parameters = function
            .parameters
            .iter()
            .map(|(_, annotation)| type_checker.try_resolve_type(annotation).unwrap_or(Type::Unknown))
            .collect();

        let return_type = match &function.return_type {
            Some(annotation) => type_checker.try_resolve_type(annotation).unwrap_or(Type::Unknown),
            None => Type::Void,
        };

        type_checker.declare(
            &function.identifier,
            Type::Function(parameters, Box::new(return_type)),
            SymbolKind::Function,
            function.span.start,
        );
    }
}

pub fn check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) {
    match stmt {
        Stmt::Expression(stmt) => {
            check_expr(type_checker, &stmt.expression);
        }
        Stmt::Block(block) => check_block(type_checker, block),
        Stmt::VarDecl(decl) => check_var_decl(type_checker, decl),
        Stmt::If(if_stmt) => check_if(type_checker, if_stmt),
        Stmt::While(while_stmt) => check_while(type_checker, while_stmt),
        Stmt::For(for_stmt) => check_for(type_checker, for_stmt),
        Stmt::Return(return_stmt) => check_return(type_checker, return_stmt),
        Stmt::Print(print) => {
            check_value(type_checker, &print.value);
        }
        Stmt::FnDecl(function) => check_fn_decl(type_checker, function),
        // Registered up front
        Stmt::StructDecl(_) => {}
    }
}

pub fn check_block(type_checker: &mut TypeChecker, block: &BlockStmt) {
    type_checker.scoped(|type_checker| {
        for stmt in &block.body {
            check_stmt(type_checker, stmt);
        }
    });
}

fn check_var_decl(type_checker: &mut TypeChecker, decl: &VarDeclStmt) {
    let position = decl.span.start;

    let declared = decl
        .explicit_type
        .as_ref()
        .map(|annotation| type_checker.resolve_type(annotation, position));

    if declared == Some(Type::Void) {
        type_checker.error(format!("variable `{}` cannot have type Void", decl.identifier), position);
    }

    // The initializer is checked before the name exists, so `var x = x;` is a use
    // before declaration.
    let initializer = decl
        .assigned_value
        .as_ref()
        .map(|value| (value, check_value(type_checker, value)));

    if let (Some(declared), Some((value, found))) = (&declared, &initializer) {
        match (declared, value) {
            (Type::Array(expected), Expr::Array(_)) => {
                if let Type::Array(element) = found {
                    if !is_assignable(expected, element) {
                        type_checker.error(
                            format!(
                                "array initializer of `{}` has element type {}, declared {}",
                                decl.identifier, element, expected
                            ),
                            value.get_span().start,
                        );
                    }
                }
            }
            _ => {
                if !is_assignable(declared, found) {
                    type_checker.error(
                        format!(
                            "cannot initialize `{}` of type {} with a value of type {}",
                            decl.identifier, declared, found
                        ),
                        value.get_span().start,
                    );
                }
            }
        }
    }

    let ty = match (declared, initializer) {
        (Some(declared), _) => declared,
        (None, Some((value, found))) => evaluated_type(value, found),
        (None, None) => Type::Unknown,
    };

    type_checker.declare(&decl.identifier, ty, SymbolKind::Variable, position);
}

/// Reports a condition whose type is not one of `allowed`.
fn check_condition(type_checker: &mut TypeChecker, condition: &Expr, statement: &str, allowed: &[Type]) {
    let ty = check_value(type_checker, condition);

    if ty.is_unknown() || allowed.contains(&ty) {
        return;
    }

    let allowed: Vec<String> = allowed.iter().map(|ty| ty.to_string()).collect();
    type_checker.error(
        format!(
            "condition of `{}` must be {}, found {}",
            statement,
            allowed.join(" or "),
            ty
        ),
        condition.get_span().start,
    );
}

fn check_if(type_checker: &mut TypeChecker, if_stmt: &IfStmt) {
    check_condition(
        type_checker,
        &if_stmt.condition,
        "if",
        &[Type::Bool, Type::Int, Type::Float],
    );

    check_block(type_checker, &if_stmt.then_body);
    if let Some(else_body) = &if_stmt.else_body {
        check_block(type_checker, else_body);
    }
}

fn check_while(type_checker: &mut TypeChecker, while_stmt: &WhileStmt) {
    check_condition(type_checker, &while_stmt.condition, "while", &[Type::Bool, Type::Int]);
    check_block(type_checker, &while_stmt.body);
}

fn check_for(type_checker: &mut TypeChecker, for_stmt: &ForStmt) {
    type_checker.scoped(|type_checker| {
        check_stmt(type_checker, &for_stmt.init);
        check_condition(type_checker, &for_stmt.condition, "for", &[Type::Bool, Type::Int]);
        check_expr(type_checker, &for_stmt.increment);
        check_block(type_checker, &for_stmt.body);
    });
}

fn check_return(type_checker: &mut TypeChecker, return_stmt: &ReturnStmt) {
    let position = return_stmt.span.start;

    let found = return_stmt
        .value
        .as_ref()
        .map(|value| check_value(type_checker, value));

    let Some(function) = type_checker.current_function.clone() else {
        type_checker.warning("`return` outside of a function is ignored", position);
        return;
    };

    match (&function.return_type, found) {
        (Type::Void, Some(found)) => type_checker.error(
            format!(
                "function `{}` returns Void but a value of type {} is returned",
                function.name, found
            ),
            position,
        ),
        (Type::Void, None) | (Type::Unknown, None) => {}
        (expected, None) => type_checker.error(
            format!("function `{}` must return a value of type {}", function.name, expected),
            position,
        ),
        (expected, Some(found)) => {
            if !is_assignable(expected, &found) {
                type_checker.error(
                    format!(
                        "function `{}` returns {}, found {}",
                        function.name, expected, found
                    ),
                    position,
                );
            }
        }
    }
}

fn check_fn_decl(type_checker: &mut TypeChecker, function: &FnDeclStmt) {
    let position = function.span.start;

    let return_type = match &function.return_type {
        Some(annotation) => type_checker.resolve_type(annotation, position),
        None => Type::Void,
    };

    if !return_type.is_scalar() && !matches!(return_type, Type::Void | Type::Unknown) {
        type_checker.error(
            format!(
                "function `{}` can only return Int, Float, Bool or Void, found {}",
                function.identifier, return_type
            ),
            position,
        );
    }

    let parameters: Vec<(String, Type)> = function
        .parameters
        .iter()
        .map(|(name, annotation)| (name.clone(), type_checker.resolve_type(annotation, position)))
        .collect();

    let enclosing = type_checker.current_function.replace(FunctionContext {
        name: function.identifier.clone(),
        return_type,
    });

    type_checker.scoped(|type_checker| {
        for (name, ty) in parameters {
            if ty == Type::Void {
                type_checker.error(format!("parameter `{}` cannot have type Void", name), position);
            }
            type_checker.declare(&name, ty, SymbolKind::Parameter, position);
        }

        // The body shares the parameter scope
        for stmt in &function.body.body {
            check_stmt(type_checker, stmt);
        }
    });

    type_checker.current_function = enclosing;
}
