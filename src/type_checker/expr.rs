use crate::{
    ast::{
        ast::Expr,
        expressions::{ArrayLiteralExpr, AssignmentExpr, BinaryExpr, CallExpr, Number, PrefixExpr},
        types::Type,
    },
    lexer::tokens::TokenKind,
};

use super::{symbol_table::SymbolKind, type_checker::{is_assignable, TypeChecker}};

/// Checks an expression whose value is used, reporting calls that produce none.
pub fn check_value(type_checker: &mut TypeChecker, expr: &Expr) -> Type {
    let ty = check_expr(type_checker, expr);

    if ty == Type::Void {
        let what = match expr {
            Expr::Call(call) => format!("call to `{}`", call.callee),
            _ => String::from("expression"),
        };
        type_checker.error(format!("{} does not produce a value", what), expr.get_span().start);
        return Type::Unknown;
    }

    ty
}

/// The type an expression of static type `ty` has once evaluated.
///
/// Arithmetic on numbers always produces a `Float` value, so a variable that
/// takes its type from such an initializer holds a `Float`.
pub fn evaluated_type(expr: &Expr, ty: Type) -> Type {
    match (expr, ty) {
        (Expr::Binary(binary), ty) if ty.is_numeric() && is_arithmetic(binary.operator.kind) => {
            Type::Float
        }
        (Expr::Prefix(prefix), ty) if ty.is_numeric() && prefix.operator.kind == TokenKind::Dash => {
            Type::Float
        }
        (Expr::Array(array), Type::Array(element)) => match array.elements.first() {
            Some(first) => Type::Array(Box::new(evaluated_type(first, *element))),
            None => Type::Array(element),
        },
        (_, ty) => ty,
    }
}

fn is_arithmetic(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus | TokenKind::Dash | TokenKind::Star | TokenKind::Slash | TokenKind::Percent
    )
}

/// Resolves the static type of an expression, reporting every problem found.
///
/// Returns [`Type::Unknown`] when the type cannot be determined; callers never
/// report a mismatch against an unknown type.
pub fn check_expr(type_checker: &mut TypeChecker, expr: &Expr) -> Type {
    match expr {
        Expr::Number(number) => match number.value {
            Number::Int(_) => Type::Int,
            Number::Float(_) => Type::Float,
        },
        Expr::String(_) => Type::String,
        Expr::Boolean(_) => Type::Bool,
        Expr::Symbol(symbol) => {
            let found = type_checker
                .symbols
                .lookup(&symbol.value)
                .map(|found| (found.kind, found.ty.clone()));

            match found {
                Some((SymbolKind::Function, _)) => {
                    type_checker.error(
                        format!("function `{}` cannot be used as a value", symbol.value),
                        symbol.span.start,
                    );
                    Type::Unknown
                }
                Some((_, ty)) => ty,
                None => {
                    type_checker.error(
                        format!("variable `{}` used before declaration", symbol.value),
                        symbol.span.start,
                    );
                    Type::Unknown
                }
            }
        }
        Expr::Array(array) => check_array_literal(type_checker, array),
        Expr::Binary(binary) => check_binary(type_checker, binary),
        Expr::Prefix(prefix) => check_prefix(type_checker, prefix),
        Expr::Call(call) => check_call(type_checker, call),
        Expr::Assignment(assignment) => check_assignment(type_checker, assignment),
    }
}

fn check_array_literal(type_checker: &mut TypeChecker, array: &ArrayLiteralExpr) -> Type {
    let element_types: Vec<Type> = array
        .elements
        .iter()
        .map(|element| check_value(type_checker, element))
        .collect();

    let Some(first) = element_types.first().cloned() else {
        type_checker.error("array literal cannot be empty", array.span.start);
        return Type::Array(Box::new(Type::Unknown));
    };

    let mismatch = array
        .elements
        .iter()
        .zip(&element_types)
        .find(|(_, ty)| !first.compatible_with(ty));

    if let Some((element, ty)) = mismatch {
        type_checker.error(
            format!("array elements must share one type, found {} and {}", first, ty),
            element.get_span().start,
        );
    }

    Type::Array(Box::new(first))
}

fn check_binary(type_checker: &mut TypeChecker, binary: &BinaryExpr) -> Type {
    let left = check_value(type_checker, &binary.left);
    let right = check_value(type_checker, &binary.right);
    let operator = &binary.operator;
    let position = operator.span.start;

    let result = match operator.kind {
        kind if is_arithmetic(kind) => {
            if left.is_numeric() {
                left.clone()
            } else {
                Type::Unknown
            }
        }
        _ => Type::Bool,
    };

    if left.is_unknown() || right.is_unknown() {
        return result;
    }

    // No implicit Int/Float promotion at this level
    if left != right {
        type_checker.error(
            format!(
                "operands of `{}` have mismatched types {} and {}",
                operator.lexeme, left, right
            ),
            position,
        );
        return result;
    }

    let (accepted, expected) = match operator.kind {
        TokenKind::Equals | TokenKind::NotEquals | TokenKind::And | TokenKind::Or => {
            (left.is_numeric() || left == Type::Bool, "Bool or numeric")
        }
        _ => (left.is_numeric(), "numeric"),
    };

    if !accepted {
        type_checker.error(
            format!(
                "operator `{}` expects {} operands, found {}",
                operator.lexeme, expected, left
            ),
            position,
        );
    }

    result
}

fn check_prefix(type_checker: &mut TypeChecker, prefix: &PrefixExpr) -> Type {
    let operand = check_value(type_checker, &prefix.right_expr);
    let position = prefix.operator.span.start;

    match prefix.operator.kind {
        TokenKind::Not => {
            if !operand.is_unknown() && !operand.is_numeric() && operand != Type::Bool {
                type_checker.error(
                    format!("operator `!` expects a Bool or numeric operand, found {}", operand),
                    position,
                );
            }
            Type::Bool
        }
        _ => {
            if operand.is_unknown() {
                return Type::Unknown;
            }
            if !operand.is_numeric() {
                type_checker.error(
                    format!(
                        "operator `{}` expects a numeric operand, found {}",
                        prefix.operator.lexeme, operand
                    ),
                    position,
                );
                return Type::Unknown;
            }
            operand
        }
    }
}

fn check_call(type_checker: &mut TypeChecker, call: &CallExpr) -> Type {
    let arguments: Vec<Type> = call
        .arguments
        .iter()
        .map(|argument| check_value(type_checker, argument))
        .collect();

    let callee = type_checker
        .symbols
        .lookup(&call.callee)
        .map(|symbol| symbol.ty.clone());

    let (parameters, return_type) = match callee {
        Some(Type::Function(parameters, return_type)) => (parameters, *return_type),
        Some(Type::Unknown) => return Type::Unknown,
        Some(other) => {
            type_checker.error(
                format!("`{}` is a variable of type {}, not a function", call.callee, other),
                call.span.start,
            );
            return Type::Unknown;
        }
        None => {
            type_checker.error(
                format!("function `{}` is not declared", call.callee),
                call.span.start,
            );
            return Type::Unknown;
        }
    };

    if parameters.len() != arguments.len() {
        type_checker.error(
            format!(
                "function `{}` expects {} argument(s), found {}",
                call.callee,
                parameters.len(),
                arguments.len()
            ),
            call.span.start,
        );
        return return_type;
    }

    for (index, (expected, found)) in parameters.iter().zip(&arguments).enumerate() {
        if !expected.compatible_with(found) {
            type_checker.error(
                format!(
                    "argument {} of `{}` expects {}, found {}",
                    index + 1,
                    call.callee,
                    expected,
                    found
                ),
                call.arguments[index].get_span().start,
            );
        }
    }

    return_type
}

fn check_assignment(type_checker: &mut TypeChecker, assignment: &AssignmentExpr) -> Type {
    let value = check_value(type_checker, &assignment.value);

    let target = type_checker
        .symbols
        .lookup(&assignment.assignee)
        .map(|symbol| (symbol.kind, symbol.ty.clone()));

    match target {
        None => {
            type_checker.error(
                format!("assignment to undeclared variable `{}`", assignment.assignee),
                assignment.span.start,
            );
            Type::Unknown
        }
        Some((SymbolKind::Function, _)) => {
            type_checker.error(
                format!("cannot assign to function `{}`", assignment.assignee),
                assignment.span.start,
            );
            Type::Unknown
        }
        Some((_, target)) => {
            if !is_assignable(&target, &value) {
                type_checker.error(
                    format!(
                        "cannot assign a value of type {} to `{}` of type {}",
                        value, assignment.assignee, target
                    ),
                    assignment.value.get_span().start,
                );
            }
            target
        }
    }
}
