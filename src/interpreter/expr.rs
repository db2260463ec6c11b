use crate::{
    ast::{
        ast::Expr,
        expressions::{AssignmentExpr, BinaryExpr, CallExpr, Number, PrefixExpr},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    environment::{Environment, EnvironmentLink},
    interpreter::{CallFrame, Interpreter},
    stmt::{exec_block, Flow},
    value::Value,
};

/// Evaluates an expression whose value is needed.
pub fn eval(interpreter: &mut Interpreter, expr: &Expr, env: &EnvironmentLink) -> Result<Value, Error> {
    match expr {
        Expr::Number(number) => Ok(match number.value {
            Number::Int(value) => Value::Int(value),
            Number::Float(value) => Value::Float(value),
        }),
        Expr::String(string) => Ok(Value::String(string.value.clone())),
        Expr::Boolean(boolean) => Ok(Value::Bool(boolean.value)),
        Expr::Symbol(symbol) => env
            .borrow()
            .get(&symbol.value)
            .map_err(|err| Error::new(err, symbol.span.start)),
        Expr::Array(array) => {
            let mut elements = Vec::with_capacity(array.elements.len());
            for element in &array.elements {
                elements.push(eval(interpreter, element, env)?);
            }
            Ok(Value::Array(elements))
        }
        Expr::Binary(binary) => eval_binary(interpreter, binary, env),
        Expr::Prefix(prefix) => eval_prefix(interpreter, prefix, env),
        Expr::Call(call) => eval_call(interpreter, call, env)?.ok_or_else(|| {
            Error::new(
                ErrorImpl::VoidValue {
                    function: call.callee.clone(),
                },
                call.span.start,
            )
        }),
        Expr::Assignment(assignment) => eval_assignment(interpreter, assignment, env),
    }
}

fn eval_assignment(
    interpreter: &mut Interpreter,
    assignment: &AssignmentExpr,
    env: &EnvironmentLink,
) -> Result<Value, Error> {
    let value = eval(interpreter, &assignment.value, env)?;

    env.borrow_mut()
        .assign(&assignment.assignee, value)
        .map_err(|err| Error::new(err, assignment.span.start))
}

fn non_numeric(operator: &Token, found: &Value) -> Error {
    Error::new(
        ErrorImpl::NonNumericOperand {
            operator: operator.lexeme.clone(),
            found: found.type_name().to_string(),
        },
        operator.span.start,
    )
}

fn number_operand(operator: &Token, value: &Value) -> Result<f64, Error> {
    value.as_number().ok_or_else(|| non_numeric(operator, value))
}

/// Operands of `&&`, `||` and `!`: booleans, or numbers where non-zero is true.
fn logical_operand(operator: &Token, value: &Value) -> Result<bool, Error> {
    match value {
        Value::Bool(value) => Ok(*value),
        other => number_operand(operator, other).map(|number| number != 0.0),
    }
}

fn eval_binary(
    interpreter: &mut Interpreter,
    binary: &BinaryExpr,
    env: &EnvironmentLink,
) -> Result<Value, Error> {
    let operator = &binary.operator;

    if matches!(operator.kind, TokenKind::And | TokenKind::Or) {
        let left = eval(interpreter, &binary.left, env)?;
        let left = logical_operand(operator, &left)?;

        match (operator.kind, left) {
            (TokenKind::And, false) => return Ok(Value::Bool(false)),
            (TokenKind::Or, true) => return Ok(Value::Bool(true)),
            _ => {}
        }

        let right = eval(interpreter, &binary.right, env)?;
        return logical_operand(operator, &right).map(Value::Bool);
    }

    let left = eval(interpreter, &binary.left, env)?;
    let right = eval(interpreter, &binary.right, env)?;

    if let (Value::Bool(l), Value::Bool(r)) = (&left, &right) {
        match operator.kind {
            TokenKind::Equals => return Ok(Value::Bool(l == r)),
            TokenKind::NotEquals => return Ok(Value::Bool(l != r)),
            _ => {}
        }
    }

    // Both sides are promoted to Float
    let l = number_operand(operator, &left)?;
    let r = number_operand(operator, &right)?;
    let division_by_zero = || Error::new(ErrorImpl::DivisionByZero, operator.span.start);

    let value = match operator.kind {
        TokenKind::Plus => Value::Float(l + r),
        TokenKind::Dash => Value::Float(l - r),
        TokenKind::Star => Value::Float(l * r),
        TokenKind::Slash if r == 0.0 => return Err(division_by_zero()),
        TokenKind::Slash => Value::Float(l / r),
        TokenKind::Percent if r == 0.0 => return Err(division_by_zero()),
        TokenKind::Percent => Value::Float(l % r),
        TokenKind::Less => Value::Bool(l < r),
        TokenKind::LessEquals => Value::Bool(l <= r),
        TokenKind::Greater => Value::Bool(l > r),
        TokenKind::GreaterEquals => Value::Bool(l >= r),
        TokenKind::Equals => Value::Bool(l == r),
        TokenKind::NotEquals => Value::Bool(l != r),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnsupportedOperator {
                    operator: operator.lexeme.clone(),
                },
                operator.span.start,
            ))
        }
    };

    Ok(value)
}

fn eval_prefix(
    interpreter: &mut Interpreter,
    prefix: &PrefixExpr,
    env: &EnvironmentLink,
) -> Result<Value, Error> {
    let operand = eval(interpreter, &prefix.right_expr, env)?;
    let operator = &prefix.operator;

    match operator.kind {
        TokenKind::Not => logical_operand(operator, &operand).map(|value| Value::Bool(!value)),
        _ => number_operand(operator, &operand).map(|value| Value::Float(-value)),
    }
}

/// Calls a function by name and returns the value it produced, if any.
///
/// Arguments are evaluated left to right in the caller's environment. The body
/// runs in a fresh environment whose parent is the global one.
pub fn eval_call(
    interpreter: &mut Interpreter,
    call: &CallExpr,
    env: &EnvironmentLink,
) -> Result<Option<Value>, Error> {
    let position = call.span.start;

    let Some(function) = interpreter.functions.get(call.callee.as_str()).copied() else {
        return Err(Error::new(
            ErrorImpl::UndefinedFunction {
                function: call.callee.clone(),
            },
            position,
        ));
    };

    let mut arguments = Vec::with_capacity(call.arguments.len());
    for argument in &call.arguments {
        arguments.push(eval(interpreter, argument, env)?);
    }

    if arguments.len() != function.parameters.len() {
        return Err(Error::new(
            ErrorImpl::WrongArgumentCount {
                function: call.callee.clone(),
                expected: function.parameters.len(),
                received: arguments.len(),
            },
            position,
        ));
    }

    let limit = interpreter.config.max_call_depth;
    if interpreter.call_stack.len() >= limit {
        return Err(Error::new(ErrorImpl::RecursionLimit { limit }, position));
    }

    let frame_env = Environment::new_child(&interpreter.globals);
    for ((name, annotation), value) in function.parameters.iter().zip(arguments) {
        frame_env
            .borrow_mut()
            .declare(name, Some(Type::from(annotation)), Some(value))
            .map_err(|err| Error::new(err, position))?;
    }

    interpreter.call_stack.push(CallFrame {
        function: call.callee.clone(),
        called_at: position,
    });
    let flow = exec_block(interpreter, &function.body, &frame_env);
    if flow.is_err() && interpreter.error_trace.is_empty() {
        interpreter.error_trace = interpreter.call_stack.clone();
    }
    interpreter.call_stack.pop();

    let return_type = function
        .return_type
        .as_ref()
        .map(Type::from)
        .unwrap_or(Type::Void);

    match flow? {
        Flow::Returned(Some(value)) => {
            if !value.is_scalar() {
                return Err(Error::new(
                    ErrorImpl::NonScalarReturn {
                        function: call.callee.clone(),
                    },
                    position,
                ));
            }

            if return_type == Type::Void {
                return Ok(None);
            }

            value
                .coerce(&return_type)
                .map(Some)
                .map_err(|err| Error::new(err, position))
        }
        Flow::Returned(None) | Flow::Continue => Ok(None),
    }
}
