use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{BlockStmt, ForStmt, IfStmt, VarDeclStmt, WhileStmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    environment::{Environment, EnvironmentLink},
    expr::eval,
    interpreter::Interpreter,
    value::Value,
};

/// How control leaves a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue,
    Returned(Option<Value>),
}

pub fn exec_stmt(
    interpreter: &mut Interpreter,
    stmt: &Stmt,
    env: &EnvironmentLink,
) -> Result<Flow, Error> {
    match stmt {
        Stmt::Expression(stmt) => {
            eval_discarded(interpreter, &stmt.expression, env)?;
            Ok(Flow::Continue)
        }
        Stmt::Block(block) => exec_block(interpreter, block, &Environment::new_child(env)),
        Stmt::VarDecl(declaration) => {
            exec_var_decl(interpreter, declaration, env)?;
            Ok(Flow::Continue)
        }
        Stmt::If(stmt) => exec_if(interpreter, stmt, env),
        Stmt::While(stmt) => exec_while(interpreter, stmt, env),
        Stmt::For(stmt) => exec_for(interpreter, stmt, env),
        Stmt::Return(stmt) => {
            let value = match &stmt.value {
                Some(expr) => Some(eval(interpreter, expr, env)?),
                None => None,
            };
            Ok(Flow::Returned(value))
        }
        Stmt::Print(stmt) => {
            let value = eval(interpreter, &stmt.value, env)?;
            interpreter.emit(value.to_string());
            Ok(Flow::Continue)
        }
        // Functions are registered before execution starts; structs only exist for the checker
        Stmt::FnDecl(_) | Stmt::StructDecl(_) => Ok(Flow::Continue),
    }
}

/// Runs the statements of a block in `env`, which the caller has already created.
pub fn exec_block(
    interpreter: &mut Interpreter,
    block: &BlockStmt,
    env: &EnvironmentLink,
) -> Result<Flow, Error> {
    for stmt in &block.body {
        if let Flow::Returned(value) = exec_stmt(interpreter, stmt, env)? {
            return Ok(Flow::Returned(value));
        }
    }

    Ok(Flow::Continue)
}

/// Evaluates an expression statement. A call to a `Void` function is allowed here.
fn eval_discarded(
    interpreter: &mut Interpreter,
    expr: &Expr,
    env: &EnvironmentLink,
) -> Result<(), Error> {
    match expr {
        Expr::Call(call) => super::expr::eval_call(interpreter, call, env).map(|_| ()),
        expr => eval(interpreter, expr, env).map(|_| ()),
    }
}

fn exec_var_decl(
    interpreter: &mut Interpreter,
    declaration: &VarDeclStmt,
    env: &EnvironmentLink,
) -> Result<(), Error> {
    let declared = declaration.explicit_type.as_ref().map(Type::from);
    let value = match &declaration.assigned_value {
        Some(expr) => Some(eval(interpreter, expr, env)?),
        None => None,
    };

    env.borrow_mut()
        .declare(&declaration.identifier, declared, value)
        .map_err(|err| Error::new(err, declaration.span.start))
}

fn exec_if(interpreter: &mut Interpreter, stmt: &IfStmt, env: &EnvironmentLink) -> Result<Flow, Error> {
    if condition_holds(interpreter, &stmt.condition, env)? {
        exec_block(interpreter, &stmt.then_body, &Environment::new_child(env))
    } else if let Some(else_body) = &stmt.else_body {
        exec_block(interpreter, else_body, &Environment::new_child(env))
    } else {
        Ok(Flow::Continue)
    }
}

fn exec_while(
    interpreter: &mut Interpreter,
    stmt: &WhileStmt,
    env: &EnvironmentLink,
) -> Result<Flow, Error> {
    while condition_holds(interpreter, &stmt.condition, env)? {
        // Each iteration gets a fresh scope
        let flow = exec_block(interpreter, &stmt.body, &Environment::new_child(env))?;
        if let Flow::Returned(_) = flow {
            return Ok(flow);
        }
    }

    Ok(Flow::Continue)
}

fn exec_for(interpreter: &mut Interpreter, stmt: &ForStmt, env: &EnvironmentLink) -> Result<Flow, Error> {
    let header = Environment::new_child(env);
    exec_stmt(interpreter, &stmt.init, &header)?;

    while condition_holds(interpreter, &stmt.condition, &header)? {
        let flow = exec_block(interpreter, &stmt.body, &Environment::new_child(&header))?;
        if let Flow::Returned(_) = flow {
            return Ok(flow);
        }

        eval_discarded(interpreter, &stmt.increment, &header)?;
    }

    Ok(Flow::Continue)
}

fn condition_holds(
    interpreter: &mut Interpreter,
    condition: &Expr,
    env: &EnvironmentLink,
) -> Result<bool, Error> {
    let value = eval(interpreter, condition, env)?;
    truthy(&value).map_err(|err| Error::new(err, condition.get_span().start))
}

/// Booleans are themselves; numbers are true when non-zero.
pub fn truthy(value: &Value) -> Result<bool, ErrorImpl> {
    match value {
        Value::Bool(value) => Ok(*value),
        Value::Int(value) => Ok(*value != 0),
        Value::Float(value) => Ok(*value != 0.0),
        other => Err(ErrorImpl::InvalidCondition {
            found: other.type_name().to_string(),
        }),
    }
}
