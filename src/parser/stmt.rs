use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{
            BlockStmt, ExpressionStmt, FnDeclStmt, ForStmt, IfStmt, PrintStmt, ReturnStmt,
            StructDeclStmt, VarDeclStmt, WhileStmt,
        },
        types::TypeAnnotation,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_comma_separated, parse_expr},
        lookups::BindingPower,
    },
    Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.descend()?;
    let stmt_fn = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();

    let result = match stmt_fn {
        Some(stmt_fn) => stmt_fn(parser),
        None => parse_expression_stmt(parser),
    };
    parser.ascend();
    result
}

pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: Span {
            start: expr.get_span().start,
            end: parser.previous_end(),
        },
        expression: expr,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let variable_name = parser.expect(TokenKind::Identifier)?.lexeme;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let assigned_value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        span: Span {
            start,
            end: parser.previous_end(),
        },
        identifier: variable_name,
        assigned_value,
        explicit_type,
    }))
}

/// Parses `( expr )`, the condition of `if` and `while`.
fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let condition = parse_condition(parser)?;
    let then_body = parse_block(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();

        if parser.current_token_kind() == TokenKind::If {
            let else_if = parse_stmt(parser)?;
            Some(BlockStmt {
                span: *else_if.get_span(),
                body: vec![else_if],
            })
        } else {
            Some(parse_block(parser)?)
        }
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    parser.expect(TokenKind::OpenParen)?;

    // Both forms consume their own `;`
    let init = if parser.current_token_kind() == TokenKind::Var {
        parse_var_decl_stmt(parser)?
    } else {
        parse_expression_stmt(parser)?
    };

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;
    let increment = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Stmt::For(ForStmt {
        init: Box::new(init),
        condition,
        increment,
        body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    parser.enter_block();
    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected(TokenKind::CloseCurly.describe()));
        }
        statements.push(parse_stmt(parser)?);
    }
    parser.exit_block();

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body: statements,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

/// Parses `name: Type`, as used by parameters and struct fields.
fn parse_typed_name(parser: &mut Parser) -> Result<(String, TypeAnnotation), Error> {
    let name = parser.expect(TokenKind::Identifier)?.lexeme;
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;

    Ok((name, ty))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if !parser.at_top_level() {
        return Err(parser.unexpected("statement (functions are declared at top level only)"));
    }

    let start = parser.advance().span.start;

    let identifier = parser.expect(TokenKind::Identifier)?.lexeme;

    parser.expect(TokenKind::OpenParen)?;
    let parameters = parse_comma_separated(parser, TokenKind::CloseParen, parse_typed_name)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        span: Span {
            start,
            end: parser.previous_end(),
        },
        identifier,
        parameters,
        return_type,
        body,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    parser.expect(TokenKind::OpenParen)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Print(PrintStmt {
        value,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_struct_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if !parser.at_top_level() {
        return Err(parser.unexpected("statement (structs are declared at top level only)"));
    }

    let start = parser.advance().span.start;

    let identifier = parser.expect(TokenKind::Identifier)?.lexeme;

    parser.expect(TokenKind::OpenCurly)?;
    let fields = parse_comma_separated(parser, TokenKind::CloseCurly, parse_typed_name)?;

    Ok(Stmt::StructDecl(StructDeclStmt {
        name: identifier,
        fields,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}
