use crate::{
    ast::{
        ast::Expr,
        expressions::{
            ArrayLiteralExpr, AssignmentExpr, BinaryExpr, BooleanExpr, CallExpr, Number,
            NumberExpr, PrefixExpr, StringExpr, SymbolExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

/// Parses an expression whose operators all bind tighter than `bp`.
///
/// Each infix operator parses its right-hand side with its own binding power,
/// which keeps same-precedence chains left-associative.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    parser.descend()?;
    let result = parse_expr_inner(parser, bp);
    parser.ascend();
    result
}

fn parse_expr_inner(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud_fn = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud_fn) => *nud_fn,
        None => return Err(parser.unexpected("expression")),
    };

    let left = nud_fn(parser)?;

    // Every folded operator deepens the left spine of the tree
    let mut folded = 0;
    let result = parse_led_chain(parser, left, bp, &mut folded);
    for _ in 0..folded {
        parser.ascend();
    }

    result
}

fn parse_led_chain(
    parser: &mut Parser,
    mut left: Expr,
    bp: BindingPower,
    folded: &mut usize,
) -> Result<Expr, Error> {
    // While LED and current BP is greater than the threshold, continue parsing lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let led_fn = match parser.get_led_lookup().get(&token_kind) {
            Some(led_fn) => *led_fn,
            None => return Err(parser.unexpected("operator")),
        };

        *folded += 1;
        parser.descend()?;

        let operator_bp = parser.current_binding_power();
        left = led_fn(parser, left, operator_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Number => {
            let value = if token.lexeme.contains('.') {
                token.lexeme.parse().map(Number::Float).ok()
            } else {
                token.lexeme.parse().map(Number::Int).ok()
            };

            let Some(value) = value else {
                return Err(Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.lexeme,
                    },
                    token.span.start,
                ));
            };

            parser.advance();
            Ok(Expr::Number(NumberExpr {
                value,
                span: token.span,
            }))
        }
        TokenKind::Identifier => {
            parser.advance();
            Ok(Expr::Symbol(SymbolExpr {
                value: token.lexeme,
                span: token.span,
            }))
        }
        TokenKind::String => {
            parser.advance();
            Ok(Expr::String(StringExpr {
                value: token.lexeme,
                span: token.span,
            }))
        }
        TokenKind::True | TokenKind::False => {
            parser.advance();
            Ok(Expr::Boolean(BooleanExpr {
                value: token.kind == TokenKind::True,
                span: token.span,
            }))
        }
        _ => Err(parser.unexpected("expression")),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start,
            end: right.get_span().end,
        },
        left: Box::new(left),
        operator: operator_token,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: Span {
            start: operator_token.span.start,
            end: rhs.get_span().end,
        },
        operator: operator_token,
        right_expr: Box::new(rhs),
    }))
}

/// `=` is right-associative: the value is parsed below assignment power so a
/// following `=` nests to the right.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let start = left.get_span().start;
    let Expr::Symbol(assignee) = left else {
        return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, start));
    };

    parser.advance();
    let rhs = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Assignment(AssignmentExpr {
        span: Span {
            start: assignee.span.start,
            end: rhs.get_span().end,
        },
        assignee: assignee.value,
        value: Box::new(rhs),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses `item (, item)*` up to and including `close`.
///
/// A comma directly before `close` is a syntax error, since `item` cannot
/// start with the closing token.
pub fn parse_comma_separated<T>(
    parser: &mut Parser,
    close: TokenKind,
    mut item: impl FnMut(&mut Parser) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let mut items = vec![];

    if parser.current_token_kind() == close {
        parser.advance();
        return Ok(items);
    }

    loop {
        items.push(item(parser)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            parser.expect(close)?;
            return Ok(items);
        }
    }
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let Expr::Symbol(callee) = left else {
        return Err(parser.unexpected("function name before `(`"));
    };

    parser.advance();

    let arguments = parse_comma_separated(parser, TokenKind::CloseParen, |parser| {
        parse_expr(parser, BindingPower::Default)
    })?;

    Ok(Expr::Call(CallExpr {
        span: Span {
            start: callee.span.start,
            end: parser.previous_end(),
        },
        callee: callee.value,
        arguments,
    }))
}

pub fn parse_array_literal_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;

    let elements = parse_comma_separated(parser, TokenKind::CloseBracket, |parser| {
        parse_expr(parser, BindingPower::Default)
    })?;

    Ok(Expr::Array(ArrayLiteralExpr {
        elements,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}
