//! Type annotation parsing.
//!
//! This module handles parsing of the types written after `:` and `->`.
//! It supports:
//!
//! - Primitive types (`Int`, `Float`, `Bool`, `String`, `Void`)
//! - Array types (`[T]`)
//! - Tuple types (`(T, U, ...)`)
//! - Struct types, either bare (`Point`) or as `struct Point`
//!
//! Like expressions, each annotation form is dispatched through a lookup
//! table keyed by its first token.

use std::collections::HashMap;

use crate::{ast::types::TypeAnnotation, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::parse_comma_separated, parser::Parser};

/// Type alias for type annotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeAnnotation, Error>;

/// Type alias for the type annotation lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::IntType, parse_primitive_type);
    parser.type_nud(TokenKind::FloatType, parse_primitive_type);
    parser.type_nud(TokenKind::BoolType, parse_primitive_type);
    parser.type_nud(TokenKind::StringType, parse_primitive_type);
    parser.type_nud(TokenKind::VoidType, parse_primitive_type);
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Struct, parse_struct_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::OpenParen, parse_tuple_type);
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token = parser.advance();
    Ok(match token.kind {
        TokenKind::IntType => TypeAnnotation::Int,
        TokenKind::FloatType => TypeAnnotation::Float,
        TokenKind::BoolType => TypeAnnotation::Bool,
        TokenKind::StringType => TypeAnnotation::String,
        _ => TypeAnnotation::Void,
    })
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(TypeAnnotation::Named(token.lexeme))
}

pub fn parse_struct_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    parser.expect(TokenKind::Struct)?;
    parse_symbol_type(parser)
}

pub fn parse_array_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let element = parse_type(parser)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(TypeAnnotation::Array(Box::new(element)))
}

pub fn parse_tuple_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let elements = parse_comma_separated(parser, TokenKind::CloseParen, parse_type)?;

    Ok(TypeAnnotation::Tuple(elements))
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token_kind = parser.current_token_kind();
    let nud_fn = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(nud_fn) => *nud_fn,
        None => return Err(parser.unexpected("type")),
    };

    parser.descend()?;
    let result = nud_fn(parser);
    parser.ascend();
    result
}
