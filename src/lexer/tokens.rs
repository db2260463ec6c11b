use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("fn", TokenKind::Fn);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("loop", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("forloop", TokenKind::For);
        map.insert("return", TokenKind::Return);
        map.insert("print", TokenKind::Print);
        map.insert("struct", TokenKind::Struct);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("Int", TokenKind::IntType);
        map.insert("Float", TokenKind::FloatType);
        map.insert("Bool", TokenKind::BoolType);
        map.insert("String", TokenKind::StringType);
        map.insert("Void", TokenKind::VoidType);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Semicolon,
    Colon,
    Comma,
    Arrow,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Var,
    Fn,
    Return,
    If,
    Else,
    While,
    For,
    Print,
    Struct,
    True,
    False,

    // Type keywords
    IntType,
    FloatType,
    BoolType,
    StringType,
    VoidType,
}

impl TokenKind {
    /// Literal and identifier tokens become leaves of the syntax tree.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::String
                | TokenKind::Identifier
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// How the parser names this kind when it was expected but not found.
    pub fn describe(&self) -> String {
        let text = match self {
            TokenKind::EOF => return String::from("end of input"),
            TokenKind::Number => return String::from("number"),
            TokenKind::String => return String::from("string"),
            TokenKind::Identifier => return String::from("identifier"),
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::Assignment => "=",
            TokenKind::Equals => "==",
            TokenKind::Not => "!",
            TokenKind::NotEquals => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEquals => ">=",
            TokenKind::Or => "||",
            TokenKind::And => "&&",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Arrow => "->",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",
            TokenKind::Percent => "%",
            TokenKind::Var => "var",
            TokenKind::Fn => "fn",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Print => "print",
            TokenKind::Struct => "struct",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::IntType => "Int",
            TokenKind::FloatType => "Float",
            TokenKind::BoolType => "Bool",
            TokenKind::StringType => "String",
            TokenKind::VoidType => "Void",
        };

        format!("`{}`", text)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn line(&self) -> u32 {
        self.span.start.line()
    }

    pub fn col(&self) -> u32 {
        self.span.start.col()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::String | TokenKind::Identifier | TokenKind::Number => {
                write!(f, "{} ({}) at {}", self.kind, self.lexeme, self.span.start)
            }
            _ => write!(f, "{} at {}", self.kind, self.span.start),
        }
    }
}
