use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// A pattern handler either produces a token, skips input (`Ok(None)`) or fails.
pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<Option<Token>, Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(source).expect("lexer patterns are valid regular expressions"),
        handler,
    }
}

lazy_static! {
    // Order matters: the first anchored match wins, so longer operators and
    // comments come before their single-character prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern(r"^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern(r"^[0-9]+(\.[0-9]+)?", number_handler),
        pattern(r"^\s+", skip_handler),
        pattern(r#"^"([^"\\]|\\.)*""#, string_handler),
        pattern(r#"^""#, unterminated_string_handler),
        pattern(r"^\*\*[^\n]*", skip_handler),
        pattern(r"(?s)^\*-.*?(?:-\*|\z)", skip_handler),
        pattern(r"^\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern(r"^\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern(r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern(r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern(r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern(r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern(r"^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern(r"^\|\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern(r"^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern(r"^\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(r"^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(r"^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern(r"^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
    ];
}

/// Scans source text one token at a time.
pub struct Lexer {
    source: String,
    pos: usize,
    line: u32,
    col: u32,
    finished: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            source: source.to_string(),
            pos: 0,
            line: 1,
            col: 1,
            finished: false,
        }
    }

    /// Moves the cursor `n` bytes forward, keeping line and column in step.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.pos = end;
    }

    pub fn position(&self) -> Position {
        Position(self.line, self.col)
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Returns the next token, or the `EOF` token once input is exhausted.
    ///
    /// Calling this again after `EOF` keeps returning `EOF`.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        while !self.at_eof() {
            let mut matched = false;

            for pattern in PATTERNS.iter() {
                if !pattern.regex.is_match(self.remainder()) {
                    continue;
                }

                matched = true;
                if let Some(token) = (pattern.handler)(self, &pattern.regex)? {
                    return Ok(token);
                }
                break;
            }

            if !matched {
                let token = self.at().map(String::from).unwrap_or_default();
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token },
                    self.position(),
                ));
            }
        }

        self.finished = true;
        Ok(MK_TOKEN!(
            TokenKind::EOF,
            String::from("EOF"),
            Span {
                start: self.position(),
                end: self.position()
            }
        ))
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

fn matched_len(lexer: &Lexer, regex: &Regex) -> usize {
    regex.find(lexer.remainder()).map(|m| m.end()).unwrap_or(0)
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<Option<Token>, Error> {
    let len = matched_len(lexer, regex);
    let matched = lexer.remainder()[..len].to_string();
    let start = lexer.position();
    lexer.advance_n(len);

    Ok(Some(MK_TOKEN!(
        TokenKind::Number,
        matched,
        Span {
            start,
            end: lexer.position()
        }
    )))
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<Option<Token>, Error> {
    let len = matched_len(lexer, regex);
    lexer.advance_n(len);
    Ok(None)
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<Option<Token>, Error> {
    let len = matched_len(lexer, regex);
    let raw = lexer.remainder()[1..len - 1].to_string();
    let start = lexer.position();
    lexer.advance_n(len);

    let mut result = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            _ => {
                result.push(ch); // Keep unknown escapes verbatim
                continue;
            }
        }
        chars.next();
    }

    Ok(Some(MK_TOKEN!(
        TokenKind::String,
        result,
        Span {
            start,
            end: lexer.position()
        }
    )))
}

fn unterminated_string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<Option<Token>, Error> {
    Err(Error::new(ErrorImpl::UnterminatedString, lexer.position()))
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<Option<Token>, Error> {
    let len = matched_len(lexer, regex);
    let value = lexer.remainder()[..len].to_string();
    let start = lexer.position();
    lexer.advance_n(len);

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    Ok(Some(MK_TOKEN!(
        kind,
        value,
        Span {
            start,
            end: lexer.position()
        }
    )))
}

/// Tokenizes a whole source string, ending with a single `EOF` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token()?;
        let is_eof = token.kind == TokenKind::EOF;
        tokens.push(token);

        if is_eof {
            return Ok(tokens);
        }
    }
}
