use std::fmt::Display;

use errors::{Line, Location};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: Line,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, literal: Option<Literal>, line: Line) -> Self {
        Self { ty, lexeme: lexeme.into(), literal, line }
    }

    pub fn eof(line: Line) -> Self {
        Self::new(TokenType::Eof, "", None, line)
    }

    pub fn ty(&self) -> TokenType {
        self.ty
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// How an error at this token is pointed at in a report.
    pub fn location(&self) -> Location {
        match self.ty {
            TokenType::Eof => Location::End,
            _ => Location::Lexeme(self.lexeme.clone()),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

/// Typed payload of a NUMBER or STRING token. String literals are stored without their quotes.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    #[strum(serialize = "STRING")]
    Str,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

/// The reserved words. Matching is case-sensitive: `And` is an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    And,
    Class,
    Else,
    False,
    For,
    Fun,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,
}

impl From<Keyword> for TokenType {
    fn from(keyword: Keyword) -> Self {
        match keyword {
            Keyword::And => TokenType::And,
            Keyword::Class => TokenType::Class,
            Keyword::Else => TokenType::Else,
            Keyword::False => TokenType::False,
            Keyword::For => TokenType::For,
            Keyword::Fun => TokenType::Fun,
            Keyword::If => TokenType::If,
            Keyword::Nil => TokenType::Nil,
            Keyword::Or => TokenType::Or,
            Keyword::Print => TokenType::Print,
            Keyword::Return => TokenType::Return,
            Keyword::Super => TokenType::Super,
            Keyword::This => TokenType::This,
            Keyword::True => TokenType::True,
            Keyword::Var => TokenType::Var,
            Keyword::While => TokenType::While,
        }
    }
}

impl TokenType {
    /// Looks up an identifier-shaped lexeme in the keyword table.
    pub fn keyword_or_identifier(text: &str) -> Self {
        text.parse::<Keyword>().map_or(TokenType::Identifier, TokenType::from)
    }
}
