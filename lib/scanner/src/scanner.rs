use errors::{Diagnostics, Line};

pub mod token;
pub use token::{Keyword, Literal, Token, TokenType};
use TokenType::*;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ScanError {
    #[error("Unexpected character.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
}

/// Single forward pass over the source. `start` marks the beginning of the lexeme being
/// scanned, `current` the next character to read.
pub struct Scanner {
    start: usize,
    current: usize,
    line: Line,
    source: Vec<char>,
    tokens: Vec<Token>,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self { start: 0, current: 0, line: Line(1), source: source.chars().collect(), tokens: Vec::new() }
    }

    /// Scans the whole source, reporting every lexical error to `diagnostics` and carrying on
    /// with the next character. The result always ends with a single `Eof` token.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            if let Err(error) = self.scan_token() {
                diagnostics.error(self.line, error);
            }
        }

        self.tokens.push(Token::eof(self.line));
        self.tokens
    }

    fn scan_token(&mut self) -> Result<(), ScanError> {
        match self.advance() {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),

            '!' => {
                let ty = if self.consume_if_matches('=') { BangEqual } else { Bang };
                self.add_token(ty)
            }
            '=' => {
                let ty = if self.consume_if_matches('=') { EqualEqual } else { Equal };
                self.add_token(ty)
            }
            '<' => {
                let ty = if self.consume_if_matches('=') { LessEqual } else { Less };
                self.add_token(ty)
            }
            '>' => {
                let ty = if self.consume_if_matches('=') { GreaterEqual } else { Greater };
                self.add_token(ty)
            }

            '/' => {
                if self.consume_if_matches('/') {
                    // Comment
                    self.consume_while(|c| c != '\n');
                } else {
                    self.add_token(Slash)
                }
            }

            ' ' | '\r' | '\t' => (),
            '\n' => self.line.0 += 1,

            '"' => return self.string(),
            d if d.is_ascii_digit() => self.number(),
            c if is_identifier_start(c) => self.identifier(),

            c => return Err(ScanError::UnexpectedCharacter(c)),
        }
        Ok(())
    }

    fn string(&mut self) -> Result<(), ScanError> {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line.0 += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return Err(ScanError::UnterminatedString);
        }

        // The closing quote.
        self.advance();

        let value = self.source[self.start + 1..self.current - 1].iter().collect();
        self.add_literal_token(Str, Literal::Str(value));
        Ok(())
    }

    fn number(&mut self) {
        self.consume_while(|c| c.is_ascii_digit());

        // A trailing '.' without digits after it is not part of the number.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.consume_while(|c| c.is_ascii_digit());
        }

        match self.lexeme().parse() {
            Ok(n) => self.add_literal_token(Number, Literal::Number(n)),
            Err(_) => unreachable!("a run of ascii digits is always a valid f64"),
        }
    }

    fn identifier(&mut self) {
        self.consume_while(|c| is_identifier_start(c) || c.is_ascii_digit());
        let ty = TokenType::keyword_or_identifier(&self.lexeme());
        self.add_token(ty);
    }
}

// Helpers
impl Scanner {
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    fn consume_if_matches(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, ty: TokenType) {
        self.push(Token::new(ty, self.lexeme(), None, self.line));
    }

    fn add_literal_token(&mut self, ty: TokenType, literal: Literal) {
        self.push(Token::new(ty, self.lexeme(), Some(literal), self.line));
    }

    fn push(&mut self, token: Token) {
        log::trace!("[line {}] {} {:?}", token.line, token.ty, token.lexeme);
        self.tokens.push(token);
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
