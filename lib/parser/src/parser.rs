mod expr;

use errors::{Diagnostics, Line};
pub use expr::{Expr, LiteralValue};
use scanner::{Token, TokenType};

use TokenType::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ParserError {
    pub error: ParserErrorType,
    pub token: Token,
}

impl ParserError {
    fn new(error: ParserErrorType, token: &Token) -> Self {
        Self { error, token: token.clone() }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ParserErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect ')' after expression.")]
    ExpectedRightParen,
    #[error("Too much nesting.")]
    TooMuchNesting,
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// Deepest the syntax tree may grow. Groupings, unary operators and each operator of a binary
/// chain count one level. Keeps parsing, evaluation and dropping of the tree off the end of the
/// stack.
pub const MAX_NESTING: usize = 256;

/// Recursive-descent parser over a borrowed token buffer.
///
/// Grammar, lowest precedence first:
///
/// ```text
/// expression -> equality
/// equality   -> comparison ( ( "!=" | "==" ) comparison )*
/// comparison -> term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term       -> factor ( ( "-" | "+" ) factor )*
/// factor     -> unary ( ( "/" | "*" ) unary )*
/// unary      -> ( "!" | "-" ) unary | primary
/// primary    -> NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    depth: usize,
    /// Stands in for `Eof` once `tokens` runs out, for buffers that lack one.
    end: Token,
}

impl<'a> Parser<'a> {
    /// `tokens` normally ends with the scanner's `Eof` token. Running off the end of a buffer
    /// without one behaves as if it were there.
    pub fn new(tokens: &'a [Token]) -> Self {
        let end_line = tokens.last().map_or(Line(1), Token::line);
        Self { tokens, current: 0, depth: 0, end: Token::eof(end_line) }
    }

    /// Parses a single expression. The first syntax error is reported to `diagnostics` and
    /// aborts the parse, in which case `None` is returned.
    pub fn parse(mut self, diagnostics: &mut Diagnostics) -> Option<Expr> {
        match self.expression() {
            Ok(expr) => {
                log::trace!("parsed {expr}");
                Some(expr)
            }
            Err(ParserError { error, token }) => {
                diagnostics.error_at(token.line(), token.location(), error);
                None
            }
        }
    }

    fn expression(&mut self) -> Result<Expr> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr> {
        self.binary(&[BangEqual, EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<Expr> {
        self.binary(&[Greater, GreaterEqual, Less, LessEqual], Self::term)
    }

    fn term(&mut self) -> Result<Expr> {
        self.binary(&[Minus, Plus], Self::factor)
    }

    fn factor(&mut self) -> Result<Expr> {
        self.binary(&[Slash, Star], Self::unary)
    }

    /// Left-associative chain of `operand`s joined by any of `operators`.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let depth = self.depth;
        let mut expr = operand(self)?;

        while let Some(operator) = self.consume_any(operators) {
            // The tree leans left, so every operator adds a level.
            self.enter(&operator)?;
            let right = operand(self)?;
            expr = Expr::binary(expr, operator, right);
        }

        self.depth = depth;
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if let Some(operator) = self.consume_any(&[Bang, Minus]) {
            self.enter(&operator)?;
            let right = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::unary(operator, right));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let token = self.peek();
        let expr = match token.ty {
            False => Expr::Literal(LiteralValue::Boolean(false)),
            True => Expr::Literal(LiteralValue::Boolean(true)),
            Nil => Expr::Literal(LiteralValue::Nil),
            Number | Str => match &token.literal {
                Some(literal) => Expr::Literal(literal.clone().into()),
                None => return Err(ParserError::new(ParserErrorType::ExpectedExpression, token)),
            },
            LeftParen => {
                let paren = self.advance().clone();
                self.enter(&paren)?;
                let expr = self.expression()?;
                self.depth -= 1;
                self.consume(RightParen, ParserErrorType::ExpectedRightParen)?;
                return Ok(Expr::grouping(expr));
            }
            _ => return Err(ParserError::new(ParserErrorType::ExpectedExpression, token)),
        };

        self.advance();
        Ok(expr)
    }

    /// Skips tokens until the start of what is probably the next statement.
    ///
    /// Only an expression is ever parsed, so a syntax error always ends the parse and nothing
    /// calls this yet. It is kept for when statements are added.
    #[allow(dead_code)]
    fn synchronize(&mut self) {
        let mut previous = self.advance().ty;

        while !self.is_at_end() {
            if previous == Semicolon {
                return;
            }

            if let Class | Fun | Var | For | If | While | Print | Return = self.peek().ty {
                return;
            }

            previous = self.advance().ty;
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.end)
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty == Eof
    }

    /// Returns the current token and moves past it. Never moves past `Eof`.
    fn advance(&mut self) -> &Token {
        let current = self.current;
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens.get(current).unwrap_or(&self.end)
    }

    fn check(&self, ty: TokenType) -> bool {
        !self.is_at_end() && self.peek().ty == ty
    }

    fn consume_any(&mut self, types: &[TokenType]) -> Option<Token> {
        types.iter().any(|ty| self.check(*ty)).then(|| self.advance().clone())
    }

    fn consume(&mut self, ty: TokenType, error: ParserErrorType) -> Result<()> {
        if self.check(ty) {
            self.advance();
            Ok(())
        } else {
            Err(ParserError::new(error, self.peek()))
        }
    }

    /// Goes one level deeper into the tree, failing at `token` past `MAX_NESTING`.
    fn enter(&mut self, token: &Token) -> Result<()> {
        if self.depth == MAX_NESTING {
            return Err(ParserError::new(ParserErrorType::TooMuchNesting, token));
        }
        self.depth += 1;
        Ok(())
    }
}
