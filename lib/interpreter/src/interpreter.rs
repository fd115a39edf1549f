use std::io::{self, Write};

use errors::Diagnostics;
use parser::{Expr, Parser};
use scanner::{Scanner, Token, TokenType};

mod value;
pub use value::Value;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be a numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    /// The operator whose operands had the wrong type.
    pub token: Token,
}

impl RuntimeError {
    fn new(error: RuntimeErrorType, token: &Token) -> Self {
        Self { error, token: token.clone() }
    }
}

/// Scans and parses `source`, reporting syntax errors to `diagnostics`.
pub fn parse(source: &str, diagnostics: &mut Diagnostics) -> Option<Expr> {
    let tokens = Scanner::new(source).scan_tokens(diagnostics);
    Parser::new(&tokens).parse(diagnostics)
}

/// Tree-walking evaluator. The language has no variables, so there is no state to carry
/// between evaluations.
#[derive(Debug, Default, Clone, Copy)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Runs one unit of input through the whole pipeline, writing the result to `output`.
    /// Evaluation is skipped if any syntax error was reported.
    pub fn run_source(
        &self,
        source: &str,
        output: &mut impl Write,
        diagnostics: &mut Diagnostics,
    ) -> io::Result<()> {
        let expr = parse(source, diagnostics);

        if diagnostics.had_error() {
            return Ok(());
        }

        match expr {
            Some(expr) => self.interpret(&expr, output, diagnostics),
            None => Ok(()),
        }
    }

    /// Evaluates `expr` and prints the result. A runtime error is reported to `diagnostics`
    /// instead of being returned; only I/O errors on `output` escape.
    pub fn interpret(
        &self,
        expr: &Expr,
        output: &mut impl Write,
        diagnostics: &mut Diagnostics,
    ) -> io::Result<()> {
        match self.evaluate(expr) {
            Ok(value) => {
                log::trace!("{expr} => {value:?}");
                writeln!(output, "{value}")
            }
            Err(RuntimeError { error, token }) => {
                diagnostics.runtime_error(token.line(), error);
                Ok(())
            }
        }
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        use Expr::*;
        use RuntimeErrorType::*;
        match expr {
            Literal(value) => Ok(value.into()),

            Grouping(expr) => self.evaluate(expr),

            Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match (operator.ty, right) {
                    (TokenType::Minus, Value::Number(n)) => Ok((-n).into()),
                    (TokenType::Minus, _) => Err(RuntimeError::new(OperandMustBeNumber, operator)),
                    (TokenType::Bang, v) => Ok((!v.is_truthy()).into()),
                    _ => Ok(Value::Nil),
                }
            }

            Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match (operator.ty, &left, &right) {
                    (TokenType::Minus, Value::Number(l), Value::Number(r)) => Ok((l - r).into()),
                    (TokenType::Slash, Value::Number(l), Value::Number(r)) => Ok((l / r).into()),
                    (TokenType::Star, Value::Number(l), Value::Number(r)) => Ok((l * r).into()),
                    (TokenType::Plus, Value::Number(l), Value::Number(r)) => Ok((l + r).into()),
                    (TokenType::Plus, Value::Str(l), Value::Str(r)) => Ok(format!("{l}{r}").into()),

                    (TokenType::Greater, Value::Number(l), Value::Number(r)) => Ok((l > r).into()),
                    (TokenType::GreaterEqual, Value::Number(l), Value::Number(r)) => {
                        Ok((l >= r).into())
                    }
                    (TokenType::Less, Value::Number(l), Value::Number(r)) => Ok((l < r).into()),
                    (TokenType::LessEqual, Value::Number(l), Value::Number(r)) => {
                        Ok((l <= r).into())
                    }

                    (TokenType::EqualEqual, _, _) => Ok(left.eq_in_lox(&right).into()),
                    (TokenType::BangEqual, _, _) => Ok((!left.eq_in_lox(&right)).into()),

                    (TokenType::Plus, _, _) => {
                        Err(RuntimeError::new(OperandsMustBeNumbersOrStrings, operator))
                    }
                    (
                        TokenType::Minus
                        | TokenType::Slash
                        | TokenType::Star
                        | TokenType::Greater
                        | TokenType::GreaterEqual
                        | TokenType::Less
                        | TokenType::LessEqual,
                        _,
                        _,
                    ) => Err(RuntimeError::new(OperandsMustBeNumbers, operator)),

                    _ => Ok(Value::Nil),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use errors::Line;
    use pretty_assertions::assert_eq;

    use super::*;

    #[ctor::ctor]
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn eval(source: &str) -> Result<Value, RuntimeError> {
        let mut diagnostics = Diagnostics::new();
        let expr = parse(source, &mut diagnostics);
        assert!(diagnostics.is_empty(), "unexpected syntax errors: {diagnostics}");
        Interpreter::new().evaluate(&expr.unwrap())
    }

    fn eval_ok(source: &str) -> Value {
        eval(source).unwrap_or_else(|e| panic!("{source:?} failed: {e}"))
    }

    fn run(source: &str) -> (String, Diagnostics) {
        let mut output = Vec::new();
        let mut diagnostics = Diagnostics::new();
        Interpreter::new().run_source(source, &mut output, &mut diagnostics).unwrap();
        (String::from_utf8(output).unwrap(), diagnostics)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval_ok("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(eval_ok("(1 + 2) * 3"), Value::Number(9.0));
        assert_eq!(eval_ok("7 - 10"), Value::Number(-3.0));
        assert_eq!(eval_ok("10 / 4"), Value::Number(2.5));
        assert_eq!(eval_ok("2 * 3"), Value::Number(6.0));
        assert_eq!(eval_ok("--4"), Value::Number(4.0));
        assert_eq!(eval_ok("1 / 0"), Value::Number(f64::INFINITY));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval_ok("\"foo\" + \"bar\""), Value::from("foobar"));
        assert_eq!(eval_ok("\"\" + \"\""), Value::from(""));
    }

    #[test]
    fn comparison() {
        assert_eq!(eval_ok("1 < 2"), Value::Bool(true));
        assert_eq!(eval_ok("2 <= 2"), Value::Bool(true));
        assert_eq!(eval_ok("1 > 2"), Value::Bool(false));
        assert_eq!(eval_ok("3 >= 2.5"), Value::Bool(true));
    }

    #[test]
    fn truthiness() {
        assert_eq!(eval_ok("!nil"), Value::Bool(true));
        assert_eq!(eval_ok("!false"), Value::Bool(true));
        assert_eq!(eval_ok("!0"), Value::Bool(false));
        assert_eq!(eval_ok("!\"\""), Value::Bool(false));
        assert_eq!(eval_ok("!!true"), Value::Bool(true));
    }

    #[test]
    fn equality() {
        assert_eq!(eval_ok("1 == \"1\""), Value::Bool(false));
        assert_eq!(eval_ok("nil == nil"), Value::Bool(true));
        assert_eq!(eval_ok("nil == false"), Value::Bool(false));
        assert_eq!(eval_ok("\"a\" == \"a\""), Value::Bool(true));
        assert_eq!(eval_ok("1 != 2"), Value::Bool(true));
        assert_eq!(eval_ok("true == !false"), Value::Bool(true));
    }

    #[test]
    fn unary_minus_needs_a_number() {
        let error = eval("-\"a\"").unwrap_err();
        assert_eq!(error.error, RuntimeErrorType::OperandMustBeNumber);
        assert_eq!(error.token, Token::new(TokenType::Minus, "-", None, Line(1)));
        assert_eq!(error.to_string(), "Operand must be a number.");

        let error = eval("1 +\n-nil").unwrap_err();
        assert_eq!(error.token.line(), Line(2));
    }

    #[test]
    fn binary_operand_types() {
        let error = eval("1 < \"a\"").unwrap_err();
        assert_eq!(error.error, RuntimeErrorType::OperandsMustBeNumbers);
        assert_eq!(error.token.lexeme(), "<");

        assert_eq!(eval("\"a\" * 2").unwrap_err().error, RuntimeErrorType::OperandsMustBeNumbers);
        assert_eq!(eval("true / 2").unwrap_err().error, RuntimeErrorType::OperandsMustBeNumbers);
        assert_eq!(
            eval("1 + nil").unwrap_err().error,
            RuntimeErrorType::OperandsMustBeNumbersOrStrings
        );
        assert_eq!(
            eval("\"a\" + 1").unwrap_err().error,
            RuntimeErrorType::OperandsMustBeNumbersOrStrings
        );
    }

    #[test]
    fn operands_are_evaluated_before_the_operator_is_checked() {
        let error = eval("\"a\" + -\"b\"").unwrap_err();
        assert_eq!(error.error, RuntimeErrorType::OperandMustBeNumber);
    }

    #[test]
    fn run_prints_result() {
        assert_eq!(run("(1 + 2) * 3"), ("9\n".to_string(), Diagnostics::new()));
        assert_eq!(run("\"a\" + \"b\"").0, "ab\n");
        assert_eq!(run("nil").0, "nil\n");
        assert_eq!(run("10 / 4").0, "2.5\n");
    }

    #[test]
    fn run_reports_runtime_error() {
        let (output, diagnostics) = run("\n-\"a\"");
        assert_eq!(output, "");
        assert!(diagnostics.had_runtime_error());
        assert!(!diagnostics.had_error());
        assert_eq!(diagnostics.to_string(), "Operand must be a number.\n[line 2]");
    }

    #[test]
    fn run_skips_evaluation_after_syntax_error() {
        let (output, diagnostics) = run("(1 + 2");
        assert_eq!(output, "");
        assert_eq!(diagnostics.to_string(), "[line 1] Error at end: Expect ')' after expression.");

        // Parses fine once the bad character is dropped, but still must not run.
        let (output, diagnostics) = run("1 @");
        assert_eq!(output, "");
        assert_eq!(diagnostics.to_string(), "[line 1] Error: Unexpected character.");
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let (output, diagnostics) = run(&format!("{}1", "-".repeat(200_000)));
        assert_eq!(output, "");
        assert_eq!(diagnostics.to_string(), "[line 1] Error at '-': Too much nesting.");

        let depth = parser::MAX_NESTING;
        let (output, diagnostics) = run(&format!("{}1{}", "(".repeat(depth), ")".repeat(depth)));
        assert_eq!(output, "1\n");
        assert!(diagnostics.is_empty());

        assert_eq!(run(&format!("{}1", "-".repeat(depth))).0, "1\n");
    }
}
