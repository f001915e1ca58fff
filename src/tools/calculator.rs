//! Calculator tool: arithmetic expression evaluation.
//!
//! Expressions are checked against a character whitelist before parsing and
//! evaluated by a small recursive-descent parser over a fixed grammar
//! (numbers, `+ - * / % ^`, parentheses, unary minus). No general-purpose
//! evaluation primitive is involved.

use super::{Tool, ToolContext, ToolExecution};
use crate::error::{Result, StegError};
use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

pub const NAME: &str = "calculator";

const DESCRIPTION: &str =
    "Evaluate an arithmetic expression (numbers, + - * / % ^ and parentheses) \
     and return the numeric result.";

/// Calculator tool.
pub struct CalculatorTool {
    whitelist: Regex,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            // Security control: anything outside this set is rejected
            // before the expression is parsed.
            whitelist: Regex::new(r"^[0-9+\-*/().%\s^]+$").expect("valid whitelist regex"),
        }
    }

    fn evaluate(&self, expression: &str) -> Result<f64> {
        if !self.whitelist.is_match(expression) {
            return Err(StegError::UnsafeExpression(
                "expression contains unsupported characters; allowed: digits, + - * / % ^ ( ) . and whitespace"
                    .to_string(),
            ));
        }

        let value = Parser::new(expression).parse()?;
        if !value.is_finite() {
            return Err(StegError::Evaluation(
                "expression did not evaluate to a finite number".to_string(),
            ));
        }
        Ok(value)
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn execute(&self, input: &str, _ctx: &ToolContext) -> ToolExecution {
        let expression = input.trim();
        if expression.is_empty() {
            return ToolExecution::fail(
                NAME,
                input,
                StegError::MissingInput("an arithmetic expression is required".to_string())
                    .to_string(),
            );
        }

        match self.evaluate(expression) {
            Ok(value) => {
                debug!("Evaluated '{}' to {}", expression, value);
                ToolExecution::ok(NAME, expression, format!("Result: {}", format_value(value)))
            }
            Err(e) => ToolExecution::fail(NAME, expression, e.to_string()),
        }
    }
}

/// Format a value without a trailing fractional part when it is integral.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Recursive-descent parser for arithmetic expressions.
///
/// Grammar:
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := factor (('*' | '/' | '%') factor)*
/// factor  := '-' factor | power
/// power   := primary ('^' factor)?        // right-associative
/// primary := number | '(' expr ')'
/// ```
struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn parse(mut self) -> Result<f64> {
        let value = self.expr()?;
        self.skip_whitespace();
        match self.chars.peek() {
            None => Ok(value),
            Some(c) => Err(StegError::Evaluation(format!(
                "unexpected character '{}' after expression",
                c
            ))),
        }
    }

    fn expr(&mut self) -> Result<f64> {
        let mut value = self.term()?;
        loop {
            match self.peek_operator() {
                Some('+') => {
                    self.chars.next();
                    value += self.term()?;
                }
                Some('-') => {
                    self.chars.next();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64> {
        let mut value = self.factor()?;
        loop {
            match self.peek_operator() {
                Some('*') => {
                    self.chars.next();
                    value *= self.factor()?;
                }
                Some('/') => {
                    self.chars.next();
                    value /= self.factor()?;
                }
                Some('%') => {
                    self.chars.next();
                    value %= self.factor()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64> {
        self.skip_whitespace();
        if self.chars.peek() == Some(&'-') {
            self.chars.next();
            return Ok(-self.factor()?);
        }
        self.power()
    }

    fn power(&mut self) -> Result<f64> {
        let base = self.primary()?;
        if self.peek_operator() == Some('^') {
            self.chars.next();
            let exponent = self.factor()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64> {
        self.skip_whitespace();
        match self.chars.peek() {
            Some('(') => {
                self.chars.next();
                let value = self.expr()?;
                self.skip_whitespace();
                if self.chars.next() != Some(')') {
                    return Err(StegError::Evaluation("missing closing parenthesis".to_string()));
                }
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || *c == '.' => self.number(),
            Some(c) => Err(StegError::Evaluation(format!("unexpected character '{}'", c))),
            None => Err(StegError::Evaluation("unexpected end of expression".to_string())),
        }
    }

    fn number(&mut self) -> Result<f64> {
        let mut literal = String::new();
        let mut seen_dot = false;
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                literal.push(c);
                self.chars.next();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                literal.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        literal
            .parse::<f64>()
            .map_err(|_| StegError::Evaluation(format!("invalid number literal '{}'", literal)))
    }

    fn peek_operator(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> ToolExecution {
        let tool = CalculatorTool::new();
        let ctx = ToolContext::new("task");
        tokio_test::block_on(tool.execute(input, &ctx))
    }

    #[test]
    fn test_basic_addition() {
        let record = run("2+2");
        assert!(record.success);
        assert_eq!(record.output, "Result: 4");
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(run("2+3*4").output, "Result: 14");
        assert_eq!(run("(2+3)*4").output, "Result: 20");
        assert_eq!(run("10%3").output, "Result: 1");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(run("2^10").output, "Result: 1024");
        assert_eq!(run("2^3^2").output, "Result: 512");
    }

    #[test]
    fn test_unary_minus_binds_at_factor_level() {
        assert_eq!(run("-3+5").output, "Result: 2");
        assert_eq!(run("-2^2").output, "Result: 4");
        assert_eq!(run("2*-3").output, "Result: -6");
    }

    #[test]
    fn test_fractional_output() {
        assert_eq!(run("3.5*2").output, "Result: 7");
        assert_eq!(run("7/2").output, "Result: 3.5");
    }

    #[test]
    fn test_empty_input_fails() {
        let record = run("   ");
        assert!(!record.success);
        assert!(record.error.unwrap().contains("expression is required"));
    }

    #[test]
    fn test_unsafe_characters_are_rejected_before_evaluation() {
        for input in ["2+2; ls", "import os", "1+a", "2+2\u{00e9}"] {
            let record = run(input);
            assert!(!record.success, "{} should be rejected", input);
            assert!(record.error.unwrap().contains("unsupported characters"));
            assert!(record.output.is_empty());
        }
    }

    #[test]
    fn test_division_by_zero_fails() {
        let record = run("1/0");
        assert!(!record.success);
        assert!(record.error.unwrap().contains("finite"));
    }

    #[test]
    fn test_malformed_expression_fails() {
        for input in ["(2+3", "2+", "2..5", "()"] {
            let record = run(input);
            assert!(!record.success, "{} should fail", input);
        }
    }
}
