//! Recursive-descent evaluator for basic arithmetic.
//!
//! Grammar:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('+' | '-')* atom
//! atom   := number | '(' expr ')'
//! number := digits ['.' digits] | '.' digits
//! ```
//!
//! Parentheses may nest at most [`MAX_DEPTH`] levels.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Deepest parenthesis nesting the parser accepts.
pub const MAX_DEPTH: usize = 256;

/// Errors produced while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The input does not follow the grammar.
    Syntax(String),
    /// The divisor evaluated to zero.
    DivisionByZero,
    /// The result does not fit in a finite `f64`.
    Overflow,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(msg) => write!(f, "{}", msg),
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::Overflow => write!(f, "result is out of range"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<CharIndices<'_>> = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                let mut seen_dot = false;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        end = i + 1;
                    } else if d == '.' && !seen_dot {
                        seen_dot = true;
                        end = i + 1;
                    } else {
                        break;
                    }
                    chars.next();
                }
                let literal = &input[start..end];
                if literal == "." {
                    return Err(EvalError::Syntax(format!("bad number at offset {}", start)));
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| EvalError::Syntax(format!("bad number '{}'", literal)))?;
                tokens.push(Token::Number(value));
                continue;
            }
            other => {
                return Err(EvalError::Syntax(format!(
                    "unexpected character '{}' at offset {}",
                    other, start
                )));
            }
        };
        tokens.push(token);
        chars.next();
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.bump();
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.bump();
            let rhs = self.unary()?;
            value = if op == Token::Star {
                value * rhs
            } else {
                if rhs == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                value / rhs
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        let mut negate = false;
        while let Some(sign @ (Token::Plus | Token::Minus)) = self.peek() {
            self.bump();
            if sign == Token::Minus {
                negate = !negate;
            }
        }
        let value = self.atom()?;
        Ok(if negate { -value } else { value })
    }

    fn atom(&mut self) -> Result<f64, EvalError> {
        match self.bump() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                if self.depth >= MAX_DEPTH {
                    return Err(EvalError::Syntax(format!(
                        "parentheses nested deeper than {} levels",
                        MAX_DEPTH
                    )));
                }
                self.depth += 1;
                let value = self.expr()?;
                self.depth -= 1;
                match self.bump() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(EvalError::Syntax("expected ')'".to_string())),
                }
            }
            Some(other) => Err(EvalError::Syntax(format!("unexpected token {:?}", other))),
            None => Err(EvalError::Syntax("unexpected end of expression".to_string())),
        }
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some(token) = parser.peek() {
        return Err(EvalError::Syntax(format!("unexpected trailing token {:?}", token)));
    }
    if !value.is_finite() {
        return Err(EvalError::Overflow);
    }

    Ok(value)
}

/// Format a result the way a calculator would print it (`5`, not `5.0`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Avoid printing "-0".
        return "0".to_string();
    }
    format!("{}", value)
}
