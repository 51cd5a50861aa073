//! Arithmetic expression evaluator for the `calculator` tool
//!
//! Grammar (usual precedence, left associative):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('-' | '+') factor | number | '(' expr ')'
//! ```
//!
//! Numbers may carry an exponent (`1e5`, `2.5E-3`). `x` and `×` are accepted
//! for multiplication, `÷` for division.

use thiserror::Error;

use crate::registry::{CapabilityDescriptor, Content, Failure, HandlerOutcome, ParameterSpec, ValidatedArgs};

/// Deepest parenthesis / unary nesting accepted
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("empty expression")]
    Empty,
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("expression nested too deeply")]
    TooDeep,
    #[error("result is not a finite number")]
    NotFinite,
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

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format_number(*n),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = start;
                let mut exponent = false;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || (d == '.' && !exponent) {
                        end = i + d.len_utf8();
                        chars.next();
                    } else if (d == 'e' || d == 'E') && !exponent {
                        exponent = true;
                        end = i + 1;
                        chars.next();
                        if let Some(&(j, sign @ ('+' | '-'))) = chars.peek() {
                            end = j + sign.len_utf8();
                            chars.next();
                        }
                    } else {
                        break;
                    }
                }
                let literal = &input[start..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(literal.to_string()))?;
                tokens.push(Token::Number(value));
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' | '−' => Token::Minus,
                    '*' | 'x' | '×' => Token::Star,
                    '/' | '÷' => Token::Slash,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    other => return Err(CalcError::UnexpectedChar(other)),
                };
                tokens.push(token);
                chars.next();
            }
        }
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

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.advance();
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.advance();
            let rhs = self.factor()?;
            value = if op == Token::Star {
                value * rhs
            } else if rhs == 0.0 {
                return Err(CalcError::DivisionByZero);
            } else {
                value / rhs
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        let value = match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Minus) => self.factor().map(|v| -v),
            Some(Token::Plus) => self.factor(),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(CalcError::UnexpectedToken(other.describe())),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(other) => Err(CalcError::UnexpectedToken(other.describe())),
            None => Err(CalcError::UnexpectedEnd),
        };
        self.depth -= 1;
        value
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(CalcError::UnexpectedToken(extra.describe()));
    }
    if !value.is_finite() {
        return Err(CalcError::NotFinite);
    }
    Ok(value)
}

/// Integral values print without a fractional part
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new("calculator", "Perform basic arithmetic operations").param(
        ParameterSpec::string(
            "expression",
            "Mathematical expression to evaluate (e.g., '2 + 2', '(1 + 2) * 3')",
        )
        .required(),
    )
}

pub fn handle(args: &ValidatedArgs) -> HandlerOutcome {
    match evaluate(args.str("expression")?) {
        Ok(value) => Ok(Content::text(format!("Result: {}", format_number(value)))),
        Err(CalcError::DivisionByZero) => Err(Failure::invalid_params("division by zero")),
        Err(e) => Err(Failure::invalid_params(format!(
            "Error evaluating expression: {}",
            e
        ))),
    }
}
