//! Arithmetic parsing for rewritten expressions.
//!
//! Accepts numbers, `+ - * / ** ( )` and nothing else. The grammar, from
//! loosest to tightest binding:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! `**` is right-associative and binds tighter than a leading sign, so
//! `-2**2` is `-4` while `2**-1` is `0.5`.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    ParenOpen,
    ParenClose,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Num(num) => write!(f, "number {num}"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Pow => write!(f, "'**'"),
            Token::ParenOpen => write!(f, "'('"),
            Token::ParenClose => write!(f, "')'"),
        }
    }
}

/// Split an expression into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => lex_number(input, &mut chars)?,
            '*' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '*').is_some() {
                    Token::Pow
                } else {
                    Token::Star
                }
            }
            '+' | '-' | '/' | '(' | ')' => {
                chars.next();
                match ch {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '/' => Token::Slash,
                    '(' => Token::ParenOpen,
                    _ => Token::ParenClose,
                }
            }
            found => return Err(EvalError::UnexpectedChar { found, offset }),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Lex `digits ['.' digits] [('e'|'E') ['+'|'-'] digits]`, also allowing a
/// leading or trailing decimal point.
fn lex_number(input: &str, chars: &mut Peekable<CharIndices<'_>>) -> Result<Token, EvalError> {
    let start = chars.peek().map_or(input.len(), |&(i, _)| i);
    let mut mantissa_digits = 0;

    while chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {
        mantissa_digits += 1;
    }
    if chars.next_if(|&(_, c)| c == '.').is_some() {
        while chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {
            mantissa_digits += 1;
        }
    }

    if chars.next_if(|&(_, c)| c == 'e' || c == 'E').is_some() {
        chars.next_if(|&(_, c)| c == '+' || c == '-');
        let mut exponent_digits = 0;
        while chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {
            exponent_digits += 1;
        }
        if exponent_digits == 0 {
            let end = chars.peek().map_or(input.len(), |&(i, _)| i);
            return Err(EvalError::InvalidNumber(input[start..end].to_string()));
        }
    }

    let end = chars.peek().map_or(input.len(), |&(i, _)| i);
    let text = &input[start..end];

    if mantissa_digits == 0 {
        return Err(EvalError::InvalidNumber(text.to_string()));
    }

    text.parse::<f64>()
        .map(Token::Num)
        .map_err(|_| EvalError::InvalidNumber(text.to_string()))
}

/// Parse and evaluate an arithmetic expression.
///
/// The returned value may be infinite or NaN; rejecting those is up to the
/// caller.
pub fn evaluate_arithmetic(input: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
    };
    let value = parser.parse_expr()?;

    if let Some(extra) = parser.tokens.next() {
        return Err(EvalError::UnexpectedToken(extra.to_string()));
    }

    Ok(value)
}

struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    fn parse_expr(&mut self) -> Result<f64, EvalError> {
        let mut lhs = self.parse_term()?;

        while let Some(Token::Plus | Token::Minus) = self.tokens.peek() {
            let is_plus = self.tokens.next() == Some(Token::Plus);
            let rhs = self.parse_term()?;
            lhs = if is_plus { lhs + rhs } else { lhs - rhs };
        }

        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<f64, EvalError> {
        let mut lhs = self.parse_unary()?;

        while let Some(Token::Star | Token::Slash) = self.tokens.peek() {
            let is_mult = self.tokens.next() == Some(Token::Star);
            let rhs = self.parse_unary()?;
            lhs = if is_mult { lhs * rhs } else { lhs / rhs };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<f64, EvalError> {
        match self.tokens.peek() {
            Some(Token::Minus) => {
                self.tokens.next();
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.tokens.next();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<f64, EvalError> {
        let base = self.parse_primary()?;

        if self.tokens.next_if_eq(&Token::Pow).is_some() {
            let exponent = self.parse_unary()?;
            return Ok(base.powf(exponent));
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<f64, EvalError> {
        match self.tokens.next() {
            Some(Token::Num(num)) => Ok(num),
            Some(Token::ParenOpen) => {
                let inner = self.parse_expr()?;
                match self.tokens.next() {
                    Some(Token::ParenClose) => Ok(inner),
                    Some(other) => Err(EvalError::UnexpectedToken(other.to_string())),
                    None => Err(EvalError::UnclosedParen),
                }
            }
            Some(other) => Err(EvalError::UnexpectedToken(other.to_string())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> f64 {
        evaluate_arithmetic(input).unwrap()
    }

    #[test]
    fn test_tokenize_operators() {
        let tokens = tokenize("(1+2)**3/4*5-6").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::ParenOpen,
                Token::Num(1.0),
                Token::Plus,
                Token::Num(2.0),
                Token::ParenClose,
                Token::Pow,
                Token::Num(3.0),
                Token::Slash,
                Token::Num(4.0),
                Token::Star,
                Token::Num(5.0),
                Token::Minus,
                Token::Num(6.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_number_forms() {
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Num(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Num(5.0)]);
        assert_eq!(tokenize("1.5e3").unwrap(), vec![Token::Num(1500.0)]);
        assert_eq!(tokenize("2E-2").unwrap(), vec![Token::Num(0.02)]);
        assert_eq!(
            tokenize("3.141592653589793").unwrap(),
            vec![Token::Num(std::f64::consts::PI)]
        );
    }

    #[test]
    fn test_tokenize_rejects_garbage() {
        assert!(matches!(
            tokenize("2+x"),
            Err(EvalError::UnexpectedChar { found: 'x', offset: 2 })
        ));
        assert!(matches!(tokenize("1e"), Err(EvalError::InvalidNumber(_))));
        assert!(matches!(tokenize("."), Err(EvalError::InvalidNumber(_))));
        assert!(tokenize("5!").is_err());
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), 14.0);
        assert_eq!(eval("(2+3)*4"), 20.0);
        assert_eq!(eval("10-4-3"), 3.0);
        assert_eq!(eval("64/4/2"), 8.0);
        assert_eq!(eval("2*3**2"), 18.0);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(eval("2**3**2"), 512.0);
        assert_eq!(eval("2**10"), 1024.0);
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(eval("-2**2"), -4.0);
        assert_eq!(eval("(-2)**2"), 4.0);
        assert_eq!(eval("2**-1"), 0.5);
        assert_eq!(eval("2*-3"), -6.0);
        assert_eq!(eval("+5"), 5.0);
        assert_eq!(eval("5--1"), 6.0);
    }

    #[test]
    fn test_division_by_zero_is_not_an_error_here() {
        assert!(eval("1/0").is_infinite());
        assert!(eval("0/0").is_nan());
    }

    #[test]
    fn test_malformed_expressions() {
        assert_eq!(evaluate_arithmetic(""), Err(EvalError::Empty));
        assert_eq!(evaluate_arithmetic("(1+2"), Err(EvalError::UnclosedParen));
        assert_eq!(evaluate_arithmetic("2+"), Err(EvalError::UnexpectedEnd));
        assert!(evaluate_arithmetic("1+2)").is_err());
        assert!(evaluate_arithmetic("()").is_err());
        assert!(evaluate_arithmetic("2(3)").is_err());
        assert!(evaluate_arithmetic("1.2.3").is_err());
        assert!(evaluate_arithmetic("*2").is_err());
    }
}
