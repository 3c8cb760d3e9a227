//! Rewrite pipeline that turns user input into plain arithmetic.
//!
//! The steps run in a fixed order and each one assumes the previous ones
//! already ran:
//!
//! 1. strip whitespace and grouping separators
//! 2. display operators `×` and `÷` become `*` and `/`
//! 3. `π` becomes its numeric value
//! 4. `^` becomes `**`
//! 5. function calls are evaluated and replaced by their value
//! 6. `n!` on a literal digit run is replaced by its factorial
//!
//! Function calls are matched up to the first `)`, so a call cannot contain
//! another parenthesised group: `sin((30))` and `sin(sqrt(4))` both fail.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::error::EvalError;
use super::format::GROUP_SEPARATOR;
use super::parser::evaluate_arithmetic;

/// A scientific function recognised in expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Log,
    Ln,
}

impl Function {
    /// All functions, in the order they are resolved.
    pub const ALL: [Function; 6] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Sqrt,
        Function::Log,
        Function::Ln,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Sqrt => "sqrt",
            Function::Log => "log",
            Function::Ln => "ln",
        }
    }

    /// Apply the function. Trigonometric arguments are in degrees.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Function::Sin => degrees_to_radians(x).sin(),
            Function::Cos => degrees_to_radians(x).cos(),
            Function::Tan => degrees_to_radians(x).tan(),
            Function::Sqrt => x.sqrt(),
            Function::Log => x.log10(),
            Function::Ln => x.ln(),
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Function::Sin => &*SIN_CALL,
            Function::Cos => &*COS_CALL,
            Function::Tan => &*TAN_CALL,
            Function::Sqrt => &*SQRT_CALL,
            Function::Log => &*LOG_CALL,
            Function::Ln => &*LN_CALL,
        }
    }
}

lazy_static! {
    static ref SIN_CALL: Regex = Regex::new(r"sin\(([^)]+)\)").unwrap();
    static ref COS_CALL: Regex = Regex::new(r"cos\(([^)]+)\)").unwrap();
    static ref TAN_CALL: Regex = Regex::new(r"tan\(([^)]+)\)").unwrap();
    static ref SQRT_CALL: Regex = Regex::new(r"sqrt\(([^)]+)\)").unwrap();
    static ref LOG_CALL: Regex = Regex::new(r"log\(([^)]+)\)").unwrap();
    static ref LN_CALL: Regex = Regex::new(r"ln\(([^)]+)\)").unwrap();

    /// A literal digit run directly followed by `!`.
    static ref FACTORIAL: Regex = Regex::new(r"(\d+)!").unwrap();
}

/// Largest `n` whose factorial is still a finite `f64`.
const MAX_FACTORIAL: u32 = 170;

/// Run the whole pipeline, producing a string for the arithmetic parser.
pub fn rewrite(expr: &str) -> Result<String, EvalError> {
    let normalized = normalize(expr);
    let with_functions = resolve_functions(&normalized)?;
    resolve_factorials(&with_functions)
}

/// Steps 1 to 4: purely textual normalisation that cannot fail.
pub fn normalize(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());

    for c in expr.chars() {
        match c {
            c if c.is_whitespace() || c == GROUP_SEPARATOR => {}
            '×' => out.push('*'),
            '÷' => out.push('/'),
            'π' => out.push_str(&number_text(std::f64::consts::PI)),
            '^' => out.push_str("**"),
            other => out.push(other),
        }
    }

    out
}

/// Step 5: replace every function call by its value.
pub fn resolve_functions(expr: &str) -> Result<String, EvalError> {
    let mut current = expr.to_string();
    for function in Function::ALL {
        current = replace_all(function.pattern(), &current, |caps| {
            let argument = &caps[1];
            let value = evaluate_arithmetic(argument)
                .map(|x| function.apply(x))
                .map_err(|source| EvalError::FunctionArgument {
                    function: function.name(),
                    argument: argument.to_string(),
                    source: Box::new(source),
                })?;
            finite_text(value)
        })?;
    }
    Ok(current)
}

/// Step 6: replace every `n!` by `n` factorial.
pub fn resolve_factorials(expr: &str) -> Result<String, EvalError> {
    replace_all(&FACTORIAL, expr, |caps| {
        let n: u32 = caps[1].parse().map_err(|_| EvalError::NonFinite)?;
        if n > MAX_FACTORIAL {
            return Err(EvalError::NonFinite);
        }
        finite_text(factorial(n))
    })
}

/// Iterative product `2 * 3 * ... * n`.
pub fn factorial(n: u32) -> f64 {
    (2..=n).fold(1.0, |acc, i| acc * f64::from(i))
}

// Multiply before dividing; `f64::to_radians` rounds differently.
fn degrees_to_radians(x: f64) -> f64 {
    x * std::f64::consts::PI / 180.0
}

/// Like `Regex::replace_all`, but the replacement may fail.
fn replace_all(
    re: &Regex,
    haystack: &str,
    mut replacement: impl FnMut(&Captures<'_>) -> Result<String, EvalError>,
) -> Result<String, EvalError> {
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;

    for caps in re.captures_iter(haystack) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&haystack[last..whole.start()]);
        out.push_str(&replacement(&caps)?);
        last = whole.end();
    }

    out.push_str(&haystack[last..]);
    Ok(out)
}

fn finite_text(value: f64) -> Result<String, EvalError> {
    if value.is_finite() {
        Ok(number_text(value))
    } else {
        Err(EvalError::NonFinite)
    }
}

/// Shortest decimal text that parses back to exactly `value`.
fn number_text(value: f64) -> String {
    format!("{}", value)
}
