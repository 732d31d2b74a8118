use std::fmt::{self, Display, Formatter};

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rug::float::Constant;
use rug::ops::Pow;
use rug::Float;
use tracing::debug;

use crate::ast::{BinaryOp, BoolAst, BoolOp, MathAst, TrigOp};
use crate::classify::{classify, Mode};
use crate::error::Error;
use crate::format::render_decimal;
use crate::lexer::Lexer;
use crate::parser::{self, ParseResult};
use crate::settings::{Angle, Settings};
use crate::token::{format_prefix, Token};
use crate::util::{DEFAULT_DISPLAY_DIGITS, MAX_INTEGER_BITS};

/// Evaluate a single expression from `input`.
///
/// Returns `Ok(result)` if the evaluation is successful, or `Err(cause)` if
/// parsing or evaluating the expression failed.
///
/// # Example
///
/// ```
/// # use bigcalc::{eval, Output, Settings};
/// let settings = Settings::default();
///
/// assert_eq!(eval("45 - 2^3", &settings).unwrap().to_string(), "37");
/// assert_eq!(eval("1/8", &settings).unwrap().to_string(), "0.125");
/// assert_eq!(eval("T @ F", &settings), Ok(Output::Boolean(true)));
/// ```
pub fn eval(input: &str, settings: &Settings) -> Result<Output, Error> {
    Expr::parse(input).and_then(|expr| expr.eval(settings))
}

/// The value of an evaluated expression
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Exact result of an integer expression
    Integer(BigInt),
    /// Result of an expression needing decimals
    Decimal(Float),
    /// Result of a boolean expression
    Boolean(bool),
}

impl Output {
    /// Render the value the way `settings` asks for
    pub fn render(&self, settings: &Settings) -> String {
        format!("{:.*}", settings.display_digits, self)
    }
}

/// Integers print exactly, booleans as `True` or `False`. Decimals print in
/// fixed point, with the formatter precision as the number of digits after
/// the decimal point.
impl Display for Output {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(fmt, "{}", value),
            Self::Decimal(value) => {
                let digits = fmt.precision().unwrap_or(DEFAULT_DISPLAY_DIGITS);
                fmt.write_str(&render_decimal(value, digits))
            }
            Self::Boolean(true) => fmt.write_str("True"),
            Self::Boolean(false) => fmt.write_str("False"),
        }
    }
}

/// Ways out of integer evaluation
enum Escape {
    /// A real error, reported to the user
    Error(Error),
    /// The expression needs decimals after all
    Decimal,
}

impl From<Error> for Escape {
    fn from(error: Error) -> Self {
        Escape::Error(error)
    }
}

/// A parsed expression, ready to be evaluated.
///
/// # Examples
/// ```
/// # use bigcalc::{Expr, Mode, Settings};
/// let expr = Expr::parse("3 + 4 * 2").unwrap();
/// assert_eq!(expr.mode(), Mode::Math);
/// assert_eq!(expr.prefix(), "+ 3 * 4 2");
/// assert_eq!(expr.eval(&Settings::default()).unwrap().to_string(), "11");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    parsed: ParseResult,
}

impl Expr {
    /// Parse the given `expression` into an `Expr`. Whitespace is ignored
    /// and letters may be written in any case.
    ///
    /// # Examples
    /// ```
    /// # use bigcalc::Expr;
    /// // A valid expression
    /// assert!(Expr::parse("sin(pi / 2) * 2").is_ok());
    /// // an invalid expression
    /// assert!(Expr::parse("3 * (4 + 2").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, Error> {
        let expression: String = expression
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();
        if expression.is_empty() {
            return Err(Error::parse("Empty expression"));
        }

        let mode = match classify(&expression) {
            Some(mode) => mode,
            None => return Err(unclassified(&expression)),
        };
        debug!(%expression, ?mode, "classified expression");

        let tokens = Lexer::new(&expression, mode).tokenize()?;
        let parsed = parser::parse(tokens, mode)?;
        Ok(Self { parsed })
    }

    /// Get the language of the expression
    pub fn mode(&self) -> Mode {
        self.parsed.mode
    }

    /// Will the expression be evaluated with decimals?
    pub fn is_floating_point(&self) -> bool {
        self.parsed.is_floating_point
    }

    /// Get the expression in prefix notation, with spaces between items
    pub fn prefix(&self) -> String {
        format_prefix(&self.parsed.tokens)
    }

    /// Evaluate the expression with the given `settings`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bigcalc::{Angle, Expr, Settings};
    /// let expr = Expr::parse("cos(180)").unwrap();
    ///
    /// let mut settings = Settings::default();
    /// settings.angle = Angle::Degrees;
    /// assert_eq!(expr.eval(&settings).unwrap().to_string(), "-1");
    /// ```
    pub fn eval(&self, settings: &Settings) -> Result<Output, Error> {
        if !self.parsed.is_math() {
            let ast = BoolAst::from_tokens(&self.parsed.tokens);
            return Ok(Output::Boolean(Self::bool_eval(&ast)));
        }

        let ast = MathAst::from_tokens(&self.parsed.tokens, settings.precision_bits());
        if !self.parsed.is_floating_point && ast.is_exact() {
            debug!("evaluating with integers");
            match Self::integer_eval(&ast, settings) {
                Ok(value) => return Ok(Output::Integer(value)),
                Err(Escape::Error(error)) => return Err(error),
                Err(Escape::Decimal) => debug!("integer evaluation needs decimals, starting over"),
            }
        }
        debug!(precision = settings.precision_bits(), "evaluating with decimals");
        Self::decimal_eval(&ast, settings).map(Output::Decimal)
    }

    fn bool_eval(ast: &BoolAst) -> bool {
        match *ast {
            BoolAst::Value(value) => value,
            BoolAst::Not(ref arg) => !Self::bool_eval(arg),
            BoolAst::Binary(op, ref left, ref right) => {
                let left = Self::bool_eval(left);
                let right = Self::bool_eval(right);
                match op {
                    BoolOp::And => left && right,
                    BoolOp::Or => left || right,
                    BoolOp::Nand => !(left && right),
                    BoolOp::Xor => left != right,
                }
            }
        }
    }

    fn integer_eval(ast: &MathAst, settings: &Settings) -> Result<BigInt, Escape> {
        match *ast {
            MathAst::Value(ref literal) => literal.integer.clone().ok_or(Escape::Decimal),
            MathAst::Binary(op, ref left, ref right) => {
                let left = Self::integer_eval(left, settings)?;
                let right = Self::integer_eval(right, settings)?;
                match op {
                    BinaryOp::Add => Ok(left + right),
                    BinaryOp::Sub => Ok(left - right),
                    BinaryOp::Mul => Ok(left * right),
                    BinaryOp::Div => Err(Escape::Decimal),
                    BinaryOp::Pow => integer_pow(left, &right),
                }
            }
            MathAst::Negation(ref arg) => Ok(-Self::integer_eval(arg, settings)?),
            MathAst::Factorial(ref arg) => {
                let value = Self::integer_eval(arg, settings)?;
                Ok(integer_factorial(&value, settings)?)
            }
            MathAst::Trig(..) => Err(Escape::Decimal),
        }
    }

    fn decimal_eval(ast: &MathAst, settings: &Settings) -> Result<Float, Error> {
        let precision = settings.precision_bits();
        let value = match *ast {
            MathAst::Value(ref literal) => literal.decimal.clone(),
            MathAst::Binary(op, ref left, ref right) => {
                let left = Self::decimal_eval(left, settings)?;
                let right = Self::decimal_eval(right, settings)?;
                match op {
                    BinaryOp::Add => left + right,
                    BinaryOp::Sub => left - right,
                    BinaryOp::Mul => left * right,
                    BinaryOp::Div => {
                        if right.is_zero() {
                            return Err(Error::math("Divide by zero error"));
                        }
                        left / right
                    }
                    BinaryOp::Pow => {
                        if left.is_zero() && right < 0 {
                            return Err(Error::math("Divide by zero error"));
                        }
                        left.pow(right)
                    }
                }
            }
            MathAst::Negation(ref arg) => -Self::decimal_eval(arg, settings)?,
            MathAst::Factorial(ref arg) => {
                let value = Self::decimal_eval(arg, settings)?;
                decimal_factorial(&value, settings)?
            }
            MathAst::Trig(op, ref arg) => {
                let mut value = Self::decimal_eval(arg, settings)?;
                if settings.angle == Angle::Degrees {
                    value = value * Float::with_val(precision, Constant::Pi) / 180;
                }
                match op {
                    TrigOp::Sin => value.sin(),
                    TrigOp::Cos => value.cos(),
                    TrigOp::Tan => value.tan(),
                }
            }
        };
        finite(value)
    }
}

/// Explain why `expression` could not be classified. A boolean looking
/// expression is run through the boolean parser first, as its structural
/// errors say more than the missing operator.
fn unclassified(expression: &str) -> Error {
    let boolean_like = expression
        .chars()
        .all(|c| Token::from_bool_char(c).is_some());
    if boolean_like {
        let parsed = Lexer::new(expression, Mode::Boolean)
            .tokenize()
            .and_then(|tokens| parser::parse(tokens, Mode::Boolean));
        if let Err(error) = parsed {
            return error;
        }
    }
    Error::parse("No valid operators detected")
}

/// Exponentiation by squaring, walking the exponent bits from the lowest
fn integer_pow(base: BigInt, exponent: &BigInt) -> Result<BigInt, Escape> {
    if exponent.is_negative() {
        return Err(Escape::Decimal);
    }
    if exponent.is_zero() || base.is_one() {
        return Ok(BigInt::one());
    }
    if base.is_zero() {
        return Ok(base);
    }
    if base == BigInt::from(-1) {
        let odd = exponent.bit(0);
        return Ok(if odd { base } else { BigInt::one() });
    }

    let too_big = || Escape::Error(Error::math("The number grew too big"));
    let mut exponent = exponent.to_u64().ok_or_else(too_big)?;
    if grows_too_big(&base, exponent) {
        return Err(too_big());
    }

    let mut base = base;
    let mut result = BigInt::one();
    while exponent > 0 {
        if exponent & 1 == 1 {
            result *= &base;
        }
        exponent >>= 1;
        if exponent > 0 {
            base = &base * &base;
        }
    }
    Ok(result)
}

/// Would `base^exponent` need more than `MAX_INTEGER_BITS` bits? The size
/// comes from the logarithm of the base, exact for powers of two.
#[allow(clippy::cast_precision_loss)]
fn grows_too_big(base: &BigInt, exponent: u64) -> bool {
    let magnitude = base.magnitude();
    let shift = magnitude.bits().saturating_sub(64);
    let top = (magnitude >> shift).to_f64().unwrap_or(f64::MAX);
    let log2 = top.log2() + shift as f64;
    let bits = (exponent as f64 * log2).floor() + 1.0;
    bits > MAX_INTEGER_BITS as f64
}

fn integer_factorial(value: &BigInt, settings: &Settings) -> Result<BigInt, Error> {
    if value.is_negative() {
        return Err(Error::math("Factorial called on a negative value"));
    }
    let n = value
        .to_u64()
        .filter(|&n| n <= settings.factorial_limit())
        .ok_or_else(|| Error::math("Value is too large for factorial"))?;
    Ok((2..=n).fold(BigInt::one(), |product, k| product * k))
}

fn decimal_factorial(value: &Float, settings: &Settings) -> Result<Float, Error> {
    if !value.is_integer() {
        return Err(Error::math("Factorial called on a non-integer value"));
    }
    if *value < 0 {
        return Err(Error::math("Factorial called on a negative value"));
    }
    let n = value
        .to_u32_saturating()
        .filter(|&n| u64::from(n) <= settings.factorial_limit())
        .ok_or_else(|| Error::math("Value is too large for factorial"))?;
    Ok(Float::with_val(settings.precision_bits(), Float::factorial(n)))
}

fn finite(value: Float) -> Result<Float, Error> {
    if value.is_nan() {
        return Err(Error::math("Result is not a real number"));
    }
    let too_big = value
        .get_exp()
        .and_then(|exp| u64::try_from(exp).ok())
        .is_some_and(|bits| bits > MAX_INTEGER_BITS);
    if value.is_infinite() || too_big {
        return Err(Error::math("The number grew too big"));
    }
    Ok(value)
}
