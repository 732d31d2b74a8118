#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! bigcalc, a crate for exact evaluation of arithmetic and boolean
//! expressions.
//!
//! This crate evaluates single-line expressions embedded in strings, with
//! arbitrary-precision integers and decimals. The easiest way to use it is
//! with the [`eval`](fn.eval.html) function:
//!
//! ```
//! use bigcalc::Settings;
//! let settings = Settings::default();
//!
//! assert_eq!(bigcalc::eval("3 + 4 * 2", &settings).unwrap().to_string(), "11");
//! assert_eq!(bigcalc::eval("2^-3", &settings).unwrap().to_string(), "0.125");
//! assert_eq!(bigcalc::eval("T & F", &settings).unwrap().to_string(), "False");
//! ```
//!
//! The second argument to `eval` is a [`Settings`](struct.Settings.html)
//! value, holding the decimal precision, the number of digits to display and
//! the angle unit of trigonometric functions:
//!
//! ```
//! use bigcalc::{Angle, Settings};
//!
//! let settings = Settings { angle: Angle::Degrees, ..Settings::default() };
//! assert_eq!(bigcalc::eval("sin(30) * 2", &settings).unwrap().to_string(), "1");
//! ```
//!
//! It is also possible to separate the parsing from the evaluation of an
//! expression with the [`Expr`](struct.Expr.html) type.
//!
//! ```
//! use bigcalc::{Expr, Output, Settings};
//!
//! let expr = Expr::parse("20!").unwrap();
//! assert_eq!(expr.prefix(), "! 20");
//! let result = expr.eval(&Settings::default()).unwrap();
//! assert_eq!(result.to_string(), "2432902008176640000");
//! assert!(matches!(result, Output::Integer(_)));
//! ```
//!
//! # Language definition
//!
//! An expression is either arithmetic or boolean, never both. Letters are
//! case insensitive and whitespace is ignored.
//!
//! Arithmetic expressions can contain:
//!
//! - integer and decimal literals: `42`, `1.5`, `.5`, `5.`;
//! - the constants `PI` and `E`;
//! - left and right parenthesis;
//! - `+` for addition, `-` for subtraction and negation, `*` for
//!   multiplication, `/` for division, `^` for exponentiation and a postfix
//!   `!` for factorial;
//! - the functions `SIN`, `COS` and `TAN`, always called with parentheses.
//!
//! A product can be left implicit: `2PI`, `2(3 + 1)` and `(1)(2)` are all
//! products. Operators of the same precedence associate to the left,
//! `2^3^2` is `(2^3)^2`. Negation binds looser than exponentiation, so
//! `-2^2` is `-4`.
//!
//! Boolean expressions contain the literals `T` and `F`, parenthesis, and the
//! operators `&` (and), `|` (or), `@` (nand), `$` (xor) and a prefix `!`
//! (not).
//!
//! # Technical details
//!
//! bigcalc rewrites the infix expression into prefix order with a
//! Shunting-Yard algorithm running from the end of the expression to its
//! start, and checks each pair of adjacent tokens on the way. The prefix
//! sequence is then turned into an AST and interpreted. Expressions without
//! division, decimals, constants, trigonometry or negative exponents are
//! computed with exact integers, the others with MPFR floats of the
//! configured precision.

#[macro_use]
extern crate lazy_static;

mod ast;
mod check;
mod classify;
mod error;
mod expr;
mod format;
mod lexer;
mod parser;
mod settings;
mod token;
mod util;

pub use classify::{classify, Mode};
pub use error::Error;
pub use expr::{eval, Expr, Output};
pub use settings::{Angle, Settings};
pub use token::{format_prefix, Token};

#[cfg(test)]
pub mod test_utils {
    /// Route `tracing` output to the test harness, filtered by `RUST_LOG`
    pub fn init_test_logging() {
        use tracing_subscriber::{fmt, EnvFilter};

        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::init_test_logging;
    use super::*;
    use num_bigint::BigInt;
    use test_case::test_case;

    /// Small xorshift generator, so the generated expressions are the same
    /// on every run
    struct Rng(u64);

    impl Rng {
        fn next_u64(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn below(&mut self, bound: u64) -> u64 {
            self.next_u64() % bound
        }
    }

    /// Build a random integer expression together with its value, computed
    /// on the tree with the usual precedence rules.
    fn expression(rng: &mut Rng, depth: u32) -> (String, BigInt) {
        let (mut text, mut value) = term(rng, depth);
        for _ in 0..rng.below(3) {
            let (right_text, right_value) = term(rng, depth);
            if rng.below(2) == 0 {
                text = format!("{}+{}", text, right_text);
                value += right_value;
            } else {
                text = format!("{}-{}", text, right_text);
                value -= right_value;
            }
        }
        (text, value)
    }

    fn term(rng: &mut Rng, depth: u32) -> (String, BigInt) {
        let (mut text, mut value) = power(rng, depth);
        for _ in 0..rng.below(3) {
            let (right_text, right_value) = power(rng, depth);
            text = format!("{}*{}", text, right_text);
            value *= right_value;
        }
        (text, value)
    }

    fn power(rng: &mut Rng, depth: u32) -> (String, BigInt) {
        let (text, value) = factor(rng, depth);
        if rng.below(4) == 0 {
            let exponent = rng.below(4);
            #[allow(clippy::cast_possible_truncation)]
            let result = num_traits::pow(value, exponent as usize);
            return (format!("{}^{}", text, exponent), result);
        }
        (text, value)
    }

    fn factor(rng: &mut Rng, depth: u32) -> (String, BigInt) {
        match rng.below(if depth == 0 { 2 } else { 4 }) {
            0 => {
                let n = rng.below(1000);
                (n.to_string(), BigInt::from(n))
            }
            1 => {
                let n = rng.below(8);
                let factorial: u64 = (1..=n).product();
                (format!("{}!", n), BigInt::from(factorial))
            }
            2 => {
                let (text, value) = expression(rng, depth - 1);
                (format!("({})", text), value)
            }
            _ => {
                let (text, value) = factor(rng, depth - 1);
                (format!("(-{})", text), -value)
            }
        }
    }

    #[test]
    fn integer_expressions_match_reference() {
        init_test_logging();
        let settings = Settings::default();
        let mut rng = Rng(0x2545_F491_4F6C_DD1D);
        for _ in 0..500 {
            let (text, expected) = expression(&mut rng, 3);
            let result = eval(&text, &settings);
            pretty_assertions::assert_eq!(result, Ok(Output::Integer(expected)), "{}", text);
        }
    }

    #[test_case("0")]
    #[test_case("7")]
    #[test_case("1000000")]
    #[test_case("123456789012345678901234567890123456789")]
    fn literal_round_trip(literal: &str) {
        let result = eval(literal, &Settings::default()).unwrap();
        pretty_assertions::assert_eq!(result.to_string(), literal);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let settings = Settings::default();
        for input in ["3+4*2", "1/7", "SIN(1)^2+COS(1)^2", "!(T@F)$T", "25!"] {
            let expr = Expr::parse(input).unwrap();
            pretty_assertions::assert_eq!(expr.eval(&settings), expr.eval(&settings));
            pretty_assertions::assert_eq!(eval(input, &settings), expr.eval(&settings));
        }
    }

    #[test]
    fn documented_examples() {
        let settings = Settings::default();

        let expr = Expr::parse("3+4*2").unwrap();
        pretty_assertions::assert_eq!(expr.prefix(), "+ 3 * 4 2");
        pretty_assertions::assert_eq!(expr.eval(&settings), Ok(Output::Integer(BigInt::from(11))));

        let expr = Expr::parse("2^10").unwrap();
        assert!(!expr.is_floating_point());
        pretty_assertions::assert_eq!(expr.eval(&settings), Ok(Output::Integer(BigInt::from(1024))));

        let expr = Expr::parse("2^-3").unwrap();
        assert!(expr.is_floating_point());
        pretty_assertions::assert_eq!(expr.eval(&settings).unwrap().to_string(), "0.125");

        pretty_assertions::assert_eq!(eval("T&F", &settings), Ok(Output::Boolean(false)));
        pretty_assertions::assert_eq!(eval("T@F", &settings), Ok(Output::Boolean(true)));
        pretty_assertions::assert_eq!(eval("5!", &settings), Ok(Output::Integer(BigInt::from(120))));
    }

    #[test_case("(-1)!" => Error::MathError("Factorial called on a negative value".into()))]
    #[test_case("3*(4+2" => Error::ParseError("Missing closing parentheses".into()))]
    #[test_case("((T)" => Error::ParseError("Missing closing parentheses".into()) ; "boolean")]
    #[test_case(")T(" => Error::ParseError("Expression begins with closed parentheses".into()))]
    fn documented_failures(input: &str) -> Error {
        eval(input, &Settings::default()).unwrap_err()
    }

    #[test]
    fn failures_do_not_leak() {
        let settings = Settings::default();
        assert!(eval("1/0", &settings).is_err());
        pretty_assertions::assert_eq!(eval("1/4", &settings).unwrap().to_string(), "0.25");
        assert!(eval("((", &settings).is_err());
        pretty_assertions::assert_eq!(eval("(1)", &settings).unwrap().to_string(), "1");
    }
}
