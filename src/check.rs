//! Local error detection. Every check looks at two adjacent tokens as the
//! right-to-left scan meets them: `current` is the token being scanned and
//! `previous` is the one scanned just before it, i.e. the token on its
//! right in the written expression. A check returns the diagnostic when the
//! pair is illegal.

use crate::classify::Mode;
use crate::error::Error;
use crate::token::Token;
use crate::util::MISSING_OPERAND_RULES;

/// A stateless check over an adjacent `(current, previous)` token pair
pub type Check = fn(Token, Token) -> Option<String>;

/// Checks applied to arithmetic expressions, in order
pub const MATH_CHECKS: &[Check] = &[
    empty_parentheses,
    missing_operator,
    missing_operand,
    factorial_adjacency,
];

/// Checks applied to boolean expressions, in order
pub const BOOL_CHECKS: &[Check] = &[
    empty_parentheses,
    consecutive_operators,
    consecutive_operands,
    not_after_value,
    not_missing_operand,
    missing_operator_bool,
    missing_operand_bool,
];

/// Run every check of the `mode` bank, stopping at the first failure
pub fn check_pair(mode: Mode, current: Token, previous: Token) -> Result<(), Error> {
    let checks = match mode {
        Mode::Math => MATH_CHECKS,
        Mode::Boolean => BOOL_CHECKS,
    };
    match checks.iter().find_map(|check| check(current, previous)) {
        Some(message) => Err(Error::ParseError(message)),
        None => Ok(()),
    }
}

pub fn empty_parentheses(current: Token, previous: Token) -> Option<String> {
    if current == Token::LeftParen && previous == Token::RightParen {
        return Some("Empty parentheses detected".into());
    }
    None
}

/// A value or group directly against a parenthesis, as in `(1)2` or `2(`
/// once implicit products are in place
pub fn missing_operator(current: Token, previous: Token) -> Option<String> {
    let missing = match (current, previous) {
        (Token::RightParen, p) => p.is_math_operand() || p == Token::LeftParen,
        (c, Token::LeftParen) => c.is_math_operand(),
        _ => false,
    };
    if missing {
        return Some(between("Missing operator", current, previous));
    }
    None
}

pub fn missing_operand(current: Token, previous: Token) -> Option<String> {
    let forbidden = MISSING_OPERAND_RULES.get(&current)?;
    if forbidden.contains(&previous) {
        return Some(between("Missing operand", current, previous));
    }
    None
}

pub fn factorial_adjacency(current: Token, previous: Token) -> Option<String> {
    if current == Token::Fac && previous == Token::Fac {
        return Some("Consecutive factorials detected".into());
    }
    if current == Token::Fac && previous.is_digit() {
        return Some("Digit following factorial".into());
    }
    if previous == Token::Fac && current != Token::RightParen && !current.is_math_operand() {
        return Some("Factorial follows a non-number value".into());
    }
    None
}

pub fn consecutive_operators(current: Token, previous: Token) -> Option<String> {
    if current.is_bool_operator() && previous.is_bool_operator() {
        return Some(format!(
            "Two consecutive operators detected: {} and {}",
            current, previous
        ));
    }
    None
}

pub fn consecutive_operands(current: Token, previous: Token) -> Option<String> {
    if current.is_bool_operand() && previous.is_bool_operand() {
        return Some(format!(
            "Two consecutive operands detected: {} and {}",
            current, previous
        ));
    }
    None
}

pub fn not_after_value(current: Token, previous: Token) -> Option<String> {
    if previous == Token::Not && (current.is_bool_operand() || current == Token::RightParen) {
        return Some("NOT applied after value".into());
    }
    None
}

pub fn not_missing_operand(current: Token, previous: Token) -> Option<String> {
    if current == Token::Not && (previous.is_bool_operator() || previous == Token::RightParen) {
        return Some(between("Missing operand", current, previous));
    }
    None
}

pub fn missing_operator_bool(current: Token, previous: Token) -> Option<String> {
    let missing = match (current, previous) {
        (Token::RightParen, p) => {
            p.is_bool_operand() || p == Token::Not || p == Token::LeftParen
        }
        (c, Token::LeftParen) => c.is_bool_operand(),
        _ => false,
    };
    if missing {
        return Some(between("Missing operator", current, previous));
    }
    None
}

pub fn missing_operand_bool(current: Token, previous: Token) -> Option<String> {
    let missing = (current == Token::LeftParen && previous.is_bool_operator())
        || (current.is_bool_operator() && previous == Token::RightParen);
    if missing {
        return Some(between("Missing operand", current, previous));
    }
    None
}

fn between(what: &str, current: Token, previous: Token) -> String {
    format!("{} between {} and {}", what, current.lexeme(), previous.lexeme())
}

/// Check the first token of the lexed expression
pub fn check_leading(tokens: &[Token], mode: Mode) -> Result<(), Error> {
    let first = match tokens.first() {
        Some(&first) => first,
        None => return Err(Error::parse("Empty expression")),
    };
    if tokens.len() == 1 && !first.is_math_operand() {
        return Err(Error::parse("Expression is only one character long"));
    }
    let message = match mode {
        Mode::Math if first == Token::Fac => "Expression begins with factorial",
        Mode::Math if first.is_math_operator() && first != Token::Sub => {
            "Math expression begins with an operator"
        }
        Mode::Boolean if first.is_bool_operator() => "Boolean expression begins with an operator",
        _ if first == Token::RightParen => "Expression begins with closed parentheses",
        _ => return Ok(()),
    };
    Err(Error::parse(message))
}

/// Check the last token of the lexed expression
pub fn check_trailing(tokens: &[Token], mode: Mode) -> Result<(), Error> {
    let last = match tokens.last() {
        Some(&last) => last,
        None => return Err(Error::parse("Empty expression")),
    };
    let message = match mode {
        Mode::Boolean if last == Token::Not => "Expression ends with NOT",
        Mode::Math if last.is_math_operator() && last != Token::Fac => {
            "Math expression ends with an operator"
        }
        Mode::Boolean if last.is_bool_operator() => "Boolean expression ends with an operator",
        _ if last == Token::LeftParen => "Expression ends with open parentheses",
        _ => return Ok(()),
    };
    Err(Error::parse(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Token::LeftParen, Token::RightParen => Some("Empty parentheses detected".into()))]
    #[test_case(Token::RightParen, Token::LeftParen => None ; "reversed pair")]
    fn empty(current: Token, previous: Token) -> Option<String> {
        empty_parentheses(current, previous)
    }

    #[test_case(Token::RightParen, Token::Digit(2) => Some("Missing operator between ) and 2".into()))]
    #[test_case(Token::Pi, Token::LeftParen => Some("Missing operator between PI and (".into()))]
    #[test_case(Token::RightParen, Token::LeftParen => Some("Missing operator between ) and (".into()))]
    #[test_case(Token::Unary, Token::LeftParen => None ; "negated group")]
    #[test_case(Token::Digit(1), Token::Digit(2) => None ; "digits join")]
    fn operator(current: Token, previous: Token) -> Option<String> {
        missing_operator(current, previous)
    }

    #[test_case(Token::Mul, Token::Add => Some("Missing operand between * and +".into()))]
    #[test_case(Token::Pow, Token::Pow => Some("Missing operand between ^ and ^".into()))]
    #[test_case(Token::Unary, Token::Mul => Some("Missing operand between - and *".into()))]
    #[test_case(Token::LeftParen, Token::Fac => Some("Missing operand between ( and !".into()))]
    #[test_case(Token::Sub, Token::RightParen => Some("Missing operand between - and )".into()))]
    #[test_case(Token::Add, Token::Sub => None ; "negation after plus")]
    #[test_case(Token::Pow, Token::Unary => None ; "negative exponent")]
    #[test_case(Token::Fac, Token::Add => None ; "factorial then operator")]
    fn operand(current: Token, previous: Token) -> Option<String> {
        missing_operand(current, previous)
    }

    #[test_case(Token::Fac, Token::Fac => Some("Consecutive factorials detected".into()))]
    #[test_case(Token::Fac, Token::Digit(3) => Some("Digit following factorial".into()))]
    #[test_case(Token::Add, Token::Fac => Some("Factorial follows a non-number value".into()))]
    #[test_case(Token::Digit(5), Token::Fac => None ; "digit factorial")]
    #[test_case(Token::RightParen, Token::Fac => None ; "group factorial")]
    fn factorial(current: Token, previous: Token) -> Option<String> {
        factorial_adjacency(current, previous)
    }

    #[test_case(Token::And, Token::Or => Some("Two consecutive operators detected: & and |".into()))]
    #[test_case(Token::And, Token::Not => None ; "not may follow a connective")]
    fn bool_operators(current: Token, previous: Token) -> Option<String> {
        consecutive_operators(current, previous)
    }

    #[test_case(Token::True, Token::False => Some("Two consecutive operands detected: T and F".into()))]
    #[test_case(Token::True, Token::And => None)]
    fn bool_operands(current: Token, previous: Token) -> Option<String> {
        consecutive_operands(current, previous)
    }

    #[test_case(Token::True, Token::Not => Some("NOT applied after value".into()))]
    #[test_case(Token::RightParen, Token::Not => Some("NOT applied after value".into()) ; "after group")]
    #[test_case(Token::Not, Token::Not => None ; "double negation")]
    fn not_value(current: Token, previous: Token) -> Option<String> {
        not_after_value(current, previous)
    }

    #[test_case(Token::Not, Token::And => Some("Missing operand between ! and &".into()))]
    #[test_case(Token::Not, Token::RightParen => Some("Missing operand between ! and )".into()))]
    #[test_case(Token::Not, Token::LeftParen => None)]
    fn not_operand(current: Token, previous: Token) -> Option<String> {
        not_missing_operand(current, previous)
    }

    #[test_case(Token::RightParen, Token::True => Some("Missing operator between ) and T".into()))]
    #[test_case(Token::False, Token::LeftParen => Some("Missing operator between F and (".into()))]
    #[test_case(Token::RightParen, Token::Not => Some("Missing operator between ) and !".into()))]
    #[test_case(Token::Not, Token::LeftParen => None ; "negated group")]
    fn bool_operator_missing(current: Token, previous: Token) -> Option<String> {
        missing_operator_bool(current, previous)
    }

    #[test_case(Token::LeftParen, Token::Xor => Some("Missing operand between ( and $".into()))]
    #[test_case(Token::Nand, Token::RightParen => Some("Missing operand between @ and )".into()))]
    #[test_case(Token::LeftParen, Token::True => None)]
    fn bool_operand_missing(current: Token, previous: Token) -> Option<String> {
        missing_operand_bool(current, previous)
    }

    #[test]
    fn first_failure_wins() {
        // `(!` is reported as a missing operand before the factorial check sees it
        assert_eq!(
            check_pair(Mode::Math, Token::LeftParen, Token::Fac),
            Err(Error::parse("Missing operand between ( and !"))
        );
        // `)!` is a NOT placement problem before it is a missing operator
        assert_eq!(
            check_pair(Mode::Boolean, Token::RightParen, Token::Not),
            Err(Error::parse("NOT applied after value"))
        );
        assert_eq!(check_pair(Mode::Math, Token::Digit(1), Token::Add), Ok(()));
    }

    #[test_case(&[], Mode::Math => Err(Error::parse("Empty expression")))]
    #[test_case(&[Token::Add], Mode::Math => Err(Error::parse("Expression is only one character long")))]
    #[test_case(&[Token::Digit(7)], Mode::Math => Ok(()) ; "single digit")]
    #[test_case(&[Token::Fac, Token::Digit(3)], Mode::Math => Err(Error::parse("Expression begins with factorial")))]
    #[test_case(&[Token::Mul, Token::Digit(3)], Mode::Math => Err(Error::parse("Math expression begins with an operator")))]
    #[test_case(&[Token::Sub, Token::Digit(3)], Mode::Math => Ok(()) ; "leading minus")]
    #[test_case(&[Token::And, Token::True], Mode::Boolean => Err(Error::parse("Boolean expression begins with an operator")))]
    #[test_case(&[Token::RightParen, Token::True, Token::LeftParen], Mode::Boolean => Err(Error::parse("Expression begins with closed parentheses")))]
    #[test_case(&[Token::Not, Token::True], Mode::Boolean => Ok(()) ; "leading not")]
    fn leading(tokens: &[Token], mode: Mode) -> Result<(), Error> {
        check_leading(tokens, mode)
    }

    #[test_case(&[Token::True, Token::Not], Mode::Boolean => Err(Error::parse("Expression ends with NOT")))]
    #[test_case(&[Token::Digit(3), Token::Sub], Mode::Math => Err(Error::parse("Math expression ends with an operator")))]
    #[test_case(&[Token::Digit(3), Token::Fac], Mode::Math => Ok(()) ; "trailing factorial")]
    #[test_case(&[Token::True, Token::Or], Mode::Boolean => Err(Error::parse("Boolean expression ends with an operator")))]
    #[test_case(&[Token::Digit(3), Token::LeftParen], Mode::Math => Err(Error::parse("Expression ends with open parentheses")))]
    fn trailing(tokens: &[Token], mode: Mode) -> Result<(), Error> {
        check_trailing(tokens, mode)
    }
}
