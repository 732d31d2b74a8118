//! Decide whether an expression is arithmetic or boolean before it is
//! tokenized. Some characters are shared between the two languages (`T` is
//! both `True` and the head of `TAN`, `!` is both factorial and NOT), so the
//! first decisive character wins and a few local lookaheads settle the
//! ambiguous ones.

/// The language an expression is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Numbers, arithmetic operators, trigonometry and constants
    Math,
    /// `T`/`F` literals and boolean connectives
    Boolean,
}

/// Classify a whitespace-free, upper-cased `expression`. Returns `None` when
/// nothing in the expression decides the matter.
///
/// # Examples
///
/// ```
/// use bigcalc::{classify, Mode};
///
/// assert_eq!(classify("3+4*2"), Some(Mode::Math));
/// assert_eq!(classify("T&F"), Some(Mode::Boolean));
/// assert_eq!(classify("TAN(1)"), Some(Mode::Math));
/// assert_eq!(classify("(T)"), None);
/// ```
pub fn classify(expression: &str) -> Option<Mode> {
    let chars: Vec<char> = expression.chars().collect();

    for (index, &c) in chars.iter().enumerate() {
        let rest = &chars[index + 1..];
        let next = rest.first().copied();

        if c == '^' {
            if let Some(mode) = exponent_or_xor(rest) {
                return Some(mode);
            }
        }
        if c == 'T' && starts_with(rest, "AN") {
            return Some(Mode::Math);
        }
        if c == '!' && next.map_or(false, is_bool_literal) {
            return Some(Mode::Boolean);
        }
        if c.is_ascii_digit() && next.map_or(false, |n| n == '!' || n == ')' || is_constant(n)) {
            return Some(Mode::Math);
        }
        if is_constant(c) && next.map_or(false, is_constant) {
            return Some(Mode::Math);
        }
        if starts_with(&chars[index..], "SIN") || starts_with(&chars[index..], "COS") {
            return Some(Mode::Math);
        }

        if is_bool_operator(c) {
            return Some(Mode::Boolean);
        }
        if is_math_operator(c) || c == '.' {
            return Some(Mode::Math);
        }
    }

    if is_literal(expression) {
        return Some(Mode::Math);
    }
    None
}

/// `^` is only an exponent, but a boolean literal after it means the user
/// was writing a boolean expression, and the boolean lexer gives the better
/// diagnostic.
fn exponent_or_xor(rest: &[char]) -> Option<Mode> {
    for (index, &c) in rest.iter().enumerate() {
        if c == '(' {
            continue;
        }
        if c == 'T' && starts_with(&rest[index + 1..], "AN") {
            return Some(Mode::Math);
        }
        if is_bool_literal(c) {
            return Some(Mode::Boolean);
        }
    }
    None
}

fn starts_with(chars: &[char], word: &str) -> bool {
    chars.len() >= word.len() && word.chars().zip(chars).all(|(a, &b)| a == b)
}

/// A lone number or constant, which needs no operator to be evaluated
fn is_literal(expression: &str) -> bool {
    if expression == "PI" || expression == "E" {
        return true;
    }
    let mut dots = 0;
    let mut digits = 0;
    for c in expression.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn is_bool_literal(c: char) -> bool {
    c == 'T' || c == 'F'
}

fn is_constant(c: char) -> bool {
    c == 'P' || c == 'I' || c == 'E'
}

fn is_bool_operator(c: char) -> bool {
    matches!(c, '&' | '|' | '@' | '$')
}

fn is_math_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^')
}
