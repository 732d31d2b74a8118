use hashbrown::HashMap;

use crate::token::Token;

lazy_static! {
    /// Trigonometric function names, as written after upper-casing
    pub static ref TRIG_FUNCTIONS: HashMap<&'static str, Token> = {
        let mut map = HashMap::new();
        map.insert("SIN", Token::Sin);
        map.insert("COS", Token::Cos);
        map.insert("TAN", Token::Tan);
        map.shrink_to_fit();
        map
    };

    /// For each operator, the tokens that may not appear immediately to its
    /// right: `*+` or `^)` leave the operator without an operand.
    pub static ref MISSING_OPERAND_RULES: HashMap<Token, &'static [Token]> = {
        const NO_ADD_SUB: &[Token] = &[
            Token::Mul,
            Token::Div,
            Token::Pow,
            Token::Fac,
            Token::RightParen,
        ];
        const ALL: &[Token] = &[
            Token::Add,
            Token::Sub,
            Token::Mul,
            Token::Div,
            Token::Pow,
            Token::Fac,
            Token::RightParen,
        ];
        let mut map = HashMap::new();
        map.insert(Token::Add, NO_ADD_SUB);
        map.insert(Token::Sub, NO_ADD_SUB);
        map.insert(Token::Mul, ALL);
        map.insert(Token::Div, ALL);
        map.insert(Token::Pow, NO_ADD_SUB);
        map.insert(Token::Unary, NO_ADD_SUB);
        map.insert(Token::LeftParen, NO_ADD_SUB);
        map.shrink_to_fit();
        map
    };
}

/// Number of bits an exact integer may grow to before evaluation gives up
pub const MAX_INTEGER_BITS: u64 = 1 << 24;

/// Digits shown for decimals when no precision is requested
pub const DEFAULT_DISPLAY_DIGITS: usize = 15;
