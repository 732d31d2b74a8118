use std::fmt::{self, Display, Formatter};

/// Every symbol the compiler knows about, from the input string down to the
/// prefix output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A decimal digit, holding its value
    Digit(u8),
    /// Decimal point
    Dot,
    /// Terminates a numeric literal in the prefix output
    Comma,
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
    /// `+`
    Add,
    /// `-` used as a binary operator
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`, always exponentiation
    Pow,
    /// Postfix `!` in arithmetic expressions
    Fac,
    /// `-` used as a negation. Written `~` in the prefix output
    Unary,
    /// `&`
    And,
    /// `|`
    Or,
    /// `@`
    Nand,
    /// `$`
    Xor,
    /// Prefix `!` in boolean expressions
    Not,
    /// `T`
    True,
    /// `F`
    False,
    /// `SIN`
    Sin,
    /// `COS`
    Cos,
    /// `TAN`
    Tan,
    /// `PI`
    Pi,
    /// `E`, Euler's number
    Euler,
    /// Nothing, used before the first and after the last token
    Null,
}

impl Token {
    /// Map a single input character to its arithmetic token, if any. Multi
    /// letter words are handled by the lexer.
    pub fn from_math_char(c: char) -> Option<Self> {
        let token = match c {
            '0'..='9' => Self::Digit(c as u8 - b'0'),
            '.' => Self::Dot,
            '(' => Self::LeftParen,
            ')' => Self::RightParen,
            '+' => Self::Add,
            '-' => Self::Sub,
            '*' => Self::Mul,
            '/' => Self::Div,
            '^' => Self::Pow,
            '!' => Self::Fac,
            'E' => Self::Euler,
            _ => return None,
        };
        Some(token)
    }

    /// Map a single input character to its boolean token, if any.
    pub fn from_bool_char(c: char) -> Option<Self> {
        let token = match c {
            'T' => Self::True,
            'F' => Self::False,
            '(' => Self::LeftParen,
            ')' => Self::RightParen,
            '&' => Self::And,
            '|' => Self::Or,
            '@' => Self::Nand,
            '$' => Self::Xor,
            '!' => Self::Not,
            _ => return None,
        };
        Some(token)
    }

    /// A decimal digit
    pub fn is_digit(self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// `PI` or `E`
    pub fn is_constant(self) -> bool {
        matches!(self, Self::Pi | Self::Euler)
    }

    /// `SIN`, `COS` or `TAN`
    pub fn is_trig(self) -> bool {
        matches!(self, Self::Sin | Self::Cos | Self::Tan)
    }

    /// Anything that ends up inside a numeric literal
    pub fn is_math_operand(self) -> bool {
        self.is_digit() || self == Self::Dot || self.is_constant()
    }

    /// `T` or `F`
    pub fn is_bool_operand(self) -> bool {
        matches!(self, Self::True | Self::False)
    }

    /// An operand of either language
    pub fn is_operand(self) -> bool {
        self.is_math_operand() || self.is_bool_operand()
    }

    /// Arithmetic operators, including the internal negation
    pub fn is_math_operator(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Pow | Self::Fac | Self::Unary
        )
    }

    /// The binary boolean connectives. NOT is kept apart, as it only takes
    /// one operand.
    pub fn is_bool_operator(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Nand | Self::Xor)
    }

    /// An operator of either language, trigonometric functions included
    pub fn is_operator(self) -> bool {
        self.is_math_operator() || self.is_bool_operator() || self == Self::Not || self.is_trig()
    }

    /// Can this token start a value, as seen from an operator on its left?
    pub fn begins_value(self) -> bool {
        self.is_math_operand() || self.is_trig() || self == Self::Unary
    }

    /// Get the operator precedence. Operators with higher precedence should be
    /// evaluated first.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Unary => 3,
            Self::Pow => 4,
            Self::Fac => 5,
            Self::Sin | Self::Cos | Self::Tan => 6,
            Self::And | Self::Or | Self::Nand | Self::Xor => 1,
            Self::Not => 2,
            _ => 0,
        }
    }

    /// The spelling shown to users in diagnostics
    pub fn lexeme(self) -> &'static str {
        match self {
            Self::Digit(digit) => DIGITS[usize::from(digit % 10)],
            Self::Unary => "-",
            other => other.symbol(),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Digit(digit) => DIGITS[usize::from(digit % 10)],
            Self::Dot => ".",
            Self::Comma => ",",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Fac | Self::Not => "!",
            Self::Unary => "~",
            Self::And => "&",
            Self::Or => "|",
            Self::Nand => "@",
            Self::Xor => "$",
            Self::True => "T",
            Self::False => "F",
            Self::Sin => "SIN",
            Self::Cos => "COS",
            Self::Tan => "TAN",
            Self::Pi => "PI",
            Self::Euler => "E",
            Self::Null => "",
        }
    }
}

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl Display for Token {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str(self.symbol())
    }
}

/// Render a prefix token sequence with one space between items. Literals are
/// printed whole and their terminating commas are dropped, so `3+4*2` reads
/// `+ 3 * 4 2`.
pub fn format_prefix(tokens: &[Token]) -> String {
    let mut items: Vec<String> = Vec::new();
    let mut literal = String::new();
    for token in tokens {
        match token {
            Token::Comma => items.push(std::mem::take(&mut literal)),
            t if t.is_math_operand() => literal.push_str(t.symbol()),
            t => items.push(t.to_string()),
        }
    }
    if !literal.is_empty() {
        items.push(literal);
    }
    items.join(" ")
}
