use crate::classify::Mode;
use crate::error::Error;
use crate::token::Token;
use crate::util::TRIG_FUNCTIONS;
use std::iter::Peekable;
use std::str::Chars;

/// An helper struct for lexing the input in a given `Mode`
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    mode: Mode,
}

impl<'a> Lexer<'a> {
    pub fn new(string: &'a str, mode: Mode) -> Lexer<'a> {
        Lexer {
            input: string.chars().peekable(),
            mode,
        }
    }

    /// Turn the whole input into tokens, rejecting any character that does
    /// not belong to the lexer's language.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        let c = match self.input.next() {
            Some(c) if c.is_whitespace() => return self.next_token(),
            Some(c) => c,
            None => return Ok(None),
        };
        let token = match self.mode {
            Mode::Math => self.math_token(c)?,
            Mode::Boolean => bool_token(c)?,
        };
        Ok(Some(token))
    }

    fn math_token(&mut self, c: char) -> Result<Token, Error> {
        if let Some(token) = Token::from_math_char(c) {
            return Ok(token);
        }
        if let Some(token) = self.trig_word(c) {
            return Ok(token);
        }
        if c == 'P' && self.input.peek() == Some(&'I') {
            self.input.next();
            return Ok(Token::Pi);
        }
        if c == 'T' || c == 'F' {
            return Err(Error::parse("Arithmetic expression contains a bool"));
        }
        Err(Error::parse(invalid_character_math(c)))
    }

    /// Consume `SIN`, `COS` or `TAN` when `first` starts one of them
    fn trig_word(&mut self, first: char) -> Option<Token> {
        let word: String = std::iter::once(first)
            .chain(self.input.clone().take(2))
            .collect();
        let token = *TRIG_FUNCTIONS.get(word.as_str())?;
        self.input.nth(1);
        Some(token)
    }
}

fn bool_token(c: char) -> Result<Token, Error> {
    if let Some(token) = Token::from_bool_char(c) {
        return Ok(token);
    }
    if c.is_ascii_digit() {
        return Err(Error::parse("Boolean expression contains a number"));
    }
    Err(Error::parse(invalid_character_bool(c)))
}

fn invalid_character_math(c: char) -> String {
    if c == '[' || c == ']' {
        return "Invalid use of brackets detected! Just use parentheses please.".into();
    }
    format!("Expected +, -, *, /, ^, received: {}", c)
}

fn invalid_character_bool(c: char) -> String {
    if c == '[' || c == ']' {
        return "Invalid use of brackets detected! Just use parentheses please.".into();
    }
    if c.is_alphanumeric() {
        return format!("Expected T or F, received: {}", c);
    }
    format!("Expected &, |, !, @, $, received: {}", c)
}

/// Make implicit products explicit: `2PI`, `2(3)`, `(1)(2)`, `3!2` and
/// `2SIN(1)` all get a `*` between the two halves. This runs on the full
/// token list before the right-to-left scan starts, so the scan never has to
/// grow its input.
pub fn insert_implicit_multiplication(tokens: &[Token]) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len() * 2);
    for (index, &current) in tokens.iter().enumerate() {
        output.push(current);
        if let Some(&next) = tokens.get(index + 1) {
            if needs_multiplication(current, next) {
                output.push(Token::Mul);
            }
        }
    }
    output
}

fn needs_multiplication(current: Token, next: Token) -> bool {
    let next_starts_factor = next.is_math_operand() || next == Token::LeftParen || next.is_trig();
    match current {
        Token::RightParen | Token::Fac => next_starts_factor,
        // digits never get a product with a following digit or dot
        c if c.is_math_operand() => next_starts_factor && !next.is_digit() && next != Token::Dot,
        _ => false,
    }
}
