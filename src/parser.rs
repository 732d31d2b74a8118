//! Infix to prefix rewriting.
//!
//! The scan runs from the last token to the first, so the operator stack
//! produces a reversed prefix sequence that only needs one final reversal.
//! Numeric literals are gathered in a buffer while the scan is inside them,
//! and every literal is terminated by a `Comma` in the final output.

use tracing::trace;

use crate::check::{check_leading, check_pair, check_trailing};
use crate::classify::Mode;
use crate::error::Error;
use crate::lexer::insert_implicit_multiplication;
use crate::token::Token;

/// A successfully rewritten expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// Tokens in prefix order, numeric literals terminated by `Comma`
    pub tokens: Vec<Token>,
    /// Language of the expression
    pub mode: Mode,
    /// Whether the expression has to be evaluated with decimals
    pub is_floating_point: bool,
}

impl ParseResult {
    pub fn is_math(&self) -> bool {
        self.mode == Mode::Math
    }
}

/// Rewrite the lexed infix `tokens` of an expression in `mode` into prefix
/// order.
pub fn parse(mut tokens: Vec<Token>, mode: Mode) -> Result<ParseResult, Error> {
    check_leading(&tokens, mode)?;
    check_trailing(&tokens, mode)?;

    if mode == Mode::Math {
        if tokens[0] == Token::Sub {
            tokens[0] = Token::Unary;
        }
        tokens = insert_implicit_multiplication(&tokens);
    }

    let mut state = ParseState::new(&tokens, mode);
    for position in (0..tokens.len()).rev() {
        state.position = position;
        state.current = tokens[position];
        match mode {
            Mode::Math => state.math_step()?,
            Mode::Boolean => state.bool_step()?,
        }
    }
    state.finish()
}

/// Scanning context of one rewrite
struct ParseState<'a> {
    tokens: &'a [Token],
    mode: Mode,
    position: usize,
    current: Token,
    previous: Token,
    num_buffer: Vec<Token>,
    in_number: bool,
    is_floating_point: bool,
    operators: Vec<Token>,
    output: Vec<Token>,
}

impl<'a> ParseState<'a> {
    fn new(tokens: &'a [Token], mode: Mode) -> Self {
        ParseState {
            tokens,
            mode,
            position: tokens.len(),
            current: Token::Null,
            previous: Token::Null,
            num_buffer: Vec::new(),
            in_number: false,
            is_floating_point: false,
            operators: Vec::new(),
            output: Vec::with_capacity(tokens.len() * 2),
        }
    }

    /// The token on the left of the current one, which the scan meets next
    fn next_token(&self) -> Token {
        if self.position == 0 {
            Token::Null
        } else {
            self.tokens[self.position - 1]
        }
    }

    fn math_step(&mut self) -> Result<(), Error> {
        if self.current.is_math_operand() {
            self.buffer_operand()?;
            self.previous = self.current;
            return Ok(());
        }

        if self.current == Token::Sub && self.is_unary_minus() {
            self.current = Token::Unary;
        }
        if self.current.is_trig() && self.previous != Token::LeftParen {
            return Err(Error::parse("Use parentheses with trig functions"));
        }
        check_pair(self.mode, self.current, self.previous)?;

        match self.current {
            Token::RightParen => {
                self.flush_number()?;
                self.operators.push(Token::RightParen);
            }
            Token::LeftParen => {
                self.flush_number()?;
                self.close_group()?;
            }
            trig if trig.is_trig() => {
                self.is_floating_point = true;
                self.push_operator(trig);
            }
            operator if operator.is_math_operator() => {
                self.flush_number()?;
                if operator == Token::Add && self.is_unary_plus() {
                    return Ok(());
                }
                self.math_operator(operator);
            }
            other => panic!("Internal error: lexer produced {:?} in an arithmetic expression", other),
        }
        self.previous = self.current;
        Ok(())
    }

    fn bool_step(&mut self) -> Result<(), Error> {
        check_pair(self.mode, self.current, self.previous)?;
        match self.current {
            operand if operand.is_bool_operand() => self.output.push(operand),
            Token::RightParen => self.operators.push(Token::RightParen),
            Token::LeftParen => self.close_group()?,
            operator => self.push_operator(operator),
        }
        self.previous = self.current;
        Ok(())
    }

    fn buffer_operand(&mut self) -> Result<(), Error> {
        match self.current {
            Token::Dot => {
                if self.num_buffer.contains(&Token::Dot) {
                    return Err(Error::parse("Multiple decimal points in one number"));
                }
                self.is_floating_point = true;
            }
            constant if constant.is_constant() => {
                if self.previous.is_math_operand() {
                    return Err(Error::parse(
                        "Variable error: a decimal point or digit must not trail a named constant",
                    ));
                }
                self.is_floating_point = true;
            }
            _ => {}
        }
        self.num_buffer.push(self.current);
        self.in_number = true;
        Ok(())
    }

    /// Is the `-` being scanned a negation rather than a subtraction?
    fn is_unary_minus(&self) -> bool {
        let next = self.next_token();
        let previous = self.previous;
        // `*-(` or `(-(`: a group on the right and nothing on the left to
        // subtract from
        (previous == Token::LeftParen
            && !next.is_operand()
            && next != Token::RightParen
            && next != Token::Fac)
            // `(-3`
            || (next == Token::LeftParen && previous.begins_value())
            // `*-3`
            || (next.is_math_operator() && next != Token::Fac && previous.begins_value())
            // `^-`
            || next == Token::Pow
    }

    /// A `+` with nothing to add to on its left does nothing
    fn is_unary_plus(&self) -> bool {
        let next = self.next_token();
        (next.is_math_operator() && next != Token::Fac) || next == Token::LeftParen
    }

    fn math_operator(&mut self, operator: Token) {
        match operator {
            Token::Div => self.is_floating_point = true,
            Token::Pow if self.negative_exponent() => self.is_floating_point = true,
            _ => {}
        }
        if operator == Token::Fac {
            self.operators.push(operator);
            return;
        }
        self.push_operator(operator);
    }

    /// Look at the already scanned exponent for a leading negation
    fn negative_exponent(&self) -> bool {
        self.tokens[self.position + 1..]
            .iter()
            .find(|&&token| token != Token::LeftParen)
            .map_or(false, |&token| token == Token::Sub || token == Token::Unary)
    }

    fn push_operator(&mut self, incoming: Token) {
        while let Some(&top) = self.operators.last() {
            if !pops_before(top, incoming) {
                break;
            }
            self.output.push(top);
            self.operators.pop();
        }
        self.operators.push(incoming);
    }

    /// Unstack operators down to the matching `)`
    fn close_group(&mut self) -> Result<(), Error> {
        loop {
            match self.operators.pop() {
                Some(Token::RightParen) => return Ok(()),
                Some(operator) => self.output.push(operator),
                None => return Err(Error::parse("Missing closing parentheses")),
            }
        }
    }

    fn flush_number(&mut self) -> Result<(), Error> {
        if !self.in_number {
            return Ok(());
        }
        if !self.num_buffer.iter().any(|t| t.is_digit() || t.is_constant()) {
            return Err(Error::parse("Invalid number"));
        }
        self.output.push(Token::Comma);
        self.output.append(&mut self.num_buffer);
        self.in_number = false;
        Ok(())
    }

    fn finish(mut self) -> Result<ParseResult, Error> {
        self.flush_number()?;
        while let Some(operator) = self.operators.pop() {
            if operator == Token::RightParen {
                return Err(Error::parse("Missing open parentheses"));
            }
            self.output.push(operator);
        }
        self.output.reverse();
        trace!(
            tokens = ?self.output,
            floating_point = self.is_floating_point,
            "rewrote expression into prefix order"
        );
        Ok(ParseResult {
            tokens: self.output,
            mode: self.mode,
            is_floating_point: self.is_floating_point,
        })
    }
}

/// Does the stacked `top` operator leave the stack when `incoming` arrives?
/// Prefix operators already hold their whole operand once any binary
/// operator shows up on their left.
fn pops_before(top: Token, incoming: Token) -> bool {
    if top == Token::RightParen {
        return false;
    }
    top.precedence() > incoming.precedence() || (is_prefix(top) && !is_prefix(incoming))
}

fn is_prefix(token: Token) -> bool {
    matches!(token, Token::Unary | Token::Not) || token.is_trig()
}
