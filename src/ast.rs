use num_bigint::BigInt;
use rug::float::Constant;
use rug::Float;

use crate::token::Token;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// <left> + <right>
    Add,
    /// <left> - <right>
    Sub,
    /// <left> * <right>
    Mul,
    /// <left> / <right>
    Div,
    /// <left> ^ <right>
    Pow,
}

/// Trigonometric functions, applied in the configured angle unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrigOp {
    /// sin(<arg>)
    Sin,
    /// cos(<arg>)
    Cos,
    /// tan(<arg>)
    Tan,
}

/// A numeric literal, parsed once for each evaluation domain
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// Exact value, absent for decimal literals and named constants
    pub integer: Option<BigInt>,
    /// Value at the working precision
    pub decimal: Float,
}

impl Literal {
    /// Parse the `text` of a literal as written in the expression
    pub fn parse(text: &str, precision: u32) -> Self {
        match text {
            "PI" => Literal {
                integer: None,
                decimal: Float::with_val(precision, Constant::Pi),
            },
            "E" => Literal {
                integer: None,
                decimal: Float::with_val(precision, 1).exp(),
            },
            _ if text.contains('.') => Literal {
                integer: None,
                decimal: parse_decimal(&normalize(text), precision),
            },
            _ => Literal {
                integer: text.parse().ok(),
                decimal: parse_decimal(text, precision),
            },
        }
    }
}

/// `.5` and `5.` are accepted in expressions, give both sides a digit
fn normalize(text: &str) -> String {
    let mut text = text.to_owned();
    if text.starts_with('.') {
        text.insert(0, '0');
    }
    if text.ends_with('.') {
        text.push('0');
    }
    text
}

fn parse_decimal(text: &str, precision: u32) -> Float {
    match Float::parse(text) {
        Ok(parsed) => Float::with_val(precision, parsed),
        Err(error) => panic!("Internal error: invalid literal {:?} after parsing: {}", text, error),
    }
}

/// Ast nodes for arithmetic expressions
#[derive(Debug, Clone, PartialEq)]
pub enum MathAst {
    /// A literal value
    Value(Literal),
    /// <left> op <right>
    Binary(BinaryOp, Box<MathAst>, Box<MathAst>),
    /// -<arg>
    Negation(Box<MathAst>),
    /// <arg>!
    Factorial(Box<MathAst>),
    /// fn(<arg>)
    Trig(TrigOp, Box<MathAst>),
}

/// Binary boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// <left> & <right>
    And,
    /// <left> | <right>
    Or,
    /// <left> @ <right>
    Nand,
    /// <left> $ <right>
    Xor,
}

/// Ast nodes for boolean expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoolAst {
    /// `T` or `F`
    Value(bool),
    /// !<arg>
    Not(Box<BoolAst>),
    /// <left> op <right>
    Binary(BoolOp, Box<BoolAst>, Box<BoolAst>),
}

/// Walks a prefix token sequence once, left to right
struct Builder<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> Builder<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Builder { tokens, index: 0 }
    }

    fn advance(&mut self) -> Token {
        match self.tokens.get(self.index) {
            Some(&token) => {
                self.index += 1;
                token
            }
            None => panic!("Internal error: prefix expression ended early"),
        }
    }

    fn finish(&self) {
        if self.index != self.tokens.len() {
            panic!(
                "Internal error: got {:?} tokens after the end of the prefix expression",
                &self.tokens[self.index..]
            );
        }
    }

    fn math(&mut self, precision: u32) -> MathAst {
        let token = self.advance();
        let binary = match token {
            Token::Add => BinaryOp::Add,
            Token::Sub => BinaryOp::Sub,
            Token::Mul => BinaryOp::Mul,
            Token::Div => BinaryOp::Div,
            Token::Pow => BinaryOp::Pow,
            Token::Unary => return MathAst::Negation(Box::new(self.math(precision))),
            Token::Fac => return MathAst::Factorial(Box::new(self.math(precision))),
            Token::Sin => return MathAst::Trig(TrigOp::Sin, Box::new(self.math(precision))),
            Token::Cos => return MathAst::Trig(TrigOp::Cos, Box::new(self.math(precision))),
            Token::Tan => return MathAst::Trig(TrigOp::Tan, Box::new(self.math(precision))),
            operand if operand.is_math_operand() => {
                return MathAst::Value(Literal::parse(&self.literal(operand), precision))
            }
            other => panic!("Internal error: got {:?} token after shunting yard", other),
        };
        let left = Box::new(self.math(precision));
        let right = Box::new(self.math(precision));
        MathAst::Binary(binary, left, right)
    }

    /// Gather the text of a literal starting with `first`, up to its comma
    fn literal(&mut self, first: Token) -> String {
        let mut text = first.to_string();
        loop {
            match self.advance() {
                Token::Comma => return text,
                token if token.is_math_operand() => text.push_str(&token.to_string()),
                other => panic!("Internal error: got {:?} token inside a literal", other),
            }
        }
    }

    fn boolean(&mut self) -> BoolAst {
        let op = match self.advance() {
            Token::True => return BoolAst::Value(true),
            Token::False => return BoolAst::Value(false),
            Token::Not => return BoolAst::Not(Box::new(self.boolean())),
            Token::And => BoolOp::And,
            Token::Or => BoolOp::Or,
            Token::Nand => BoolOp::Nand,
            Token::Xor => BoolOp::Xor,
            other => panic!("Internal error: got {:?} token after shunting yard", other),
        };
        let left = Box::new(self.boolean());
        let right = Box::new(self.boolean());
        BoolAst::Binary(op, left, right)
    }
}

impl MathAst {
    /// Construct the AST for a sequence of tokens in prefix order, parsing
    /// decimals with `precision` bits. The tokens must come out of a
    /// successful parse.
    pub fn from_tokens(tokens: &[Token], precision: u32) -> Self {
        let mut builder = Builder::new(tokens);
        let ast = builder.math(precision);
        builder.finish();
        ast
    }

    /// Does every literal in the tree have an exact integer value?
    pub fn is_exact(&self) -> bool {
        match self {
            Self::Value(literal) => literal.integer.is_some(),
            Self::Binary(_, left, right) => left.is_exact() && right.is_exact(),
            Self::Negation(arg) | Self::Factorial(arg) => arg.is_exact(),
            Self::Trig(..) => false,
        }
    }
}

impl BoolAst {
    /// Construct the AST for a sequence of boolean tokens in prefix order
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut builder = Builder::new(tokens);
        let ast = builder.boolean();
        builder.finish();
        ast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Mode;
    use crate::lexer::Lexer;
    use crate::parser::parse;

    fn tokens(input: &str, mode: Mode) -> Vec<Token> {
        parse(Lexer::new(input, mode).tokenize().unwrap(), mode).unwrap().tokens
    }

    fn value(text: &str) -> Box<MathAst> {
        Box::new(MathAst::Value(Literal::parse(text, 64)))
    }

    #[test]
    fn math_tree() {
        let ast = MathAst::from_tokens(&tokens("3+4*25", Mode::Math), 64);
        pretty_assertions::assert_eq!(
            ast,
            MathAst::Binary(
                BinaryOp::Add,
                value("3"),
                Box::new(MathAst::Binary(BinaryOp::Mul, value("4"), value("25"))),
            )
        );
        assert!(ast.is_exact());

        let ast = MathAst::from_tokens(&tokens("-SIN(PI)!", Mode::Math), 64);
        pretty_assertions::assert_eq!(
            ast,
            MathAst::Negation(Box::new(MathAst::Factorial(Box::new(MathAst::Trig(
                TrigOp::Sin,
                value("PI"),
            )))))
        );
        assert!(!ast.is_exact());
    }

    #[test]
    fn bool_tree() {
        let ast = BoolAst::from_tokens(&tokens("!T@(F$T)", Mode::Boolean));
        pretty_assertions::assert_eq!(
            ast,
            BoolAst::Binary(
                BoolOp::Nand,
                Box::new(BoolAst::Not(Box::new(BoolAst::Value(true)))),
                Box::new(BoolAst::Binary(
                    BoolOp::Xor,
                    Box::new(BoolAst::Value(false)),
                    Box::new(BoolAst::Value(true)),
                )),
            )
        );
    }

    #[test]
    fn literals() {
        let literal = Literal::parse("120", 64);
        pretty_assertions::assert_eq!(literal.integer, Some(BigInt::from(120)));
        pretty_assertions::assert_eq!(literal.decimal, 120);

        let literal = Literal::parse(".5", 64);
        pretty_assertions::assert_eq!(literal.integer, None);
        pretty_assertions::assert_eq!(literal.decimal, 0.5);

        let literal = Literal::parse("2.", 64);
        pretty_assertions::assert_eq!(literal.decimal, 2);

        let literal = Literal::parse("PI", 64);
        assert!(literal.decimal > 3.1 && literal.decimal < 3.2);
    }

    #[test]
    #[should_panic(expected = "Internal error: prefix expression ended early")]
    fn truncated_prefix_is_a_bug() {
        let _ = MathAst::from_tokens(&[Token::Add, Token::Digit(1), Token::Comma], 64);
    }

    #[test]
    #[should_panic(expected = "Internal error: got And token after shunting yard")]
    fn boolean_token_in_math_prefix_is_a_bug() {
        let _ = MathAst::from_tokens(&[Token::And, Token::Digit(1), Token::Comma], 64);
    }

    #[test]
    #[should_panic(expected = "Internal error: got Add token inside a literal")]
    fn unterminated_literal_is_a_bug() {
        let _ = MathAst::from_tokens(&[Token::Digit(1), Token::Add], 64);
    }

    #[test]
    #[should_panic(expected = "Internal error: got [Digit(2), Comma] tokens after the end")]
    fn trailing_prefix_tokens_are_a_bug() {
        let _ = BoolAst::from_tokens(&[Token::True, Token::Digit(2), Token::Comma]);
    }
}
