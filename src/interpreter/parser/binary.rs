use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses one left-associative precedence level.
///
/// Reads an operand with `next_level`, then folds in every following
/// operator for which `accept` returns `Some`.
fn parse_left_assoc<'a, I>(tokens: &mut Peekable<I>,
                           next_level: fn(&mut Peekable<I>) -> ParseResult<Expr>,
                           accept: fn(&Token) -> Option<BinaryOperator>)
                           -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = next_level(tokens)?;
    while let Some((token, line)) = tokens.peek()
          && let Some(op) = accept(token)
    {
        tokens.next();
        let right = next_level(tokens)?;
        left = Expr::BinaryOp { left: Box::new(left),
                                op,
                                right: Box::new(right),
                                line: *line };
    }
    Ok(left)
}

/// Parses logical OR expressions.
///
/// The rule is: `logical_or := logical_and ("or" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, parse_logical_and, |token| {
        (*token == Token::Or).then_some(BinaryOperator::Or)
    })
}

/// Parses logical AND expressions.
///
/// The rule is: `logical_and := comparison ("and" comparison)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, parse_comparison, |token| {
        (*token == Token::And).then_some(BinaryOperator::And)
    })
}

/// Parses comparison and membership expressions.
///
/// Handles `==`, `!=`, `<`, `>`, `<=`, `>=` and `in`.
///
/// The rule is: `comparison := additive (comp_op additive)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, parse_additive, |token| {
        token_to_binary_operator(token).filter(|op| {
                                           matches!(op,
                                                    BinaryOperator::Equal
                                                    | BinaryOperator::NotEqual
                                                    | BinaryOperator::Less
                                                    | BinaryOperator::Greater
                                                    | BinaryOperator::LessEqual
                                                    | BinaryOperator::GreaterEqual
                                                    | BinaryOperator::In)
                                       })
    })
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// # Parameters
/// - `tokens`: Token stream with line information.
///
/// # Returns
/// An `Expr::BinaryOp` tree representing the parsed expression.
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, parse_multiplicative, |token| {
        token_to_binary_operator(token).filter(|op| {
                                           matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
                                       })
    })
}

/// Parses multiplication-level expressions.
///
/// Handles left-associative operators `*`, `/` and `%`.
///
/// The rule is: `multiplicative := unary (("*" | "/" | "%") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_left_assoc(tokens, parse_unary, |token| {
        token_to_binary_operator(token).filter(|op| {
                                           matches!(op,
                                                    BinaryOperator::Mul
                                                    | BinaryOperator::Div
                                                    | BinaryOperator::Mod)
                                       })
    })
}

/// Maps a token to the binary operator it denotes, if any.
///
/// # Example
/// ```
/// use stencil::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::Percent), Some(BinaryOperator::Mod));
/// assert_eq!(token_to_binary_operator(&Token::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::In => Some(BinaryOperator::In),
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}
