use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{expect_token, parse_comma_separated, parse_identifier},
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `!`  (logical not)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`] and then applies any postfix operators via
/// [`parse_postfix`].
///
/// Grammar:
/// ```text
///     unary := ("-" | "!") unary
///            | primary postfix*
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Minus, line)) = tokens.peek() {
        tokens.next();
        let expr = parse_unary(tokens)?;
        Ok(Expr::UnaryOp { op:   UnaryOperator::Negate,
                           expr: Box::new(expr),
                           line: *line, })
    } else if let Some((Token::Bang, line)) = tokens.peek() {
        tokens.next();
        let expr = parse_unary(tokens)?;
        Ok(Expr::UnaryOp { op:   UnaryOperator::Not,
                           expr: Box::new(expr),
                           line: *line, })
    } else {
        let primary = parse_primary(tokens)?;
        parse_postfix(tokens, primary)
    }
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - numeric, boolean and `none` literals
/// - string literals
/// - identifiers
/// - parenthesized expressions
/// - list literals (`[ ... ]`)
/// - lambdas (`fn(x) => x + 1`)
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | STRING
///              | IDENTIFIER
///              | "(" expression ")"
///              | "[" elements "]"
///              | "fn" "(" params ")" "=>" expression
/// ```
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { line: 0 });
    };
    let line = *line;

    match token {
        Token::Integer(n) => Ok(Expr::Literal { value: (*n).into(),
                                                line }),
        Token::Real(r) => Ok(Expr::Literal { value: (*r).into(),
                                             line }),
        Token::Bool(b) => Ok(Expr::Literal { value: (*b).into(),
                                             line }),
        Token::NoneLiteral => Ok(Expr::Literal { value: LiteralValue::None,
                                                 line }),
        Token::Str(value) => Ok(Expr::Str { value: value.clone(),
                                            line }),
        Token::Identifier(name) => Ok(Expr::Variable { name: name.clone(),
                                                       line }),
        Token::LParen => {
            let expr = parse_expression(tokens)?;
            match tokens.next() {
                Some((Token::RParen, _)) => Ok(expr),
                _ => Err(ParseError::ExpectedClosingParen { line }),
            }
        },
        Token::LBracket => {
            let elements =
                parse_comma_separated(tokens, parse_expression, &Token::RBracket, line)?;
            Ok(Expr::ListLiteral { elements, line })
        },
        Token::Fn => parse_lambda(tokens, line),
        tok => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                 line }),
    }
}

/// Parses postfix operators applied to an expression.
///
/// This function is called after parsing a primary expression and handles
/// two kinds of postfix constructs, which may be chained freely:
///
/// 1. **Calls** `expr(arg1, arg2)`
/// 2. **Indexing** `expr[index]`
///
/// Grammar:
/// ```text
///     postfix := primary
///              | postfix "(" arguments ")"
///              | postfix "[" expression "]"
/// ```
/// # Errors
/// Returns a `ParseError` if an argument list or index is malformed.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    loop {
        match tokens.peek() {
            Some((Token::LParen, line)) => {
                tokens.next();
                let arguments =
                    parse_comma_separated(tokens, parse_expression, &Token::RParen, *line)?;
                node = Expr::Call { callee: Box::new(node),
                                    arguments,
                                    line: *line };
            },
            Some((Token::LBracket, line)) => {
                tokens.next();
                let index = parse_expression(tokens)?;
                expect_token(tokens, &Token::RBracket, "']' after index")?;
                node = Expr::Index { target: Box::new(node),
                                     index:  Box::new(index),
                                     line:   *line, };
            },
            _ => break,
        }
    }
    Ok(node)
}

/// Parses an anonymous function after its `fn` keyword.
///
/// Grammar: `lambda := "fn" "(" params ")" "=>" expression`
///
/// # Parameters
/// - `tokens`: Token iterator positioned after `fn`.
/// - `line`: Line number of the `fn` token.
fn parse_lambda<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect_token(tokens, &Token::LParen, "'(' after fn")?;
    let params = parse_comma_separated(tokens, parse_identifier, &Token::RParen, line)?;
    expect_token(tokens, &Token::FatArrow, "'=>' after lambda parameters")?;
    let body = parse_expression(tokens)?;

    Ok(Expr::Lambda { params,
                      body: Rc::new(body),
                      line })
}
