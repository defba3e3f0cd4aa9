use std::iter::Peekable;

use crate::{
    ast::{Expr, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, tokenize},
        parser::{
            binary::parse_logical_or,
            block::{parse_block, skip_separators},
            statement::parse_statement,
            utils::{check_nesting, expect_token},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses every statement of a token stream.
///
/// Statements are separated by newlines or `;`. Blank lines and stray
/// separators are skipped. A statement followed by anything other than a
/// separator or the end of input is an error.
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The statements in source order.
///
/// # Example
/// ```
/// use stencil::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("x = 1; y = 2\nz = 3", 1).unwrap();
/// let program = parse_program(&mut tokens.iter().peekable()).unwrap();
///
/// assert_eq!(program.len(), 3);
/// ```
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    check_nesting(tokens.clone())?;
    let mut statements = Vec::new();

    loop {
        skip_separators(tokens);
        match tokens.peek() {
            None => break,
            Some((Token::RBrace, line)) => {
                return Err(ParseError::UnexpectedToken { token: "Unmatched '}'".to_string(),
                                                         line:  *line, });
            },
            Some(_) => statements.push(parse_statement(tokens)?),
        }
    }

    Ok(statements)
}

/// Parses a source fragment that must hold exactly one expression.
///
/// Used for interpolated segments: the fragment is lexed starting at `line`
/// so that every node reports the line of the enclosing literal. Newlines are
/// insignificant inside a fragment.
///
/// # Errors
/// - Any lexing or parsing error of the fragment.
/// - `UnexpectedTrailingTokens` if tokens remain after the expression.
///
/// # Example
/// ```
/// use stencil::interpreter::parser::core::parse_expression_source;
///
/// let expr = parse_expression_source("a + 1", 7).unwrap();
/// assert_eq!(expr.line_number(), 7);
///
/// assert!(parse_expression_source("a +", 7).is_err());
/// assert!(parse_expression_source("a b", 7).is_err());
/// ```
pub fn parse_expression_source(source: &str, line: usize) -> ParseResult<Expr> {
    let tokens = tokenize(source, line)?.into_iter()
                                        .filter(|(tok, _)| *tok != Token::NewLine)
                                        .collect::<Vec<_>>();
    check_nesting(tokens.iter())?;
    let mut iter = tokens.iter().peekable();

    let expr = parse_expression(&mut iter)?;

    if let Some((tok, line)) = iter.next() {
        return Err(ParseError::UnexpectedTrailingTokens { token: format!("{tok:?}"),
                                                          line:  *line, });
    }

    Ok(expr)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, the conditional, and
/// recursively descends through the precedence hierarchy.
///
/// Grammar: `expression := logical_or ("?" expression ":" expression)?`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_logical_or(tokens)?;

    if let Some((Token::Question, line)) = tokens.peek() {
        tokens.next();
        let then_branch = parse_expression(tokens)?;
        expect_token(tokens, &Token::Colon, "':' in conditional expression")?;
        let else_branch = parse_expression(tokens)?;

        return Ok(Expr::Conditional { condition:   Box::new(condition),
                                      then_branch: Box::new(then_branch),
                                      else_branch: Box::new(else_branch),
                                      line:        *line, });
    }

    Ok(condition)
}

/// Parses an `if` statement with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if <condition> { ... }
///     else if <condition> { ... }
///     else { ... }
/// ```
/// Nested `else if` constructs are parsed recursively and stored as a single
/// nested `if` statement inside the else branch.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `line`: Line number of the `if` token.
///
/// # Errors
/// - `UnexpectedToken` if a `{` or the token after `else` is wrong.
/// - Propagates any errors from sub-expression parsing.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let condition = parse_expression(tokens)?;
    let open = expect_token(tokens, &Token::LBrace, "'{' after if condition")?;
    let then_branch = parse_block(tokens, open)?;

    let else_branch = match tokens.peek() {
        Some((Token::Else, _)) => {
            tokens.next();

            match tokens.next() {
                Some((Token::If, line2)) => Some(vec![parse_if(tokens, *line2)?]),
                Some((Token::LBrace, line2)) => Some(parse_block(tokens, *line2)?),
                Some((tok, line2)) => {
                    return Err(ParseError::UnexpectedToken { token: format!("Expected 'if' or '{{' after else, found {tok:?}"),
                                                             line:  *line2, });
                },
                None => return Err(ParseError::UnexpectedEndOfInput { line }),
            }
        },

        _ => None,
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       line })
}
