use std::iter::Peekable;

use crate::{error::ParseError, interpreter::lexer::Token};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by list literals, call argument lists and
/// parameter lists. It repeatedly calls `parse_item` to parse one element,
/// expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list, and a
/// trailing comma before the closing token is accepted.
///
/// Grammar (simplified): `list := item ("," item)* ","?`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> Result<T, ParseError>,
    closing: &Token,
    line: usize)
    -> Result<Vec<T>, ParseError>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    loop {
        if let Some((tok, _)) = tokens.peek()
           && tok == closing
        {
            tokens.next();
            break;
        }
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((tok, _)) if tok == closing => {
                tokens.next();
                break;
            },
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("Expected ',' or {closing:?}, found {tok:?}"),
                                                         line:  *line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// The next token must be `Token::Identifier`.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the next token is not an identifier,
/// - the input ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> Result<String, ParseError>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected identifier, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Consumes the next token, which must equal `expected`.
///
/// `what` describes the expected token for the error message.
///
/// # Returns
/// The line number of the consumed token.
pub(in crate::interpreter::parser) fn expect_token<'a, I>(tokens: &mut Peekable<I>,
                                                          expected: &Token,
                                                          what: &str)
                                                          -> Result<usize, ParseError>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, line)) if tok == expected => Ok(*line),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected {what}, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Tells whether the next token ends a statement.
pub(in crate::interpreter::parser) fn at_statement_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    matches!(tokens.peek(),
             None | Some((Token::NewLine | Token::Semicolon | Token::RBrace, _)))
}

/// Deepest bracket or prefix-operator nesting the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Rejects token streams nested deeper than [`MAX_NESTING_DEPTH`].
///
/// Open brackets and braces each add a level, and so does every operator
/// in a run of prefix `-` or `!`.
///
/// # Errors
/// `NestingTooDeep` at the first token past the limit.
///
/// # Example
/// ```
/// use stencil::interpreter::{lexer::tokenize, parser::utils::check_nesting};
///
/// let shallow = tokenize("f((1 + 2) * [3])", 1).unwrap();
/// assert!(check_nesting(shallow.iter()).is_ok());
///
/// let deep = tokenize(&"(".repeat(500), 1).unwrap();
/// assert!(check_nesting(deep.iter()).is_err());
///
/// let negated = tokenize(&format!("{}1", "-".repeat(500)), 1).unwrap();
/// assert!(check_nesting(negated.iter()).is_err());
/// ```
pub fn check_nesting<'a, I>(tokens: I) -> Result<(), ParseError>
    where I: Iterator<Item = &'a (Token, usize)>
{
    let mut depth = 0usize;
    let mut prefix_run = 0usize;

    for (token, line) in tokens {
        match token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
            _ => {},
        }
        prefix_run = if matches!(token, Token::Minus | Token::Bang) { prefix_run + 1 } else { 0 };

        if depth + prefix_run > MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep { limit: MAX_NESTING_DEPTH,
                                                    line:  *line, });
        }
    }
    Ok(())
}
