use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{BinaryOperator, FunctionDef, Statement, WrapMode},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression, parse_if},
            utils::{at_statement_end, expect_token, parse_comma_separated, parse_identifier},
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a keyword statement (`import`, `fn`, `return`, `break`, `continue`,
///   `if`, `for`, `while`).
/// - an assignment, compound assignment or index assignment.
/// - an expression used as a statement.
///
/// The statement must be followed by a separator (newline or `;`), a closing
/// `}` or the end of input.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, line)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let statement = parse_statement_body(tokens)?;

    if !at_statement_end(tokens)
       && let Some((tok, line)) = tokens.peek()
    {
        return Err(ParseError::UnexpectedTrailingTokens { token: format!("{tok:?}"),
                                                          line:  *line, });
    }

    Ok(statement)
}

fn parse_statement_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput { line: 0 });
    };
    let line = *line;

    match token {
        Token::Import => {
            tokens.next();
            parse_import(tokens, line)
        },
        Token::Fn if matches!(peek_second(tokens), Some(Token::Identifier(_))) => {
            tokens.next();
            parse_function_definition(tokens, line)
        },
        Token::Return => {
            tokens.next();
            let value = if at_statement_end(tokens) {
                None
            } else {
                Some(parse_expression(tokens)?)
            };
            Ok(Statement::Return { value, line })
        },
        Token::Break => {
            tokens.next();
            Ok(Statement::Break { line })
        },
        Token::Continue => {
            tokens.next();
            Ok(Statement::Continue { line })
        },
        Token::If => {
            tokens.next();
            parse_if(tokens, line)
        },
        Token::For => {
            tokens.next();
            parse_for(tokens, line)
        },
        Token::While => {
            tokens.next();
            let condition = parse_expression(tokens)?;
            let open = expect_token(tokens, &Token::LBrace, "'{' after while condition")?;
            let body = parse_block(tokens, open)?;
            Ok(Statement::While { condition,
                                  body,
                                  line })
        },
        _ => {
            if let Some(statement) = parse_assignment(tokens)? {
                return Ok(statement);
            }
            let expr = parse_expression(tokens)?;
            Ok(Statement::Expression { expr, line })
        },
    }
}

/// Returns the token after the next one without consuming anything.
fn peek_second<'a, I>(tokens: &Peekable<I>) -> Option<&'a Token>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    lookahead.next().map(|(tok, _)| tok)
}

/// Parses an import statement after its `import` keyword.
///
/// Grammar: `import := "import" IDENTIFIER ("." IDENTIFIER)*`
///
/// The dotted name is kept as written; normalization happens in the loader.
fn parse_import<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut name = parse_identifier(tokens)?;
    while let Some((Token::Dot, _)) = tokens.peek() {
        tokens.next();
        name.push('.');
        name.push_str(&parse_identifier(tokens)?);
    }
    Ok(Statement::Import { name, line })
}

/// Parses a named function definition after its `fn` keyword.
///
/// Grammar: `function := "fn" IDENTIFIER "(" params ")" "{" statement* "}"`
///
/// The definition is produced with [`WrapMode::Bare`]; template compilation
/// decides how it is finally bound.
///
/// # Errors
/// Returns a `ParseError` if the name, parameter list or body is malformed.
fn parse_function_definition<'a, I>(tokens: &mut Peekable<I>,
                                    line: usize)
                                    -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = parse_identifier(tokens)?;
    expect_token(tokens, &Token::LParen, "'(' after function name")?;
    let params = parse_comma_separated(tokens, parse_identifier, &Token::RParen, line)?;

    for (i, param) in params.iter().enumerate() {
        if params[..i].contains(param) {
            return Err(ParseError::DuplicateParameter { name: param.clone(),
                                                        line });
        }
    }

    let open = expect_token(tokens, &Token::LBrace, "'{' before function body")?;
    let body = parse_block(tokens, open)?;

    Ok(Statement::Function(Rc::new(FunctionDef { name,
                                                 params,
                                                 body,
                                                 wrap: WrapMode::Bare,
                                                 line })))
}

/// Parses a `for` loop after its `for` keyword.
///
/// Grammar: `for := "for" IDENTIFIER "in" expression "{" statement* "}"`
fn parse_for<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let var = parse_identifier(tokens)?;
    expect_token(tokens, &Token::In, "'in' after loop variable")?;
    let iterable = parse_expression(tokens)?;
    let open = expect_token(tokens, &Token::LBrace, "'{' after for header")?;
    let body = parse_block(tokens, open)?;

    Ok(Statement::For { var,
                        iterable,
                        body,
                        line })
}

/// Parses an assignment, compound-assignment or index-assignment statement.
///
/// Supported forms:
///
/// - `<identifier> = <expression>`
/// - `<identifier> += <expression>` (and `-=`, `*=`, `/=`)
/// - `<identifier>[<expression>] = <expression>`
///
/// The function performs a limited lookahead: if the next token is an
/// identifier followed by `=`, one of the compound-assignment operators, or a
/// balanced `[...]` followed by `=`, an assignment is parsed.
///
/// If no assignment pattern matches, the function returns `Ok(None)` and does
/// not consume tokens.
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((Token::Identifier(name), line)) = tokens.peek() else {
        return Ok(None);
    };
    let (name, line) = (name.clone(), *line);

    let compound = match peek_second(tokens) {
        Some(Token::Equals) => None,
        Some(Token::PlusAssign) => Some(BinaryOperator::Add),
        Some(Token::MinusAssign) => Some(BinaryOperator::Sub),
        Some(Token::MulAssign) => Some(BinaryOperator::Mul),
        Some(Token::DivAssign) => Some(BinaryOperator::Div),
        Some(Token::LBracket) if is_index_assignment(tokens) => {
            tokens.next();
            tokens.next();
            let index = parse_expression(tokens)?;
            expect_token(tokens, &Token::RBracket, "']' after index")?;
            expect_token(tokens, &Token::Equals, "'=' after indexed target")?;
            let value = parse_expression(tokens)?;
            return Ok(Some(Statement::IndexAssignment { name,
                                                        index,
                                                        value,
                                                        line }));
        },
        _ => return Ok(None),
    };

    tokens.next();
    tokens.next();
    let value = parse_expression(tokens)?;

    Ok(Some(match compound {
                None => Statement::Assignment { name, value, line },
                Some(op) => Statement::CompoundAssignment { name,
                                                            op,
                                                            value,
                                                            line },
            }))
}

/// Checks whether `name[...]` is directly followed by `=`.
fn is_index_assignment<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    lookahead.next();
    let mut brackets = 1;

    while brackets > 0 {
        match lookahead.next() {
            Some((Token::LBracket, _)) => brackets += 1,
            Some((Token::RBracket, _)) => brackets -= 1,
            Some(_) => {},
            None => return false,
        }
    }

    matches!(lookahead.next(), Some((Token::Equals, _)))
}
