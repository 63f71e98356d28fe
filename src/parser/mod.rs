//! Premise expression parser
//!
//! Turns textual rule premises into [`Antecedent`] trees:
//! - `temperatura is baixa and fluxo_agua is alto`
//! - `not (pressao is alta) or vazao is media`
//!
//! Keywords are lowercase `is`, `and`, `or`, `not`. `not` binds tightest, then `and`,
//! then `or`; `and`/`or` chains flatten into n-ary nodes; parentheses group. Identifiers
//! are alphanumeric/underscore words starting with a letter or underscore.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, multispace0, satisfy},
    combinator::{all_consuming, map, recognize, verify},
    multi::fold_many0,
    sequence::{delimited, pair, preceded, separated_pair},
};
use thiserror::Error;

use crate::rule::Antecedent;

/// Errors from premise parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The premise text was empty or all whitespace
    #[error("premise is empty")]
    Empty,
    /// The text does not form a valid premise expression
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },
}

/// Reserved words that can never be identifiers
fn is_reserved(word: &str) -> bool {
    matches!(word, "is" | "and" | "or" | "not")
}

/// Parse a keyword with a word boundary, so `or` never matches inside `orchid`
fn keyword(word: &'static str) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| {
        let (rest, kw) = tag(word)(input)?;
        match rest.chars().next() {
            Some(c) if c.is_alphanumeric() || c == '_' => Err(nom::Err::Error(
                nom::error::Error::new(input, nom::error::ErrorKind::Tag),
            )),
            _ => Ok((rest, kw)),
        }
    }
}

/// Parse a variable or term name
fn identifier(input: &str) -> IResult<&str, &str> {
    verify(
        recognize(pair(
            satisfy(|c| c.is_alphabetic() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
        |ident: &str| !is_reserved(ident),
    )(input)
}

/// Parse a leaf premise: `variable is term`
fn leaf(input: &str) -> IResult<&str, Antecedent> {
    map(
        separated_pair(
            identifier,
            delimited(multispace0, keyword("is"), multispace0),
            identifier,
        ),
        |(variable, term)| Antecedent::is(variable, term),
    )(input)
}

/// Parse a leaf or a parenthesized expression
fn primary(input: &str) -> IResult<&str, Antecedent> {
    alt((
        delimited(
            pair(char('('), multispace0),
            expression,
            pair(multispace0, char(')')),
        ),
        leaf,
    ))(input)
}

/// Parse `not ...` chains and primaries
fn unary(input: &str) -> IResult<&str, Antecedent> {
    alt((
        map(
            preceded(pair(keyword("not"), multispace0), unary),
            Antecedent::not,
        ),
        primary,
    ))(input)
}

/// Parse `and` chains (binds tighter than `or`)
fn and_expression(input: &str) -> IResult<&str, Antecedent> {
    let (input, first) = unary(input)?;
    fold_many0(
        preceded(delimited(multispace0, keyword("and"), multispace0), unary),
        move || first.clone(),
        Antecedent::and,
    )(input)
}

/// Parse `or` chains
fn expression(input: &str) -> IResult<&str, Antecedent> {
    let (input, first) = and_expression(input)?;
    fold_many0(
        preceded(
            delimited(multispace0, keyword("or"), multispace0),
            and_expression,
        ),
        move || first.clone(),
        Antecedent::or,
    )(input)
}

/// Parse a full premise expression
pub fn parse_premise(input: &str) -> Result<Antecedent, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    match all_consuming(expression)(trimmed) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = trimmed.len() - e.input.len();
            let message = if e.input.is_empty() {
                "unexpected end of input".to_string()
            } else {
                let snippet: String = e.input.chars().take(20).collect();
                format!("unexpected input near '{snippet}'")
            };
            Err(ParseError::Syntax { position, message })
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::Syntax {
            position: trimmed.len(),
            message: "unexpected end of input".to_string(),
        }),
    }
}
