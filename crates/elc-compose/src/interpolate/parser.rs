//! Parsing of variable expressions using `nom`.
//!
//! Grammar:
//!
//! ```text
//! expression := segment*
//! segment    := "${" NAME (":-" default)? "}" | "$" | text
//! default    := ( "${" ... "}" | "$" NAME | "$" | text-until-brace )*
//! NAME       := [A-Za-z0-9_]+
//! ```
//!
//! The `$NAME` shorthand is only recognized inside a default; at the top
//! level a `$` that does not open `${` is plain text.

use elc_common::error::{ElcError, Result};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till1, take_while1},
    character::complete::char,
    combinator::{all_consuming, cut, opt, value},
    multi::many0,
    sequence::preceded,
};

/// A piece of a parsed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim.
    Literal(String),
    /// A variable reference with an optional fallback expression.
    Reference {
        /// Referenced variable name.
        name: String,
        /// Fallback used when the variable is unset or empty.
        default: Option<Vec<Segment>>,
    },
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn name(input: &str) -> IResult<&str, String> {
    take_while1(is_name_char).map(str::to_string).parse(input)
}

/// `${NAME}` or `${NAME:-DEFAULT}`. Everything after `${` is committed.
fn braced(input: &str) -> IResult<&str, Segment> {
    preceded(
        tag("${"),
        cut((name, opt(preceded(tag(":-"), default_body)), char('}'))),
    )
    .map(|(name, default, _)| Segment::Reference { name, default })
    .parse(input)
}

fn shorthand(input: &str) -> IResult<&str, Segment> {
    preceded(char('$'), name)
        .map(|name| Segment::Reference {
            name,
            default: None,
        })
        .parse(input)
}

fn lone_dollar(input: &str) -> IResult<&str, Segment> {
    value(Segment::Literal("$".into()), char('$')).parse(input)
}

fn default_text(input: &str) -> IResult<&str, Segment> {
    take_till1(|c: char| c == '$' || c == '}')
        .map(|s: &str| Segment::Literal(s.to_string()))
        .parse(input)
}

fn default_body(input: &str) -> IResult<&str, Vec<Segment>> {
    many0(alt((braced, shorthand, default_text, lone_dollar))).parse(input)
}

fn top_text(input: &str) -> IResult<&str, Segment> {
    take_till1(|c: char| c == '$')
        .map(|s: &str| Segment::Literal(s.to_string()))
        .parse(input)
}

/// Parses a raw expression into segments.
///
/// # Errors
///
/// Returns [`ElcError::InvalidExpression`] for an unterminated `${`, an
/// empty variable name, or stray characters inside a reference.
pub fn parse_expression(input: &str) -> Result<Vec<Segment>> {
    match all_consuming(many0(alt((braced, top_text, lone_dollar)))).parse(input) {
        Ok((_, segments)) => Ok(segments),
        Err(err) => Err(ElcError::InvalidExpression {
            expression: input.to_string(),
            message: describe(&err),
        }),
    }
}

fn describe(err: &nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "incomplete expression".into(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            if e.input.is_empty() {
                "unterminated \"${\"".into()
            } else {
                let near: String = e.input.chars().take(16).collect();
                format!("unexpected input near {near:?}")
            }
        }
    }
}
