//! Triple tokenizer using nom.
//!
//! Recipes may spell a triple as one line of text. This module splits such a
//! line into its three terms without interpreting them.
//!
//! ```text
//! ?person ex:hasName 'John Smith'@en .
//! ───┬─── ────┬───── ───────┬────── ┬
//!    │        │             │       └── optional terminator
//!    │        │             └── object (quoted literal + tag)
//!    │        └── predicate
//!    └── subject
//! ```

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till, take_till1, take_while, take_while1},
    character::complete::{char, multispace0, none_of},
    combinator::{opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
};

use crate::ast::Triple;
use crate::error::{BuildResult, BuilderError};

/// Parse a one-line triple such as `?s ex:p 'o'@en .`.
///
/// The terminator may also be glued to a bare object (`?s ?p ?o.`); a lone
/// `.` is never a term.
pub fn parse_triple(input: &str) -> BuildResult<Triple> {
    let terms = parse_terms(input)?;
    match terms.as_slice() {
        [subject, predicate, object] | [subject, predicate, object, "."]
            if *subject != "." && *predicate != "." && *object != "." =>
        {
            let object = object.strip_suffix('.').unwrap_or(*object);
            Ok(Triple::new(*subject, *predicate, object))
        }
        _ => Err(BuilderError::parse(
            input.len(),
            format!(
                "Expected 3 terms, found {} in '{}'",
                terms.iter().filter(|term| **term != ".").count(),
                input.trim()
            ),
        )),
    }
}

/// Split a line into whitespace-separated terms, keeping quoted literals and
/// IRIs whole.
pub fn parse_terms(input: &str) -> BuildResult<Vec<&str>> {
    match terms(input) {
        Ok(("", terms)) => Ok(terms),
        Ok((remaining, _)) => Err(BuilderError::parse(
            input.len() - remaining.len(),
            format!("Unexpected content: '{}'", remaining),
        )),
        Err(e) => Err(BuilderError::parse(0, format!("Parse failed: {:?}", e))),
    }
}

fn terms(input: &str) -> IResult<&str, Vec<&str>> {
    let (input, terms) = many0(preceded(multispace0, term))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, terms))
}

fn term(input: &str) -> IResult<&str, &str> {
    alt((literal, iri, bare))(input)
}

/// `'text'` or `"text"`, optionally followed by `@lang` or `^^datatype`.
fn literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        opt(alt((
            preceded(
                char('@'),
                take_while1(|c: char| c.is_alphanumeric() || c == '-'),
            ),
            preceded(tag("^^"), alt((iri, bare))),
        ))),
    ))(input)
}

/// `<...>`
fn iri(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('<'), take_till1(|c: char| c == '>'), char('>')))(input)
}

/// Any other run of non-whitespace that does not open a literal or IRI.
fn bare(input: &str) -> IResult<&str, &str> {
    recognize(pair(none_of("'\"<"), take_till(|c: char| c.is_whitespace())))(input)
}
