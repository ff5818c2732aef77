//! Literal parser for projection argument tuples.
//!
//! Accepts exactly what a function key may carry between its parentheses:
//! quoted strings, integers, floats, `true`/`false`/`null` (and their
//! `True`/`False`/`None` spellings), bracketed lists, and bare `$name` /
//! `$$name` tokens.
//!
//! ```text
//! from_unixtime($create_time, '%Y-%m-%d')
//!              └───────────┬──────────┘
//!                   parse_args input
//! ```

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::{fold_many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::ast::Value;
use crate::error::{ModelError, ModelResult};

/// Parse a parenthesised argument tuple, e.g. `('%Y', $col, 3)`.
pub fn parse_args(input: &str) -> ModelResult<Vec<Value>> {
    match all_consuming(delimited(multispace0, parse_tuple, multispace0))(input) {
        Ok((_, args)) => Ok(args),
        Err(e) => Err(ModelError::malformed(input, e.to_string())),
    }
}

fn parse_tuple(input: &str) -> IResult<&str, Vec<Value>> {
    sequence_of('(', ')')(input)
}

fn parse_list(input: &str) -> IResult<&str, Value> {
    map(sequence_of('[', ']'), Value::Array)(input)
}

/// `open item, item, ... [,] close`
fn sequence_of(open: char, close: char) -> impl FnMut(&str) -> IResult<&str, Vec<Value>> {
    move |input: &str| {
        delimited(
            pair(char(open), multispace0),
            terminated(
                separated_list0(delimited(multispace0, char(','), multispace0), parse_literal),
                pair(multispace0, opt(pair(char(','), multispace0))),
            ),
            char(close),
        )(input)
    }
}

fn parse_literal(input: &str) -> IResult<&str, Value> {
    alt((
        map(quoted('\''), Value::String),
        map(quoted('"'), Value::String),
        parse_number,
        parse_keyword,
        map(parse_sigil, |s: &str| Value::String(s.to_string())),
        parse_list,
        map(parse_tuple, Value::Array),
    ))(input)
}

/// Quoted string with backslash escapes.
fn quoted(quote: char) -> impl FnMut(&str) -> IResult<&str, String> {
    let stop = if quote == '\'' { "\\'" } else { "\\\"" };
    move |input: &str| {
        delimited(
            char(quote),
            fold_many0(
                alt((
                    map(is_not(stop), |s: &str| s.to_string()),
                    map(parse_escape, |c| c.to_string()),
                )),
                String::new,
                |mut acc, fragment| {
                    acc.push_str(&fragment);
                    acc
                },
            ),
            char(quote),
        )(input)
    }
}

fn parse_escape(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            value('\\', char('\\')),
            value('\'', char('\'')),
            value('"', char('"')),
            value('\n', char('n')),
            value('\t', char('t')),
        )),
    )(input)
}

fn parse_number(input: &str) -> IResult<&str, Value> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |text: &str| -> Result<Value, String> {
            if text.contains(['.', 'e', 'E']) {
                text.parse::<f64>().map(Value::Float).map_err(|e| e.to_string())
            } else {
                text.parse::<i64>().map(Value::Int).map_err(|e| e.to_string())
            }
        },
    )(input)
}

fn parse_keyword(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Bool(true), alt((tag("true"), tag("True")))),
        value(Value::Bool(false), alt((tag("false"), tag("False")))),
        value(Value::Null, alt((tag("null"), tag("None")))),
    ))(input)
}

/// Bare `$name` or `$$name`.
fn parse_sigil(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c == '$'),
        take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '.'),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn test_mixed_arguments() {
        assert_eq!(
            parse_args("($create_time, '%Y-%m-%d')").unwrap(),
            vec![s("$create_time"), s("%Y-%m-%d")]
        );
        assert_eq!(
            parse_args("('$id', \"$$raw\", 3, -1.5, True, null)").unwrap(),
            vec![s("$id"), s("$$raw"), Value::Int(3), Value::Float(-1.5), Value::Bool(true), Value::Null]
        );
    }

    #[test]
    fn test_single_and_trailing_comma() {
        assert_eq!(parse_args("($id)").unwrap(), vec![s("$id")]);
        assert_eq!(parse_args("($id,)").unwrap(), vec![s("$id")]);
        assert_eq!(parse_args("()").unwrap(), vec![]);
    }

    #[test]
    fn test_nested_list_and_escapes() {
        assert_eq!(
            parse_args("([1, 2], 'it\\'s')").unwrap(),
            vec![Value::Array(vec![Value::Int(1), Value::Int(2)]), s("it's")]
        );
        assert_eq!(parse_args("('')").unwrap(), vec![s("")]);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(parse_args("('unterminated)"), Err(ModelError::MalformedKey { .. })));
        assert!(parse_args("(a b)").is_err());
        assert!(parse_args("").is_err());
    }
}
