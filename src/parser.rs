//! Builds a [`Value`] tree from tokenized, quote-expanded source text.
//!
//! Single-atom recognition reuses `nom`'s digit combinators; the
//! cons-tree build itself walks the token stream with an explicit
//! cursor (`(` recurses into a sublist, `)` ends the current one, `.`
//! marks the next value as a dotted tail).

use crate::error::ReadError;
use crate::lexer::{dequote, tokenize};
use crate::value::Value;

use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map, opt, recognize};
use nom::sequence::tuple;
use nom::IResult;

/// Parse a single top-level expression from source text.
pub fn parse(input: &str) -> Result<Value, ReadError> {
    log::trace!("parse: {input:?}");
    let expanded = dequote(input);
    let tokens = tokenize(&expanded);
    if tokens.is_empty() {
        return Err(ReadError("empty input".to_string()));
    }
    let mut reader = Reader {
        tokens: &tokens,
        pos: 0,
    };
    reader.read_expr()
}

struct Reader<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn advance(&mut self) -> Option<&'a str> {
        let tok = self.peek();
        self.pos += 1;
        tok
    }

    fn read_expr(&mut self) -> Result<Value, ReadError> {
        match self.advance() {
            Some("(") => self.read_list(),
            Some(")") => Err(ReadError("unexpected )".to_string())),
            Some(".") => Err(ReadError("unexpected .".to_string())),
            Some(tok) => Ok(parse_atom(tok)),
            None => Err(ReadError("unexpected end of input".to_string())),
        }
    }

    /// Called just after consuming the opening `(`.
    fn read_list(&mut self) -> Result<Value, ReadError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(")") => {
                    self.advance();
                    return Ok(Value::list(items));
                }
                Some(".") => {
                    self.advance();
                    let tail = self.read_expr()?;
                    match self.advance() {
                        Some(")") => return Ok(Value::dotted_list(items, tail)),
                        _ => return Err(ReadError("malformed dotted list".to_string())),
                    }
                }
                None => return Err(ReadError("unclosed list".to_string())),
                _ => items.push(self.read_expr()?),
            }
        }
    }
}

fn parse_integer_literal(input: &str) -> IResult<&str, Value> {
    map(recognize(tuple((opt(char('-')), digit1))), |s: &str| {
        Value::Integer(s.parse::<i64>().expect("digit1 guarantees parseable int"))
    })(input)
}

fn parse_float_literal(input: &str) -> IResult<&str, Value> {
    map(recognize(tuple((digit1, char('.'), digit1))), |s: &str| {
        Value::Float(s.parse::<f64>().expect("digit1 . digit1 guarantees parseable float"))
    })(input)
}

/// Classify a single token: `^-?[0-9]+$` is an integer, `^[0-9]+\.[0-9]+$`
/// is a float, anything else (including `t` and `nil`) is a symbol.
/// Symbols only become booleans when evaluated, not at read time.
fn parse_atom(token: &str) -> Value {
    if let Ok((_, v)) = all_consuming(parse_integer_literal)(token) {
        v
    } else if let Ok((_, v)) = all_consuming(parse_float_literal)(token) {
        v
    } else {
        Value::Symbol(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer() {
        assert_eq!(parse("42").unwrap(), Value::Integer(42));
        assert_eq!(parse("-7").unwrap(), Value::Integer(-7));
    }

    #[test]
    fn parses_float() {
        assert_eq!(parse("3.5").unwrap(), Value::Float(3.5));
    }

    #[test]
    fn negative_float_is_not_a_float_literal() {
        // Spec's single-atom regex for floats has no sign, so "-3.5"
        // reads as a symbol rather than Float(-3.5).
        assert_eq!(parse("-3.5").unwrap(), Value::Symbol("-3.5".to_string()));
    }

    #[test]
    fn t_and_nil_read_as_symbols() {
        assert_eq!(parse("t").unwrap(), Value::Symbol("t".to_string()));
        assert_eq!(parse("nil").unwrap(), Value::Symbol("nil".to_string()));
    }

    #[test]
    fn parses_proper_list() {
        let v = parse("(+ 2 3)").unwrap();
        assert_eq!(
            v,
            Value::list(vec![
                Value::Symbol("+".to_string()),
                Value::Integer(2),
                Value::Integer(3),
            ])
        );
    }

    #[test]
    fn parses_dotted_pair() {
        let v = parse("(a . b)").unwrap();
        assert_eq!(
            v,
            Value::cons(Value::Symbol("a".to_string()), Value::Symbol("b".to_string()))
        );
        assert_eq!(v.to_string(), "(a . b)");
    }

    #[test]
    fn parses_quoted_form() {
        let v = parse("'foo").unwrap();
        assert_eq!(
            v,
            Value::list(vec![
                Value::Symbol("quote".to_string()),
                Value::Symbol("foo".to_string()),
            ])
        );
    }

    #[test]
    fn round_trips_through_print() {
        let v = parse("(friends romans (and countrymen))").unwrap();
        let printed = v.to_string();
        let reparsed = parse(&printed).unwrap();
        assert_eq!(v, reparsed);
    }
}
