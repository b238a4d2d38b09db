//! Restricted object-literal parser backing the `object-to-json` transform.
//!
//! Accepts the JS-flavored literals people paste from editors and consoles:
//! unquoted or single-quoted keys, single-quoted strings, trailing commas,
//! nested arrays and objects, `true`/`false`/`null`, and plain numbers.
//! Anything that smells like code (identifiers as values, calls, template
//! interpolation) is a parse error; this is a parser, not an evaluator.

use serde_json::{Map, Number, Value};
use std::fmt;

#[derive(Debug)]
pub struct ParseError {
    pub pos: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.pos)
    }
}

impl std::error::Error for ParseError {}

pub fn parse(input: &str) -> Result<Value, ParseError> {
    let mut p = Parser {
        chars: input.chars().collect(),
        pos: 0,
    };
    p.skip_ws();
    let value = p.value()?;
    p.skip_ws();
    if p.pos < p.chars.len() {
        return Err(p.err("trailing characters after literal"));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn err(&self, message: &str) -> ParseError {
        ParseError {
            pos: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            _ => Err(self.err(&format!("expected '{expected}'"))),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some('"') | Some('\'') | Some('`') => Ok(Value::String(self.string()?)),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() => self.keyword(),
            _ => Err(self.err("expected a value")),
        }
    }

    fn object(&mut self) -> Result<Value, ParseError> {
        self.eat('{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }
            let key = self.key()?;
            self.skip_ws();
            self.eat(':')?;
            self.skip_ws();
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some('}') => {}
                _ => return Err(self.err("expected ',' or '}' in object")),
            }
        }
    }

    fn array(&mut self) -> Result<Value, ParseError> {
        self.eat('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some(']') => {}
                _ => return Err(self.err("expected ',' or ']' in array")),
            }
        }
    }

    fn key(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some('"') | Some('\'') | Some('`') => self.string(),
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
                let mut key = String::new();
                while let Some(c) = self.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '$' {
                        key.push(c);
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                Ok(key)
            }
            _ => Err(self.err("expected an object key")),
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let quote = self.bump().unwrap();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.err("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('$') if quote == '`' && self.peek() == Some('{') => {
                    return Err(self.err("template interpolation is not supported"));
                }
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('u') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let d = self
                                .bump()
                                .and_then(|c| c.to_digit(16))
                                .ok_or_else(|| self.err("invalid \\u escape"))?;
                            code = code * 16 + d;
                        }
                        let c = char::from_u32(code)
                            .ok_or_else(|| self.err("invalid \\u escape"))?;
                        out.push(c);
                    }
                    Some(c @ ('\\' | '/' | '"' | '\'' | '`')) => out.push(c),
                    _ => return Err(self.err("unsupported escape sequence")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let mut raw = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                raw.push(c);
                self.pos += 1;
            } else if c == '_' {
                // Numeric separator, dropped.
                self.pos += 1;
            } else {
                break;
            }
        }
        let n: f64 = raw.parse().map_err(|_| ParseError {
            pos: start,
            message: format!("invalid number '{raw}'"),
        })?;
        if n.fract() == 0.0 && n.abs() < 9e15 {
            return Ok(Value::Number(Number::from(n as i64)));
        }
        Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| self.err("number out of range"))
    }

    fn keyword(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        match word.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            _ => Err(ParseError {
                pos: start,
                message: format!("bare identifier '{word}' is not a literal value"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unquoted_and_single_quoted_keys() {
        let v = parse("{foo: 'bar', 'baz': 1, \"q\": true}").unwrap();
        assert_eq!(v, json!({"foo": "bar", "baz": 1, "q": true}));
    }

    #[test]
    fn nested_structures_and_trailing_commas() {
        let v = parse("{a: [1, 2, {b: null,},], c: {d: 'e'}}").unwrap();
        assert_eq!(v, json!({"a": [1, 2, {"b": null}], "c": {"d": "e"}}));
    }

    #[test]
    fn numbers() {
        let v = parse("[1, -2.5, 1_000, 3e2]").unwrap();
        assert_eq!(v, json!([1, -2.5, 1000, 300]));
    }

    #[test]
    fn escapes() {
        let v = parse(r#"{a: 'line\nbreak', b: "A"}"#).unwrap();
        assert_eq!(v, json!({"a": "line\nbreak", "b": "A"}));
    }

    #[test]
    fn template_string_without_interpolation() {
        let v = parse("{msg: `plain`}").unwrap();
        assert_eq!(v, json!({"msg": "plain"}));
    }

    #[test]
    fn rejects_code() {
        assert!(parse("{a: doEvil()}").is_err());
        assert!(parse("{a: `${pwn}`}").is_err());
        assert!(parse("{a: b}").is_err());
        assert!(parse("{a: 1} + 1").is_err());
        assert!(parse("undefined").is_err());
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(parse("{a: 1").is_err());
        assert!(parse("[1,").is_err());
        assert!(parse("'open").is_err());
    }

    #[test]
    fn plain_json_still_parses() {
        let v = parse(r#"{"a": [1, 2], "b": "c"}"#).unwrap();
        assert_eq!(v, json!({"a": [1, 2], "b": "c"}));
    }
}
