//! TRON: a compact JSON superset.
//!
//! Object shapes that repeat are declared once as classes in a header and
//! instantiated positionally in the body:
//!
//! ```text
//! class A: status,title
//!
//! {"todoList":{"items":[A("pending","Task 1"),A("completed","Task 2")]},"vBRIEFInfo":{"version":"0.2"}}
//! ```
//!
//! Any plain JSON text is also valid TRON. Strings and numbers use JSON syntax
//! and are decoded by `serde_json`.

use crate::core::error::VbriefError;
use serde_json::{Map, Value};
use std::collections::HashMap;

const CLASS_KEYWORD: &str = "class";

/// Deepest container nesting accepted by `decode`; matches `serde_json`.
pub const MAX_DEPTH: usize = 128;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encodes `value`, hoisting every object shape seen at least twice into a
/// class declaration.
pub fn encode(value: &Value) -> String {
    let mut counts: Vec<(Vec<String>, usize)> = Vec::new();
    count_shapes(value, &mut counts);

    let mut classes: HashMap<Vec<String>, String> = HashMap::new();
    let mut out = String::new();
    for (keys, count) in counts {
        if count < 2 {
            continue;
        }
        let name = class_name(classes.len());
        out.push_str(&format!(
            "{CLASS_KEYWORD} {name}: {}\n",
            keys.iter()
                .map(|k| encode_key(k))
                .collect::<Vec<_>>()
                .join(",")
        ));
        classes.insert(keys, name);
    }
    if !classes.is_empty() {
        out.push('\n');
    }
    write_value(value, &classes, &mut out);
    out
}

fn shape(map: &Map<String, Value>) -> Vec<String> {
    map.keys().cloned().collect()
}

/// Counts non-empty object shapes in first-appearance order.
fn count_shapes(value: &Value, counts: &mut Vec<(Vec<String>, usize)>) {
    match value {
        Value::Object(map) => {
            if !map.is_empty() {
                let keys = shape(map);
                match counts.iter_mut().find(|(k, _)| *k == keys) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((keys, 1)),
                }
            }
            for child in map.values() {
                count_shapes(child, counts);
            }
        }
        Value::Array(items) => {
            for child in items {
                count_shapes(child, counts);
            }
        }
        _ => {}
    }
}

/// A, B, .., Z, AA, AB, ..
fn class_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn encode_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        encode_string(key)
    }
}

fn encode_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn write_value(value: &Value, classes: &HashMap<Vec<String>, String>, out: &mut String) {
    match value {
        Value::Object(map) => {
            if let Some(name) = classes.get(&shape(map)) {
                out.push_str(name);
                out.push('(');
                for (i, child) in map.values().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_value(child, classes, out);
                }
                out.push(')');
                return;
            }
            out.push('{');
            for (i, (key, child)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&encode_string(key));
                out.push(':');
                write_value(child, classes, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, child) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(child, classes, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

pub fn decode(input: &str) -> Result<Value, VbriefError> {
    let mut reader = Reader::new(input);
    reader.read_headers()?;
    reader.skip_whitespace();
    if reader.at_end() {
        return Err(reader.error("expected a value"));
    }
    let value = reader.read_value()?;
    reader.skip_whitespace();
    if !reader.at_end() {
        return Err(reader.error("trailing characters after value"));
    }
    Ok(value)
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    classes: HashMap<String, Vec<String>>,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            classes: HashMap::new(),
        }
    }

    fn error(&self, message: impl Into<String>) -> VbriefError {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count())
            + 1;
        VbriefError::Tron {
            line,
            column,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), VbriefError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    fn read_identifier(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        if len == 0 || rest.as_bytes()[0].is_ascii_digit() {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn starts_class_header(&self) -> bool {
        let rest = self.rest();
        rest.starts_with(CLASS_KEYWORD)
            && matches!(
                rest.as_bytes().get(CLASS_KEYWORD.len()),
                Some(b' ' | b'\t')
            )
    }

    fn read_headers(&mut self) -> Result<(), VbriefError> {
        loop {
            self.skip_whitespace();
            if !self.starts_class_header() {
                return Ok(());
            }
            self.pos += CLASS_KEYWORD.len();
            self.skip_inline_whitespace();
            let name = self
                .read_identifier()
                .ok_or_else(|| self.error("expected class name"))?
                .to_string();
            self.skip_inline_whitespace();
            self.expect(b':')?;

            let mut props = Vec::new();
            loop {
                self.skip_inline_whitespace();
                let prop = if self.peek() == Some(b'"') {
                    self.read_string()?
                } else {
                    self.read_identifier()
                        .ok_or_else(|| self.error("expected property name"))?
                        .to_string()
                };
                props.push(prop);
                self.skip_inline_whitespace();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(b'\n') | Some(b'\r') | None => break,
                    _ => return Err(self.error("expected ',' or end of line")),
                }
            }
            if self.classes.insert(name.clone(), props).is_some() {
                return Err(self.error(format!("class {name} declared twice")));
            }
        }
    }

    fn read_value(&mut self) -> Result<Value, VbriefError> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => self.nested(Self::read_object),
            Some(b'[') => self.nested(Self::read_array),
            Some(b'"') => Ok(Value::String(self.read_string()?)),
            Some(b'-' | b'0'..=b'9') => self.read_number(),
            Some(_) => self.read_word(),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Runs `read` one container level deeper.
    fn nested<T, F>(&mut self, read: F) -> Result<T, VbriefError>
    where
        F: FnOnce(&mut Self) -> Result<T, VbriefError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_object(&mut self) -> Result<Value, VbriefError> {
        self.expect(b'{')?;
        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(map));
        }
        loop {
            self.skip_whitespace();
            let key = self.read_string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            let value = self.read_value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn read_array(&mut self) -> Result<Value, VbriefError> {
        self.expect(b'[')?;
        let items = self.read_sequence(b']')?;
        Ok(Value::Array(items))
    }

    /// Comma-separated values up to `close`; the opener is already consumed.
    fn read_sequence(&mut self, close: u8) -> Result<Vec<Value>, VbriefError> {
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(items);
        }
        loop {
            items.push(self.read_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b) if b == close => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.error(format!("expected ',' or '{}'", close as char))),
            }
        }
    }

    fn read_string(&mut self) -> Result<String, VbriefError> {
        if self.peek() != Some(b'"') {
            return Err(self.error("expected string"));
        }
        let bytes = self.src.as_bytes();
        let mut end = self.pos + 1;
        loop {
            match bytes.get(end) {
                Some(b'\\') => end += 2,
                Some(b'"') => break,
                Some(_) => end += 1,
                None => return Err(self.error("unterminated string")),
            }
        }
        let literal = &self.src[self.pos..=end];
        let decoded: String = serde_json::from_str(literal)
            .map_err(|e| self.error(format!("invalid string: {e}")))?;
        self.pos = end + 1;
        Ok(decoded)
    }

    fn read_number(&mut self) -> Result<Value, VbriefError> {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
            .count();
        let number: serde_json::Number = serde_json::from_str(&rest[..len])
            .map_err(|e| self.error(format!("invalid number: {e}")))?;
        self.pos += len;
        Ok(Value::Number(number))
    }

    /// `true`, `false`, `null`, or a class instantiation `Name(args)`.
    fn read_word(&mut self) -> Result<Value, VbriefError> {
        let start = self.pos;
        let word = self
            .read_identifier()
            .ok_or_else(|| self.error("unexpected character"))?;
        match word {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "null" => return Ok(Value::Null),
            _ => {}
        }
        let Some(props) = self.classes.get(word).cloned() else {
            self.pos = start;
            return Err(self.error(format!("unknown class or keyword: {word}")));
        };
        self.expect(b'(')?;
        let args = self.nested(|reader| reader.read_sequence(b')'))?;
        if args.len() != props.len() {
            return Err(self.error(format!(
                "class {word} takes {} argument(s), got {}",
                props.len(),
                args.len()
            )));
        }
        Ok(Value::Object(props.into_iter().zip(args).collect()))
    }
}
