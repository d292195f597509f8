//! Lenient repair of near-JSON tool input
//!
//! Models often emit tool arguments that are almost JSON: single quotes,
//! bare keys, trailing commas, comments, unclosed strings or brackets, or
//! prose around the object. [`repair_json`] scans such text with a forgiving
//! recursive-descent reader and re-serializes whatever structure it recovers.
//! [`safe_repair`] wraps it with the guards used for tool input.
//!
//! Fixes applied by the reader:
//!
//! - text before the first `{` or `[` and after the matching close is dropped
//! - single-quoted strings become double-quoted
//! - bare keys are quoted, bare words become strings
//! - `True`/`False`/`None` become `true`/`false`/`null`
//! - trailing and repeated commas are removed
//! - `//` and `/* */` comments are removed
//! - unclosed strings, objects and arrays are closed
//! - a quote followed by more text is kept as a literal quote

use serde_json::{Map, Value};
use tracing::debug;

/// Nesting beyond this depth is dropped
const MAX_DEPTH: usize = 128;

/// Repair results that mean nothing useful was recovered
const DEGENERATE_RESULTS: [&str; 2] = ["\"\"", "{}"];

/// Best-effort repair of a tool-input fragment. Never fails.
///
/// 1. Fragments shaped like an array are returned unchanged.
/// 2. `"""` is collapsed to `"`.
/// 3. The result is run through [`repair_json`].
/// 4. A degenerate repair (`""` or `{}`) falls back to the step 2 text.
pub fn safe_repair(fragment: &str) -> String {
    let trimmed = fragment.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return fragment.to_string();
    }

    let normalized = fragment.replace("\"\"\"", "\"");
    let repaired = repair_json(&normalized);

    if DEGENERATE_RESULTS.contains(&repaired.as_str()) {
        debug!(
            fragment_len = normalized.len(),
            "Repair collapsed tool input, keeping original"
        );
        return normalized;
    }

    repaired
}

/// Repair near-JSON text and serialize the result.
///
/// Returns `""` (an empty JSON string) when the text contains no object or
/// array to recover.
pub fn repair_json(input: &str) -> String {
    repair_value(input)
        .unwrap_or_else(|| Value::String(String::new()))
        .to_string()
}

/// Repair near-JSON text into a value, if any structure is present
pub fn repair_value(input: &str) -> Option<Value> {
    LenientReader::new(input).read_document()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

struct LenientReader {
    chars: Vec<char>,
    pos: usize,
    open: Vec<Container>,
}

impl LenientReader {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            open: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn read_document(&mut self) -> Option<Value> {
        while let Some(c) = self.peek() {
            match c {
                '{' => return Some(self.read_object()),
                '[' => return Some(self.read_array()),
                _ => self.pos += 1,
            }
        }
        None
    }

    fn read_value(&mut self) -> Option<Value> {
        self.skip_ignorable();
        match self.peek()? {
            '{' => Some(self.read_object()),
            '[' => Some(self.read_array()),
            quote @ ('"' | '\'') => Some(Value::String(self.read_string(quote))),
            ',' | ':' | '}' | ']' => None,
            _ => Some(self.read_bare_value()),
        }
    }

    fn read_object(&mut self) -> Value {
        self.pos += 1;
        if !self.enter(Container::Object) {
            return Value::Null;
        }

        let mut map = Map::new();
        loop {
            self.skip_ignorable();
            let start = self.pos;
            match self.peek() {
                None => break,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(']') if self.closes_outer(Container::Array) => break,
                Some(',') | Some(']') | Some(':') => self.pos += 1,
                Some(c) => {
                    let key = match c {
                        '"' | '\'' => self.read_string(c),
                        _ => self.read_bare_key(),
                    };
                    self.skip_ignorable();
                    if self.peek() == Some(':') {
                        self.pos += 1;
                        let value = self
                            .read_value()
                            .unwrap_or_else(|| Value::String(String::new()));
                        map.insert(key, value);
                    }
                }
            }
            if self.pos == start {
                self.pos += 1;
            }
        }

        self.open.pop();
        Value::Object(map)
    }

    fn read_array(&mut self) -> Value {
        self.pos += 1;
        if !self.enter(Container::Array) {
            return Value::Null;
        }

        let mut items = Vec::new();
        loop {
            self.skip_ignorable();
            let start = self.pos;
            match self.peek() {
                None => break,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some('}') if self.closes_outer(Container::Object) => break,
                Some(',') | Some('}') | Some(':') => self.pos += 1,
                Some(_) => {
                    if let Some(value) = self.read_value() {
                        items.push(value);
                    }
                }
            }
            if self.pos == start {
                self.pos += 1;
            }
        }

        self.open.pop();
        Value::Array(items)
    }

    /// Push a container, or drop the rest of the input if nesting is too deep
    fn enter(&mut self, container: Container) -> bool {
        if self.open.len() >= MAX_DEPTH {
            self.pos = self.chars.len();
            return false;
        }
        self.open.push(container);
        true
    }

    /// Whether a mismatched closer belongs to an enclosing container
    fn closes_outer(&self, container: Container) -> bool {
        let outer = &self.open[..self.open.len().saturating_sub(1)];
        outer.contains(&container)
    }

    fn read_string(&mut self, quote: char) -> String {
        self.pos += 1;
        let mut out = String::new();

        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '\\' => self.read_escape(&mut out),
                c if c == quote => {
                    if self.quote_closes_string() {
                        return out;
                    }
                    out.push(c);
                }
                c => out.push(c),
            }
        }

        out
    }

    /// A quote closes its string when structure, the end of input, or a new
    /// string after whitespace follows it
    fn quote_closes_string(&self) -> bool {
        let mut offset = 0;
        while let Some(c) = self.peek_at(offset) {
            if !c.is_whitespace() {
                return match c {
                    ',' | ':' | '}' | ']' => true,
                    '"' | '\'' => offset > 0,
                    '/' => matches!(self.peek_at(offset + 1), Some('/' | '*')),
                    _ => false,
                };
            }
            offset += 1;
        }
        true
    }

    fn read_escape(&mut self, out: &mut String) {
        let Some(c) = self.peek() else {
            out.push('\\');
            return;
        };
        self.pos += 1;

        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            '"' | '\'' | '\\' | '/' => out.push(c),
            'u' => match self.hex4_at(0) {
                Some(high @ 0xD800..=0xDBFF) => {
                    self.pos += 4;
                    let low = (self.peek() == Some('\\') && self.peek_at(1) == Some('u'))
                        .then(|| self.hex4_at(2))
                        .flatten()
                        .filter(|low| (0xDC00..=0xDFFF).contains(low));
                    match low {
                        Some(low) => {
                            self.pos += 6;
                            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                        }
                        None => out.push(char::REPLACEMENT_CHARACTER),
                    }
                }
                Some(code) => {
                    self.pos += 4;
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                None => out.push_str("\\u"),
            },
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    /// Four hex digits starting `offset` chars ahead, as a code unit
    fn hex4_at(&self, offset: usize) -> Option<u32> {
        let hex: String = (offset..offset + 4).filter_map(|i| self.peek_at(i)).collect();
        if hex.len() != 4 {
            return None;
        }
        u32::from_str_radix(&hex, 16).ok()
    }

    fn read_bare_key(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ':' | ',' | '{' | '}' | '[' | ']' | '"' | '\'') {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .trim()
            .to_string()
    }

    fn read_bare_value(&mut self) -> Value {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ',' | '}' | ']' | '\n') {
                break;
            }
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        bare_token_value(token.trim())
    }

    /// Skip whitespace and comments
    fn skip_ignorable(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => self.pos += 1,
                (Some('/'), Some('/')) => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    while self.pos < self.chars.len() && !self.at_block_comment_end() {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.chars.len());
                }
                _ => return,
            }
        }
    }

    fn at_block_comment_end(&self) -> bool {
        self.peek() == Some('*') && self.peek_at(1) == Some('/')
    }
}

/// Interpret an unquoted token as a literal, number or string
fn bare_token_value(token: &str) -> Value {
    match token {
        "true" | "True" => return Value::Bool(true),
        "false" | "False" => return Value::Bool(false),
        "null" | "None" => return Value::Null,
        _ => {}
    }

    match serde_json::from_str::<Value>(token) {
        Ok(number @ Value::Number(_)) => number,
        _ => Value::String(token.to_string()),
    }
}
