//! Strict parser for JavaScript object-literal *data*.
//!
//! Hand-authored config files use JavaScript syntax rather than JSON: keys are
//! usually unquoted, strings may use single quotes, trailing commas and
//! comments are common.  This parser accepts exactly that data subset and
//! produces a [`serde_json::Value`]:
//!
//! | Construct            | Accepted forms                                        |
//! |----------------------|-------------------------------------------------------|
//! | object               | `{ key: value, 'quoted': v, "q": v, 1: v, }`           |
//! | array                | `[ a, b, ]`                                           |
//! | string               | `"..."`, `'...'`, `` `...` `` (no `${}`)              |
//! | number               | `-1`, `+2`, `.5`, `1.5e3`, `0x1F`, `0o17`, `0b101`    |
//! | keyword              | `true`, `false`, `null`, `undefined` (read as null)   |
//! | comment              | `// line`, `/* block */`                              |
//!
//! Anything else is rejected, including bare identifiers and calls such as
//! `require(...)`.  Nothing is ever evaluated.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Deepest nesting of objects/arrays accepted before giving up.
pub const MAX_DEPTH: usize = 128;

/// A syntax error with its 1-based position in the parsed text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind} at line {line}, column {column}")]
pub struct LiteralError {
    pub kind: LiteralErrorKind,
    pub line: usize,
    pub column: usize,
}

/// What went wrong while parsing a literal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LiteralErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    /// A bare identifier in value position, e.g. `port: PORT`.
    #[error("unexpected identifier `{0}`")]
    UnexpectedIdentifier(String),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("invalid escape sequence")]
    InvalidEscape,

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("template interpolation `${{...}}` is not supported")]
    TemplateInterpolation,

    #[error("nesting deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

/// Parses `src` as a single literal value.
///
/// Leading and trailing whitespace and comments are allowed; any other
/// trailing text is an error.
///
/// # Errors
///
/// Returns [`LiteralError`] describing the first syntax error found.
///
/// # Examples
///
/// ```rust
/// use y2m_core::module_exports::parse_literal;
///
/// let value = parse_literal("{ host: 'localhost', port: 1883, }").unwrap();
/// assert_eq!(value["host"], "localhost");
/// assert_eq!(value["port"], 1883);
/// ```
pub fn parse_literal(src: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { src, pos: 0 };
    parser.skip_trivia()?;
    let value = parser.parse_value(0)?;
    parser.skip_trivia()?;
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(parser.error(LiteralErrorKind::UnexpectedChar(c))),
    }
}

/// Returns `true` if `key` can be written without quotes.
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Parser<'a> {
    src: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, kind: LiteralErrorKind) -> LiteralError {
        self.error_at(self.pos, kind)
    }

    fn error_at(&self, pos: usize, kind: LiteralErrorKind) -> LiteralError {
        let before = &self.src[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        LiteralError { kind, line, column }
    }

    /// Error for the character under the cursor, or end of input.
    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(c) => self.error(LiteralErrorKind::UnexpectedChar(c)),
            None => self.error(LiteralErrorKind::UnexpectedEnd),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Skips whitespace, a byte-order mark, and comments.
    fn skip_trivia(&mut self) -> Result<(), LiteralError> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() || c == '\u{FEFF}' => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    match self.src[self.pos + 2..].find("*/") {
                        Some(offset) => self.pos += 2 + offset + 2,
                        None => {
                            return Err(self.error_at(start, LiteralErrorKind::UnterminatedComment))
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        match self.peek() {
            None => Err(self.error(LiteralErrorKind::UnexpectedEnd)),
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some(quote @ ('"' | '\'')) => self.parse_string(quote).map(Value::String),
            Some('`') => self.parse_template().map(Value::String),
            Some('-' | '+' | '.' | '0'..='9') => self.parse_number().map(Value::Number),
            Some(c) if is_ident_start(c) => {
                let start = self.pos;
                let ident = self.read_identifier();
                match ident {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" | "undefined" => Ok(Value::Null),
                    "Infinity" | "NaN" => Err(self.error_at(
                        start,
                        LiteralErrorKind::InvalidNumber(ident.to_string()),
                    )),
                    other => Err(self.error_at(
                        start,
                        LiteralErrorKind::UnexpectedIdentifier(other.to_string()),
                    )),
                }
            }
            Some(c) => Err(self.error(LiteralErrorKind::UnexpectedChar(c))),
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth >= MAX_DEPTH {
            return Err(self.error(LiteralErrorKind::TooDeep));
        }
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = self.parse_key()?;
            self.skip_trivia()?;
            self.expect(':')?;
            self.skip_trivia()?;
            let value = self.parse_value(depth + 1)?;
            // Later duplicates win, as in JavaScript.
            map.insert(key, value);
            self.skip_trivia()?;
            if !self.eat(',') {
                self.skip_trivia()?;
                self.expect('}')?;
                return Ok(Value::Object(map));
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, LiteralError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_string(quote),
            Some('0'..='9' | '.') => self.parse_number().map(|n| number_key(&n)),
            Some(c) if is_ident_start(c) => Ok(self.read_identifier().to_string()),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth >= MAX_DEPTH {
            return Err(self.error(LiteralErrorKind::TooDeep));
        }
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value(depth + 1)?);
            self.skip_trivia()?;
            if !self.eat(',') {
                self.expect(']')?;
                return Ok(Value::Array(items));
            }
        }
    }

    fn read_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_continue(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    // ── Strings ───────────────────────────────────────────────────────────────

    fn parse_string(&mut self, quote: char) -> Result<String, LiteralError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n' | '\r') => {
                    return Err(self.error_at(start, LiteralErrorKind::UnterminatedString))
                }
                Some('\\') => self.parse_escape(&mut out, start)?,
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_template(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_at(start, LiteralErrorKind::UnterminatedString)),
                Some('`') => return Ok(out),
                Some('\\') => self.parse_escape(&mut out, start)?,
                Some('$') if self.peek() == Some('{') => {
                    return Err(self.error(LiteralErrorKind::TemplateInterpolation))
                }
                Some('\r') => {
                    self.eat('\n');
                    out.push('\n');
                }
                Some(c) => out.push(c),
            }
        }
    }

    /// Decodes the escape following a backslash and appends it to `out`.
    fn parse_escape(&mut self, out: &mut String, string_start: usize) -> Result<(), LiteralError> {
        let escape_pos = self.pos.saturating_sub(1);
        let Some(c) = self.bump() else {
            return Err(self.error_at(string_start, LiteralErrorKind::UnterminatedString));
        };
        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !self.peek().is_some_and(|n| n.is_ascii_digit()) => out.push('\0'),
            '1'..='9' | '0' => {
                return Err(self.error_at(escape_pos, LiteralErrorKind::InvalidEscape))
            }
            'x' => {
                let code = self.read_hex(2, escape_pos)?;
                out.push(self.code_point(code, escape_pos)?);
            }
            'u' => {
                let code = self.read_unicode_escape(escape_pos)?;
                out.push(code);
            }
            // Line continuation: the backslash and the line break vanish.
            '\r' => {
                self.eat('\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
        Ok(())
    }

    fn read_unicode_escape(&mut self, escape_pos: usize) -> Result<char, LiteralError> {
        if self.eat('{') {
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            let digits = &self.src[start..self.pos];
            if digits.is_empty() || !self.eat('}') {
                return Err(self.error_at(escape_pos, LiteralErrorKind::InvalidEscape));
            }
            let code = u32::from_str_radix(digits, 16)
                .map_err(|_| self.error_at(escape_pos, LiteralErrorKind::InvalidEscape))?;
            return self.code_point(code, escape_pos);
        }

        let high = self.read_hex(4, escape_pos)?;
        if !(0xD800..=0xDBFF).contains(&high) {
            return self.code_point(high, escape_pos);
        }
        // A high surrogate must be followed by `\u` and a low surrogate.
        if !(self.eat('\\') && self.eat('u')) {
            return Err(self.error_at(escape_pos, LiteralErrorKind::InvalidEscape));
        }
        let low = self.read_hex(4, escape_pos)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(self.error_at(escape_pos, LiteralErrorKind::InvalidEscape));
        }
        self.code_point(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00), escape_pos)
    }

    fn read_hex(&mut self, len: usize, escape_pos: usize) -> Result<u32, LiteralError> {
        let mut code = 0u32;
        for _ in 0..len {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at(escape_pos, LiteralErrorKind::InvalidEscape))?;
            self.bump();
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn code_point(&self, code: u32, escape_pos: usize) -> Result<char, LiteralError> {
        char::from_u32(code).ok_or_else(|| self.error_at(escape_pos, LiteralErrorKind::InvalidEscape))
    }

    // ── Numbers ───────────────────────────────────────────────────────────────

    fn parse_number(&mut self) -> Result<Number, LiteralError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };

        let radix = match (self.peek(), self.peek_second()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };
        let number = match radix {
            Some(radix) => {
                self.pos += 2;
                let digits_start = self.pos;
                while self.peek().is_some_and(|c| c.is_digit(radix) || c == '_') {
                    self.bump();
                }
                let digits = self.src[digits_start..self.pos].replace('_', "");
                u64::from_str_radix(&digits, radix)
                    .ok()
                    .and_then(|magnitude| signed_integer(magnitude, negative))
            }
            None => self.scan_decimal(negative),
        };

        // `1abc`, `0x` and `-Infinity` are not numbers either.
        let trailing = self.peek().is_some_and(is_ident_continue);
        if trailing {
            self.read_identifier();
        }
        match number {
            Some(number) if !trailing => Ok(number),
            _ => {
                let text = self.src[start..self.pos].to_string();
                Err(self.error_at(start, LiteralErrorKind::InvalidNumber(text)))
            }
        }
    }

    /// Scans `digits [. digits] [e [+-] digits]` after an optional sign.
    fn scan_decimal(&mut self, negative: bool) -> Option<Number> {
        let body_start = self.pos;
        let mut int_digits = 0usize;
        let mut frac_digits = 0usize;
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            int_digits += 1;
        }
        if self.peek() == Some('.') {
            self.bump();
            is_float = true;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                frac_digits += 1;
            }
        }
        if int_digits + frac_digits == 0 {
            return None;
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let exp_start = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            let mut exp_digits = 0usize;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                exp_digits += 1;
            }
            if exp_digits == 0 {
                // Leave the bad exponent for the trailing-identifier check.
                self.pos = exp_start;
                return None;
            }
            is_float = true;
        }

        let body = &self.src[body_start..self.pos];
        if !is_float {
            if let Ok(magnitude) = body.parse::<u64>() {
                return signed_integer(magnitude, negative);
            }
        }
        let magnitude: f64 = body.parse().ok()?;
        Number::from_f64(if negative { -magnitude } else { magnitude })
    }
}

/// Property name of a numeric key.  `1e3` and `1000` name the same key.
fn number_key(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float.to_string(),
        _ => number.to_string(),
    }
}

/// Builds an integer [`Number`], falling back to a float for huge negatives.
fn signed_integer(magnitude: u64, negative: bool) -> Option<Number> {
    if !negative {
        return Some(Number::from(magnitude));
    }
    match i64::try_from(magnitude) {
        Ok(value) => Some(Number::from(-value)),
        Err(_) => Number::from_f64(-(magnitude as f64)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
