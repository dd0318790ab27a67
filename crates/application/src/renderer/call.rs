//! Call expression parser for `{{ $name(arg, ...) }}`
//!
//! A small recursive-descent parser. The grammar is deliberately narrow:
//!
//! ```text
//! call      := "{{" "{"? ws callee ws "(" ws arguments? ws ")" ws "}}" "}"?
//! callee    := "$" ident_char+
//! arguments := argument ("," argument)* ","?
//! argument  := string | number | "true" | "false" | "null" | <other>
//! number    := "-"? (decimal | "0x" hex+ | "0o" octal+ | "0b" binary+)
//! ```
//!
//! `<other>` is any balanced expression (a variable, a nested call, an
//! operator expression); it parses as [`Argument::Undefined`] rather than
//! failing. It may not contain `{{` or `}}` outside a quoted string.
//! Anything outside this grammar is not a call.
//!
//! Scanning is linear in the input: a failed attempt stops at the next
//! brace pair, and a quote found to be unterminated is never rescanned.

use std::ops::Range;

use serde_json::{Number, Value};
use tessera_domain::Argument;

/// A call expression located in a string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCall {
    /// Function name, sigil included.
    pub name: String,

    /// Positional arguments.
    pub args: Vec<Argument>,

    /// Byte range of the whole `{{ ... }}` expression.
    pub span: Range<usize>,
}

/// Returns the first call expression in `text`, if any.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tessera_application::renderer::try_parse_call;
/// use tessera_domain::Argument;
///
/// let call = try_parse_call("ts={{ $add(1, 'two') }}").unwrap();
/// assert_eq!(call.name, "$add");
/// assert_eq!(
///     call.args,
///     vec![Argument::Literal(json!(1)), Argument::Literal(json!("two"))]
/// );
/// assert_eq!(call.span, 3..23);
///
/// assert!(try_parse_call("{{ plain.path }}").is_none());
/// ```
#[must_use]
pub fn try_parse_call(text: &str) -> Option<ParsedCall> {
    CallScanner::new(text).next()
}

/// Returns every call expression in `text`, left to right and non-overlapping.
#[must_use]
pub fn find_calls(text: &str) -> Vec<ParsedCall> {
    CallScanner::new(text).collect()
}

struct CallScanner<'a> {
    text: &'a str,
    from: usize,
    unterminated: Unterminated,
}

impl<'a> CallScanner<'a> {
    const fn new(text: &'a str) -> Self {
        Self {
            text,
            from: 0,
            unterminated: Unterminated::new(),
        }
    }
}

impl Iterator for CallScanner<'_> {
    type Item = ParsedCall;

    fn next(&mut self) -> Option<ParsedCall> {
        while let Some(offset) = self.text.get(self.from..)?.find("{{") {
            let start = self.from + offset;
            if let Some(call) = Parser::at(self.text, start, &mut self.unterminated).call() {
                self.from = call.span.end;
                return Some(call);
            }
            self.from = start + 1;
        }
        self.from = self.text.len();
        None
    }
}

/// Earliest opening offset, per quote kind, of a quoted string that ran to
/// the end of the input.
///
/// Any later string opened with the same quote is unterminated as well, so
/// it can be rejected without rescanning the tail of the input.
#[derive(Debug, Clone, Copy)]
struct Unterminated([usize; 3]);

impl Unterminated {
    const fn new() -> Self {
        Self([usize::MAX; 3])
    }

    const fn slot(quote: char) -> usize {
        match quote {
            '"' => 0,
            '\'' => 1,
            _ => 2,
        }
    }

    const fn covers(&self, quote: char, open: usize) -> bool {
        open >= self.0[Self::slot(quote)]
    }

    const fn record(&mut self, quote: char, open: usize) {
        let slot = &mut self.0[Self::slot(quote)];
        if open < *slot {
            *slot = open;
        }
    }
}

struct Parser<'a, 'm> {
    src: &'a str,
    pos: usize,
    unterminated: &'m mut Unterminated,
}

impl<'a, 'm> Parser<'a, 'm> {
    const fn at(src: &'a str, pos: usize, unterminated: &'m mut Unterminated) -> Self {
        Self {
            src,
            pos,
            unterminated,
        }
    }

    fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn call(mut self) -> Option<ParsedCall> {
        let start = self.pos;
        if !self.eat_str("{{") {
            return None;
        }
        self.eat('{');
        self.skip_whitespace();
        let name = self.callee()?;
        self.skip_whitespace();
        if !self.eat('(') {
            return None;
        }
        let args = self.arguments()?;
        self.skip_whitespace();
        if !self.eat_str("}}") {
            return None;
        }
        self.eat('}');

        Some(ParsedCall {
            name,
            args,
            span: start..self.pos,
        })
    }

    fn callee(&mut self) -> Option<String> {
        let start = self.pos;
        if !self.eat('$') {
            return None;
        }
        let ident_start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == ident_start {
            return None;
        }
        Some(self.src[start..self.pos].to_string())
    }

    /// Parses arguments up to and including the closing `)`.
    fn arguments(&mut self) -> Option<Vec<Argument>> {
        let mut args = Vec::new();
        self.skip_whitespace();
        if self.eat(')') {
            return Some(args);
        }

        loop {
            args.push(self.argument()?);
            self.skip_whitespace();
            if self.eat(')') {
                return Some(args);
            }
            if !self.eat(',') {
                return None;
            }
            self.skip_whitespace();
            if self.eat(')') {
                return Some(args);
            }
        }
    }

    fn argument(&mut self) -> Option<Argument> {
        self.skip_whitespace();
        let start = self.pos;

        let literal = match self.peek()? {
            quote @ ('"' | '\'') => self.string_literal(quote),
            c if c.is_ascii_digit() || c == '-' || c == '.' => self.number_literal(),
            c if is_ident_char(c) => self.keyword_literal(),
            _ => None,
        };

        self.skip_whitespace();
        if let Some(value) = literal
            && matches!(self.peek(), Some(',' | ')'))
        {
            return Some(Argument::Literal(value));
        }

        self.pos = start;
        self.skip_expression()?;
        Some(Argument::Undefined)
    }

    /// Consumes a quoted string and returns its raw contents, escapes intact.
    fn quoted(&mut self, quote: char) -> Option<&'a str> {
        let open = self.pos;
        if self.unterminated.covers(quote, open) {
            return None;
        }
        self.bump();
        let start = self.pos;

        loop {
            match self.bump() {
                Some('\\') => {
                    if self.bump().is_none() {
                        break;
                    }
                }
                Some(c) if c == quote => {
                    return self.src.get(start..self.pos - quote.len_utf8());
                }
                Some(_) => {}
                None => break,
            }
        }

        self.unterminated.record(quote, open);
        None
    }

    fn string_literal(&mut self, quote: char) -> Option<Value> {
        let raw = self.quoted(quote)?;
        unescape(raw).map(Value::String)
    }

    fn number_literal(&mut self) -> Option<Value> {
        let start = self.pos;
        let negative = self.eat('-');
        if let Some(radix) = self.radix_prefix() {
            return self.radix_digits(radix, negative);
        }

        let mut digits = self.digits();
        if self.eat('.') {
            digits += self.digits();
        }
        if digits == 0 {
            return None;
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if !self.eat('+') {
                self.eat('-');
            }
            if self.digits() == 0 {
                return None;
            }
        }

        let raw = &self.src[start..self.pos];
        if let Ok(int) = raw.parse::<i64>() {
            return Some(Value::from(int));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
    }

    /// Consumes a `0x`, `0o` or `0b` prefix.
    fn radix_prefix(&mut self) -> Option<u32> {
        let radix = match self.rest().get(..2)? {
            "0x" | "0X" => 16,
            "0o" | "0O" => 8,
            "0b" | "0B" => 2,
            _ => return None,
        };
        self.pos += 2;
        Some(radix)
    }

    fn radix_digits(&mut self, radix: u32, negative: bool) -> Option<Value> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_digit(radix)) {
            self.bump();
        }
        let magnitude = i64::from_str_radix(&self.src[start..self.pos], radix).ok()?;
        Some(Value::from(if negative { -magnitude } else { magnitude }))
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            count += 1;
        }
        count
    }

    fn keyword_literal(&mut self) -> Option<Value> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            "null" => Some(Value::Null),
            _ => None,
        }
    }

    /// Skips a non-empty, bracket-balanced expression ending before a
    /// top-level `,` or `)`.
    ///
    /// A `{{` or `}}` outside a quoted string ends the attempt: the call
    /// cannot extend past its own placeholder.
    fn skip_expression(&mut self) -> Option<()> {
        let start = self.pos;
        let mut depth = 0usize;

        loop {
            let rest = self.rest();
            if rest.starts_with("{{") || rest.starts_with("}}") {
                return None;
            }
            match self.peek()? {
                ',' | ')' if depth == 0 => break,
                '(' | '[' | '{' => {
                    depth += 1;
                    self.bump();
                }
                ')' | ']' | '}' => {
                    depth = depth.checked_sub(1)?;
                    self.bump();
                }
                quote @ ('"' | '\'' | '`') => {
                    self.quoted(quote)?;
                }
                _ => {
                    self.bump();
                }
            }
        }

        if self.src[start..self.pos].trim().is_empty() {
            None
        } else {
            Some(())
        }
    }
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
            other => other,
        });
    }

    Some(out)
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
