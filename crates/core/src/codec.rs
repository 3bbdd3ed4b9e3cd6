// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compact JSON5-like wire codec for [`MeterData`].
//!
//! The writer appends `key:value` pairs separated by commas, without the
//! enclosing braces (the emission layer owns the envelope). Fields equal to
//! their zero value are omitted. The reader accepts a brace-enclosed object
//! of the same shape and performs a partial update: only keys present in the
//! input overwrite fields, unknown keys are skipped.
//!
//! The short-key table is frozen; producer and consumer must match
//! byte-for-byte:
//!
//! | key | field | key | field |
//! |-----|-------|-----|-------|
//! | `s` | session_uuid | `i`  | current_iteration |
//! | `pos` | position   | `ei` | expected_iterations |
//! | `c` | category     | `ok` | ok_path |
//! | `n` | operation    | `rj` | reject_path |
//! | `p` | parent       | `fl` | fail_path |
//! | `d` | description  | `fm` | fail_message |
//! | `ct` | create_time | `ctx` | context (nested object) |
//! | `st` | start_time  | `hc hx hu` | heap committed/max/used |
//! | `sp` | stop_time   | `nc nx nu` | non-heap committed/max/used |
//! | `lc` | last_current_time | `pf` | pending_finalization_count |
//! | `tl` | time_limit  | `ll lt lu` | classes loaded/total/unloaded |
//! | `cp` | compilation_time | `gc gt` | collector count/time |
//! | `ru rx rt` | runtime used/max/total memory | `sl` | system_load |

use crate::data::MeterData;
use indexmap::IndexMap;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// Reader-side parse failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected '{expected}' at byte {at}")]
    Expected { expected: char, at: usize },
    #[error("unexpected '{found}' at byte {at}")]
    UnexpectedChar { found: char, at: usize },
    #[error("empty key at byte {0}")]
    EmptyKey(usize),
    #[error("invalid number '{value}' for key '{key}'")]
    InvalidNumber { key: String, value: String },
}

impl MeterData {
    /// Append the compact form of this record to `out`, without braces.
    pub fn write_json5(&self, out: &mut String) {
        let mut w = FieldWriter::new(out);
        w.string("s", &self.session_uuid);
        w.u64("pos", self.position);
        w.string("c", &self.category);
        w.string("n", &self.operation);
        w.string("p", &self.parent);
        w.string("d", &self.description);
        w.u64("ct", self.create_time);
        w.u64("st", self.start_time);
        w.u64("sp", self.stop_time);
        w.u64("lc", self.last_current_time);
        w.u64("tl", self.time_limit);
        w.u64("i", self.current_iteration);
        w.u64("ei", self.expected_iterations);
        w.opt("ok", &self.ok_path);
        w.opt("rj", &self.reject_path);
        w.opt("fl", &self.fail_path);
        w.opt("fm", &self.fail_message);
        w.u64("hc", self.heap_committed);
        w.u64("hx", self.heap_max);
        w.u64("hu", self.heap_used);
        w.u64("nc", self.non_heap_committed);
        w.u64("nx", self.non_heap_max);
        w.u64("nu", self.non_heap_used);
        w.u64("pf", self.pending_finalization_count);
        w.u64("ll", self.classes_loaded);
        w.u64("lt", self.classes_total);
        w.u64("lu", self.classes_unloaded);
        w.u64("cp", self.compilation_time);
        w.u64("gc", self.collector_count);
        w.u64("gt", self.collector_time);
        w.u64("ru", self.runtime_used_memory);
        w.u64("rx", self.runtime_max_memory);
        w.u64("rt", self.runtime_total_memory);
        w.f64("sl", self.system_load);
        w.map("ctx", &self.context);
    }

    /// The compact form as a fresh string, without braces.
    pub fn to_json5(&self) -> String {
        let mut out = String::with_capacity(64);
        self.write_json5(&mut out);
        out
    }

    /// Partial-update parse of a brace-enclosed compact object.
    ///
    /// Keys absent from the input leave the corresponding fields untouched;
    /// `{}` is a no-op. Unknown keys are skipped. Anything after the closing
    /// brace is ignored.
    pub fn read_json5(&mut self, input: &str) -> Result<(), CodecError> {
        Parser::new(input).parse_object(self)
    }
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct FieldWriter<'a> {
    out: &'a mut String,
    first: bool,
}

impl<'a> FieldWriter<'a> {
    fn new(out: &'a mut String) -> Self {
        Self { out, first: true }
    }

    fn key(&mut self, key: &str) {
        if !self.first {
            self.out.push(',');
        }
        self.first = false;
        self.out.push_str(key);
        self.out.push(':');
    }

    fn string(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        self.key(key);
        push_string(self.out, value);
    }

    fn opt(&mut self, key: &str, value: &Option<String>) {
        if let Some(v) = value {
            self.key(key);
            push_string(self.out, v);
        }
    }

    fn u64(&mut self, key: &str, value: u64) {
        if value == 0 {
            return;
        }
        self.key(key);
        self.out.push_str(&value.to_string());
    }

    fn f64(&mut self, key: &str, value: f64) {
        if value == 0.0 {
            return;
        }
        self.key(key);
        self.out.push_str(&value.to_string());
    }

    fn map(&mut self, key: &str, map: &IndexMap<String, String>) {
        if map.is_empty() {
            return;
        }
        self.key(key);
        self.out.push('{');
        let mut first = true;
        for (k, v) in map {
            if !first {
                self.out.push(',');
            }
            first = false;
            push_string(self.out, k);
            self.out.push(':');
            push_string(self.out, v);
        }
        self.out.push('}');
    }
}

/// A string is emitted bare unless it would collide with the syntax.
fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || s.chars()
            .any(|c| matches!(c, ',' | ':' | '{' | '}' | '\'' | '"' | '\\'))
}

fn push_string(out: &mut String, s: &str) {
    if !needs_quoting(s) {
        out.push_str(s);
        return;
    }
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

// ── Reader ──────────────────────────────────────────────────────────────────

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            len: input.len(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn pos(&mut self) -> usize {
        self.chars.peek().map(|&(i, _)| i).unwrap_or(self.len)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), CodecError> {
        let at = self.pos();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(_) => Err(CodecError::Expected { expected, at }),
            None => Err(CodecError::UnexpectedEnd),
        }
    }

    fn parse_object(&mut self, data: &mut MeterData) -> Result<(), CodecError> {
        self.skip_ws();
        self.expect('{')?;
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(());
        }
        loop {
            let key = self.parse_key()?;
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            self.apply(data, &key)?;
            self.skip_ws();
            let at = self.pos();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(());
                    }
                }
                Some('}') => return Ok(()),
                Some(_) => return Err(CodecError::Expected { expected: ',', at }),
                None => return Err(CodecError::UnexpectedEnd),
            }
        }
    }

    fn apply(&mut self, data: &mut MeterData, key: &str) -> Result<(), CodecError> {
        match key {
            "s" => data.session_uuid = self.parse_scalar()?,
            "c" => data.category = self.parse_scalar()?,
            "n" => data.operation = self.parse_scalar()?,
            "p" => data.parent = self.parse_scalar()?,
            "d" => data.description = self.parse_scalar()?,
            "ok" => data.ok_path = Some(self.parse_scalar()?),
            "rj" => data.reject_path = Some(self.parse_scalar()?),
            "fl" => data.fail_path = Some(self.parse_scalar()?),
            "fm" => data.fail_message = Some(self.parse_scalar()?),
            "pos" => data.position = self.parse_u64(key)?,
            "ct" => data.create_time = self.parse_u64(key)?,
            "st" => data.start_time = self.parse_u64(key)?,
            "sp" => data.stop_time = self.parse_u64(key)?,
            "lc" => data.last_current_time = self.parse_u64(key)?,
            "tl" => data.time_limit = self.parse_u64(key)?,
            "i" => data.current_iteration = self.parse_u64(key)?,
            "ei" => data.expected_iterations = self.parse_u64(key)?,
            "hc" => data.heap_committed = self.parse_u64(key)?,
            "hx" => data.heap_max = self.parse_u64(key)?,
            "hu" => data.heap_used = self.parse_u64(key)?,
            "nc" => data.non_heap_committed = self.parse_u64(key)?,
            "nx" => data.non_heap_max = self.parse_u64(key)?,
            "nu" => data.non_heap_used = self.parse_u64(key)?,
            "pf" => data.pending_finalization_count = self.parse_u64(key)?,
            "ll" => data.classes_loaded = self.parse_u64(key)?,
            "lt" => data.classes_total = self.parse_u64(key)?,
            "lu" => data.classes_unloaded = self.parse_u64(key)?,
            "cp" => data.compilation_time = self.parse_u64(key)?,
            "gc" => data.collector_count = self.parse_u64(key)?,
            "gt" => data.collector_time = self.parse_u64(key)?,
            "ru" => data.runtime_used_memory = self.parse_u64(key)?,
            "rx" => data.runtime_max_memory = self.parse_u64(key)?,
            "rt" => data.runtime_total_memory = self.parse_u64(key)?,
            "sl" => data.system_load = self.parse_f64(key)?,
            "ctx" => data.context = self.parse_map()?,
            _ => self.skip_value()?,
        }
        Ok(())
    }

    fn parse_key(&mut self) -> Result<String, CodecError> {
        self.skip_ws();
        let at = self.pos();
        let key = match self.peek() {
            Some(q @ ('\'' | '"')) => self.parse_quoted(q)?,
            _ => self.parse_bare()?,
        };
        if key.is_empty() {
            return Err(CodecError::EmptyKey(at));
        }
        Ok(key)
    }

    fn parse_scalar(&mut self) -> Result<String, CodecError> {
        self.skip_ws();
        match self.peek() {
            Some(q @ ('\'' | '"')) => self.parse_quoted(q),
            Some('{') => Err(CodecError::UnexpectedChar {
                found: '{',
                at: self.pos(),
            }),
            Some(_) => self.parse_bare(),
            None => Err(CodecError::UnexpectedEnd),
        }
    }

    /// Unquoted run up to the next separator, surrounding whitespace trimmed.
    fn parse_bare(&mut self) -> Result<String, CodecError> {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if matches!(c, ',' | ':' | '{' | '}') {
                break;
            }
            value.push(c);
            self.bump();
        }
        Ok(value.trim().to_string())
    }

    fn parse_quoted(&mut self, quote: char) -> Result<String, CodecError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(CodecError::UnexpectedEnd),
                Some('\\') => match self.bump() {
                    None => return Err(CodecError::UnexpectedEnd),
                    Some(c) => value.push(c),
                },
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_u64(&mut self, key: &str) -> Result<u64, CodecError> {
        let raw = self.parse_scalar()?;
        raw.parse().map_err(|_| CodecError::InvalidNumber {
            key: key.to_string(),
            value: raw,
        })
    }

    fn parse_f64(&mut self, key: &str) -> Result<f64, CodecError> {
        let raw = self.parse_scalar()?;
        raw.parse().map_err(|_| CodecError::InvalidNumber {
            key: key.to_string(),
            value: raw,
        })
    }

    fn parse_map(&mut self) -> Result<IndexMap<String, String>, CodecError> {
        let mut map = IndexMap::new();
        self.skip_ws();
        self.expect('{')?;
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(map);
        }
        loop {
            let key = self.parse_key()?;
            self.skip_ws();
            self.expect(':')?;
            let value = self.parse_scalar()?;
            map.insert(key, value);
            self.skip_ws();
            let at = self.pos();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(map);
                    }
                }
                Some('}') => return Ok(map),
                Some(_) => return Err(CodecError::Expected { expected: ',', at }),
                None => return Err(CodecError::UnexpectedEnd),
            }
        }
    }

    /// Consume and discard a value of unknown shape (scalar or nested object).
    fn skip_value(&mut self) -> Result<(), CodecError> {
        self.skip_ws();
        if self.peek() != Some('{') {
            self.parse_scalar()?;
            return Ok(());
        }
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                None => return Err(CodecError::UnexpectedEnd),
                Some('{') => depth += 1,
                Some('}') => depth -= 1,
                Some(q @ ('\'' | '"')) => loop {
                    match self.bump() {
                        None => return Err(CodecError::UnexpectedEnd),
                        Some('\\') => {
                            self.bump();
                        }
                        Some(c) if c == q => break,
                        Some(_) => {}
                    }
                },
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
