//! Parser for flat `key = value` constants files
//!
//! One assignment per line. `#` starts a comment anywhere on a line, blank
//! lines and lines without `=` are ignored. Values are read as an integer,
//! else a float, else kept as text.

use crate::diagnostics::{Diagnostic, Diagnostics, Span};
use std::collections::BTreeMap;
use std::fmt;

/// A single parsed value
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ConstantValue {
    /// Interpret a raw value: integer first, then float, then text
    pub fn parse(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            Self::Int(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            Self::Float(f)
        } else {
            Self::Text(raw.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(_) => None,
        }
    }

    /// Non-negative count; integral floats such as `5.0` are accepted
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Int(i) => u64::try_from(*i).ok(),
            Self::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64 => {
                Some(*f as u64)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Raw constants keyed by name, before typing into `SimulationConstants`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantTable {
    values: BTreeMap<String, ConstantValue>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; a repeated key replaces the earlier one
    pub fn insert(&mut self, key: impl Into<String>, value: ConstantValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ConstantValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConstantValue)> {
        self.values.iter()
    }
}

/// Helper to track byte offsets while parsing
struct ParseContext {
    line_offsets: Vec<usize>, // Byte offset of start of each line
    len: usize,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        let mut offset = 0;
        for ch in source.chars() {
            offset += ch.len_utf8();
            if ch == '\n' {
                line_offsets.push(offset);
            }
        }
        Self {
            line_offsets,
            len: source.len(),
        }
    }

    /// Span for the entire line (0-indexed)
    fn full_line_span(&self, line: usize) -> Span {
        let start = self.line_offsets.get(line).copied().unwrap_or(self.len);
        let end = self.line_offsets.get(line + 1).copied().unwrap_or(self.len);
        Span::new(start, end)
    }
}

/// Parse a constants file.
///
/// Never fails: a line with `=` but an empty key or value is reported as a
/// warning and skipped. Checking for required keys happens when the table is
/// converted into `SimulationConstants`.
pub fn parse_constants(source: &str) -> (ConstantTable, Diagnostics) {
    let ctx = ParseContext::new(source);
    let mut table = ConstantTable::new();
    let mut diagnostics = Diagnostics::new();

    for (i, raw_line) in source.lines().enumerate() {
        let line = match raw_line.split_once('#') {
            Some((code, _comment)) => code,
            None => raw_line,
        }
        .trim();

        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            diagnostics.push(
                Diagnostic::warning(
                    format!("malformed assignment '{}'", line),
                    Some(ctx.full_line_span(i)),
                )
                .at_line(i + 1),
            );
            continue;
        }

        table.insert(key, ConstantValue::parse(value));
    }

    (table, diagnostics)
}
