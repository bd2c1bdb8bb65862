//! Flat, typed key/value configuration store.
//!
//! [`Properties`] keeps entries in insertion order (backed by an
//! [`IndexMap`]) and can be read from a small line-oriented text format:
//!
//! ```text
//! # comment
//! name : type [as length] = value [unit]
//! ```
//!
//! Supported types are `boolean`, `integer`, `real`, `string` and
//! `string[N]`. Reals may carry a length unit symbol (see
//! [`length_unit`]); the value is stored converted to millimetres and
//! remembered as having an explicit unit.
//!
//! # Examples
//!
//! ```
//! use meshplace_core::Properties;
//!
//! let props = Properties::parse(
//!     "step_x : real as length = 5 cm\n\
//!      overlapping.high_sampling : boolean = true\n",
//! ).unwrap();
//! assert_eq!(props.fetch_real("step_x").unwrap(), 50.0);
//! assert!(props.has_explicit_unit("step_x"));
//! assert!(props.has_flag("overlapping.high_sampling"));
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::PropertyError;
use crate::units::length_unit;

/// A typed property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// `true` / `false`.
    Boolean(bool),
    /// Signed integer.
    Integer(i64),
    /// Real number, in millimetres when it denotes a length.
    Real {
        /// Stored value.
        value: f64,
        /// `true` when the value was given with an explicit unit.
        explicit_unit: bool,
    },
    /// Single string.
    String(String),
    /// List of strings.
    StringList(Vec<String>),
}

impl PropertyValue {
    /// Type name used in error messages and the text format.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real { .. } => "real",
            Self::String(_) => "string",
            Self::StringList(_) => "string list",
        }
    }
}

/// Ordered set of named, typed properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    entries: IndexMap<String, PropertyValue>,
}

impl Properties {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    /// `true` when `key` is present, whatever its type.
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// `true` when `key` holds the boolean `true`.
    pub fn has_flag(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(PropertyValue::Boolean(true)))
    }

    /// `true` when `key` is a real given with an explicit unit.
    pub fn has_explicit_unit(&self, key: &str) -> bool {
        matches!(
            self.entries.get(key),
            Some(PropertyValue::Real {
                explicit_unit: true,
                ..
            })
        )
    }

    /// Insert or replace a value.
    pub fn store(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.entries.insert(key.into(), value);
    }

    /// Store the boolean `true`.
    pub fn store_flag(&mut self, key: impl Into<String>) {
        self.store(key, PropertyValue::Boolean(true));
    }

    /// Store a boolean.
    pub fn store_boolean(&mut self, key: impl Into<String>, value: bool) {
        self.store(key, PropertyValue::Boolean(value));
    }

    /// Store an integer.
    pub fn store_integer(&mut self, key: impl Into<String>, value: i64) {
        self.store(key, PropertyValue::Integer(value));
    }

    /// Store a real without unit information.
    pub fn store_real(&mut self, key: impl Into<String>, value: f64) {
        self.store(
            key,
            PropertyValue::Real {
                value,
                explicit_unit: false,
            },
        );
    }

    /// Store a length already converted to millimetres.
    pub fn store_length(&mut self, key: impl Into<String>, value: f64) {
        self.store(
            key,
            PropertyValue::Real {
                value,
                explicit_unit: true,
            },
        );
    }

    /// Store a string.
    pub fn store_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.store(key, PropertyValue::String(value.into()));
    }

    /// Store a list of strings.
    pub fn store_strings<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = values.into_iter().map(Into::into).collect();
        self.store(key, PropertyValue::StringList(list));
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.entries.shift_remove(key)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn fetch(&self, key: &str) -> Result<&PropertyValue, PropertyError> {
        self.entries.get(key).ok_or_else(|| PropertyError::MissingKey {
            key: key.to_string(),
        })
    }

    fn mismatch(key: &str, expected: &'static str, found: &PropertyValue) -> PropertyError {
        PropertyError::TypeMismatch {
            key: key.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    /// Fetch a boolean.
    pub fn fetch_boolean(&self, key: &str) -> Result<bool, PropertyError> {
        match self.fetch(key)? {
            PropertyValue::Boolean(b) => Ok(*b),
            other => Err(Self::mismatch(key, "boolean", other)),
        }
    }

    /// Fetch an integer.
    pub fn fetch_integer(&self, key: &str) -> Result<i64, PropertyError> {
        match self.fetch(key)? {
            PropertyValue::Integer(v) => Ok(*v),
            other => Err(Self::mismatch(key, "integer", other)),
        }
    }

    /// Fetch a real. Integers are accepted and widened.
    pub fn fetch_real(&self, key: &str) -> Result<f64, PropertyError> {
        match self.fetch(key)? {
            PropertyValue::Real { value, .. } => Ok(*value),
            PropertyValue::Integer(v) => Ok(*v as f64),
            other => Err(Self::mismatch(key, "real", other)),
        }
    }

    /// Fetch a string.
    pub fn fetch_string(&self, key: &str) -> Result<&str, PropertyError> {
        match self.fetch(key)? {
            PropertyValue::String(s) => Ok(s),
            other => Err(Self::mismatch(key, "string", other)),
        }
    }

    /// Fetch a list of strings. A single string is returned as a one-item list.
    pub fn fetch_strings(&self, key: &str) -> Result<Vec<String>, PropertyError> {
        match self.fetch(key)? {
            PropertyValue::StringList(v) => Ok(v.clone()),
            PropertyValue::String(s) => Ok(vec![s.clone()]),
            other => Err(Self::mismatch(key, "string list", other)),
        }
    }

    /// Copy every entry whose key starts with `prefix` into `target`,
    /// replacing the prefix with `new_prefix`.
    pub fn export_and_rename_starting_with(
        &self,
        target: &mut Properties,
        prefix: &str,
        new_prefix: &str,
    ) {
        for (key, value) in &self.entries {
            if let Some(rest) = key.strip_prefix(prefix) {
                target.store(format!("{new_prefix}{rest}"), value.clone());
            }
        }
    }

    /// Copy every entry whose key starts with `prefix` into `target`.
    pub fn export_starting_with(&self, target: &mut Properties, prefix: &str) {
        self.export_and_rename_starting_with(target, prefix, prefix);
    }

    /// Parse the line-oriented text format.
    pub fn parse(text: &str) -> Result<Self, PropertyError> {
        let mut props = Self::new();
        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) =
                parse_line(line).map_err(|reason| PropertyError::Parse { line: n + 1, reason })?;
            props.store(key, value);
        }
        Ok(props)
    }
}

impl FromStr for Properties {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            match value {
                PropertyValue::Boolean(b) => writeln!(f, "{key} : boolean = {b}")?,
                PropertyValue::Integer(v) => writeln!(f, "{key} : integer = {v}")?,
                PropertyValue::Real {
                    value,
                    explicit_unit: true,
                } => writeln!(f, "{key} : real as length = {value} mm")?,
                PropertyValue::Real { value, .. } => writeln!(f, "{key} : real = {value}")?,
                PropertyValue::String(s) => writeln!(f, "{key} : string = {s:?}")?,
                PropertyValue::StringList(v) => {
                    write!(f, "{key} : string[{}] =", v.len())?;
                    for s in v {
                        write!(f, " {s:?}")?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

// ── Text format ─────────────────────────────────────────────────

fn parse_line(line: &str) -> Result<(String, PropertyValue), String> {
    let (key, rest) = line
        .split_once(':')
        .ok_or_else(|| "expected 'name : type = value'".to_string())?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(format!("invalid property name '{key}'"));
    }
    let (type_spec, value) = rest
        .split_once('=')
        .ok_or_else(|| format!("missing '=' for property '{key}'"))?;

    let mut type_tokens = type_spec.split_whitespace();
    let type_name = type_tokens
        .next()
        .ok_or_else(|| format!("missing type for property '{key}'"))?;
    let as_length = match (type_tokens.next(), type_tokens.next()) {
        (None, _) => false,
        (Some("as"), Some("length")) => true,
        (Some(other), _) => return Err(format!("unexpected '{other}' in type of '{key}'")),
    };
    if as_length && type_name != "real" {
        return Err(format!("'as length' requires a real, found '{type_name}'"));
    }

    let value = value.trim();
    let parsed = match type_name {
        "boolean" => PropertyValue::Boolean(parse_bool(value)?),
        "integer" => PropertyValue::Integer(
            value
                .parse()
                .map_err(|_| format!("invalid integer '{value}'"))?,
        ),
        "real" => parse_real(value)?,
        "string" => {
            let mut words = tokenize_strings(value)?;
            if words.len() != 1 {
                return Err(format!("expected one string, found {}", words.len()));
            }
            PropertyValue::String(words.remove(0))
        }
        t => match t.strip_prefix("string[").and_then(|s| s.strip_suffix(']')) {
            Some(n) => {
                let n: usize = n
                    .parse()
                    .map_err(|_| format!("invalid string list size in '{t}'"))?;
                let words = tokenize_strings(value)?;
                if words.len() != n {
                    return Err(format!("expected {n} strings, found {}", words.len()));
                }
                PropertyValue::StringList(words)
            }
            None => return Err(format!("unknown type '{t}'")),
        },
    };
    Ok((key.to_string(), parsed))
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(format!("invalid boolean '{value}'")),
    }
}

fn parse_real(value: &str) -> Result<PropertyValue, String> {
    let mut tokens = value.split_whitespace();
    let number = tokens
        .next()
        .ok_or_else(|| "missing real value".to_string())?;
    let number: f64 = number
        .parse()
        .map_err(|_| format!("invalid real '{number}'"))?;
    match (tokens.next(), tokens.next()) {
        (None, _) => Ok(PropertyValue::Real {
            value: number,
            explicit_unit: false,
        }),
        (Some(unit), None) => {
            let factor = length_unit(unit).map_err(|e| e.to_string())?;
            Ok(PropertyValue::Real {
                value: number * factor,
                explicit_unit: true,
            })
        }
        (Some(_), Some(extra)) => Err(format!("unexpected '{extra}' after real value")),
    }
}

/// Split a value into strings. Double-quoted strings may contain spaces;
/// bare words are accepted as single strings.
fn tokenize_strings(value: &str) -> Result<Vec<String>, String> {
    let mut out = Vec::new();
    let mut chars = value.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut word = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                word.push(c);
            }
            if !closed {
                return Err("unterminated string".to_string());
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
        }
        out.push(word);
    }
    Ok(out)
}
