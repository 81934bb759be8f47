//! Values threaded through the pipeline.

use std::{collections::BTreeMap, fmt, mem};

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{schema::OptionDescriptor, ParseError};

/// A resolved value in the result mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    Flag { count: i64 },
    Array(Vec<Value>),
    Command(Args),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(it) => Some(it),
            _ => None,
        }
    }
}

/// Integral numbers serialize as integers, flags as `{"count": n}`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(it) => serializer.serialize_str(it),
            Value::Number(it) if it.fract() == 0.0 && it.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*it as i64)
            }
            Value::Number(it) => serializer.serialize_f64(*it),
            Value::Bool(it) => serializer.serialize_bool(*it),
            Value::Flag { count } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("count", count)?;
                map.end()
            }
            Value::Array(values) => values.serialize(serializer),
            Value::Command(args) => args.serialize(serializer),
        }
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<&str> for Value {
    fn from(it: &str) -> Self {
        Value::String(it.to_string())
    }
}

impl From<String> for Value {
    fn from(it: String) -> Self {
        Value::String(it)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(it) => f.write_str(it),
            Value::Number(it) => fmt::Display::fmt(it, f),
            Value::Bool(it) => fmt::Display::fmt(it, f),
            Value::Flag { count } => fmt::Display::fmt(count, f),
            Value::Array(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    fmt::Display::fmt(value, f)?;
                }
                Ok(())
            }
            Value::Command(args) => write!(f, "{:?}", args.rest),
        }
    }
}

/// The result mapping of one scope.
///
/// `rest` holds the tokens no descriptor claimed, in input order; it is
/// serialized under the reserved `_` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub rest: Vec<String>,
    pub values: BTreeMap<String, Value>,
}

impl Args {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
}

impl Serialize for Args {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("_", &self.rest)?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Runtime state of one descriptor after binding.
#[derive(Debug, Clone)]
pub struct BoundOption {
    pub desc: OptionDescriptor,
    /// Every occurrence's values, concatenated. Each occurrence has
    /// `desc.arity.len()` slots; tokens missing at the end of input are
    /// `None`.
    pub values: Vec<Option<Value>>,
    /// Number of times the descriptor was triggered. Stages may make it
    /// negative (see `reverse_flags`).
    pub count: i64,
    /// Tokens captured by a triggered subcommand.
    pub argv: Vec<String>,
    /// Project every occurrence instead of only the last one.
    pub accumulate: bool,
}

impl BoundOption {
    pub fn new(desc: OptionDescriptor) -> Self {
        Self { desc, values: Vec::new(), count: 0, argv: Vec::new(), accumulate: false }
    }

    pub fn key(&self) -> &str {
        &self.desc.key
    }

    pub fn is_present(&self) -> bool {
        self.count != 0 || !self.values.is_empty()
    }

    /// Values grouped per occurrence. The last group is short when a stage
    /// left a number of values that is not a multiple of the arity.
    pub fn occurrences(&self) -> impl Iterator<Item = &[Option<Value>]> {
        self.values.chunks(self.desc.arity.len().max(1))
    }

    /// The value this option contributes to the result mapping, if any.
    pub(crate) fn resolve(&self) -> Option<Value> {
        if self.desc.is_subcommand() {
            return None;
        }
        if self.desc.arity.is_empty() {
            return if self.count != 0 { Some(Value::Flag { count: self.count }) } else { None };
        }
        let arity = self.desc.arity.len();
        let complete = self.occurrences().filter_map(|it| occurrence(it, arity));
        if self.accumulate {
            let values = complete.collect::<Vec<_>>();
            if values.is_empty() {
                None
            } else {
                Some(Value::Array(values))
            }
        } else {
            complete.last()
        }
    }
}

fn occurrence(values: &[Option<Value>], arity: usize) -> Option<Value> {
    if values.len() != arity {
        return None;
    }
    let mut values = values.iter().cloned().collect::<Option<Vec<_>>>()?;
    if arity == 1 {
        values.pop()
    } else {
        Some(Value::Array(values))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArgvState {
    pub errs: Vec<ParseError>,
    pub argv: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OptsState {
    pub errs: Vec<ParseError>,
    pub opts: Vec<BoundOption>,
    /// Tokens the binder could not assign.
    pub rest: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArgsState {
    pub errs: Vec<ParseError>,
    pub args: Args,
}

/// Final outcome of a parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResult {
    pub errs: Vec<ParseError>,
    pub args: Args,
}

impl From<ParseResult> for ArgsState {
    fn from(res: ParseResult) -> ArgsState {
        ArgsState { errs: res.errs, args: res.args }
    }
}

/// Access to the error list every phase state carries.
pub(crate) trait PhaseState {
    fn take_errs(&mut self) -> Vec<ParseError>;
}

impl PhaseState for ArgvState {
    fn take_errs(&mut self) -> Vec<ParseError> {
        mem::take(&mut self.errs)
    }
}

impl PhaseState for OptsState {
    fn take_errs(&mut self) -> Vec<ParseError> {
        mem::take(&mut self.errs)
    }
}

impl PhaseState for ArgsState {
    fn take_errs(&mut self) -> Vec<ParseError> {
        mem::take(&mut self.errs)
    }
}
