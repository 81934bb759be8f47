//! Option schema: descriptors, builders and scope validation.
//!
//! The schema is plain data. Builders only reject descriptors that can never
//! be bound; everything that depends on the input (requiredness, value
//! restrictions, positional ordering, ...) is checked by stages.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

use crate::{state::BoundOption, Result, SchemaError};

/// Type tag of a single value slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    String,
    Number,
    Bool,
    Custom(String),
}

/// How a descriptor is selected from the token stream.
#[derive(Debug, Clone)]
pub enum Kind {
    /// Selected by any of its trigger literals.
    Named { triggers: Vec<String> },
    /// Claims one unclaimed token, in declaration order.
    Positional,
    /// Selected by a trigger, owns the tokens after it and parses them
    /// against its own scope.
    Subcommand { triggers: Vec<String>, opts: Vec<OptionDescriptor> },
}

/// Predicate over an option and the options of its scope.
pub type Rule = Arc<dyn Fn(&BoundOption, &[BoundOption]) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct OptionDescriptor {
    pub key: String,
    pub kind: Kind,
    /// Empty arity means a flag: no values, only an occurrence count.
    pub arity: Vec<Ty>,
    pub required: Option<bool>,
    pub default_values: Option<Vec<String>>,
    pub only: Option<Vec<String>>,
    pub reverse: bool,
    pub implies: Vec<String>,
    pub contradicts: Vec<String>,
    pub rules: Option<Rule>,
    pub desc: Option<String>,
}

impl fmt::Debug for OptionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDescriptor")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .field("required", &self.required)
            .field("default_values", &self.default_values)
            .field("only", &self.only)
            .field("reverse", &self.reverse)
            .field("implies", &self.implies)
            .field("contradicts", &self.contradicts)
            .field("rules", &self.rules.as_ref().map(|_| ".."))
            .field("desc", &self.desc)
            .finish()
    }
}

impl OptionDescriptor {
    pub fn new(key: impl Into<String>, kind: Kind, arity: Vec<Ty>) -> Self {
        Self {
            key: key.into(),
            kind,
            arity,
            required: None,
            default_values: None,
            only: None,
            reverse: false,
            implies: Vec::new(),
            contradicts: Vec::new(),
            rules: None,
            desc: None,
        }
    }

    pub fn triggers(&self) -> &[String] {
        match &self.kind {
            Kind::Named { triggers } | Kind::Subcommand { triggers, .. } => triggers.as_slice(),
            Kind::Positional => &[],
        }
    }

    pub fn sub_options(&self) -> Option<&[OptionDescriptor]> {
        match &self.kind {
            Kind::Subcommand { opts, .. } => Some(opts.as_slice()),
            _ => None,
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.kind, Kind::Positional)
    }

    pub fn is_subcommand(&self) -> bool {
        matches!(self.kind, Kind::Subcommand { .. })
    }

    pub fn is_flag(&self) -> bool {
        self.arity.is_empty() && !self.is_subcommand()
    }

    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_values = Some(strings(values));
        self
    }

    pub fn only<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(strings(values));
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn implies<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implies = strings(keys);
        self
    }

    pub fn contradicts<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contradicts = strings(keys);
        self
    }

    pub fn rules<F>(mut self, rules: F) -> Self
    where
        F: Fn(&BoundOption, &[BoundOption]) -> bool + Send + Sync + 'static,
    {
        self.rules = Some(Arc::new(rules));
        self
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

/// The root of a schema.
#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub opts: Vec<OptionDescriptor>,
    pub desc: Option<String>,
}

impl Command {
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

pub fn command(name: impl Into<String>, opts: Vec<OptionDescriptor>) -> Result<Command> {
    validate_scope(&opts)?;
    Ok(Command { name: name.into(), opts, desc: None })
}

pub fn subcommand<I, S>(
    key: impl Into<String>,
    triggers: I,
    opts: Vec<OptionDescriptor>,
) -> Result<OptionDescriptor>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    validate_scope(&opts)?;
    let kind = Kind::Subcommand { triggers: strings(triggers), opts };
    Ok(OptionDescriptor::new(key, kind, Vec::new()))
}

pub fn flag<I, S>(key: impl Into<String>, triggers: I) -> OptionDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    named(key, triggers, Vec::new())
}

pub fn string<I, S>(key: impl Into<String>, triggers: I) -> OptionDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    named(key, triggers, vec![Ty::String])
}

pub fn number<I, S>(key: impl Into<String>, triggers: I) -> OptionDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    named(key, triggers, vec![Ty::Number])
}

pub fn bool<I, S>(key: impl Into<String>, triggers: I) -> OptionDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    named(key, triggers, vec![Ty::Bool])
}

/// An option taking one value per element of `arity` on every occurrence.
pub fn array<I, S>(key: impl Into<String>, arity: Vec<Ty>, triggers: I) -> OptionDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    named(key, triggers, arity)
}

pub fn string_pos(key: impl Into<String>) -> OptionDescriptor {
    OptionDescriptor::new(key, Kind::Positional, vec![Ty::String])
}

pub fn number_pos(key: impl Into<String>) -> OptionDescriptor {
    OptionDescriptor::new(key, Kind::Positional, vec![Ty::Number])
}

pub fn bool_pos(key: impl Into<String>) -> OptionDescriptor {
    OptionDescriptor::new(key, Kind::Positional, vec![Ty::Bool])
}

/// The negated twin of a named option: same key and arity, `reverse`
/// flipped, long triggers renamed with `prefix`. The twin is never required
/// and has no defaults.
///
/// `complement("--not-", &tired)` turns `--tired` into `--not-tired`.
pub fn complement(prefix: &str, desc: &OptionDescriptor) -> OptionDescriptor {
    let triggers = desc
        .triggers()
        .iter()
        .filter_map(|it| it.strip_prefix("--"))
        .map(|it| format!("{}{}", prefix, it))
        .collect();
    OptionDescriptor {
        kind: Kind::Named { triggers },
        required: None,
        default_values: None,
        reverse: !desc.reverse,
        ..desc.clone()
    }
}

fn named<I, S>(key: impl Into<String>, triggers: I, arity: Vec<Ty>) -> OptionDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    OptionDescriptor::new(key, Kind::Named { triggers: strings(triggers) }, arity)
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Checks one scope and, recursively, every subcommand scope in it.
pub(crate) fn validate_scope(opts: &[OptionDescriptor]) -> Result<()> {
    let mut keys = BTreeMap::new();
    let mut triggers = BTreeSet::new();
    for opt in opts {
        if !opt.is_positional() {
            if let Some(prev) = keys.insert(opt.key.as_str(), opt) {
                if !is_complement(prev, opt) {
                    return Err(SchemaError::DuplicateKey { key: opt.key.clone() });
                }
            }
        }
        if !opt.is_positional() && opt.triggers().is_empty() {
            return Err(SchemaError::MissingTriggers { key: opt.key.clone() });
        }
        for trigger in opt.triggers() {
            if !triggers.insert(trigger.as_str()) {
                return Err(SchemaError::DuplicateTrigger { trigger: trigger.clone() });
            }
        }
        if opt.only.is_some() && opt.is_flag() {
            return Err(SchemaError::RestrictedFlag { key: opt.key.clone() });
        }
        if let Some(sub) = opt.sub_options() {
            if !opt.arity.is_empty() {
                return Err(SchemaError::SubcommandWithArity { key: opt.key.clone() });
            }
            validate_scope(sub)?;
        }
    }
    Ok(())
}

fn is_complement(a: &OptionDescriptor, b: &OptionDescriptor) -> bool {
    let named = |it: &OptionDescriptor| matches!(it.kind, Kind::Named { .. });
    named(a) && named(b) && a.arity == b.arity && a.reverse != b.reverse
}
