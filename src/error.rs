use serde::Serialize;

/// A structurally impossible schema, rejected by [`command`](crate::command)
/// and [`subcommand`](crate::subcommand).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("trigger is used more than once in the same scope: `{trigger}`")]
    DuplicateTrigger { trigger: String },
    #[error("key is used more than once in the same scope: `{key}`")]
    DuplicateKey { key: String },
    #[error("subcommand can't declare an arity: `{key}`")]
    SubcommandWithArity { key: String },
    #[error("flag can't restrict its values: `{key}`")]
    RestrictedFlag { key: String },
    #[error("option has no triggers: `{key}`")]
    MissingTriggers { key: String },
}

/// A problem found while parsing.
///
/// Parsing never stops at the first problem: every stage appends the errors
/// it finds to the result, and the variant fields carry the context the
/// stage had at hand.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParseError {
    #[error("argument is not a boolean: `{key}` expects `true` or `false`")]
    ArgumentIsNotABool { key: String, values: Vec<String>, index: usize },
    #[error("argument is not a number: `{key}`")]
    ArgumentIsNotANumber { key: String, values: Vec<String>, index: usize },
    #[error("contradiction detected: `{key}` can't be combined with {contradicts:?}")]
    ContradictionDetected { key: String, contradicts: Vec<String> },
    #[error("unknown argument: `{argv}`, did you mean one of {options:?}?")]
    DidYouMean { argv: String, options: Vec<String> },
    #[error("args rules returned false")]
    FalseArgsRules,
    #[error("argv rules returned false")]
    FalseArgvRules { argv: Vec<String> },
    #[error("opts rules returned false")]
    FalseOptsRules,
    #[error("rules of `{key}` returned false")]
    FalseRules { key: String },
    #[error("implication violated: `{key}` requires {implies:?}")]
    ImplicationViolated { key: String, implies: Vec<String> },
    #[error("wrong number of values for `{key}`: expected a multiple of {arity}, got {values:?}")]
    InvalidArity { key: String, arity: usize, values: Vec<Option<String>> },
    #[error("required positional argument follows an optional one: {positional:?}")]
    InvalidRequiredPositionalArgument { positional: Vec<String> },
    #[error("option is required: `{key}`")]
    RequiredOptionMissing { key: String },
    #[error("subcommand is required")]
    SubcommandRequired { options: Vec<String> },
    #[error("unexpected argument: `{argument}`")]
    UnexpectedArgument { argument: String },
    #[error("value {index} of `{key}` is not one of {only:?}")]
    ValueRestrictionsViolated { key: String, values: Vec<String>, index: usize, only: Vec<String> },
}

/// The kind of a [`ParseError`], without its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArgumentIsNotABool,
    ArgumentIsNotANumber,
    ContradictionDetected,
    DidYouMean,
    FalseArgsRules,
    FalseArgvRules,
    FalseOptsRules,
    FalseRules,
    ImplicationViolated,
    InvalidArity,
    InvalidRequiredPositionalArgument,
    RequiredOptionMissing,
    SubcommandRequired,
    UnexpectedArgument,
    ValueRestrictionsViolated,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::ArgumentIsNotABool { .. } => ErrorKind::ArgumentIsNotABool,
            ParseError::ArgumentIsNotANumber { .. } => ErrorKind::ArgumentIsNotANumber,
            ParseError::ContradictionDetected { .. } => ErrorKind::ContradictionDetected,
            ParseError::DidYouMean { .. } => ErrorKind::DidYouMean,
            ParseError::FalseArgsRules => ErrorKind::FalseArgsRules,
            ParseError::FalseArgvRules { .. } => ErrorKind::FalseArgvRules,
            ParseError::FalseOptsRules => ErrorKind::FalseOptsRules,
            ParseError::FalseRules { .. } => ErrorKind::FalseRules,
            ParseError::ImplicationViolated { .. } => ErrorKind::ImplicationViolated,
            ParseError::InvalidArity { .. } => ErrorKind::InvalidArity,
            ParseError::InvalidRequiredPositionalArgument { .. } => {
                ErrorKind::InvalidRequiredPositionalArgument
            }
            ParseError::RequiredOptionMissing { .. } => ErrorKind::RequiredOptionMissing,
            ParseError::SubcommandRequired { .. } => ErrorKind::SubcommandRequired,
            ParseError::UnexpectedArgument { .. } => ErrorKind::UnexpectedArgument,
            ParseError::ValueRestrictionsViolated { .. } => ErrorKind::ValueRestrictionsViolated,
        }
    }
}
