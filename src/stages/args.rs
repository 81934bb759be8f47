use std::{collections::BTreeMap, mem};

use crate::{stages::guess_rest, Args, ArgsState, ParseError, Value};

/// Reports every unclaimed token.
pub fn fail_rest(mut state: ArgsState) -> ArgsState {
    for arg in &state.args.rest {
        state.errs.push(ParseError::UnexpectedArgument { argument: arg.clone() });
    }
    state
}

pub fn clear_rest(mut state: ArgsState) -> ArgsState {
    state.args.rest.clear();
    state
}

/// `Flag { count }` becomes `count > 0`.
pub fn flags_as_bools(state: ArgsState) -> ArgsState {
    traverse_args(is_flag, |_, value| match value {
        Value::Flag { count } => Value::Bool(count > 0),
        it => it,
    })(state)
}

/// `Flag { count }` becomes `count`.
pub fn flags_as_numbers(state: ArgsState) -> ArgsState {
    traverse_args(is_flag, |_, value| match value {
        Value::Flag { count } => Value::Number(count as f64),
        it => it,
    })(state)
}

/// Converts string values that look like numbers or booleans, without
/// consulting the schema.
pub fn best_guess_cast(state: ArgsState) -> ArgsState {
    traverse_args(|_, _| true, |_, value| guess(value))(state)
}

/// Turns option-looking tokens of the rest bucket into values: `--colors`
/// becomes a flag, `--name Ada` a string.
pub fn best_guess_args(state: ArgsState) -> ArgsState {
    let ArgsState { errs, mut args } = state;
    let (guesses, rest) = guess_rest(mem::take(&mut args.rest));
    args.rest = rest;
    for guess in guesses {
        let value = match (guess.value, args.get(&guess.key)) {
            (Some(value), _) => Value::String(value),
            (None, Some(Value::Flag { count })) => Value::Flag { count: count.saturating_add(1) },
            (None, _) => Value::Flag { count: 1 },
        };
        args.insert(guess.key, value);
    }
    ArgsState { errs, args }
}

/// The number under `key` becomes a flag with that count.
pub fn number_as_flag(key: impl Into<String>) -> impl Fn(ArgsState) -> ArgsState + Send + Sync {
    let key = key.into();
    traverse_args(
        move |it, value| it == key && matches!(value, Value::Number(_)),
        |_, value| match value {
            Value::Number(n) => Value::Flag { count: n as i64 },
            it => it,
        },
    )
}

/// Flattens subcommand results into the enclosing mapping. Keys already set
/// there win, rest tokens are appended.
///
/// Subcommands are parsed after the args phase, so this is applied to a
/// finished result: `merge_args(ArgsState::from(res))`.
pub fn merge_args(state: ArgsState) -> ArgsState {
    let ArgsState { errs, args } = state;
    ArgsState { errs, args: flatten(args) }
}

/// Reports [`ParseError::FalseArgsRules`] when `rules` rejects the result.
pub fn verify_args<R>(rules: R) -> impl Fn(ArgsState) -> ArgsState + Send + Sync
where
    R: Fn(&Args) -> bool + Send + Sync,
{
    move |mut state: ArgsState| {
        if !rules(&state.args) {
            state.errs.push(ParseError::FalseArgsRules);
        }
        state
    }
}

/// Replaces every value whose key and value match `pred` with `f` of it.
pub fn traverse_args<P, F>(pred: P, f: F) -> impl Fn(ArgsState) -> ArgsState + Send + Sync
where
    P: Fn(&str, &Value) -> bool + Send + Sync,
    F: Fn(&str, Value) -> Value + Send + Sync,
{
    move |ArgsState { errs, mut args }| {
        args.values = args
            .values
            .into_iter()
            .map(|(key, value)| {
                let value = if pred(&key, &value) { f(&key, value) } else { value };
                (key, value)
            })
            .collect();
        ArgsState { errs, args }
    }
}

/// Reports a result without any subcommand. Meant to run as a check, when
/// subcommand results are already in place.
pub fn demand_a_subcommand(mut state: ArgsState) -> ArgsState {
    let invoked = state.args.values.values().any(|it| matches!(it, Value::Command(_)));
    if !invoked {
        state.errs.push(ParseError::SubcommandRequired { options: Vec::new() });
    }
    state
}

fn flatten(args: Args) -> Args {
    let Args { mut rest, values } = args;
    let mut merged = BTreeMap::new();
    let mut nested = Vec::new();
    for (key, value) in values {
        match value {
            Value::Command(sub) => nested.push(flatten(sub)),
            it => {
                merged.insert(key, it);
            }
        }
    }
    for sub in nested {
        rest.extend(sub.rest);
        for (key, value) in sub.values {
            merged.entry(key).or_insert(value);
        }
    }
    Args { rest, values: merged }
}

fn is_flag(_: &str, value: &Value) -> bool {
    matches!(value, Value::Flag { .. })
}

fn guess(value: Value) -> Value {
    match value {
        Value::String(it) => match it.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => match it.parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Number(n),
                _ => Value::String(it),
            },
        },
        Value::Array(values) => Value::Array(values.into_iter().map(guess).collect()),
        it => it,
    }
}
