use crate::{ArgvState, ParseError};

/// Splits groups of short options: `-abc` becomes `-a -b -c`.
pub fn split_short_opts(state: ArgvState) -> ArgvState {
    traverse_argv(is_short_group, |arg| arg.chars().skip(1).map(|c| format!("-{}", c)).collect())(
        state,
    )
}

/// Reads the tail of a short option group as its value: `-n42` becomes
/// `-n 42`.
pub fn short_opts_no_space(state: ArgvState) -> ArgvState {
    traverse_argv(is_short_group, |arg| {
        let split = arg.char_indices().nth(2).map_or(arg.len(), |(idx, _)| idx);
        vec![arg[..split].to_string(), arg[split..].to_string()]
    })(state)
}

/// `--name=value` becomes `--name value`.
pub fn equals_sign_as_space(state: ArgvState) -> ArgvState {
    traverse_argv(
        |arg| split_equals(arg).is_some(),
        |arg| match split_equals(arg) {
            Some((name, value)) => vec![name.to_string(), value.to_string()],
            None => vec![arg.to_string()],
        },
    )(state)
}

/// Replaces every token matching `pred` with the tokens `f` returns.
pub fn traverse_argv<P, F>(pred: P, f: F) -> impl Fn(ArgvState) -> ArgvState + Send + Sync
where
    P: Fn(&str) -> bool + Send + Sync,
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    move |ArgvState { errs, argv }| {
        let argv = argv
            .into_iter()
            .flat_map(|arg| if pred(&arg) { f(&arg) } else { vec![arg] })
            .collect();
        ArgvState { errs, argv }
    }
}

/// Reports [`ParseError::FalseArgvRules`] when `rules` rejects the tokens.
pub fn verify_argv<R>(rules: R) -> impl Fn(ArgvState) -> ArgvState + Send + Sync
where
    R: Fn(&[String]) -> bool + Send + Sync,
{
    move |mut state: ArgvState| {
        if !rules(&state.argv) {
            state.errs.push(ParseError::FalseArgvRules { argv: state.argv.clone() });
        }
        state
    }
}

fn is_short_group(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next() == Some('-')
        && matches!(chars.next(), Some(c) if c != '-')
        && chars.next().is_some()
}

fn split_equals(arg: &str) -> Option<(&str, &str)> {
    let (name, value) = arg.split_once('=')?;
    let bare = name.trim_start_matches('-');
    if !name.starts_with('-') || bare.is_empty() || name.len() - bare.len() > 2 {
        return None;
    }
    Some((name, value))
}
