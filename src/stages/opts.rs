use std::collections::BTreeSet;

use crate::{
    stages::guess_rest, BoundOption, Kind, OptionDescriptor, OptsState, ParseError, Ty, Value,
};

/// Gives absent options their `default_values`. Flags read the first
/// default as their occurrence count.
pub fn set_default_values(mut state: OptsState) -> OptsState {
    for opt in &mut state.opts {
        if opt.is_present() || opt.desc.is_subcommand() {
            continue;
        }
        let defaults = match &opt.desc.default_values {
            Some(it) => it,
            None => continue,
        };
        if opt.desc.is_flag() {
            if let Some(count) = defaults.first().and_then(|it| it.parse::<i64>().ok()) {
                opt.count = count;
            }
        } else {
            opt.values = defaults.iter().map(|it| Some(Value::from(it.as_str()))).collect();
        }
    }
    state
}

/// Reports required options whose key is absent. A complement counts as
/// its key being present.
pub fn require_opts(mut state: OptsState) -> OptsState {
    let present = present_keys(&state.opts);
    for opt in &state.opts {
        if opt.desc.is_required() && !present.contains(opt.key()) {
            state.errs.push(ParseError::RequiredOptionMissing { key: opt.key().to_string() });
        }
    }
    state
}

/// Reports a required positional argument declared after an optional one.
/// The check depends only on the schema.
pub fn validate_pos_args(mut state: OptsState) -> OptsState {
    let positional = state.opts.iter().filter(|it| it.desc.is_positional()).collect::<Vec<_>>();
    let mut optional_seen = false;
    let mut invalid = false;
    for opt in &positional {
        if opt.desc.is_required() {
            invalid |= optional_seen;
        } else {
            optional_seen = true;
        }
    }
    if invalid {
        let positional = positional.iter().map(|it| it.key().to_string()).collect();
        state.errs.push(ParseError::InvalidRequiredPositionalArgument { positional });
    }
    state
}

/// Reports options whose values don't fill their arity.
pub fn verify_values_arity(mut state: OptsState) -> OptsState {
    for opt in &state.opts {
        if opt.desc.arity.is_empty() || opt.values.is_empty() {
            continue;
        }
        let arity = opt.desc.arity.len();
        if opt.values.len() % arity != 0 || opt.values.iter().any(Option::is_none) {
            let values = opt.values.iter().map(|it| it.as_ref().map(Value::to_string)).collect();
            state.errs.push(ParseError::InvalidArity { key: opt.key().to_string(), arity, values });
        }
    }
    state
}

pub fn imply_opts(mut state: OptsState) -> OptsState {
    let present = present_keys(&state.opts);
    for opt in &state.opts {
        if !opt.is_present() || opt.desc.implies.is_empty() {
            continue;
        }
        if opt.desc.implies.iter().any(|it| !present.contains(it.as_str())) {
            state.errs.push(ParseError::ImplicationViolated {
                key: opt.key().to_string(),
                implies: opt.desc.implies.clone(),
            });
        }
    }
    state
}

pub fn contradict_opts(mut state: OptsState) -> OptsState {
    let present = present_keys(&state.opts);
    for opt in &state.opts {
        if !opt.is_present() {
            continue;
        }
        if opt.desc.contradicts.iter().any(|it| present.contains(it.as_str())) {
            state.errs.push(ParseError::ContradictionDetected {
                key: opt.key().to_string(),
                contradicts: opt.desc.contradicts.clone(),
            });
        }
    }
    state
}

/// Reports every value outside the `only` set of its option.
pub fn restrict_to_only(mut state: OptsState) -> OptsState {
    for opt in &state.opts {
        let only = match &opt.desc.only {
            Some(it) => it,
            None => continue,
        };
        let values = raw_values(opt);
        for (index, value) in values.iter().enumerate() {
            if !only.contains(value) {
                state.errs.push(ParseError::ValueRestrictionsViolated {
                    key: opt.key().to_string(),
                    values: values.clone(),
                    index,
                    only: only.clone(),
                });
            }
        }
    }
    state
}

/// Negates the occurrence count of reversed flags.
pub fn reverse_flags(mut state: OptsState) -> OptsState {
    for opt in &mut state.opts {
        if opt.desc.reverse && opt.desc.is_flag() {
            opt.count = opt.count.saturating_neg();
        }
    }
    state
}

/// Flips the boolean values of reversed options.
pub fn reverse_bools(mut state: OptsState) -> OptsState {
    for opt in &mut state.opts {
        if !opt.desc.reverse {
            continue;
        }
        for (slot, ty) in slots(opt) {
            if *ty != Ty::Bool {
                continue;
            }
            let flipped = match slot.as_ref() {
                Some(Value::Bool(it)) => Value::Bool(!it),
                Some(Value::String(it)) if it == "true" => Value::from("false"),
                Some(Value::String(it)) if it == "false" => Value::from("true"),
                _ => continue,
            };
            *slot = Some(flipped);
        }
    }
    state
}

/// Maps additional spellings to `true` and `false` for boolean values, e.g.
/// `broaden_bools(&["yes"], &["no"])`.
pub fn broaden_bools(trues: &[&str], falses: &[&str]) -> impl Fn(OptsState) -> OptsState + Send + Sync {
    let trues = trues.iter().map(|it| it.to_string()).collect::<Vec<_>>();
    let falses = falses.iter().map(|it| it.to_string()).collect::<Vec<_>>();
    move |mut state: OptsState| {
        for opt in &mut state.opts {
            for (slot, ty) in slots(opt) {
                if let (Some(Value::String(it)), Ty::Bool) = (slot, ty) {
                    if trues.contains(it) {
                        *it = "true".to_string();
                    } else if falses.contains(it) {
                        *it = "false".to_string();
                    }
                }
            }
        }
        state
    }
}

/// Converts `Number` and `Bool` values from their string form. Values that
/// don't convert are reported and left as they are.
pub fn cast(mut state: OptsState) -> OptsState {
    for opt in &mut state.opts {
        let key = opt.key().to_string();
        let values = raw_values(opt);
        for (index, (slot, ty)) in slots(opt).enumerate() {
            let raw = match slot {
                Some(Value::String(it)) => it.clone(),
                _ => continue,
            };
            match ty {
                Ty::Number => match raw.parse::<f64>() {
                    Ok(it) => *slot = Some(Value::Number(it)),
                    Err(_) => state.errs.push(ParseError::ArgumentIsNotANumber {
                        key: key.clone(),
                        values: values.clone(),
                        index,
                    }),
                },
                Ty::Bool => match raw.as_str() {
                    "true" => *slot = Some(Value::Bool(true)),
                    "false" => *slot = Some(Value::Bool(false)),
                    _ => state.errs.push(ParseError::ArgumentIsNotABool {
                        key: key.clone(),
                        values: values.clone(),
                        index,
                    }),
                },
                Ty::String | Ty::Custom(_) => (),
            }
        }
    }
    state
}

/// Collects every occurrence of a repeated option instead of keeping only
/// the last one.
pub fn array_on_repeat(mut state: OptsState) -> OptsState {
    for opt in &mut state.opts {
        if opt.count > 1 && !opt.desc.arity.is_empty() {
            opt.accumulate = true;
        }
    }
    state
}

/// Reports every unclaimed token together with the closest triggers.
pub fn suggest_opts(mut state: OptsState) -> OptsState {
    let triggers = state.opts.iter().flat_map(|it| it.desc.triggers()).collect::<Vec<_>>();
    for arg in &state.rest {
        let distances = triggers.iter().map(|it| levenshtein(arg, it)).collect::<Vec<_>>();
        let options = match distances.iter().min() {
            Some(&min) => triggers
                .iter()
                .zip(&distances)
                .filter(|&(_, &d)| d == min)
                .map(|(it, _)| it.to_string())
                .collect(),
            None => Vec::new(),
        };
        state.errs.push(ParseError::DidYouMean { argv: arg.clone(), options });
    }
    state
}

/// Turns option-looking tokens of the rest bucket into ad hoc options:
/// `--colors` becomes a flag, `--name Ada` a string option.
pub fn best_guess_opts(state: OptsState) -> OptsState {
    let OptsState { errs, mut opts, rest } = state;
    let (guesses, rest) = guess_rest(rest);
    for guess in guesses {
        let arity = if guess.value.is_some() { vec![Ty::String] } else { Vec::new() };
        let idx = match opts.iter().position(|it| it.desc.triggers().contains(&guess.token)) {
            Some(idx) => idx,
            None => {
                let kind = Kind::Named { triggers: vec![guess.token.clone()] };
                opts.push(BoundOption::new(OptionDescriptor::new(guess.key.clone(), kind, arity)));
                opts.len() - 1
            }
        };
        let opt = &mut opts[idx];
        opt.count += 1;
        if let Some(value) = guess.value {
            opt.values.push(Some(Value::String(value)));
        }
    }
    OptsState { errs, opts, rest }
}

/// Reports [`ParseError::FalseOptsRules`] when `rules` rejects the options.
pub fn verify_opts<R>(rules: R) -> impl Fn(OptsState) -> OptsState + Send + Sync
where
    R: Fn(&[BoundOption]) -> bool + Send + Sync,
{
    move |mut state: OptsState| {
        if !rules(&state.opts) {
            state.errs.push(ParseError::FalseOptsRules);
        }
        state
    }
}

/// Runs the `rules` of every present option.
pub fn verify_rules(mut state: OptsState) -> OptsState {
    for opt in &state.opts {
        if let Some(rules) = &opt.desc.rules {
            if opt.is_present() && !rules(opt, &state.opts) {
                state.errs.push(ParseError::FalseRules { key: opt.key().to_string() });
            }
        }
    }
    state
}

/// Replaces every option matching `pred` with `f` of it.
pub fn traverse_opts<P, F>(pred: P, f: F) -> impl Fn(OptsState) -> OptsState + Send + Sync
where
    P: Fn(&BoundOption) -> bool + Send + Sync,
    F: Fn(BoundOption) -> BoundOption + Send + Sync,
{
    move |OptsState { errs, opts, rest }| {
        let opts = opts.into_iter().map(|it| if pred(&it) { f(it) } else { it }).collect();
        OptsState { errs, opts, rest }
    }
}

/// Reports a scope in which no subcommand was triggered.
pub fn demand_a_subcommand(mut state: OptsState) -> OptsState {
    let subcommands = state.opts.iter().filter(|it| it.desc.is_subcommand()).collect::<Vec<_>>();
    if !subcommands.iter().any(|it| it.count > 0) {
        let options = subcommands.iter().map(|it| it.key().to_string()).collect();
        state.errs.push(ParseError::SubcommandRequired { options });
    }
    state
}

fn present_keys(opts: &[BoundOption]) -> BTreeSet<&str> {
    opts.iter().filter(|it| it.is_present()).map(|it| it.key()).collect()
}

fn raw_values(opt: &BoundOption) -> Vec<String> {
    opt.values.iter().map(|it| it.as_ref().map(Value::to_string).unwrap_or_default()).collect()
}

/// Value slots of an option paired with their type tags.
fn slots(opt: &mut BoundOption) -> impl Iterator<Item = (&mut Option<Value>, &Ty)> {
    let BoundOption { desc, values, .. } = opt;
    values.iter_mut().zip(desc.arity.iter().cycle())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b = b.chars().collect::<Vec<_>>();
    let mut prev = (0..=b.len()).collect::<Vec<_>>();
    for (i, ca) in a.chars().enumerate() {
        let mut curr = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev = curr;
    }
    prev[b.len()]
}
