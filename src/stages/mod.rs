//! Built-in stages.
//!
//! Every stage is a plain function (or a function returning a closure) over
//! one phase state, so they can be mixed freely with user defined ones:
//!
//! ```
//! use pflags::{stages, Stages};
//!
//! let stages = Stages::new()
//!     .argv(stages::argv::split_short_opts)
//!     .opts(stages::opts::set_default_values)
//!     .opts(stages::opts::cast)
//!     .args(stages::args::flags_as_bools);
//! # drop(stages);
//! ```

pub mod args;
pub mod argv;
pub mod opts;

/// An option-looking token of the rest bucket.
pub(crate) struct Guess {
    pub(crate) key: String,
    pub(crate) token: String,
    pub(crate) value: Option<String>,
}

/// Splits the rest bucket into guessed options and the tokens that don't
/// look like options. A guessed option takes the following token as its
/// value unless that one starts with `-`.
pub(crate) fn guess_rest(rest: Vec<String>) -> (Vec<Guess>, Vec<String>) {
    let mut guesses = Vec::new();
    let mut left = Vec::new();
    let mut tokens = rest.into_iter().peekable();
    while let Some(token) = tokens.next() {
        let key = match option_key(&token) {
            Some(it) => it.to_string(),
            None => {
                left.push(token);
                continue;
            }
        };
        let value = tokens.next_if(|it| !it.starts_with('-'));
        guesses.push(Guess { key, token, value });
    }
    (guesses, left)
}

/// `--name` gives `name`, `-v` gives `v`. Groups like `-vv` are left alone.
fn option_key(token: &str) -> Option<&str> {
    if let Some(long) = token.strip_prefix("--") {
        return if long.is_empty() || long.starts_with('-') { None } else { Some(long) };
    }
    let short = token.strip_prefix('-')?;
    let mut chars = short.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '-' => Some(short),
        _ => None,
    }
}
