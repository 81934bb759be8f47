//! Token binder: assigns raw tokens to the descriptors of one scope.
//!
//! Binding never fails. Short value lists and unknown tokens are kept as
//! data (`None` slots, `rest`) for stages to report.

use crate::{
    schema::{Kind, OptionDescriptor},
    state::{BoundOption, Value},
};

#[derive(Debug, Clone)]
pub struct Bound {
    /// One entry per descriptor, in declaration order.
    pub opts: Vec<BoundOption>,
    pub rest: Vec<String>,
}

pub fn bind(scope: &[OptionDescriptor], argv: Vec<String>) -> Bound {
    let mut p = Tokens::new(argv);
    let mut opts = scope.iter().cloned().map(BoundOption::new).collect::<Vec<_>>();
    let mut rest = Vec::new();

    while let Some(arg) = p.next() {
        if let Some(idx) = trigger_index(scope, &arg) {
            let opt = &mut opts[idx];
            opt.count += 1;
            match &scope[idx].kind {
                Kind::Subcommand { .. } => {
                    while let Some(sub_arg) = p.next_unless(|it| trigger_index(scope, it).is_some()) {
                        opt.argv.push(sub_arg);
                    }
                    tracing::trace!(key = %opt.desc.key, argv = ?opt.argv, "subcommand");
                }
                _ => {
                    for _ in 0..scope[idx].arity.len() {
                        opt.values.push(p.next().map(Value::String));
                    }
                    tracing::trace!(key = %opt.desc.key, trigger = %arg, "option");
                }
            }
            continue;
        }

        let unfilled = opts.iter_mut().find(|it| it.desc.is_positional() && it.count == 0);
        match unfilled {
            Some(pos) => {
                tracing::trace!(key = %pos.desc.key, value = %arg, "positional");
                pos.count = 1;
                pos.values.push(Some(Value::String(arg)));
            }
            None => rest.push(arg),
        }
    }

    Bound { opts, rest }
}

fn trigger_index(scope: &[OptionDescriptor], arg: &str) -> Option<usize> {
    scope.iter().position(|opt| opt.triggers().iter().any(|it| it == arg))
}

struct Tokens {
    rargs: Vec<String>,
}

impl Tokens {
    fn new(mut args: Vec<String>) -> Self {
        args.reverse();
        Self { rargs: args }
    }

    fn next(&mut self) -> Option<String> {
        self.rargs.pop()
    }

    fn next_unless(&mut self, stop: impl Fn(&str) -> bool) -> Option<String> {
        let stopped = self.rargs.last().map_or(true, |it| stop(it.as_str()));
        if stopped {
            None
        } else {
            self.rargs.pop()
        }
    }
}
