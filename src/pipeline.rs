//! The staged pipeline: argv stages, binding, opts stages, projection, args
//! stages, subcommand recursion and checks.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    bind::bind,
    schema::{Command, OptionDescriptor},
    state::{Args, ArgsState, ArgvState, BoundOption, OptsState, ParseResult, PhaseState, Value},
    ParseError,
};

pub type ArgvStage = Arc<dyn Fn(ArgvState) -> ArgvState + Send + Sync>;
pub type OptsStage = Arc<dyn Fn(OptsState) -> OptsState + Send + Sync>;
pub type ArgsStage = Arc<dyn Fn(ArgsState) -> ArgsState + Send + Sync>;

/// A stage of any phase.
#[derive(Clone)]
pub enum Stage {
    Argv(ArgvStage),
    Opts(OptsStage),
    Args(ArgsStage),
}

impl Stage {
    pub fn argv(f: impl Fn(ArgvState) -> ArgvState + Send + Sync + 'static) -> Stage {
        Stage::Argv(Arc::new(f))
    }

    pub fn opts(f: impl Fn(OptsState) -> OptsState + Send + Sync + 'static) -> Stage {
        Stage::Opts(Arc::new(f))
    }

    pub fn args(f: impl Fn(ArgsState) -> ArgsState + Send + Sync + 'static) -> Stage {
        Stage::Args(Arc::new(f))
    }
}

/// The ordered stage lists of one scope.
///
/// Every stage receives a state whose `errs` is empty; whatever it leaves
/// in `errs` is appended to the parse result. A stage therefore can't drop
/// or reorder errors reported before it ran.
#[derive(Clone, Default)]
pub struct Stages {
    argv: Vec<ArgvStage>,
    opts: Vec<OptsStage>,
    args: Vec<ArgsStage>,
}

impl fmt::Debug for Stages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stages")
            .field("argv", &self.argv.len())
            .field("opts", &self.opts.len())
            .field("args", &self.args.len())
            .finish()
    }
}

impl Stages {
    pub fn new() -> Stages {
        Stages::default()
    }

    pub fn with(mut self, stage: Stage) -> Stages {
        match stage {
            Stage::Argv(it) => self.argv.push(it),
            Stage::Opts(it) => self.opts.push(it),
            Stage::Args(it) => self.args.push(it),
        }
        self
    }

    pub fn argv(self, f: impl Fn(ArgvState) -> ArgvState + Send + Sync + 'static) -> Stages {
        self.with(Stage::argv(f))
    }

    pub fn opts(self, f: impl Fn(OptsState) -> OptsState + Send + Sync + 'static) -> Stages {
        self.with(Stage::opts(f))
    }

    pub fn args(self, f: impl Fn(ArgsState) -> ArgsState + Send + Sync + 'static) -> Stages {
        self.with(Stage::args(f))
    }

    /// What a subcommand without its own stages runs: the opts stages only.
    /// Argv stages already saw the subcommand's tokens as part of the parent
    /// argv, and args stages stay with the scope they were given to.
    fn inherited(&self) -> Stages {
        Stages { opts: self.opts.clone(), ..Stages::default() }
    }
}

impl FromIterator<Stage> for Stages {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Stages {
        iter.into_iter().fold(Stages::new(), Stages::with)
    }
}

/// A configured pipeline.
///
/// The parser holds no per-parse state: one parser can serve any number
/// of parses, concurrently or not.
#[derive(Clone, Default)]
pub struct Parser {
    stages: Stages,
    substages: BTreeMap<String, Stages>,
    checks: Vec<ArgsStage>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("stages", &self.stages)
            .field("substages", &self.substages)
            .field("checks", &self.checks.len())
            .finish()
    }
}

impl Parser {
    pub fn new(stages: Stages) -> Parser {
        Parser { stages, ..Parser::default() }
    }

    /// Stages for the subcommand with the given key. Without them the
    /// subcommand runs the opts stages of its parent scope.
    pub fn substages(mut self, key: impl Into<String>, stages: Stages) -> Parser {
        self.substages.insert(key.into(), stages);
        self
    }

    /// Adds a check: it sees the final result and may only report errors.
    pub fn check(mut self, f: impl Fn(ArgsState) -> ArgsState + Send + Sync + 'static) -> Parser {
        self.checks.push(Arc::new(f));
        self
    }

    pub fn parse(&self, cmd: &Command, argv: Vec<String>) -> ParseResult {
        let _span = tracing::debug_span!("parse", cmd = %cmd.name).entered();
        let mut errs = Vec::new();
        let args = self.run(&cmd.opts, &self.stages, argv, &mut errs);

        for check in &self.checks {
            let mut state = check(ArgsState { errs: Vec::new(), args: args.clone() });
            errs.extend(state.take_errs());
        }
        tracing::debug!(errs = errs.len(), "parsed");
        ParseResult { errs, args }
    }

    /// Parses the arguments of the current process, without the program
    /// name.
    pub fn parse_env(&self, cmd: &Command) -> ParseResult {
        let argv = std::env::args().skip(1).collect();
        self.parse(cmd, argv)
    }

    fn run(
        &self,
        scope: &[OptionDescriptor],
        stages: &Stages,
        argv: Vec<String>,
        errs: &mut Vec<ParseError>,
    ) -> Args {
        let state = fold(ArgvState { errs: Vec::new(), argv }, &stages.argv, errs);
        tracing::debug!(argv = ?state.argv, "argv phase done");

        let bound = bind(scope, state.argv);
        let state = OptsState { errs: Vec::new(), opts: bound.opts, rest: bound.rest };
        let OptsState { opts, rest, .. } = fold(state, &stages.opts, errs);
        tracing::debug!(rest = ?rest, "opts phase done");

        let state = ArgsState { errs: Vec::new(), args: project(&opts, rest) };
        let mut args = fold(state, &stages.args, errs).args;

        for opt in triggered_subcommands(&opts) {
            if let Some(sub_scope) = opt.desc.sub_options() {
                let _span = tracing::debug_span!("subcommand", key = %opt.key()).entered();
                let sub_args = match self.substages.get(opt.key()) {
                    Some(sub_stages) => self.run(sub_scope, sub_stages, opt.argv.clone(), errs),
                    None => self.run(sub_scope, &stages.inherited(), opt.argv.clone(), errs),
                };
                args.insert(opt.key(), Value::Command(sub_args));
            }
        }
        args
    }
}

/// Parses `argv` against `cmd` without any stages.
pub fn parse(cmd: &Command, argv: Vec<String>) -> ParseResult {
    Parser::default().parse(cmd, argv)
}

fn fold<S: PhaseState>(
    mut state: S,
    stages: &[Arc<dyn Fn(S) -> S + Send + Sync>],
    errs: &mut Vec<ParseError>,
) -> S {
    for stage in stages {
        state = stage(state);
        errs.extend(state.take_errs());
    }
    state
}

fn project(opts: &[BoundOption], rest: Vec<String>) -> Args {
    let mut args = Args { rest, ..Args::default() };
    for opt in opts {
        if let Some(value) = opt.resolve() {
            args.insert(opt.key(), value);
        }
    }
    args
}

fn triggered_subcommands(opts: &[BoundOption]) -> impl Iterator<Item = &BoundOption> {
    opts.iter().filter(|it| it.desc.is_subcommand() && it.count > 0)
}
