//! Command line arguments parser built from composable stages.
//!
//! A parse binds tokens to a [`Command`] schema and refines the binding in
//! three phases (argv, opts, args), each a list of user supplied stage
//! functions. Problems never abort a parse; they are collected in
//! [`ParseResult::errs`].
//!
//! ```
//! use pflags::{command, flag, string, stages, Parser, Stages};
//!
//! let cmd = command("hello", vec![
//!     flag("verbose", ["-v", "--verbose"]),
//!     string("name", ["--name"]).required(true),
//! ])
//! .unwrap();
//!
//! let parser = Parser::new(
//!     Stages::new().argv(stages::argv::split_short_opts).opts(stages::opts::require_opts),
//! );
//! let res = parser.parse(&cmd, vec!["-vv".to_string()]);
//! assert_eq!(res.errs.len(), 1);
//! assert_eq!(res.args.get("verbose"), Some(&pflags::Value::Flag { count: 2 }));
//! ```

mod bind;
mod error;
mod pipeline;
mod schema;
mod state;

pub mod stages;

pub use crate::{
    bind::{bind, Bound},
    error::{ErrorKind, ParseError, SchemaError},
    pipeline::{parse, ArgsStage, ArgvStage, OptsStage, Parser, Stage, Stages},
    schema::{
        array, bool, bool_pos, command, complement, flag, number, number_pos, string, string_pos,
        subcommand, Command, Kind, OptionDescriptor, Rule, Ty,
    },
    state::{Args, ArgsState, ArgvState, BoundOption, OptsState, ParseResult, Value},
};

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
