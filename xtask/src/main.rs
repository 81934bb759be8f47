#[cfg(test)]
mod tidy;

use std::process::ExitCode;

use xshell::{cmd, Shell};

const TASKS: &str = "ci, test, demo";

fn main() -> xshell::Result<ExitCode> {
    let sh = Shell::new()?;
    sh.change_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/.."));

    let task = std::env::args().nth(1).unwrap_or_else(|| "ci".to_string());
    match task.as_str() {
        "ci" => {
            test(&sh)?;
            demo(&sh)?;
        }
        "test" => test(&sh)?,
        "demo" => demo(&sh)?,
        _ => {
            eprintln!("unknown task `{task}`, expected one of: {TASKS}");
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Unit, integration and tidy tests of the whole workspace, then doctests.
fn test(sh: &Shell) -> xshell::Result<()> {
    cmd!(sh, "cargo test --workspace --all-targets").run()?;
    cmd!(sh, "cargo test --doc -p pflags").run()
}

/// The demo must greet and exit successfully on a valid command line.
fn demo(sh: &Shell) -> xshell::Result<()> {
    let greeting = cmd!(sh, "cargo run --quiet --example hello -- Ada -e").read()?;
    eprintln!("{greeting}");
    Ok(())
}
