use pflags::{command, flag, stages, string_pos, Parser, Stages, Value};

fn main() {
    let cmd = command(
        "hello",
        vec![string_pos("name").required(true), flag("emoji", ["-e", "--emoji"])],
    )
    .unwrap();

    let parser = Parser::new(
        Stages::new()
            .argv(stages::argv::split_short_opts)
            .opts(stages::opts::require_opts)
            .args(stages::args::fail_rest)
            .args(stages::args::flags_as_bools),
    );

    let res = parser.parse_env(&cmd);
    if !res.errs.is_empty() {
        for err in &res.errs {
            eprintln!("{}", err);
        }
        std::process::exit(1)
    }

    let name = res.args.get("name").and_then(Value::as_str).unwrap_or_default();
    let bang = if res.args.get("emoji") == Some(&Value::Bool(true)) { "❣️" } else { "!" };
    println!("Hello {}{}", name, bang);
}
