use expect_test::expect;
use pflags::{
    array, bool, command, complement, flag, number, stages, string, string_pos, subcommand,
    ArgsState, BoundOption, ErrorKind, OptsState, ParseError, Parser, Stages, Ty, Value,
};

use crate::{argv, check, deep_thought, deep_thought_argv, kinds};

#[test]
fn split_short_opts() {
    let cmd = command("cmd", vec![flag("all", ["-a"]), flag("verbose", ["-v"])]).unwrap();
    let parser = Parser::new(Stages::new().argv(stages::argv::split_short_opts));
    check(
        &parser,
        &cmd,
        "-avv",
        expect![[r#"{"errs":[],"args":{"_":[],"all":{"count":1},"verbose":{"count":2}}}"#]],
    );
}

#[test]
fn short_opts_no_space() {
    let cmd = command("cmd", vec![number("n", ["-n"])]).unwrap();
    let parser = Parser::new(
        Stages::new().argv(stages::argv::short_opts_no_space).opts(stages::opts::cast),
    );
    let res = parser.parse(&cmd, argv("-n42"));
    assert_eq!(res.args.get("n"), Some(&Value::Number(42.0)));
}

#[test]
fn set_default_values() {
    let cmd = command(
        "cmd",
        vec![
            flag("level", ["-l"]).default_values(["3"]),
            string("genre", ["-g"]).default_values(["sci-fi"]),
        ],
    )
    .unwrap();
    let parser = Parser::new(Stages::new().opts(stages::opts::set_default_values));
    check(
        &parser,
        &cmd,
        "",
        expect![[r#"{"errs":[],"args":{"_":[],"genre":"sci-fi","level":{"count":3}}}"#]],
    );
    check(
        &parser,
        &cmd,
        "-g drama",
        expect![[r#"{"errs":[],"args":{"_":[],"genre":"drama","level":{"count":3}}}"#]],
    );
}

#[test]
fn validate_pos_args() {
    let parser = Parser::new(Stages::new().opts(stages::opts::validate_pos_args));

    let cmd = command("cmd", vec![string_pos("a"), string_pos("b").required(true)]).unwrap();
    for input in ["", "x y"] {
        let res = parser.parse(&cmd, argv(input));
        assert_eq!(
            res.errs,
            vec![ParseError::InvalidRequiredPositionalArgument {
                positional: vec!["a".to_string(), "b".to_string()],
            }]
        );
    }

    let cmd = command("cmd", vec![string_pos("a").required(true), string_pos("b")]).unwrap();
    assert!(parser.parse(&cmd, argv("")).errs.is_empty());
}

#[test]
fn restrict_to_only() {
    let cmd = command(
        "cmd",
        vec![array("pair", vec![Ty::String, Ty::String], ["--pair"]).only(["a", "b"])],
    )
    .unwrap();
    let parser = Parser::new(Stages::new().opts(stages::opts::restrict_to_only));

    let res = parser.parse(&cmd, argv("--pair a c"));
    expect![[r#"[{"kind":"value-restrictions-violated","key":"pair","values":["a","c"],"index":1,"only":["a","b"]}]"#]]
        .assert_eq(&serde_json::to_string(&res.errs).unwrap());

    let res = parser.parse(&cmd, argv("--pair c d"));
    assert_eq!(
        kinds(&res.errs),
        vec![ErrorKind::ValueRestrictionsViolated, ErrorKind::ValueRestrictionsViolated]
    );
}

#[test]
fn cast_reports_and_keeps_bad_values() {
    let cmd = command("cmd", vec![number("n", ["-n"]), bool("b", ["-b"])]).unwrap();
    let parser = Parser::new(Stages::new().opts(stages::opts::cast));
    check(
        &parser,
        &cmd,
        "-n abc -b maybe",
        expect![[r#"{"errs":[{"kind":"argument-is-not-a-number","key":"n","values":["abc"],"index":0},{"kind":"argument-is-not-a-bool","key":"b","values":["maybe"],"index":0}],"args":{"_":[],"b":"maybe","n":"abc"}}"#]],
    );
    check(
        &parser,
        &cmd,
        "-n -1.5 -b false",
        expect![[r#"{"errs":[],"args":{"_":[],"b":false,"n":-1.5}}"#]],
    );
}

#[test]
fn broaden_bools() {
    let cmd = command("cmd", vec![bool("smile", ["--smile"])]).unwrap();

    let parser = Parser::new(
        Stages::new().opts(stages::opts::broaden_bools(&["yes"], &["no"])).opts(stages::opts::cast),
    );
    let res = parser.parse(&cmd, argv("--smile yes"));
    assert!(res.errs.is_empty());
    assert_eq!(res.args.get("smile"), Some(&Value::Bool(true)));

    let parser = Parser::new(Stages::new().opts(stages::opts::cast));
    let res = parser.parse(&cmd, argv("--smile yes"));
    assert_eq!(kinds(&res.errs), vec![ErrorKind::ArgumentIsNotABool]);
}

#[test]
fn reverse_flags_and_bools() {
    let cmd = command(
        "cmd",
        vec![
            flag("popcorn", ["-l"]).reverse(),
            bool("fantasy", ["--no-hobbits"]).reverse(),
        ],
    )
    .unwrap();
    let parser = Parser::new(
        Stages::new()
            .opts(stages::opts::reverse_flags)
            .opts(stages::opts::reverse_bools)
            .opts(stages::opts::cast)
            .args(stages::args::flags_as_numbers),
    );
    check(
        &parser,
        &cmd,
        "-l -l --no-hobbits true",
        expect![[r#"{"errs":[],"args":{"_":[],"fantasy":false,"popcorn":-2}}"#]],
    );
}

#[test]
fn array_on_repeat() {
    let cmd =
        command("cmd", vec![array("point", vec![Ty::Number, Ty::Number], ["--point"])]).unwrap();
    let parser = Parser::new(
        Stages::new().opts(stages::opts::cast).opts(stages::opts::array_on_repeat),
    );
    check(
        &parser,
        &cmd,
        "--point 1 2 --point 3 4",
        expect![[r#"{"errs":[],"args":{"_":[],"point":[[1,2],[3,4]]}}"#]],
    );
    check(
        &parser,
        &cmd,
        "--point 1 2",
        expect![[r#"{"errs":[],"args":{"_":[],"point":[1,2]}}"#]],
    );
}

#[test]
fn imply_and_contradict_opts() {
    let cmd = command(
        "cmd",
        vec![
            flag("quiet", ["-q"]).contradicts(["verbose"]),
            flag("verbose", ["-v"]).implies(["log"]),
            string("log", ["--log"]),
        ],
    )
    .unwrap();
    let parser = Parser::new(
        Stages::new().opts(stages::opts::imply_opts).opts(stages::opts::contradict_opts),
    );

    let res = parser.parse(&cmd, argv("-q -v"));
    expect![[r#"[{"kind":"implication-violated","key":"verbose","implies":["log"]},{"kind":"contradiction-detected","key":"quiet","contradicts":["verbose"]}]"#]]
        .assert_eq(&serde_json::to_string(&res.errs).unwrap());

    assert!(parser.parse(&cmd, argv("-v --log out.txt")).errs.is_empty());
}

#[test]
fn suggest_opts() {
    let cmd =
        command("cmd", vec![flag("colors", ["--colors"]), flag("help", ["-h", "--help"])]).unwrap();
    let parser = Parser::new(Stages::new().opts(stages::opts::suggest_opts));

    let res = parser.parse(&cmd, argv("--colrs"));
    assert_eq!(
        res.errs,
        vec![ParseError::DidYouMean {
            argv: "--colrs".to_string(),
            options: vec!["--colors".to_string()],
        }]
    );
}

#[test]
fn verify_opts_and_rules() {
    let cmd = command(
        "cmd",
        vec![string("name", ["--name"]).rules(|opt, _| {
            opt.values.iter().flatten().all(|it| it.to_string().len() > 2)
        })],
    )
    .unwrap();
    let parser = Parser::new(
        Stages::new()
            .opts(stages::opts::verify_opts(|opts| opts.iter().any(BoundOption::is_present)))
            .opts(stages::opts::verify_rules),
    );

    assert_eq!(kinds(&parser.parse(&cmd, argv("")).errs), vec![ErrorKind::FalseOptsRules]);
    assert_eq!(
        parser.parse(&cmd, argv("--name Al")).errs,
        vec![ParseError::FalseRules { key: "name".to_string() }]
    );
    assert!(parser.parse(&cmd, argv("--name Ada")).errs.is_empty());
}

#[test]
fn traverse_opts() {
    let cmd = command("cmd", vec![string("list", ["--list"])]).unwrap();
    let split_commas = |mut opt: BoundOption| {
        opt.values = opt
            .values
            .into_iter()
            .flat_map(|it| match it {
                Some(Value::String(it)) => it.split(',').map(|it| Some(Value::from(it))).collect::<Vec<_>>(),
                it => vec![it],
            })
            .collect();
        opt.accumulate = true;
        opt
    };
    let parser = Parser::new(
        Stages::new().opts(stages::opts::traverse_opts(|opt| opt.key() == "list", split_commas)),
    );
    check(
        &parser,
        &cmd,
        "--list a,b,c",
        expect![[r#"{"errs":[],"args":{"_":[],"list":["a","b","c"]}}"#]],
    );
}

#[test]
fn demand_a_subcommand() {
    let rate = subcommand("rate", ["rate"], vec![]).unwrap();
    let cmd = command("cmd", vec![flag("help", ["--help"]), rate]).unwrap();
    let parser = Parser::new(Stages::new().opts(stages::opts::demand_a_subcommand));

    assert_eq!(
        parser.parse(&cmd, argv("--help")).errs,
        vec![ParseError::SubcommandRequired { options: vec!["rate".to_string()] }]
    );
    assert!(parser.parse(&cmd, argv("rate")).errs.is_empty());
}

#[test]
fn custom_opts_stage() {
    let cmd = command("cmd", vec![string("name", ["--name"])]).unwrap();
    let upper = |mut state: OptsState| {
        for opt in &mut state.opts {
            for value in opt.values.iter_mut().flatten() {
                *value = Value::from(value.to_string().to_uppercase());
            }
        }
        state
    };
    let res = Parser::new(Stages::new().opts(upper)).parse(&cmd, argv("--name ada"));
    assert_eq!(res.args.get("name"), Some(&Value::from("ADA")));
}

#[test]
fn fail_and_clear_rest() {
    let cmd = command("cmd", vec![]).unwrap();

    let parser = Parser::new(Stages::new().args(stages::args::fail_rest));
    check(
        &parser,
        &cmd,
        "a b",
        expect![[r#"{"errs":[{"kind":"unexpected-argument","argument":"a"},{"kind":"unexpected-argument","argument":"b"}],"args":{"_":["a","b"]}}"#]],
    );

    let parser = Parser::new(Stages::new().args(stages::args::clear_rest).args(stages::args::fail_rest));
    check(&parser, &cmd, "a b", expect![[r#"{"errs":[],"args":{"_":[]}}"#]]);
}

#[test]
fn best_guess_cast() {
    let cmd = command(
        "cmd",
        vec![
            string("a", ["-a"]),
            string("b", ["-b"]),
            string("c", ["-c"]),
            array("d", vec![Ty::String, Ty::String], ["-d"]),
        ],
    )
    .unwrap();
    let parser = Parser::new(Stages::new().args(stages::args::best_guess_cast));
    check(
        &parser,
        &cmd,
        "-a 42 -b true -c x -d 1 false",
        expect![[r#"{"errs":[],"args":{"_":[],"a":42,"b":true,"c":"x","d":[1,false]}}"#]],
    );
}

#[test]
fn traverse_args() {
    let cmd = command("cmd", vec![string("name", ["--name"]), flag("v", ["-v"])]).unwrap();
    let parser = Parser::new(Stages::new().args(stages::args::traverse_args(
        |key, _| key == "name",
        |_, value| Value::from(format!("<{}>", value)),
    )));
    check(
        &parser,
        &cmd,
        "--name ada -v",
        expect![[r#"{"errs":[],"args":{"_":[],"name":"<ada>","v":{"count":1}}}"#]],
    );
}

#[test]
fn reverse_flags_saturates() {
    let cmd = command(
        "cmd",
        vec![flag("f", ["-f"]).reverse().default_values(["-9223372036854775808"])],
    )
    .unwrap();
    let parser = Parser::new(
        Stages::new().opts(stages::opts::set_default_values).opts(stages::opts::reverse_flags),
    );
    let res = parser.parse(&cmd, argv(""));
    assert!(res.errs.is_empty());
    assert_eq!(res.args.get("f"), Some(&Value::Flag { count: i64::MAX }));
}

#[test]
fn best_guess_opts() {
    let parser = Parser::new(Stages::new().opts(stages::opts::best_guess_opts));
    let res = parser.parse(&deep_thought(), deep_thought_argv());
    expect![[r#"{"errs":[],"args":{"_":["-vv"],"colors":{"count":1},"entries":"42","fantasy":"true","help":{"count":1},"nums":"23","popcorn":{"count":1},"query":"The Hobbit","rate":{"_":[],"stars":"8"},"smile=no":{"count":1}}}"#]]
        .assert_eq(&serde_json::to_string(&res).unwrap());

    let cmd = command("cmd", vec![]).unwrap();
    check(
        &parser,
        &cmd,
        "-v --name Ada x -v",
        expect![[r#"{"errs":[],"args":{"_":["x"],"name":"Ada","v":{"count":2}}}"#]],
    );
}

#[test]
fn best_guess_args() {
    let parser = Parser::new(Stages::new().args(stages::args::best_guess_args));
    let res = parser.parse(&deep_thought(), deep_thought_argv());
    expect![[r#"{"errs":[],"args":{"_":["-vv"],"colors":{"count":1},"entries":"42","fantasy":"true","help":{"count":1},"nums":"23","popcorn":{"count":1},"query":"The Hobbit","rate":{"_":[],"stars":"8"},"smile=no":{"count":1}}}"#]]
        .assert_eq(&serde_json::to_string(&res).unwrap());

    let cmd = command("cmd", vec![]).unwrap();
    check(
        &parser,
        &cmd,
        "-v --name Ada x -v",
        expect![[r#"{"errs":[],"args":{"_":["x"],"name":"Ada","v":{"count":2}}}"#]],
    );
}

#[test]
fn number_as_flag() {
    let parser = Parser::new(
        Stages::new().opts(stages::opts::cast).args(stages::args::number_as_flag("entries")),
    );
    let res = parser.parse(&deep_thought(), deep_thought_argv());
    expect![[r#"{"errs":[],"args":{"_":["--colors","-vv","--smile=no"],"entries":{"count":42},"fantasy":true,"help":{"count":1},"nums":"23","popcorn":{"count":1},"query":"The Hobbit","rate":{"_":[],"stars":8}}}"#]]
        .assert_eq(&serde_json::to_string(&res).unwrap());
}

#[test]
fn merge_args() {
    let res = pflags::parse(&deep_thought(), deep_thought_argv());
    let merged = stages::args::merge_args(ArgsState::from(res));
    expect![[r#"{"_":["--colors","-vv","--smile=no"],"entries":"42","fantasy":"true","help":{"count":1},"nums":"23","popcorn":{"count":1},"query":"The Hobbit","stars":"8"}"#]]
        .assert_eq(&serde_json::to_string(&merged.args).unwrap());

    let rate = subcommand("rate", ["rate"], vec![string("name", ["--name"])]).unwrap();
    let cmd = command("cmd", vec![string("name", ["-n"]), rate]).unwrap();
    let res = pflags::parse(&cmd, argv("-n outer x rate --name inner y"));
    let merged = stages::args::merge_args(ArgsState::from(res));
    expect![[r#"{"_":["x","y"],"name":"outer"}"#]]
        .assert_eq(&serde_json::to_string(&merged.args).unwrap());
}

#[test]
fn complement_negates_an_option() {
    let tired = bool("tired", ["-t", "--tired"]).default_values(["true"]);
    let not_tired = complement("--not-", &tired);
    let bad_luck = flag("badLuck", ["--luck"]).reverse();
    let no_bad_luck = complement("--no-", &bad_luck);
    assert_eq!(not_tired.triggers(), &["--not-tired"]);
    assert!(not_tired.reverse && not_tired.default_values.is_none());

    let cmd = command("complement", vec![tired, not_tired, bad_luck, no_bad_luck]).unwrap();
    let parser = Parser::new(
        Stages::new()
            .opts(stages::opts::reverse_bools)
            .opts(stages::opts::reverse_flags)
            .opts(stages::opts::cast)
            .args(stages::args::flags_as_bools),
    );
    check(
        &parser,
        &cmd,
        "--not-tired true --no-luck",
        expect![[r#"{"errs":[],"args":{"_":[],"badLuck":true,"tired":false}}"#]],
    );
}

#[test]
fn required_key_is_met_by_its_complement() {
    let tired = bool("tired", ["--tired"]).required(true);
    let not_tired = complement("--not-", &tired);
    let cmd = command("cmd", vec![tired, not_tired]).unwrap();
    let parser = Parser::new(Stages::new().opts(stages::opts::require_opts));

    assert!(parser.parse(&cmd, argv("--not-tired true")).errs.is_empty());
    assert_eq!(kinds(&parser.parse(&cmd, argv("")).errs), vec![ErrorKind::RequiredOptionMissing]);
}
