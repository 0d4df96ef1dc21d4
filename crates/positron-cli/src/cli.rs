//! Command-line definition: shared argument builders composed per command.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("positron")
        .about("Positive supercompiler for the SLL language")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Supercompile an expression and print the residual program")
                .arg(file_arg())
                .arg(expr_arg())
                .arg(types_arg())
                .arg(out_arg())
                .arg(strategy_arg())
                .arg(json_arg())
                .arg(fuel_arg("100000"))
                .arg(color_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Parse and type check a program")
                .arg(file_arg())
                .arg(color_arg()),
        )
        .subcommand(
            Command::new("eval")
                .about("Normalize an expression with the reference interpreter")
                .arg(file_arg())
                .arg(expr_arg())
                .arg(fuel_arg("1000000"))
                .arg(color_arg()),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the process tree as DOT")
                .arg(file_arg())
                .arg(expr_arg())
                .arg(types_arg())
                .arg(strategy_arg())
                .arg(fuel_arg("100000"))
                .arg(color_arg()),
        )
}

/// Program file (positional).
fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("SLL program file")
}

/// Start expression (positional).
fn expr_arg() -> Arg {
    Arg::new("expr")
        .value_name("EXPR")
        .required(true)
        .help("Start expression, or a bare function name to synthesize one")
}

/// Free-variable types (-t/--types var=Type ..).
fn types_arg() -> Arg {
    Arg::new("types")
        .short('t')
        .long("types")
        .value_name("VAR=TYPE")
        .action(ArgAction::Append)
        .num_args(1..)
        .help("Types for free variables, e.g. a=Nat b=Nat")
}

/// Output base name (-o/--out).
fn out_arg() -> Arg {
    Arg::new("out")
        .short('o')
        .long("out")
        .value_name("BASE")
        .value_parser(value_parser!(PathBuf))
        .help("Write the process tree to BASE.dot (and BASE.json with --json)")
}

/// Whistle strategy (-s/--strategy).
fn strategy_arg() -> Arg {
    Arg::new("strategy")
        .short('s')
        .long("strategy")
        .value_name("STRATEGY")
        .default_value("HE")
        .value_parser(["HE", "TAG"])
        .help("Whistle strategy: homeomorphic embedding or bag of tags")
}

/// Also write the JSON tree dump (--json).
fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Also write the process tree as BASE.json")
}

/// Fuel limit (--fuel).
fn fuel_arg(default: &'static str) -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .default_value(default)
        .value_parser(value_parser!(u32))
        .help("Execution fuel limit")
}

/// Color output control (--color).
fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}
