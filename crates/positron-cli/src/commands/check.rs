use std::path::PathBuf;

use clap::ArgMatches;

use positron_compiler::analyze::check_program;
use positron_compiler::pipeline;

use super::{load_source, should_colorize};

pub struct CheckArgs {
    pub file: PathBuf,
    pub color: bool,
}

impl CheckArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().expect("required"),
            color: should_colorize(m),
        }
    }
}

pub fn run(args: CheckArgs) {
    let source = load_source(&args.file);
    let path = args.file.display().to_string();

    let parsed = match pipeline::parse(&source) {
        Ok(parsed) => parsed,
        Err(err) => {
            if let Some(diagnostics) = err.diagnostics() {
                eprint!(
                    "{}",
                    diagnostics
                        .printer()
                        .source(&source)
                        .path(&path)
                        .colored(args.color)
                        .render()
                );
            }
            std::process::exit(1);
        }
    };

    // Warnings render even when the program is accepted; silence otherwise,
    // like `cargo check`.
    let diagnostics = check_program(&parsed.program);
    if !diagnostics.is_empty() {
        eprint!(
            "{}",
            diagnostics
                .printer()
                .source(&source)
                .path(&path)
                .colored(args.color)
                .render()
        );
    }
    if diagnostics.has_errors() {
        std::process::exit(1);
    }
}
