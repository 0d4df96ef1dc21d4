use std::path::PathBuf;

use clap::ArgMatches;

use positron_compiler::export::{to_dot, to_json};
use positron_compiler::{ScLimits, Strategy};

use super::{load_checked, load_source, resolve_start, should_colorize, type_overrides};

pub struct RunArgs {
    pub file: PathBuf,
    pub expr: String,
    pub types: Vec<String>,
    pub out: Option<PathBuf>,
    pub strategy: Strategy,
    pub json: bool,
    pub fuel: u32,
    pub color: bool,
}

impl RunArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().expect("required"),
            expr: m.get_one::<String>("expr").cloned().expect("required"),
            types: type_overrides(m),
            out: m.get_one::<PathBuf>("out").cloned(),
            strategy: m
                .get_one::<String>("strategy")
                .expect("defaulted")
                .parse()
                .expect("validated by clap"),
            json: m.get_flag("json"),
            fuel: *m.get_one::<u32>("fuel").expect("defaulted"),
            color: should_colorize(m),
        }
    }
}

pub fn run(args: RunArgs) {
    let source = load_source(&args.file);
    let checked = load_checked(&source, &args.file, args.color);
    let (start, ctx) = resolve_start(&checked, &args.expr, &args.types, args.color);

    let outcome = match checked.supercompile(
        start,
        ctx,
        args.strategy,
        ScLimits::new().fuel(args.fuel),
    ) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    print!("{}", outcome.residual);

    if let Some(base) = &args.out {
        write_or_die(&base.with_extension("dot"), &to_dot(&outcome.tree));
        if args.json {
            write_or_die(&base.with_extension("json"), &to_json(&outcome.tree));
        }
    }
}

fn write_or_die(path: &PathBuf, contents: &str) {
    if let Err(err) = std::fs::write(path, contents) {
        eprintln!("error: cannot write {}: {err}", path.display());
        std::process::exit(1);
    }
}
