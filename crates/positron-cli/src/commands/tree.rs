use std::path::PathBuf;

use clap::ArgMatches;

use positron_compiler::export::to_dot;
use positron_compiler::{ScLimits, Strategy};

use super::{load_checked, load_source, resolve_start, should_colorize, type_overrides};

pub struct TreeArgs {
    pub file: PathBuf,
    pub expr: String,
    pub types: Vec<String>,
    pub strategy: Strategy,
    pub fuel: u32,
    pub color: bool,
}

impl TreeArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().expect("required"),
            expr: m.get_one::<String>("expr").cloned().expect("required"),
            types: type_overrides(m),
            strategy: m
                .get_one::<String>("strategy")
                .expect("defaulted")
                .parse()
                .expect("validated by clap"),
            fuel: *m.get_one::<u32>("fuel").expect("defaulted"),
            color: should_colorize(m),
        }
    }
}

pub fn run(args: TreeArgs) {
    let source = load_source(&args.file);
    let checked = load_checked(&source, &args.file, args.color);
    let (start, ctx) = resolve_start(&checked, &args.expr, &args.types, args.color);

    match checked.supercompile(start, ctx, args.strategy, ScLimits::new().fuel(args.fuel)) {
        Ok(outcome) => println!("{}", to_dot(&outcome.tree)),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
