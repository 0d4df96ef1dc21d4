use std::path::PathBuf;

use clap::ArgMatches;

use positron_vm::{Evaluator, FuelLimits};

use super::{load_checked, load_source, parse_start_expr, should_colorize};

pub struct EvalArgs {
    pub file: PathBuf,
    pub expr: String,
    pub fuel: u32,
    pub color: bool,
}

impl EvalArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().expect("required"),
            expr: m.get_one::<String>("expr").cloned().expect("required"),
            fuel: *m.get_one::<u32>("fuel").expect("defaulted"),
            color: should_colorize(m),
        }
    }
}

pub fn run(args: EvalArgs) {
    let source = load_source(&args.file);
    let checked = load_checked(&source, &args.file, args.color);
    let expr = parse_start_expr(&args.expr, args.color);

    let evaluator = Evaluator::new(&checked.program).limits(FuelLimits::new().exec_fuel(args.fuel));
    match evaluator.normalize(&expr) {
        Ok(normal_form) => println!("{normal_form}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
