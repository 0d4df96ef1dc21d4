mod cli;
mod commands;

use commands::{check::CheckArgs, eval::EvalArgs, run::RunArgs, tree::TreeArgs};

fn main() {
    let matches = cli::build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", m)) => {
            commands::run::run(RunArgs::from_matches(m));
        }
        Some(("check", m)) => {
            commands::check::run(CheckArgs::from_matches(m));
        }
        Some(("eval", m)) => {
            commands::eval::run(EvalArgs::from_matches(m));
        }
        Some(("tree", m)) => {
            commands::tree::run(TreeArgs::from_matches(m));
        }
        _ => unreachable!("clap should have caught this"),
    }
}
