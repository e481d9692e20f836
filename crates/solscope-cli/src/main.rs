//! `solscope` binary: parses arguments, sets up logging and reports failures.

use std::process;

use clap::Parser;
use log::{debug, error, info};
use miette::GraphicalTheme;

use solscope_cli::{Args, error_adapter};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(args.log_level)
        .init();

    let command = args.command.name();
    info!(command, log_level:? = args.log_level; "Running solscope");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = solscope_cli::run(&args) {
        let reports = error_adapter::render(&err, GraphicalTheme::default());
        for report in &reports {
            error!("{report}");
        }
        error!(command, errors = reports.len(); "Command failed");
        process::exit(1);
    }

    info!(command; "Command finished");
}
