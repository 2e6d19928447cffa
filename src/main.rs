mod cli;
mod config;
mod health;
mod logging;
mod model;
mod pedometer;
mod session;
mod storage;

use std::process;

use clap::Parser;

use config::Config;

fn main() {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(cli, &config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
