mod cli;
mod commands;


use clap::Parser;
use dotenvy::dotenv;
use log::error;

use crate::cli::Cli;

fn init_logging(log_level: &str) {
    azmon_options::set_process_env("RUST_LOG", log_level);
    pretty_env_logger::init();
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    commands::run(cli.command).inspect_err(|e| error!("{:#}", e))
}
