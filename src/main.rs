mod auth;
mod cli;
mod config;
mod error;
mod output;
mod providers;

use clap::Parser;
use cli::Cli;
use log::{error, info};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting glpipe");

    if let Err(e) = cli.execute().await {
        error!("{e:#}");
        output::actions::set_failed(&e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
