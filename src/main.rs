mod cli;
mod config;
mod email;
mod error;
mod extract;
mod generate;
mod models;
mod template;
mod tracking;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    cli::run(cli);
}
