mod add;
mod config_cmd;
mod track;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::Language;

#[derive(Parser)]
#[command(name = "dcp")]
#[command(about = "Manage Daily Coding Problem workspaces", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a problem workspace from an email or text input
    Add(add::AddArgs),
    /// Manage DCP problem-number tracking
    Track {
        #[command(subcommand)]
        command: TrackCommands,
    },
    /// Show or change defaults
    Config {
        /// Default stub language
        #[arg(long, value_enum)]
        language: Option<Language>,
        /// Default problems directory
        #[arg(long)]
        problems_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TrackCommands {
    /// List all problems with their DCP numbers
    List {
        #[arg(long)]
        problems_dir: Option<PathBuf>,
    },
    /// Record the DCP number for a problem directory
    Add {
        /// Problem directory name (e.g. 2023_1204)
        directory: String,
        /// DCP problem number
        number: u32,
        #[arg(long)]
        problems_dir: Option<PathBuf>,
    },
    /// Show problems without a DCP number
    Untracked {
        #[arg(long)]
        problems_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) {
    match cli.command {
        Commands::Add(args) => add::add_problem(args),
        Commands::Track { command } => track::run(command),
        Commands::Config {
            language,
            problems_dir,
        } => config_cmd::handle_config(language, problems_dir),
    }
}
