//! `lexico` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and dispatch to command handlers.
//! - Resolve the data directory and start file logging when it exists.

mod commands;
mod terminal;

use clap::{Parser, Subcommand};
use lexico_core::{default_log_level, init_logging, AppPaths, WordnikClient, DEFAULT_EXTRA};
use std::path::PathBuf;
use std::process::ExitCode;
use terminal::ConsoleTerminal;

#[derive(Parser)]
#[command(
    name = "lexico",
    version,
    about = "Your personal glossarist to help you expand your English vocabulary."
)]
struct Cli {
    /// Data directory (defaults to ~/.lexico)
    #[arg(long, env = "LEXICO_HOME", global = true)]
    base_dir: Option<PathBuf>,
    /// Log level for the file log (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Finds the dictionary data about a word and saves it
    Add { word: Option<String> },
    /// Helps you get started: saves your Wordnik API key and creates the dictionary
    Init,
    /// Lists all the words present in your dictionary
    View {
        #[arg(
            long,
            default_value = DEFAULT_EXTRA,
            help = "Displays an additional column with information of your choice"
        )]
        extra: String,
    },
    /// Shows everything saved about one word
    Show { word: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(dir) => AppPaths::new(std::path::absolute(&dir).unwrap_or(dir)),
        None => match AppPaths::from_home() {
            Ok(paths) => paths,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
    };

    // `init` is the only command allowed to create the data directory.
    if paths.base_dir().is_dir() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &paths.log_dir()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut term = ConsoleTerminal;
    let code = match cli.command {
        Cmd::Add { word } => commands::add(&paths, word, &mut term, WordnikClient::from_config),
        Cmd::Init => commands::init(&paths, &mut term),
        Cmd::View { extra } => commands::view(&paths, &extra, &mut term),
        Cmd::Show { word } => commands::show(&paths, &word, &mut term),
    };
    ExitCode::from(code)
}
