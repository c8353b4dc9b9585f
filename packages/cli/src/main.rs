mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, closure, diff, ApplyArgs, ClosureArgs, DiffArgs};
use tracing_subscriber::EnvFilter;

/// ctb - replay schema edits against a content-type builder store
#[derive(Parser, Debug)]
#[command(name = "ctb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a file of actions to a store and print the resulting store
    Apply(ApplyArgs),

    /// List the components a component or content type depends on
    Closure(ClosureArgs),

    /// Show what the working copy of a store changes
    Diff(DiffArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Apply(args) => apply(args, &cwd),
        Command::Closure(args) => closure(args, &cwd),
        Command::Diff(args) => diff(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
