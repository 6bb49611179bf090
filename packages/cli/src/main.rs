mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, blocks, import_draft, move_block, new_page, remove, show, templates, AddArgs, ImportDraftArgs, MoveArgs,
    NewArgs, RemoveArgs, ShowArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagecraft CLI - compose pages from typed content blocks
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List page templates
    Templates,

    /// List block types
    Blocks,

    /// Create a page, optionally from a template
    New(NewArgs),

    /// Convert a legacy draft config into a page
    ImportDraft(ImportDraftArgs),

    /// Print a page's blocks as seen in a viewport
    Show(ShowArgs),

    /// Add a block to a page
    Add(AddArgs),

    /// Move a block to another position
    Move(MoveArgs),

    /// Remove a block from a page
    Remove(RemoveArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Templates => templates(),
        Command::Blocks => blocks(),
        Command::New(args) => new_page(args, &cwd).await,
        Command::ImportDraft(args) => import_draft(args, &cwd).await,
        Command::Show(args) => show(args, &cwd).await,
        Command::Add(args) => add(args, &cwd).await,
        Command::Move(args) => move_block(args, &cwd).await,
        Command::Remove(args) => remove(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
