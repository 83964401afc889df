//! dirdoc - a file manager that renders directories as editable text documents.
//!
//! Usage:
//!   dirdoc [PATH]              Interactive shell over PATH
//!   dirdoc ls [PATH]           Print the directory document
//!   dirdoc ls --json [PATH]    Print the listing as JSON
//!   dirdoc --help              Show help

mod editor;
mod prompt;
mod render;
mod shell;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};

use dirdoc_core::Config;
use dirdoc_engine::Controller;

use crate::render::{RenderOptions, render};
use crate::shell::Shell;

#[derive(Parser)]
#[command(
    name = "dirdoc",
    version,
    about = "A file manager that renders directories as editable text documents",
    long_about = "dirdoc shows a directory as a numbered list of entries.\n\n\
                  Mark entries, then rename, copy or link them by editing a \
                  plain list of names in your $EDITOR, or cut and paste them \
                  between directories."
)]
struct Cli {
    /// Directory to open (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Resolve symbolic links in the path before opening it
    #[arg(short = 'L', long, global = true)]
    resolve_links: bool,

    /// Configuration file (defaults to <config dir>/dirdoc/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a directory document and exit
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,

        /// Include dot files
        #[arg(short, long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log_filter);

    let mut controller = Controller::new(config);

    match cli.command {
        Some(Command::Ls { path, json, all }) => {
            run_ls(&mut controller, &path, cli.resolve_links, json, all).await?;
        }
        None => {
            let shell = Shell::open(controller, &cli.path, cli.resolve_links)
                .await
                .context("Invalid path")?;
            shell.run().await?;
        }
    }

    Ok(())
}

/// Load the configuration from `path`, or from the default location.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path.map(Path::to_path_buf).or_else(Config::default_path) else {
        return Ok(Config::default());
    };
    Config::load(&path).context("Invalid configuration")
}

/// Log to stderr, filtered by `RUST_LOG` or the configured filter.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print one directory document.
async fn run_ls(
    controller: &mut Controller,
    path: &Path,
    resolve_links: bool,
    json: bool,
    all: bool,
) -> Result<()> {
    let options = RenderOptions {
        show_hidden: all || controller.config().show_hidden,
    };
    let listing = controller
        .open_directory(path, resolve_links)
        .await
        .context("Could not read directory")?;

    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }
    for line in render(listing, options) {
        println!("{}", line.text);
    }
    Ok(())
}
