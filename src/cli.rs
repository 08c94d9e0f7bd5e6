//! CLI interface for contact-book

use clap::{Parser, Subcommand};
use anyhow::Result;
use std::path::PathBuf;

use crate::config;
use crate::repl;
use crate::store::ContactStore;

#[derive(Parser)]
#[command(name = "contact-book")]
#[command(about = "Assistant bot with a persistent, command-driven contact book", long_about = None)]
#[command(version)]
struct Cli {
    /// Contacts file to use (overrides the configured location)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive assistant session (default when no command given)
    Interactive,
    /// Configure the assistant
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the contacts file location
        #[arg(long, value_name = "PATH")]
        set_store_path: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Interactive) => {
            let store = open_store(cli.file)?;
            repl::run(&store)
        }
        Some(Commands::Config { show, set_store_path }) => {
            run_config(show, set_store_path)
        }
    }
}

/// Resolve the store: CLI override first, configured location otherwise
fn open_store(file: Option<PathBuf>) -> Result<ContactStore> {
    match file {
        Some(path) => Ok(ContactStore::with_path(path)),
        None => ContactStore::new(),
    }
}

fn run_config(show: bool, set_store_path: Option<PathBuf>) -> Result<()> {
    let set_requested = set_store_path.is_some();

    if let Some(path) = set_store_path {
        let mut config = config::Config::load()?;
        config.store.path = Some(path);
        config.save()?;
        println!("Store path updated.");
    }

    if show || !set_requested {
        let config = config::Config::load()?;
        println!("Config file: {}", config::config_path()?.display());
        match &config.store.path {
            Some(path) => println!("Store path:  {} (configured)", path.display()),
            None => println!("Store path:  {} (default)", config::store_path()?.display()),
        }
    }

    Ok(())
}
