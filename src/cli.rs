//! The `cli` module provides the command-line interface for the `zipcodetw` binary.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The `Cli` struct is the top-level command-line interface: a directory store path shared by
/// both subcommands, plus the [`Command`] to run.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The command to execute: build a directory from a source, or look up addresses against one.
    #[command(subcommand)]
    pub command: Command,
}

/// The two operations this binary supports.
#[derive(Subcommand)]
pub enum Command {
    /// Builds (or rebuilds) a directory store from a CSV source.
    Build {
        /// Path to the CSV directory source (header row, then `zipcode,...,rule_str` records).
        #[arg(short = 's', long)]
        source: PathBuf,
        /// Path to the backing store. Omit to build an in-memory store and discard it on exit
        /// (useful only to validate a source); pass it to persist via the `sqlite` feature.
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Resolves one or more addresses against an existing directory store.
    Lookup {
        /// Path to the backing store opened in [`Command::Build`]. Omitted runs against an empty
        /// store, which resolves every address to the empty string.
        #[arg(long)]
        store: Option<PathBuf>,
        /// Addresses to resolve, each printed as `address\tzipcode`.
        addresses: Vec<String>,
    },
}
