use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use tracing::{error, info};
use zipcodetw::cli::{Cli, Command};
use zipcodetw::directory::{Directory, InMemoryStore, Store};
#[cfg(feature = "sqlite")]
use zipcodetw::directory::SqliteStore;
use zipcodetw::error::AddressResult;
use zipcodetw::utils::trace_init;

fn main() -> AddressResult<()> {
    trace_init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { source, store } => build(source, store),
        Command::Lookup { store, addresses } => lookup(store, addresses),
    }
}

fn build(source: PathBuf, store: Option<PathBuf>) -> AddressResult<()> {
    let file = File::open(&source)?;
    let rows = match store {
        #[cfg(feature = "sqlite")]
        Some(path) => {
            let mut dir = Directory::new(SqliteStore::persistent(&path.to_string_lossy())?);
            dir.load(file)?
        }
        #[cfg(not(feature = "sqlite"))]
        Some(_) => {
            error!("the `sqlite` feature is required to persist a store; rebuild with --features sqlite");
            return Ok(());
        }
        None => {
            let mut dir = Directory::new(InMemoryStore::new());
            dir.load(file)?
        }
    };
    info!(rows, source = %source.display(), "directory build complete");
    Ok(())
}

fn lookup(store: Option<PathBuf>, addresses: Vec<String>) -> AddressResult<()> {
    match store {
        #[cfg(feature = "sqlite")]
        Some(path) => {
            let mut dir = Directory::new(SqliteStore::persistent(&path.to_string_lossy())?);
            run_lookups(&mut dir, addresses)
        }
        #[cfg(not(feature = "sqlite"))]
        Some(_) => {
            error!("the `sqlite` feature is required to open a persisted store; rebuild with --features sqlite");
            Ok(())
        }
        None => {
            let mut dir = Directory::new(InMemoryStore::new());
            run_lookups(&mut dir, addresses)
        }
    }
}

fn run_lookups<S: Store>(dir: &mut Directory<S>, addresses: Vec<String>) -> AddressResult<()> {
    for address in addresses {
        let zipcode = dir.find(&address)?;
        println!("{address}\t{zipcode}");
    }
    Ok(())
}
