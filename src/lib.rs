#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
//! Maps free-form Taiwanese postal addresses to 3- or 5-digit zipcodes: normalization,
//! tokenization, administrative-order standardization, a rule language for numbering
//! qualifiers, and a two-index (precise + gradual) directory lookup engine.
pub mod cli;
pub mod directory;
pub mod error;
pub mod normalize;
pub mod rule;
pub mod standard;
pub mod token;
pub mod tokenize;
pub mod utils;

pub use cli::{Cli, Command};
pub use directory::{Directory, DirectoryRow, GradualStore, InMemoryStore, PreciseStore, Store};
#[cfg(feature = "sqlite")]
pub use directory::SqliteStore;
pub use error::{AddressError, AddressResult};
pub use normalize::normalize;
pub use rule::{Qualifier, Rule};
pub use standard::StandardAddress;
pub use token::{Address, Token};
pub use tokenize::tokenize;
