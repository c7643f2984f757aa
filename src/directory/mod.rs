//! The `directory` module builds and queries the two-index zipcode lookup engine: a `precise`
//! index of rule-matched exact prefixes and a `gradual` index of common-prefix fallbacks, both
//! owned by a backing [`Store`] implementation.
pub mod store;

pub use store::{GradualStore, InMemoryStore, PreciseStore, Store};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;

use crate::error::{AddressError, AddressResult};
use crate::rule::Rule;
use crate::standard::StandardAddress;
use crate::token::Address;
use csv::ReaderBuilder;
use std::io;

/// One parsed row of a directory source: a head address string, a tail rule string, and the
/// zipcode they resolve to.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct DirectoryRow {
    /// The zipcode this row assigns.
    pub zipcode: String,
    /// The address prefix the row's rule is anchored to.
    pub head_addr_str: String,
    /// The qualifier text further restricting which addresses under `head_addr_str` match.
    pub tail_rule_str: String,
}

/// Maps one CSV record at 1-based `line` into a [`DirectoryRow`]: the first field is the
/// zipcode, the last is the rule string, and every field in between is concatenated without
/// separators into the head address string. Fewer than three fields is a malformed row.
fn row_from_record(line: usize, record: &csv::StringRecord) -> AddressResult<DirectoryRow> {
    if record.len() < 3 {
        return Err(AddressError::MalformedRow { line, fields: record.len() });
    }
    let zipcode = record.get(0).unwrap_or_default().to_string();
    let tail_rule_str = record.get(record.len() - 1).unwrap_or_default().to_string();
    let head_addr_str: String = record.iter().skip(1).take(record.len() - 2).collect();
    Ok(DirectoryRow::new(zipcode, head_addr_str, tail_rule_str))
}

/// Reads `reader` as headered CSV (the header row is discarded) and maps every record into a
/// [`DirectoryRow`] via [`row_from_record`]. A record with fewer than three fields aborts the
/// whole read with [`AddressError::MalformedRow`], carrying the 1-based line number (not
/// counting the header).
#[tracing::instrument(skip_all)]
pub fn load_rows<R: io::Read>(reader: R) -> AddressResult<Vec<DirectoryRow>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        rows.push(row_from_record(line + 1, &result?)?);
    }

    tracing::info!(rows = rows.len(), "loaded directory rows");
    Ok(rows)
}

/// The zipcode lookup engine, generic over its backing [`Store`].
pub struct Directory<S> {
    store: S,
}

impl<S> Directory<S> {
    /// Wraps an already-opened store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consumes the directory, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Borrows the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: Store> Directory<S> {
    /// Runs `body` inside one transaction: commits on `Ok`, rolls back on `Err`, mirroring the
    /// transaction-scoping decorator in the system this was ported from.
    fn transaction<T>(&mut self, body: impl FnOnce(&mut Self) -> AddressResult<T>) -> AddressResult<T> {
        self.store.begin()?;
        match body(self) {
            Ok(value) => {
                self.store.commit()?;
                Ok(value)
            }
            Err(e) => {
                self.store.rollback()?;
                Err(e)
            }
        }
    }

    /// Reads directory rows from `reader` and inserts each via [`Directory::put`], inside one
    /// transaction, row by row with no full materialization of the source. Returns the number of
    /// rows loaded; any malformed row rolls back the transaction and no partial index persists.
    #[tracing::instrument(skip(self, reader))]
    pub fn load<R: io::Read>(&mut self, reader: R) -> AddressResult<usize> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        self.transaction(|dir| {
            let mut count = 0;
            for (line, result) in rdr.records().enumerate() {
                let row = row_from_record(line + 1, &result?)?;
                dir.put(&row.head_addr_str, &row.tail_rule_str, &row.zipcode)?;
                count += 1;
            }
            Ok(count)
        })
    }

    /// Inserts one directory row: a precise entry under the full head address, plus a gradual
    /// entry for every contiguous sub-range of its tokens, plus the "skip-the-middle" key when at
    /// least 3 tokens are present.
    fn put(&mut self, head_addr_str: &str, tail_rule_str: &str, zipcode: &str) -> AddressResult<()> {
        let addr = Address::new(head_addr_str);
        let addr_key = addr.flat();
        let rule_str = format!("{head_addr_str}{tail_rule_str}");
        PreciseStore::put(&mut self.store, &addr_key, &rule_str, zipcode)?;

        let len = addr.len();
        for f in 0..len {
            for l in f..len {
                let key = addr.flat_range(f, l + 1);
                GradualStore::put(&mut self.store, &key, zipcode)?;
            }
        }
        if len >= 3 {
            let key = addr.pick_to_flat(&[0, 2]);
            GradualStore::put(&mut self.store, &key, zipcode)?;
        }

        Ok(())
    }

    /// Resolves `addr_str` to a zipcode, or the empty string when no index row is reachable
    /// Iterates standardized-address prefixes longest-first, trying the precise
    /// index (rule-matched) before the gradual index (prefix-collapsed) at each length.
    #[tracing::instrument(skip(self))]
    pub fn find(&mut self, addr_str: &str) -> AddressResult<String> {
        let standard = StandardAddress::new(addr_str);
        self.transaction(|dir| {
            for i in (1..=standard.len()).rev() {
                let key = standard.flat_prefix(i);

                for (rule_str, zipcode) in PreciseStore::get(&dir.store, &key)? {
                    let rule = Rule::new(&rule_str);
                    if rule.matches(standard.address()) {
                        return Ok(zipcode);
                    }
                }

                if let Some(zipcode) = GradualStore::get(&dir.store, &key)? {
                    if !zipcode.is_empty() {
                        return Ok(zipcode);
                    }
                }
            }
            Ok(String::new())
        })
    }
}
