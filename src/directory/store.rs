//! The `store` module defines the transactional storage boundary a [`crate::directory::Directory`]
//! builds and queries against, plus the two implementations this crate ships: an in-memory
//! default and an optional SQLite-backed store behind the `sqlite` feature.
use crate::error::{AddressError, AddressResult};
use std::collections::HashMap;

/// The precise index: `(addr_key, rule_str) -> zipcode`, first writer wins.
pub trait PreciseStore {
    /// All `(rule_str, zipcode)` pairs recorded under `addr_key`.
    fn get(&self, addr_key: &str) -> AddressResult<Vec<(String, String)>>;
    /// Inserts `(addr_key, rule_str) -> zipcode`; a pre-existing row under the same composite key
    /// is left untouched (ignore-on-conflict).
    fn put(&mut self, addr_key: &str, rule_str: &str, zipcode: &str) -> AddressResult<()>;
}

/// The gradual index: `addr_key -> zipcode`, where the stored value is the longest common prefix
/// of every zipcode ever written under that key.
pub trait GradualStore {
    /// The zipcode prefix currently recorded under `addr_key`, if any.
    fn get(&self, addr_key: &str) -> AddressResult<Option<String>>;
    /// Narrows the value stored under `addr_key` to its longest common prefix with `zipcode`;
    /// a first write under a key stores `zipcode` unchanged.
    fn put(&mut self, addr_key: &str, zipcode: &str) -> AddressResult<()>;
}

/// A transactional backing store combining both indexes.  `Directory` is the only caller of
/// `begin`/`commit`/`rollback`; every bulk operation runs inside exactly one transaction.
pub trait Store: PreciseStore + GradualStore {
    /// Starts a transaction. Must be paired with exactly one `commit` or `rollback`.
    fn begin(&mut self) -> AddressResult<()>;
    /// Commits the current transaction, persisting every write made since `begin`.
    fn commit(&mut self) -> AddressResult<()>;
    /// Rolls back the current transaction, discarding every write made since `begin`.
    fn rollback(&mut self) -> AddressResult<()>;
}

/// Returns the character-wise longest common prefix of `a` and `b`. Two equal strings yield
/// themselves; an empty range (no shared leading character) yields the empty string.
pub fn longest_common_prefix(a: &str, b: &str) -> String {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let len = a_chars.iter().zip(b_chars.iter()).take_while(|(x, y)| x == y).count();
    a_chars[..len].iter().collect()
}

/// The default `Store`: two `HashMap`s, with `begin`/`rollback` implemented by snapshotting and
/// restoring both maps. No external dependency, no persistence across process runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    precise: HashMap<(String, String), String>,
    gradual: HashMap<String, String>,
    snapshot: Option<(HashMap<(String, String), String>, HashMap<String, String>)>,
}

impl InMemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreciseStore for InMemoryStore {
    fn get(&self, addr_key: &str) -> AddressResult<Vec<(String, String)>> {
        Ok(self
            .precise
            .iter()
            .filter(|((key, _), _)| key == addr_key)
            .map(|((_, rule_str), zipcode)| (rule_str.clone(), zipcode.clone()))
            .collect())
    }

    fn put(&mut self, addr_key: &str, rule_str: &str, zipcode: &str) -> AddressResult<()> {
        self.precise
            .entry((addr_key.to_string(), rule_str.to_string()))
            .or_insert_with(|| zipcode.to_string());
        Ok(())
    }
}

impl GradualStore for InMemoryStore {
    fn get(&self, addr_key: &str) -> AddressResult<Option<String>> {
        Ok(self.gradual.get(addr_key).cloned())
    }

    fn put(&mut self, addr_key: &str, zipcode: &str) -> AddressResult<()> {
        let next = match self.gradual.get(addr_key) {
            Some(existing) => longest_common_prefix(existing, zipcode),
            None => zipcode.to_string(),
        };
        self.gradual.insert(addr_key.to_string(), next);
        Ok(())
    }
}

impl Store for InMemoryStore {
    fn begin(&mut self) -> AddressResult<()> {
        self.snapshot = Some((self.precise.clone(), self.gradual.clone()));
        Ok(())
    }

    fn commit(&mut self) -> AddressResult<()> {
        self.snapshot = None;
        Ok(())
    }

    fn rollback(&mut self) -> AddressResult<()> {
        if let Some((precise, gradual)) = self.snapshot.take() {
            self.precise = precise;
            self.gradual = gradual;
        }
        Ok(())
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_store {
    use super::{AddressError, AddressResult, GradualStore, PreciseStore, Store};
    use rusqlite::{params, Connection, OptionalExtension};

    const SCHEMA: &str = "
        create table if not exists precise (
            addr_str text,
            rule_str text,
            zipcode  text,
            primary key (addr_str, rule_str)
        );
        create table if not exists gradual (
            addr_str text primary key,
            zipcode  text
        );
    ";

    /// A [`Store`] backed by a SQLite database.
    ///
    /// Supports both connection lifecycles: [`SqliteStore::ephemeral`] opens a fresh connection
    /// per call and is meant to be recreated for each transaction; [`SqliteStore::persistent`]
    /// keeps one connection alive across calls, with `begin`/`commit`/`rollback` issuing SQL
    /// transaction statements against it directly.
    pub struct SqliteStore {
        conn: Connection,
    }

    impl SqliteStore {
        /// Opens `path` (creating it if absent) and ensures the schema exists. Intended to be
        /// reopened for each unit of work (the *Ephemeral* connection lifecycle).
        pub fn ephemeral(path: &str) -> AddressResult<Self> {
            let conn = Connection::open(path)?;
            conn.execute_batch(SCHEMA)?;
            Ok(Self { conn })
        }

        /// Opens `path` once for reuse across many calls (the *Persistent* connection lifecycle).
        /// Identical setup to [`SqliteStore::ephemeral`]; the distinction is the caller's
        /// discipline in keeping the returned value alive.
        pub fn persistent(path: &str) -> AddressResult<Self> {
            Self::ephemeral(path)
        }

        /// Opens an in-memory SQLite database, useful for tests.
        pub fn in_memory() -> AddressResult<Self> {
            let conn = Connection::open_in_memory()?;
            conn.execute_batch(SCHEMA)?;
            Ok(Self { conn })
        }
    }

    impl PreciseStore for SqliteStore {
        fn get(&self, addr_key: &str) -> AddressResult<Vec<(String, String)>> {
            let mut stmt = self
                .conn
                .prepare("select rule_str, zipcode from precise where addr_str = ?1")?;
            let rows = stmt
                .query_map(params![addr_key], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        }

        fn put(&mut self, addr_key: &str, rule_str: &str, zipcode: &str) -> AddressResult<()> {
            self.conn.execute(
                "insert or ignore into precise values (?1, ?2, ?3)",
                params![addr_key, rule_str, zipcode],
            )?;
            Ok(())
        }
    }

    impl GradualStore for SqliteStore {
        fn get(&self, addr_key: &str) -> AddressResult<Option<String>> {
            let zipcode = self
                .conn
                .query_row("select zipcode from gradual where addr_str = ?1", params![addr_key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(zipcode)
        }

        fn put(&mut self, addr_key: &str, zipcode: &str) -> AddressResult<()> {
            let existing = GradualStore::get(self, addr_key)?;
            let next = match existing {
                Some(stored) => super::longest_common_prefix(&stored, zipcode),
                None => zipcode.to_string(),
            };
            self.conn
                .execute("replace into gradual values (?1, ?2)", params![addr_key, next])?;
            Ok(())
        }
    }

    impl Store for SqliteStore {
        fn begin(&mut self) -> AddressResult<()> {
            self.conn.execute_batch("begin transaction;")?;
            Ok(())
        }

        fn commit(&mut self) -> AddressResult<()> {
            self.conn.execute_batch("commit;")?;
            Ok(())
        }

        fn rollback(&mut self) -> AddressResult<()> {
            self.conn.execute_batch("rollback;")?;
            Ok(())
        }
    }

    impl From<rusqlite::Error> for AddressError {
        fn from(e: rusqlite::Error) -> Self {
            AddressError::Sqlite(e)
        }
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_common_prefix_handles_equal_and_disjoint() {
        assert_eq!(longest_common_prefix("10041", "10051"), "100");
        assert_eq!(longest_common_prefix("100", "100"), "100");
        assert_eq!(longest_common_prefix("1", "2"), "");
        assert_eq!(longest_common_prefix("", "100"), "");
    }

    #[test]
    fn gradual_upsert_narrows_to_common_prefix() {
        let mut store = InMemoryStore::new();
        GradualStore::put(&mut store, "k", "10041").unwrap();
        GradualStore::put(&mut store, "k", "10051").unwrap();
        assert_eq!(GradualStore::get(&store, "k").unwrap(), Some("100".to_string()));
    }

    #[test]
    fn precise_first_write_wins() {
        let mut store = InMemoryStore::new();
        PreciseStore::put(&mut store, "k", "r", "100").unwrap();
        PreciseStore::put(&mut store, "k", "r", "999").unwrap();
        assert_eq!(PreciseStore::get(&store, "k").unwrap(), vec![("r".to_string(), "100".to_string())]);
    }

    #[test]
    fn rollback_restores_pre_transaction_state() {
        let mut store = InMemoryStore::new();
        GradualStore::put(&mut store, "k", "100").unwrap();
        store.begin().unwrap();
        GradualStore::put(&mut store, "k", "200").unwrap();
        store.rollback().unwrap();
        assert_eq!(GradualStore::get(&store, "k").unwrap(), Some("100".to_string()));
    }

    #[test]
    fn commit_discards_snapshot_keeping_writes() {
        let mut store = InMemoryStore::new();
        store.begin().unwrap();
        GradualStore::put(&mut store, "k", "100").unwrap();
        store.commit().unwrap();
        assert_eq!(GradualStore::get(&store, "k").unwrap(), Some("100".to_string()));
    }
}
