//! The Command Dispatcher: a thin, per-connection facade routing the six
//! textual commands (`begin`, `commit`, `abort`, `get`, `set`, `delete`)
//! through a shared `Database`.
//!
//! A `Connection` holds at most one active transaction. Issuing a data command
//! with no active transaction, or `begin` while one is already active, is a
//! programmer error and panics rather than returning a `Result` -- see the
//! engine's error handling design.

use std::sync::{Arc, Mutex};

use log::info;

use crate::error::{CResult, Error};
use crate::mvcc::{Database, Isolation, TxId};

/// One client connection's view of the engine: a handle to the shared,
/// mutex-guarded `Database` plus the connection's own active-transaction
/// pointer. The active pointer is per-connection state, never shared.
pub struct Connection {
    db: Arc<Mutex<Database>>,
    active: Option<TxId>,
}

impl Connection {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Connection { db, active: None }
    }

    /// Starts a transaction at the database's default isolation. Panics if
    /// this connection already has an active transaction.
    pub fn begin(&mut self) -> TxId {
        self.begin_with(None)
    }

    /// Starts a transaction at an explicitly chosen isolation, overriding the
    /// database's default for this transaction only. Panics if this
    /// connection already has an active transaction.
    pub fn begin_with(&mut self, isolation: Option<Isolation>) -> TxId {
        assert!(self.active.is_none(), "begin called with a transaction already active");
        let id = self.db.lock().unwrap().begin(isolation);
        self.active = Some(id);
        info!("connection: began txn {id}");
        id
    }

    /// Commits the active transaction. On success or conflict alike, clears
    /// the connection's active transaction. Panics if there is none.
    pub fn commit(&mut self) -> CResult<()> {
        let id = self.require_active("commit");
        let result = self.db.lock().unwrap().commit(id);
        self.active = None;
        result
    }

    /// Aborts the active transaction and clears it. Panics if there is none.
    pub fn abort(&mut self) {
        let id = self.require_active("abort");
        self.db.lock().unwrap().abort(id);
        self.active = None;
    }

    /// Reads `key` under the active transaction. Panics if there is none.
    pub fn get(&mut self, key: &str) -> CResult<String> {
        let id = self.require_active("get");
        self.db.lock().unwrap().get(id, key)
    }

    /// Writes `key` = `value` under the active transaction, returning `value`
    /// back to the caller per the command surface. Panics if there is none.
    pub fn set(&mut self, key: &str, value: &str) -> String {
        let id = self.require_active("set");
        self.db.lock().unwrap().set(id, key, value.to_string());
        value.to_string()
    }

    /// Deletes `key` under the active transaction. Panics if there is none.
    pub fn delete(&mut self, key: &str) -> CResult<()> {
        let id = self.require_active("delete");
        self.db.lock().unwrap().delete(id, key)
    }

    fn require_active(&self, command: &str) -> TxId {
        self.active.unwrap_or_else(|| panic!("{command} called with no active transaction"))
    }

    /// Parses and routes one whitespace-separated command line, returning the
    /// command's textual result. Unrecognized verbs or wrong argument counts
    /// yield the recoverable `unimplemented` error rather than panicking --
    /// only the active-transaction contract is a programmer error.
    pub fn execute(&mut self, line: &str) -> CResult<String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&verb) = tokens.first() else {
            return Err(Error::Unimplemented(String::new()));
        };

        match (verb.to_ascii_lowercase().as_str(), tokens.len()) {
            ("begin", 1) => Ok(self.begin().to_string()),
            ("begin", 2) => {
                let isolation = tokens[1]
                    .parse()
                    .map_err(|_| Error::Unimplemented(line.to_string()))?;
                Ok(self.begin_with(Some(isolation)).to_string())
            }
            ("commit", 1) => self.commit().map(|()| String::new()),
            ("abort", 1) => {
                self.abort();
                Ok(String::new())
            }
            ("get", 2) => self.get(tokens[1]),
            ("set", 3) => Ok(self.set(tokens[1], tokens[2])),
            ("delete", 2) => self.delete(tokens[1]).map(|()| String::new()),
            _ => Err(Error::Unimplemented(line.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mvcc::Isolation;

    fn new_connection() -> Connection {
        Connection::new(Arc::new(Mutex::new(Database::new(Isolation::ReadCommitted))))
    }

    #[test]
    fn begin_then_set_then_get_round_trips() {
        let mut conn = new_connection();
        conn.begin();
        conn.set("x", "v");
        assert_eq!(conn.get("x").unwrap(), "v");
    }

    #[test]
    fn execute_routes_text_commands() {
        let mut conn = new_connection();
        let id = conn.execute("begin").unwrap();
        assert_eq!(id, "1");
        assert_eq!(conn.execute("set x v").unwrap(), "v");
        assert_eq!(conn.execute("get x").unwrap(), "v");
        assert_eq!(conn.execute("commit").unwrap(), "");
    }

    #[test]
    fn execute_parses_an_explicit_isolation_on_begin() {
        // The connection's own default is ReadCommitted, which runs no
        // commit-time conflict checks; overriding to snapshot on `begin`
        // must still trigger the write-write check.
        let db = Arc::new(Mutex::new(Database::new(Isolation::ReadCommitted)));
        let mut a = Connection::new(db.clone());
        let mut b = Connection::new(db.clone());

        a.execute("begin snapshot").unwrap();
        a.execute("set x a").unwrap();
        a.execute("commit").unwrap();

        b.execute("begin snapshot").unwrap();
        b.execute("set x b").unwrap();
        assert_eq!(b.execute("commit"), Err(Error::WriteWriteConflict));
    }

    #[test]
    fn execute_reports_unimplemented_for_an_unparseable_isolation() {
        let mut conn = new_connection();
        assert_eq!(conn.execute("begin bogus"), Err(Error::Unimplemented("begin bogus".to_string())));
    }

    #[test]
    fn execute_reports_unimplemented_for_unknown_verbs() {
        let mut conn = new_connection();
        conn.begin();
        assert_eq!(conn.execute("frobnicate x"), Err(Error::Unimplemented("frobnicate x".to_string())));
    }

    #[test]
    #[should_panic(expected = "no active transaction")]
    fn get_with_no_active_transaction_panics() {
        let mut conn = new_connection();
        let _ = conn.get("x");
    }

    #[test]
    #[should_panic(expected = "already active")]
    fn begin_while_active_panics() {
        let mut conn = new_connection();
        conn.begin();
        conn.begin();
    }

    #[test]
    fn commit_clears_active_transaction_even_on_conflict() {
        let db = Arc::new(Mutex::new(Database::new(Isolation::Snapshot)));
        let mut a = Connection::new(db.clone());
        let mut b = Connection::new(db.clone());

        a.begin();
        a.set("x", "a");
        a.commit().unwrap();

        b.begin();
        b.set("x", "b");
        assert_eq!(b.commit(), Err(Error::WriteWriteConflict));
        assert!(b.active.is_none());
    }
}
