//! `mvcc` is an in-memory, transactional key-value store built on multi-version
//! concurrency control. Every write appends a new version rather than
//! overwriting in place; readers never block writers and writers never block
//! readers. Five SQL isolation levels are supported, from Read Uncommitted
//! through Serializable, selected per transaction.
//!
//! The engine is organized as:
//! - [`mvcc::store`] -- per-key version chains.
//! - [`mvcc::txn_table`] -- the table of in-progress and terminal transactions.
//! - [`mvcc::visibility`] -- the isolation-parameterized visibility predicate.
//! - [`mvcc::conflict`] -- commit-time write-write and read-write conflict checks.
//! - [`mvcc::database`] -- the facade tying the above into `begin`/`get`/`set`/
//!   `delete`/`commit`/`abort`.
//! - [`dispatcher`] -- a per-connection wrapper enforcing the one-active-
//!   transaction-per-connection contract and routing textual commands.
//!
//! ## Getting started
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use mvcc::dispatcher::Connection;
//! use mvcc::mvcc::{Database, Isolation};
//!
//! let db = Arc::new(Mutex::new(Database::new(Isolation::Snapshot)));
//! let mut conn = Connection::new(db);
//!
//! conn.begin();
//! conn.set("a", "1");
//! assert_eq!(conn.get("a").unwrap(), "1");
//! conn.commit().unwrap();
//! ```

pub mod dispatcher;
pub mod error;
pub mod mvcc;
