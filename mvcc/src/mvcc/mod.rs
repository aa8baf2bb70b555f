//! The MVCC engine: versioned values, the transaction table, the
//! isolation-parameterized visibility predicate, and commit-time conflict
//! detection. See `database::Database` for the facade that ties these
//! together into the six primitive operations the dispatcher exposes.

pub mod conflict;
pub mod database;
pub mod store;
pub mod transaction;
pub mod txn_table;
pub mod visibility;

pub use database::Database;
pub use transaction::{Isolation, ParseIsolationError, Transaction, TxnState};

/// A transaction id. Strictly monotonic and positive; 0 is reserved as "none."
pub type TxId = u64;
