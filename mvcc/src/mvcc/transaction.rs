use std::collections::HashSet;
use std::fmt;
use serde_derive::{Deserialize, Serialize};

use crate::mvcc::TxId;

/// The five SQL-standard isolation levels this engine supports, ordered from
/// weakest to strictest. The derived `Ord` follows declaration order, which is
/// the strictness ordering the conflict detector and config layer rely on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Isolation {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Snapshot,
    Serializable,
}

impl Isolation {
    /// Whether this level runs a fixed, begin-time view of the
    /// committed-transaction set (Repeatable Read and stricter).
    pub fn is_snapshot_based(&self) -> bool {
        *self >= Isolation::RepeatableRead
    }

    /// Whether commits under this level must run the write-write conflict check.
    pub fn checks_write_write(&self) -> bool {
        *self >= Isolation::Snapshot
    }

    /// Whether commits under this level must run the read-write conflict check.
    pub fn checks_read_write(&self) -> bool {
        *self == Isolation::Serializable
    }
}

impl fmt::Display for Isolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Isolation::ReadUncommitted => write!(f, "Read Uncommitted"),
            Isolation::ReadCommitted => write!(f, "Read Committed"),
            Isolation::RepeatableRead => write!(f, "Repeatable Read"),
            Isolation::Snapshot => write!(f, "Snapshot"),
            Isolation::Serializable => write!(f, "Serializable"),
        }
    }
}

impl Default for Isolation {
    fn default() -> Self {
        Isolation::ReadCommitted
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIsolationError(pub String);

impl fmt::Display for ParseIsolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized isolation level: {}", self.0)
    }
}

impl std::error::Error for ParseIsolationError {}

impl std::str::FromStr for Isolation {
    type Err = ParseIsolationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read uncommitted" | "read-uncommitted" | "readuncommitted" => {
                Ok(Isolation::ReadUncommitted)
            }
            "read committed" | "read-committed" | "readcommitted" => Ok(Isolation::ReadCommitted),
            "repeatable read" | "repeatable-read" | "repeatableread" => {
                Ok(Isolation::RepeatableRead)
            }
            "snapshot" => Ok(Isolation::Snapshot),
            "serializable" => Ok(Isolation::Serializable),
            _ => Err(ParseIsolationError(s.to_string())),
        }
    }
}

/// The lifecycle of a transaction. Transitions only ever occur out of
/// `InProgress`; both `Aborted` and `Committed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnState {
    InProgress,
    Aborted,
    Committed,
}

/// A registered transaction, as stored by the Transaction Table.
///
/// The table owns exactly one copy of each `Transaction`; callers are always
/// handed `&mut Transaction` borrows into that copy (never a clone they'd need
/// to write back), so growth of `readset`/`writeset` during `get`/`set`/`delete`
/// is immediately visible to the commit-time conflict detector.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub id: TxId,
    pub isolation: Isolation,
    pub state: TxnState,
    /// Transaction ids that were InProgress at the instant this transaction began.
    pub inprogress_snapshot: HashSet<TxId>,
    pub readset: HashSet<String>,
    pub writeset: HashSet<String>,
}

impl Transaction {
    pub(crate) fn new(id: TxId, isolation: Isolation, inprogress_snapshot: HashSet<TxId>) -> Self {
        debug_assert!(!inprogress_snapshot.contains(&id));
        Transaction {
            id,
            isolation,
            state: TxnState::InProgress,
            inprogress_snapshot,
            readset: HashSet::new(),
            writeset: HashSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolation_ordering() {
        assert!(Isolation::ReadUncommitted < Isolation::ReadCommitted);
        assert!(Isolation::ReadCommitted < Isolation::RepeatableRead);
        assert!(Isolation::RepeatableRead < Isolation::Snapshot);
        assert!(Isolation::Snapshot < Isolation::Serializable);
    }

    #[test]
    fn isolation_from_str_round_trips_display() {
        for level in [
            Isolation::ReadUncommitted,
            Isolation::ReadCommitted,
            Isolation::RepeatableRead,
            Isolation::Snapshot,
            Isolation::Serializable,
        ] {
            assert_eq!(level.to_string().parse::<Isolation>().unwrap(), level);
        }
    }

    #[test]
    fn new_transaction_never_contains_its_own_id_in_its_snapshot() {
        let txn = Transaction::new(5, Isolation::Snapshot, HashSet::from([1, 2, 3]));
        assert!(!txn.inprogress_snapshot.contains(&txn.id));
    }
}
