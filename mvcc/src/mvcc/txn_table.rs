use std::collections::{BTreeMap, HashSet};

use crate::mvcc::transaction::{Isolation, Transaction, TxnState};
use crate::mvcc::TxId;

/// Registry of every transaction ever created, keyed by id.
///
/// The table never prunes -- a long-lived reader's commit-time conflict check
/// may reference the state of an arbitrarily old transaction, so every
/// `Transaction` the table has ever handed out via `begin` stays reachable via
/// `get`/`get_mut` for the lifetime of the process.
#[derive(Default)]
pub struct TransactionTable {
    txns: BTreeMap<TxId, Transaction>,
    next_id: TxId,
}

impl TransactionTable {
    pub fn new() -> Self {
        TransactionTable { txns: BTreeMap::new(), next_id: 1 }
    }

    /// The id that would be assigned to the next transaction to `begin`. Used
    /// by the conflict detector to bound "began during or after T".
    pub fn next_id(&self) -> TxId {
        self.next_id
    }

    /// Allocates the next id, snapshots the currently-InProgress set, registers
    /// a new InProgress transaction, and returns its id.
    pub fn begin(&mut self, isolation: Isolation) -> TxId {
        let id = self.next_id;
        self.next_id += 1;

        let snapshot = self.inprogress_ids();
        self.txns.insert(id, Transaction::new(id, isolation, snapshot));
        id
    }

    /// Looks up a transaction by id. A missing id is a programmer error: ids
    /// are never recycled, so every id returned by `begin` stays valid forever.
    pub fn get(&self, id: TxId) -> &Transaction {
        self.txns.get(&id).unwrap_or_else(|| panic!("unregistered transaction id {id}"))
    }

    /// Mutable counterpart of `get`, used by the dispatcher to grow a
    /// transaction's read/write sets and by the conflict detector to transition
    /// its state.
    pub fn get_mut(&mut self, id: TxId) -> &mut Transaction {
        self.txns.get_mut(&id).unwrap_or_else(|| panic!("unregistered transaction id {id}"))
    }

    /// Transitions `id` to a terminal state. Only valid from `InProgress`;
    /// attempting to transition an already-terminal transaction is a
    /// programmer error.
    pub fn set_state(&mut self, id: TxId, state: TxnState) {
        let txn = self.get_mut(id);
        assert_eq!(
            txn.state,
            TxnState::InProgress,
            "transaction {id} is already terminal ({:?})",
            txn.state
        );
        txn.state = state;
    }

    /// All transaction ids currently in the InProgress state.
    pub fn inprogress_ids(&self) -> HashSet<TxId> {
        self.txns
            .values()
            .filter(|t| t.state == TxnState::InProgress)
            .map(|t| t.id)
            .collect()
    }

    /// Transactions overlapping `txn`'s lifetime that are now Committed: those
    /// that were InProgress when `txn` began, plus those that began at or after
    /// `txn` (and strictly before the current id counter). Used by the
    /// conflict detector.
    pub fn overlapping_committed(&self, txn: &Transaction) -> Vec<&Transaction> {
        self.txns
            .values()
            .filter(|u| u.id != txn.id && u.state == TxnState::Committed)
            .filter(|u| txn.inprogress_snapshot.contains(&u.id) || u.id >= txn.id)
            .collect()
    }
}
