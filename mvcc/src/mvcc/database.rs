//! The MVCC engine facade: ties the Version Store, Transaction Table,
//! Visibility Engine, and Conflict Detector together into the six primitive
//! operations the Command Dispatcher calls.

use log::{debug, trace};

use crate::error::{CResult, Error};
use crate::mvcc::conflict;
use crate::mvcc::store::{ValueVersion, VersionStore};
use crate::mvcc::transaction::{Isolation, TxnState};
use crate::mvcc::txn_table::TransactionTable;
use crate::mvcc::visibility;
use crate::mvcc::TxId;

/// An in-memory, transactional key-value database.
///
/// All mutable state (`store`, `txns`) lives behind whatever external
/// synchronization the caller applies -- see `crate::dispatcher::Connection`,
/// which wraps a `Database` in a `std::sync::Mutex` shared across connections,
/// matching the engine's single-threaded, one-lock-per-command concurrency
/// model.
pub struct Database {
    store: VersionStore,
    txns: TransactionTable,
    default_isolation: Isolation,
}

impl Database {
    pub fn new(default_isolation: Isolation) -> Self {
        Database { store: VersionStore::new(), txns: TransactionTable::new(), default_isolation }
    }

    /// Starts a new transaction at `isolation`, or at the database's default
    /// isolation if `None`. Returns the new transaction's id.
    pub fn begin(&mut self, isolation: Option<Isolation>) -> TxId {
        let isolation = isolation.unwrap_or(self.default_isolation);
        let id = self.txns.begin(isolation);
        debug!("begin: txn {id} at {isolation}");
        id
    }

    /// Transitions `id` to Aborted. `id` must currently be InProgress; calling
    /// this on a terminal transaction is a programmer error and panics.
    pub fn abort(&mut self, id: TxId) {
        self.txns.set_state(id, TxnState::Aborted);
        debug!("abort: txn {id}");
    }

    /// Runs the applicable commit-time conflict checks for `id` and, on
    /// success, transitions it to Committed. On conflict, `id` is transitioned
    /// to Aborted instead and the conflict error is returned. `id` must
    /// currently be InProgress.
    pub fn commit(&mut self, id: TxId) -> CResult<()> {
        let txn = self.txns.get(id).clone();
        match conflict::check(&self.txns, &txn) {
            Ok(()) => {
                self.txns.set_state(id, TxnState::Committed);
                debug!("commit: txn {id} committed");
                Ok(())
            }
            Err(err) => {
                self.txns.set_state(id, TxnState::Aborted);
                debug!("commit: txn {id} aborted ({err})");
                Err(err)
            }
        }
    }

    /// Records `key` in `id`'s readset and returns the payload of the first
    /// version of `key` visible to `id`, newest-to-oldest. `NoSuchKey` if none.
    pub fn get(&mut self, id: TxId, key: &str) -> CResult<String> {
        self.txns.get_mut(id).readset.insert(key.to_string());

        let txn = self.txns.get(id);
        let found = self
            .store
            .chain(key)
            .and_then(|chain| chain.iter_newest_first().find(|(_, v)| visibility::visible(txn, v, &self.txns)))
            .map(|(_, v)| v.payload.clone());

        trace!("get: txn {id} key {key:?} -> {found:?}");
        found.ok_or(Error::NoSuchKey)
    }

    /// Ends every version of `key` currently visible to `id`, appends a new
    /// live version with `value`, and records `key` in `id`'s writeset. Always
    /// succeeds, even if `key` had no prior version.
    pub fn set(&mut self, id: TxId, key: &str, value: String) {
        for index in self.visible_indices(id, key) {
            self.store.mark_end(key, index, id);
        }
        self.store.append(key, ValueVersion::new(id, value));
        self.txns.get_mut(id).writeset.insert(key.to_string());
        debug!("set: txn {id} key {key:?}");
    }

    /// Ends every version of `key` currently visible to `id` and records `key`
    /// in `id`'s writeset. `NoSuchKey` if no version was visible to end.
    pub fn delete(&mut self, id: TxId, key: &str) -> CResult<()> {
        let indices = self.visible_indices(id, key);
        if indices.is_empty() {
            return Err(Error::NoSuchKey);
        }
        for index in indices {
            self.store.mark_end(key, index, id);
        }
        self.txns.get_mut(id).writeset.insert(key.to_string());
        debug!("delete: txn {id} key {key:?}");
        Ok(())
    }

    fn visible_indices(&self, id: TxId, key: &str) -> Vec<usize> {
        let txn = self.txns.get(id);
        match self.store.chain(key) {
            None => Vec::new(),
            Some(chain) => chain
                .iter_newest_first()
                .filter(|(_, v)| visibility::visible(txn, v, &self.txns))
                .map(|(index, _)| index)
                .collect(),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Database::new(Isolation::default())
    }
}
