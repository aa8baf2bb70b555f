//! Commit-time conflict detection for Snapshot and Serializable isolation.

use crate::error::{CResult, Error};
use crate::mvcc::transaction::Transaction;
use crate::mvcc::txn_table::TransactionTable;

fn write_write_conflict(txn: &Transaction, other: &Transaction) -> bool {
    txn.writeset.intersection(&other.writeset).next().is_some()
}

fn read_write_conflict(txn: &Transaction, other: &Transaction) -> bool {
    txn.readset.intersection(&other.writeset).next().is_some()
}

/// Checks `txn` against every committed transaction that overlapped its
/// lifetime, applying whichever conflict predicates `txn`'s isolation level
/// requires. Returns the conflict error for the first violation found
/// (write-write before read-write), or `Ok(())` if the commit may proceed.
pub fn check(table: &TransactionTable, txn: &Transaction) -> CResult<()> {
    if !txn.isolation.checks_write_write() && !txn.isolation.checks_read_write() {
        return Ok(());
    }

    let overlapping = table.overlapping_committed(txn);

    if txn.isolation.checks_write_write() {
        for other in &overlapping {
            if write_write_conflict(txn, other) {
                return Err(Error::WriteWriteConflict);
            }
        }
    }

    if txn.isolation.checks_read_write() {
        for other in &overlapping {
            if read_write_conflict(txn, other) {
                return Err(Error::ReadWriteConflict);
            }
        }
    }

    Ok(())
}
