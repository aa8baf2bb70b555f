//! The visibility predicate: given a reader transaction and a version, decides
//! whether the reader may observe that version. Parameterized entirely by the
//! reader's isolation level; everything else the predicate needs (whether a
//! given transaction id is now Committed) comes from the Transaction Table.

use crate::mvcc::store::ValueVersion;
use crate::mvcc::transaction::{Isolation, Transaction, TxnState};
use crate::mvcc::txn_table::TransactionTable;

fn is_committed(table: &TransactionTable, id: crate::mvcc::TxId) -> bool {
    table.get(id).state == TxnState::Committed
}

/// Read Uncommitted: visible iff not logically deleted. Uncommitted writes
/// (including other transactions') are visible; only an end-id hides a version.
fn visible_read_uncommitted(version: &ValueVersion) -> bool {
    !version.is_ended()
}

/// Read Committed: a reader sees committed writes plus its own, and respects
/// its own deletions.
fn visible_read_committed(reader: &Transaction, version: &ValueVersion, table: &TransactionTable) -> bool {
    let created_visible = version.tx_start_id == reader.id || is_committed(table, version.tx_start_id);
    if !created_visible {
        return false;
    }

    if version.tx_end_id == reader.id {
        return false;
    }

    if version.is_ended() && is_committed(table, version.tx_end_id) {
        return false;
    }

    true
}

/// Repeatable Read / Snapshot / Serializable: the reader sees the database as
/// of its own begin time. Writes by transactions that had not yet committed at
/// that point remain invisible even after they later commit.
fn visible_snapshot_based(reader: &Transaction, version: &ValueVersion, table: &TransactionTable) -> bool {
    if version.tx_start_id > reader.id {
        return false;
    }
    if reader.inprogress_snapshot.contains(&version.tx_start_id) {
        return false;
    }
    let created_visible = version.tx_start_id == reader.id || is_committed(table, version.tx_start_id);
    if !created_visible {
        return false;
    }

    // A writer marks versions visible-to-itself as ended-by-itself before
    // appending their replacement; without hiding the self-ended version here,
    // both it and its live replacement would appear visible to the same
    // in-flight reader, violating "at most one visible version per key".
    if version.tx_end_id == reader.id {
        return false;
    }

    if version.is_ended() {
        let ender_committed_in_time = is_committed(table, version.tx_end_id)
            && version.tx_end_id < reader.id
            && !reader.inprogress_snapshot.contains(&version.tx_end_id);
        if ender_committed_in_time {
            return false;
        }
    }

    true
}

/// The visibility predicate, dispatched on the reader's isolation level.
pub fn visible(reader: &Transaction, version: &ValueVersion, table: &TransactionTable) -> bool {
    match reader.isolation {
        Isolation::ReadUncommitted => visible_read_uncommitted(version),
        Isolation::ReadCommitted => visible_read_committed(reader, version, table),
        Isolation::RepeatableRead | Isolation::Snapshot | Isolation::Serializable => {
            visible_snapshot_based(reader, version, table)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mvcc::transaction::TxnState;

    fn txn(table: &mut TransactionTable, isolation: Isolation) -> crate::mvcc::TxId {
        table.begin(isolation)
    }

    #[test]
    fn read_uncommitted_sees_uncommitted_writes_but_not_deletes() {
        let mut table = TransactionTable::new();
        let writer = txn(&mut table, Isolation::ReadUncommitted);
        let reader = txn(&mut table, Isolation::ReadUncommitted);

        let live = ValueVersion::new(writer, "v".to_string());
        assert!(visible(table.get(reader), &live, &table));

        let mut ended = live.clone();
        ended.tx_end_id = writer;
        assert!(!visible(table.get(reader), &ended, &table));
    }

    #[test]
    fn read_committed_hides_uncommitted_writes_from_other_readers() {
        let mut table = TransactionTable::new();
        let writer = txn(&mut table, Isolation::ReadCommitted);
        let reader = txn(&mut table, Isolation::ReadCommitted);

        let version = ValueVersion::new(writer, "v".to_string());
        assert!(!visible(table.get(reader), &version, &table));

        table.set_state(writer, TxnState::Committed);
        assert!(visible(table.get(reader), &version, &table));
    }

    #[test]
    fn read_committed_sees_its_own_uncommitted_write() {
        let mut table = TransactionTable::new();
        let writer = txn(&mut table, Isolation::ReadCommitted);
        let version = ValueVersion::new(writer, "v".to_string());
        assert!(visible(table.get(writer), &version, &table));
    }

    #[test]
    fn snapshot_based_hides_versions_from_transactions_started_later() {
        let mut table = TransactionTable::new();
        let reader = txn(&mut table, Isolation::Snapshot);
        let writer = txn(&mut table, Isolation::Snapshot);
        table.set_state(writer, TxnState::Committed);

        let version = ValueVersion::new(writer, "v".to_string());
        assert!(!visible(table.get(reader), &version, &table));
    }

    #[test]
    fn snapshot_based_hides_versions_from_transactions_concurrent_at_begin() {
        let mut table = TransactionTable::new();
        let writer = txn(&mut table, Isolation::Snapshot);
        let reader = txn(&mut table, Isolation::Snapshot); // writer is in reader's snapshot
        table.set_state(writer, TxnState::Committed);

        let version = ValueVersion::new(writer, "v".to_string());
        assert!(!visible(table.get(reader), &version, &table));
    }

    #[test]
    fn snapshot_based_hides_self_ended_versions_from_the_writer_itself() {
        let mut table = TransactionTable::new();
        let writer = txn(&mut table, Isolation::Snapshot);

        let mut ended = ValueVersion::new(writer, "old".to_string());
        ended.tx_end_id = writer;
        assert!(!visible(table.get(writer), &ended, &table));
    }
}
