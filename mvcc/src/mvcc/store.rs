use std::collections::BTreeMap;

use crate::mvcc::TxId;

/// An immutable-once-appended record in a key's version chain.
///
/// `tx_end_id == 0` is the sentinel for "still live." Once non-zero it is only
/// ever set by the transaction that held the semantic right to end it during
/// its own `set`/`delete` -- see the commit-time conflict detector for how
/// concurrent double-ends are caught.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueVersion {
    pub tx_start_id: TxId,
    pub tx_end_id: TxId,
    pub payload: String,
}

impl ValueVersion {
    pub fn new(tx_start_id: TxId, payload: String) -> Self {
        ValueVersion { tx_start_id, tx_end_id: 0, payload }
    }

    pub fn is_ended(&self) -> bool {
        self.tx_end_id != 0
    }
}

/// The per-key ordered list of historical values, in ascending `tx_start_id`
/// order (one transaction appends at most one live version per key per
/// `set`/`delete`, so insertion order and start-id order coincide).
#[derive(Default)]
pub struct VersionChain(Vec<ValueVersion>);

impl VersionChain {
    fn new() -> Self {
        VersionChain(Vec::new())
    }

    pub fn push(&mut self, version: ValueVersion) {
        self.0.push(version);
    }

    /// Iterates the chain newest-to-oldest, pairing each version with its
    /// index for use with `VersionStore::mark_end`.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = (usize, &ValueVersion)> {
        self.0.iter().enumerate().rev()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ValueVersion> {
        self.0.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-key append-only version chains. Keys with no live or historical
/// version simply have no entry.
#[derive(Default)]
pub struct VersionStore {
    chains: BTreeMap<String, VersionChain>,
}

impl VersionStore {
    pub fn new() -> Self {
        VersionStore { chains: BTreeMap::new() }
    }

    /// Appends `version` onto `key`'s chain, creating the chain if this is the
    /// key's first version.
    pub fn append(&mut self, key: &str, version: ValueVersion) {
        self.chains.entry(key.to_string()).or_insert_with(VersionChain::new).push(version);
    }

    /// Returns the chain for `key`, or `None` if the key has never been written.
    pub fn chain(&self, key: &str) -> Option<&VersionChain> {
        self.chains.get(key)
    }

    /// Sets the `tx_end_id` of the version at `index` in `key`'s chain.
    /// Idempotent if the version is already marked with the same id.
    pub fn mark_end(&mut self, key: &str, index: usize, tx_id: TxId) {
        if let Some(chain) = self.chains.get_mut(key) {
            if let Some(version) = chain.get_mut(index) {
                debug_assert!(version.tx_end_id == 0 || version.tx_end_id == tx_id);
                version.tx_end_id = tx_id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_chain_round_trips() {
        let mut store = VersionStore::new();
        assert!(store.chain("x").is_none());

        store.append("x", ValueVersion::new(1, "a".to_string()));
        store.append("x", ValueVersion::new(2, "b".to_string()));

        let chain = store.chain("x").unwrap();
        let newest: Vec<_> = chain.iter_newest_first().map(|(_, v)| v.payload.clone()).collect();
        assert_eq!(newest, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn mark_end_sets_the_targeted_version_only() {
        let mut store = VersionStore::new();
        store.append("x", ValueVersion::new(1, "a".to_string()));
        store.append("x", ValueVersion::new(2, "b".to_string()));

        store.mark_end("x", 0, 2);

        let chain = store.chain("x").unwrap();
        let ends: Vec<_> = chain.iter_newest_first().map(|(_, v)| v.tx_end_id).collect();
        assert_eq!(ends, vec![0, 2]);
    }

    #[test]
    fn mark_end_is_idempotent_for_the_same_id() {
        let mut store = VersionStore::new();
        store.append("x", ValueVersion::new(1, "a".to_string()));
        store.mark_end("x", 0, 5);
        store.mark_end("x", 0, 5);
        assert_eq!(store.chain("x").unwrap().iter_newest_first().next().unwrap().1.tx_end_id, 5);
    }
}
