//! Per-category record stores
//!
//! A store is an ordered set of live records, unique by identity. Merges
//! build a candidate vector with exactly one add-or-remove and swap it in
//! whole; a length delta is therefore a complete "membership changed"
//! signal, and snapshots handed out earlier are never touched.

use lume_record::DiscoveryRecord;

/// Outcome of merging one announcement into a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New identity appended at the end of the store
    Added,
    /// Known identity renewed; membership unchanged
    Renewed,
    /// Known identity removed by an explicit departure
    Removed,
    /// Departure for an identity the store never had; nothing changed
    Unchanged,
}

impl MergeOutcome {
    /// Whether consumers should be notified
    pub fn changed_membership(&self) -> bool {
        matches!(self, MergeOutcome::Added | MergeOutcome::Removed)
    }
}

/// Ordered set of live records for one service category
#[derive(Debug, Default)]
pub struct ServiceStore {
    records: Vec<DiscoveryRecord>,
}

impl ServiceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Owned copy of the current record set, in insertion order
    pub fn snapshot(&self) -> Vec<DiscoveryRecord> {
        self.records.clone()
    }

    /// Merge one announcement into the store
    ///
    /// A presence announcement for a known identity resets its TTL and
    /// changes nothing else; for a new identity the record is appended
    /// with a fresh TTL. A departure removes the matching identity if
    /// present. Relative order of surviving records is preserved.
    pub fn merge(&mut self, record: DiscoveryRecord) -> MergeOutcome {
        if record.exists {
            if let Some(known) = self.records.iter_mut().find(|r| **r == record) {
                known.reset_ttl();
                return MergeOutcome::Renewed;
            }

            let mut record = record;
            record.reset_ttl();

            let mut candidate = self.records.clone();
            candidate.push(record);
            self.records = candidate;
            MergeOutcome::Added
        } else {
            let candidate: Vec<_> = self
                .records
                .iter()
                .filter(|r| **r != record)
                .cloned()
                .collect();

            if candidate.len() == self.records.len() {
                return MergeOutcome::Unchanged;
            }

            self.records = candidate;
            MergeOutcome::Removed
        }
    }

    /// Burn one sweep off every record and drop the ones that expire
    ///
    /// Returns the removed records so the caller can log and notify.
    pub fn sweep(&mut self) -> Vec<DiscoveryRecord> {
        for record in &mut self.records {
            record.decay();
        }

        if !self.records.iter().any(|r| r.expired()) {
            return Vec::new();
        }

        let (expired, live): (Vec<_>, Vec<_>) =
            self.records.drain(..).partition(|r| r.expired());
        self.records = live;
        expired
    }
}
