//! Core merge/expire engine
//!
//! The engine owns one [`ServiceStore`] per retained category and applies
//! the merge and expiry rules. It is synchronous and unaware of channels;
//! the actor in [`crate::actor`] serializes access to it and publishes the
//! snapshots this module returns.

use std::collections::HashMap;
use std::net::IpAddr;

use lume_record::{DiscoveryRecord, ServiceKind};
use tracing::{debug, info, warn};

use crate::net;
use crate::store::{MergeOutcome, ServiceStore};

/// The discovery registry engine
pub struct Registry {
    stores: HashMap<ServiceKind, ServiceStore>,
    local_addrs: Vec<IpAddr>,
}

impl Registry {
    /// Engine with the host's current interface addresses as the self-filter
    pub fn new() -> Self {
        Self::with_local_addrs(net::local_interface_addrs())
    }

    /// Engine with an explicit self-filter address set
    ///
    /// Used by tests and by containerized deployments where the interface
    /// view inside the namespace is not the one announcements carry.
    pub fn with_local_addrs(local_addrs: Vec<IpAddr>) -> Self {
        let stores = ServiceKind::RETAINED
            .iter()
            .map(|kind| (*kind, ServiceStore::new()))
            .collect();

        Self {
            stores,
            local_addrs,
        }
    }

    /// Ingest one announcement
    ///
    /// Returns the category and its full new record set iff membership
    /// changed; renewals, self-announcements, unstored categories, and
    /// departures for unknown identities all return `None`.
    pub fn announce(
        &mut self,
        record: DiscoveryRecord,
    ) -> Option<(ServiceKind, Vec<DiscoveryRecord>)> {
        if self.is_local_address(&record.address) {
            debug!("Ignoring announcement of ourselves: {}", record);
            return None;
        }

        let kind = record.kind;
        let Some(store) = self.stores.get_mut(&kind) else {
            debug!("Dropping announcement for unstored category: {}", record);
            return None;
        };

        let label = record.to_string();
        match store.merge(record) {
            MergeOutcome::Added => {
                info!("Found {}", label);
                Some((kind, store.snapshot()))
            }
            MergeOutcome::Removed => {
                info!("Deregistered {}", label);
                Some((kind, store.snapshot()))
            }
            MergeOutcome::Renewed | MergeOutcome::Unchanged => None,
        }
    }

    /// Expiry sweep for one category
    ///
    /// Returns the full new record set iff at least one record expired.
    pub fn sweep(&mut self, kind: ServiceKind) -> Option<Vec<DiscoveryRecord>> {
        let store = self.stores.get_mut(&kind)?;

        let removed = store.sweep();
        if removed.is_empty() {
            return None;
        }

        for record in &removed {
            warn!("Removing not responding {}", record);
        }
        Some(store.snapshot())
    }

    /// Current snapshot of one category; empty for unstored categories
    pub fn snapshot(&self, kind: ServiceKind) -> Vec<DiscoveryRecord> {
        self.stores
            .get(&kind)
            .map(ServiceStore::snapshot)
            .unwrap_or_default()
    }

    /// Every retained category's snapshot, concatenated in declaration order
    pub fn all_services(&self) -> Vec<DiscoveryRecord> {
        ServiceKind::RETAINED
            .iter()
            .flat_map(|kind| self.snapshot(*kind))
            .collect()
    }

    fn is_local_address(&self, address: &str) -> bool {
        match address.parse::<IpAddr>() {
            Ok(ip) => self.local_addrs.contains(&ip),
            Err(_) => false,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
