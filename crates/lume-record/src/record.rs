//! Liveness records for discovered peers

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kind::ServiceKind;

/// Number of expiry sweeps a record survives without renewal
///
/// The counter is sweep-based, not wall-clock based: a record announced
/// once disappears after `TTL_MAX` per-category queries or full scans with
/// no renewal in between.
pub const TTL_MAX: u8 = 3;

/// One observed peer, as announced by a discovery transport
///
/// Identity is the `(kind, address, port)` tuple; `PartialEq`/`Eq` compare
/// only those fields. Host name is display metadata, `exists` carries the
/// announcement's intent (present/renew vs. departing), and the TTL counter
/// is registry bookkeeping — none of them participate in identity.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiscoveryRecord {
    /// Service category
    pub kind: ServiceKind,
    /// Network address in host form; serial-discovered peers carry the
    /// port path here (e.g. `/dev/ttyACM0`)
    pub address: String,
    /// Service port (0 for serial-discovered peers)
    pub port: u16,
    /// Display name announced by the peer
    pub host_name: String,
    /// True for present/renew announcements, false for explicit departure
    pub exists: bool,
    ttl: u8,
}

impl DiscoveryRecord {
    /// Create a presence announcement with a fresh TTL
    pub fn new(
        kind: ServiceKind,
        address: impl Into<String>,
        port: u16,
        host_name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            address: address.into(),
            port,
            host_name: host_name.into(),
            exists: true,
            ttl: TTL_MAX,
        }
    }

    /// Create an explicit departure announcement for the same identity
    pub fn departure(
        kind: ServiceKind,
        address: impl Into<String>,
        port: u16,
        host_name: impl Into<String>,
    ) -> Self {
        Self {
            exists: false,
            ..Self::new(kind, address, port, host_name)
        }
    }

    /// Remaining sweeps before this record expires
    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    /// Reset the TTL to its maximum (renewal)
    pub fn reset_ttl(&mut self) {
        self.ttl = TTL_MAX;
    }

    /// Burn one sweep off the TTL
    pub fn decay(&mut self) {
        self.ttl = self.ttl.saturating_sub(1);
    }

    /// Whether the expiry sweep should remove this record
    pub fn expired(&self) -> bool {
        self.ttl == 0
    }
}

impl PartialEq for DiscoveryRecord {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.address == other.address && self.port == other.port
    }
}

impl Eq for DiscoveryRecord {}

impl fmt::Display for DiscoveryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{} ({})",
            self.kind.display_name(),
            self.address,
            self.port,
            self.host_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_host_name_and_flags() {
        let a = DiscoveryRecord::new(ServiceKind::BulbBridge, "10.0.0.5", 80, "bridge1");
        let mut b = DiscoveryRecord::departure(
            ServiceKind::BulbBridge,
            "10.0.0.5",
            80,
            "bridge1-renamed",
        );
        b.decay();

        assert_eq!(a, b);
    }

    #[test]
    fn identity_distinguishes_kind_address_port() {
        let base = DiscoveryRecord::new(ServiceKind::WifiStrip, "10.0.0.7", 80, "strip");

        let other_kind = DiscoveryRecord::new(ServiceKind::BulbBridge, "10.0.0.7", 80, "strip");
        let other_addr = DiscoveryRecord::new(ServiceKind::WifiStrip, "10.0.0.8", 80, "strip");
        let other_port = DiscoveryRecord::new(ServiceKind::WifiStrip, "10.0.0.7", 81, "strip");

        assert_ne!(base, other_kind);
        assert_ne!(base, other_addr);
        assert_ne!(base, other_port);
    }

    #[test]
    fn ttl_lifecycle() {
        let mut rec = DiscoveryRecord::new(ServiceKind::Session, "10.0.0.2", 8090, "peer");
        assert_eq!(rec.ttl(), TTL_MAX);
        assert!(!rec.expired());

        for _ in 0..TTL_MAX {
            rec.decay();
        }
        assert!(rec.expired());

        // decay below zero saturates
        rec.decay();
        assert_eq!(rec.ttl(), 0);

        rec.reset_ttl();
        assert_eq!(rec.ttl(), TTL_MAX);
        assert!(!rec.expired());
    }

    #[test]
    fn display_includes_identity_and_host() {
        let rec = DiscoveryRecord::new(ServiceKind::BulbBridge, "10.0.0.5", 80, "bridge1");
        assert_eq!(rec.to_string(), "bulb bridge at 10.0.0.5:80 (bridge1)");
    }
}
