//! Integration tests for the discovery registry
//!
//! These tests verify end-to-end behavior through the public handle:
//! - Announcement merging across categories (add, renew, depart)
//! - TTL expiry driven by queries
//! - Scan trigger emission
//! - Update fan-out to multiple subscribers
//! - Snapshot isolation under concurrent ingestion

use std::time::Duration;

use lume_record::{DiscoveryRecord, ServiceKind, TTL_MAX};
use lume_registry::{start_registry, RegistryConfig, RegistryHandle, ServiceUpdate};
use tokio::sync::broadcast;
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_millis(500);

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    /// Start a registry with an empty self-filter so test addresses
    /// never collide with the host's interfaces
    pub fn registry() -> RegistryHandle {
        start_registry(RegistryConfig {
            local_addrs: Some(Vec::new()),
            ..Default::default()
        })
    }

    /// Start a registry that treats the given address as its own
    pub fn registry_with_local(addr: &str) -> RegistryHandle {
        start_registry(RegistryConfig {
            local_addrs: Some(vec![addr.parse().unwrap()]),
            ..Default::default()
        })
    }

    pub fn bridge(address: &str, host: &str) -> DiscoveryRecord {
        DiscoveryRecord::new(ServiceKind::BulbBridge, address, 80, host)
    }

    pub fn strip(address: &str, host: &str) -> DiscoveryRecord {
        DiscoveryRecord::new(ServiceKind::WifiStrip, address, 80, host)
    }

    pub async fn recv_update(rx: &mut broadcast::Receiver<ServiceUpdate>) -> ServiceUpdate {
        timeout(RECV_TIMEOUT, rx.recv())
            .await
            .expect("timed out waiting for update")
            .expect("update channel closed")
    }
}

// ============================================================================
// Merge Behavior
// ============================================================================

mod merge_tests {
    use super::helpers::*;
    use super::*;

    #[tokio::test]
    async fn bridge_appears_then_departs() {
        let registry = registry();
        let mut updates = registry.subscribe();

        registry
            .announce(bridge("10.0.0.5", "bridge1"))
            .await
            .unwrap();

        let update = recv_update(&mut updates).await;
        assert_eq!(update.kind, ServiceKind::BulbBridge);
        assert_eq!(update.services.len(), 1);
        assert_eq!(update.services[0].host_name, "bridge1");

        // host-name mismatch is irrelevant; identity matches address+port
        registry
            .announce(DiscoveryRecord::departure(
                ServiceKind::BulbBridge,
                "10.0.0.5",
                80,
                "bridge1-renamed",
            ))
            .await
            .unwrap();

        let update = recv_update(&mut updates).await;
        assert_eq!(update.kind, ServiceKind::BulbBridge);
        assert!(update.services.is_empty());
    }

    #[tokio::test]
    async fn repeated_announcements_are_idempotent() {
        let registry = registry();
        let mut updates = registry.subscribe();

        for _ in 0..4 {
            registry
                .announce(strip("10.0.0.7", "strip-a"))
                .await
                .unwrap();
        }
        registry
            .announce(strip("10.0.0.8", "strip-b"))
            .await
            .unwrap();

        assert_eq!(recv_update(&mut updates).await.services.len(), 1);
        // renewals emitted nothing: the very next update is the second add
        assert_eq!(recv_update(&mut updates).await.services.len(), 2);

        let services = registry.all_services().await.unwrap();
        assert_eq!(services.len(), 2);
    }

    #[tokio::test]
    async fn categories_do_not_interfere() {
        let registry = registry();

        registry
            .announce(bridge("10.0.0.5", "bridge1"))
            .await
            .unwrap();
        registry
            .announce(strip("10.0.0.5", "strip-same-addr"))
            .await
            .unwrap();

        // same address and port, different category: distinct identities
        let bridges = registry.services(ServiceKind::BulbBridge).await.unwrap();
        let strips = registry.services(ServiceKind::WifiStrip).await.unwrap();
        assert_eq!(bridges.len(), 1);
        assert_eq!(strips.len(), 1);
    }

    #[tokio::test]
    async fn self_announcements_never_land() {
        let registry = registry_with_local("192.168.7.3");
        let mut updates = registry.subscribe();

        registry
            .announce(bridge("192.168.7.3", "our-own-echo"))
            .await
            .unwrap();
        registry
            .announce(bridge("10.0.0.5", "real-bridge"))
            .await
            .unwrap();

        // only the real bridge produced an update
        let update = recv_update(&mut updates).await;
        assert_eq!(update.services.len(), 1);
        assert_eq!(update.services[0].host_name, "real-bridge");
    }
}

// ============================================================================
// Expiry
// ============================================================================

mod expiry_tests {
    use super::helpers::*;
    use super::*;

    #[tokio::test]
    async fn unrenewed_record_expires_with_one_update() {
        let registry = registry();
        let mut updates = registry.subscribe();

        registry
            .announce(strip("10.0.0.7", "fading"))
            .await
            .unwrap();
        let _ = recv_update(&mut updates).await;

        // each query sweeps once; the record survives TTL_MAX - 1 sweeps
        for _ in 0..TTL_MAX - 1 {
            let services = registry.services(ServiceKind::WifiStrip).await.unwrap();
            assert_eq!(services.len(), 1);
        }

        let services = registry.services(ServiceKind::WifiStrip).await.unwrap();
        assert!(services.is_empty());

        // exactly one removal update, carrying the empty set
        let update = recv_update(&mut updates).await;
        assert_eq!(update.kind, ServiceKind::WifiStrip);
        assert!(update.services.is_empty());
    }

    #[tokio::test]
    async fn renewal_staves_off_expiry() {
        let registry = registry();

        registry
            .announce(strip("10.0.0.7", "alive"))
            .await
            .unwrap();

        for _ in 0..2 * TTL_MAX {
            let services = registry.services(ServiceKind::WifiStrip).await.unwrap();
            assert_eq!(services.len(), 1);
            // transport re-observes the peer between queries
            registry
                .announce(strip("10.0.0.7", "alive"))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn all_services_does_not_sweep() {
        let registry = registry();

        registry
            .announce(strip("10.0.0.7", "fading"))
            .await
            .unwrap();

        // all_services never decays TTLs, no matter how often it is called
        for _ in 0..2 * TTL_MAX {
            let services = registry.all_services().await.unwrap();
            assert_eq!(services.len(), 1);
        }
    }
}

// ============================================================================
// Scan Triggers
// ============================================================================

mod trigger_tests {
    use super::helpers::*;
    use super::*;

    #[tokio::test]
    async fn query_requests_a_refresh() {
        let registry = registry();
        let mut scans = registry.scan_requests();

        let _ = registry.services(ServiceKind::BulbBridge).await.unwrap();

        let requested = timeout(RECV_TIMEOUT, scans.recv())
            .await
            .expect("timed out waiting for scan trigger")
            .unwrap();
        assert_eq!(requested, ServiceKind::BulbBridge);
    }

    #[tokio::test]
    async fn full_scan_covers_every_category() {
        let registry = registry();
        let mut scans = registry.scan_requests();

        registry.request_full_scan().await.unwrap();

        let mut triggered = Vec::new();
        for _ in 0..ServiceKind::RETAINED.len() + 1 {
            triggered.push(
                timeout(RECV_TIMEOUT, scans.recv())
                    .await
                    .expect("timed out waiting for scan trigger")
                    .unwrap(),
            );
        }

        let mut expected: Vec<_> = ServiceKind::RETAINED.to_vec();
        expected.push(ServiceKind::SerialPort);
        assert_eq!(triggered, expected);
    }
}

// ============================================================================
// Fan-out & Isolation
// ============================================================================

mod fanout_tests {
    use super::helpers::*;
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_every_update_in_order() {
        let registry = registry();
        let mut first = registry.subscribe();
        let mut second = registry.subscribe();

        registry
            .announce(strip("10.0.0.7", "strip-a"))
            .await
            .unwrap();
        registry
            .announce(strip("10.0.0.8", "strip-b"))
            .await
            .unwrap();
        registry
            .announce(DiscoveryRecord::departure(
                ServiceKind::WifiStrip,
                "10.0.0.7",
                80,
                "strip-a",
            ))
            .await
            .unwrap();

        for rx in [&mut first, &mut second] {
            let sizes: Vec<usize> = [
                recv_update(rx).await,
                recv_update(rx).await,
                recv_update(rx).await,
            ]
            .iter()
            .map(|u| u.services.len())
            .collect();
            assert_eq!(sizes, [1, 2, 1]);
        }
    }

    #[tokio::test]
    async fn snapshots_are_unaffected_by_later_updates() {
        let registry = registry();

        registry
            .announce(strip("10.0.0.7", "strip-a"))
            .await
            .unwrap();
        let snapshot = registry.all_services().await.unwrap();
        assert_eq!(snapshot.len(), 1);

        // concurrent transports keep announcing while we hold the snapshot
        for i in 0..8 {
            registry
                .announce(strip(&format!("10.0.1.{i}"), "later"))
                .await
                .unwrap();
        }

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].host_name, "strip-a");

        let fresh = registry.all_services().await.unwrap();
        assert_eq!(fresh.len(), 9);
    }
}
