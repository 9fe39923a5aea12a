//! Scripted discovery transport
//!
//! A set of scripted peers per category, announced in response to scan
//! triggers after a configurable latency.

use std::time::Duration;

use lume_record::{DiscoveryRecord, ServiceKind};
use lume_registry::RegistryHandle;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

/// One scripted peer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimPeer {
    /// Category the peer announces under
    pub kind: ServiceKind,
    /// Announced address
    pub address: String,
    /// Announced port
    pub port: u16,
    /// Announced display name
    pub host_name: String,
    /// When true the peer answers scans with a departure announcement
    pub departed: bool,
}

impl SimPeer {
    /// Create a present peer
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
            departed: false,
        }
    }

    /// Script this peer as departing
    pub fn departed(mut self) -> Self {
        self.departed = true;
        self
    }

    /// The announcement this peer answers a scan with
    pub fn record(&self) -> DiscoveryRecord {
        if self.departed {
            DiscoveryRecord::departure(self.kind, self.address.clone(), self.port, self.host_name.clone())
        } else {
            DiscoveryRecord::new(self.kind, self.address.clone(), self.port, self.host_name.clone())
        }
    }
}

/// Transport timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimTransportConfig {
    /// Delay between receiving a trigger and announcing, per scan
    pub latency: Duration,
}

impl Default for SimTransportConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(10),
        }
    }
}

/// A scripted set of peers behind one simulated transport
#[derive(Debug, Default)]
pub struct SimTransport {
    peers: Vec<SimPeer>,
    config: SimTransportConfig,
}

impl SimTransport {
    /// Transport with no peers
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport answering scans with the given peers
    pub fn with_peers(peers: Vec<SimPeer>) -> Self {
        Self {
            peers,
            config: SimTransportConfig::default(),
        }
    }

    /// Override the timing configuration
    pub fn with_config(mut self, config: SimTransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Add one scripted peer
    pub fn add_peer(&mut self, peer: SimPeer) {
        self.peers.push(peer);
    }

    /// Announcements this transport gives for one category's scan
    pub fn answers_for(&self, kind: ServiceKind) -> Vec<DiscoveryRecord> {
        self.peers
            .iter()
            .filter(|p| p.kind == kind)
            .map(SimPeer::record)
            .collect()
    }
}

/// Run the simulated transport against a registry
///
/// Listens on the registry's scan trigger stream and answers each trigger
/// for a category it has peers for. Returns when the registry is gone.
pub async fn run_sim_transport(registry: RegistryHandle, transport: SimTransport) {
    let mut scans = registry.scan_requests();
    info!(
        "Simulated transport started with {} peer(s)",
        transport.peers.len()
    );

    loop {
        let kind = match scans.recv().await {
            Ok(kind) => kind,
            Err(RecvError::Lagged(missed)) => {
                debug!("Simulated transport lagged {} trigger(s)", missed);
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let answers = transport.answers_for(kind);
        if answers.is_empty() {
            continue;
        }

        debug!("Answering scan for {} with {} peer(s)", kind, answers.len());
        tokio::time::sleep(transport.config.latency).await;

        for record in answers {
            if registry.announce(record).await.is_err() {
                return;
            }
        }
    }

    info!("Simulated transport stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_registry::{start_registry, RegistryConfig};
    use tokio::time::timeout;

    #[test]
    fn answers_filter_by_category() {
        let transport = SimTransport::with_peers(vec![
            SimPeer::new(ServiceKind::BulbBridge, "10.0.0.5", 80, "bridge1"),
            SimPeer::new(ServiceKind::WifiStrip, "10.0.0.7", 80, "strip-a"),
            SimPeer::new(ServiceKind::WifiStrip, "10.0.0.8", 80, "strip-b").departed(),
        ]);

        let strips = transport.answers_for(ServiceKind::WifiStrip);
        assert_eq!(strips.len(), 2);
        assert!(strips[0].exists);
        assert!(!strips[1].exists);

        assert!(transport.answers_for(ServiceKind::Session).is_empty());
    }

    #[tokio::test]
    async fn scan_trigger_round_trip() {
        let registry = start_registry(RegistryConfig {
            local_addrs: Some(Vec::new()),
            ..Default::default()
        });
        let mut updates = registry.subscribe();

        let transport = SimTransport::with_peers(vec![SimPeer::new(
            ServiceKind::BulbBridge,
            "10.0.0.5",
            80,
            "bridge1",
        )]);
        tokio::spawn(run_sim_transport(registry.clone(), transport));

        // each query's snapshot predates the scan it triggers; keep asking
        // until the transport's announcement has landed
        let mut found = Vec::new();
        for _ in 0..40 {
            let snapshot = registry.services(ServiceKind::BulbBridge).await.unwrap();
            if !snapshot.is_empty() {
                found = snapshot;
                break;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].host_name, "bridge1");

        // the update stream saw exactly the add; scan renewals were silent
        let update = timeout(Duration::from_secs(2), updates.recv())
            .await
            .expect("timed out waiting for simulated announcement")
            .unwrap();
        assert_eq!(update.kind, ServiceKind::BulbBridge);
        assert_eq!(update.services.len(), 1);
    }
}
