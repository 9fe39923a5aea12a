//! Cloneable handle to a running registry
//!
//! The handle is the only surface transports and consumers see: announce,
//! query, trigger, subscribe. Clones share the same actor.

use std::net::IpAddr;

use lume_record::{DiscoveryRecord, ServiceKind};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::actor::{run_registry_actor, RegistryCommand};
use crate::error::RegistryError;
use crate::events::ServiceUpdate;
use crate::registry::Registry;

/// Registry construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Command channel capacity
    pub command_buffer: usize,
    /// Update broadcast capacity; lagged subscribers lose oldest updates
    pub event_buffer: usize,
    /// Scan trigger broadcast capacity
    pub scan_buffer: usize,
    /// Self-filter address override; `None` enumerates local interfaces
    #[serde(default)]
    pub local_addrs: Option<Vec<IpAddr>>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            command_buffer: 64,
            event_buffer: 64,
            scan_buffer: 16,
            local_addrs: None,
        }
    }
}

/// Handle to a running registry actor
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    cmd_tx: mpsc::Sender<RegistryCommand>,
    event_tx: broadcast::Sender<ServiceUpdate>,
    scan_tx: broadcast::Sender<ServiceKind>,
}

/// Spawn a registry actor and return a handle to it
///
/// Must be called from within a tokio runtime. The actor stops when a
/// [`RegistryHandle::shutdown`] is issued or every handle clone is dropped.
pub fn start_registry(config: RegistryConfig) -> RegistryHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
    let (event_tx, _) = broadcast::channel(config.event_buffer);
    let (scan_tx, _) = broadcast::channel(config.scan_buffer);

    let registry = match config.local_addrs {
        Some(addrs) => Registry::with_local_addrs(addrs),
        None => Registry::new(),
    };

    tokio::spawn(run_registry_actor(
        registry,
        cmd_rx,
        event_tx.clone(),
        scan_tx.clone(),
    ));

    RegistryHandle {
        cmd_tx,
        event_tx,
        scan_tx,
    }
}

impl RegistryHandle {
    /// Push one announcement from a discovery transport
    pub async fn announce(&self, record: DiscoveryRecord) -> Result<(), RegistryError> {
        self.send(RegistryCommand::Announce { record }).await
    }

    /// Post-expiry snapshot of one category, with a refresh triggered
    ///
    /// The returned snapshot predates the triggered scan; newly discovered
    /// peers surface through the update stream or a later query.
    pub async fn services(
        &self,
        kind: ServiceKind,
    ) -> Result<Vec<DiscoveryRecord>, RegistryError> {
        let (response, rx) = oneshot::channel();
        self.send(RegistryCommand::Services { kind, response })
            .await?;
        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Snapshot of every retained category, in declaration order
    ///
    /// Does not sweep or trigger; callers that need freshness query the
    /// categories they care about first.
    pub async fn all_services(&self) -> Result<Vec<DiscoveryRecord>, RegistryError> {
        let (response, rx) = oneshot::channel();
        self.send(RegistryCommand::AllServices { response }).await?;
        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Sweep and re-trigger every category; fire-and-forget
    pub async fn request_full_scan(&self) -> Result<(), RegistryError> {
        self.send(RegistryCommand::FullScan).await
    }

    /// Stop the registry actor
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        self.send(RegistryCommand::Shutdown).await
    }

    /// Subscribe to membership-change updates
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceUpdate> {
        self.event_tx.subscribe()
    }

    /// Subscribe to scan triggers (for discovery transports)
    pub fn scan_requests(&self) -> broadcast::Receiver<ServiceKind> {
        self.scan_tx.subscribe()
    }

    async fn send(&self, cmd: RegistryCommand) -> Result<(), RegistryError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RegistryError::ChannelClosed)
    }
}
