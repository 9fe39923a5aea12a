//! Registry actor
//!
//! All registry state lives on this task. Discovery transports and
//! consumers interact with it through channels, so interleaved
//! announcements from concurrent transports are applied one at a time and
//! every query observes a consistent snapshot.
//!
//! # Example
//!
//! ```rust,ignore
//! use lume_registry::{run_registry_actor, Registry, RegistryCommand};
//! use tokio::sync::{broadcast, mpsc};
//!
//! let (cmd_tx, cmd_rx) = mpsc::channel(64);
//! let (event_tx, _) = broadcast::channel(64);
//! let (scan_tx, _) = broadcast::channel(16);
//!
//! tokio::spawn(run_registry_actor(
//!     Registry::new(),
//!     cmd_rx,
//!     event_tx,
//!     scan_tx,
//! ));
//! // Send commands through cmd_tx; subscribe to event_tx for updates.
//! ```

use lume_record::{DiscoveryRecord, ServiceKind};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::events::ServiceUpdate;
use crate::registry::Registry;
use crate::serial::SerialAdapter;

/// Commands sent to the registry actor
#[derive(Debug)]
pub enum RegistryCommand {
    /// Push one announcement from a discovery transport
    Announce {
        /// The announced record (presence or departure)
        record: DiscoveryRecord,
    },

    /// Expire stale records, trigger a refresh, and return the current
    /// snapshot for one category
    Services {
        /// Category to query
        kind: ServiceKind,
        /// Channel to send back the post-expiry snapshot
        response: oneshot::Sender<Vec<DiscoveryRecord>>,
    },

    /// Concatenated snapshot of every retained category, without sweeping
    /// or triggering
    AllServices {
        /// Channel to send back the snapshot
        response: oneshot::Sender<Vec<DiscoveryRecord>>,
    },

    /// Sweep and re-trigger every category
    FullScan,

    /// Stop the actor
    Shutdown,
}

/// Run the registry actor
///
/// Processes commands until `Shutdown` arrives or every command sender is
/// dropped. Membership changes broadcast on `event_tx`; scan triggers
/// broadcast on `scan_tx`. Neither broadcast blocks, and a send with no
/// subscribers is not an error.
pub async fn run_registry_actor(
    mut registry: Registry,
    mut cmd_rx: mpsc::Receiver<RegistryCommand>,
    event_tx: broadcast::Sender<ServiceUpdate>,
    scan_tx: broadcast::Sender<ServiceKind>,
) {
    let mut serial = SerialAdapter::new();
    info!("Discovery registry started");

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            RegistryCommand::Announce { record } => {
                apply_announcement(&mut registry, &event_tx, record);
            }

            RegistryCommand::Services { kind, response } => {
                if kind.is_retained() {
                    publish_sweep(&mut registry, &event_tx, kind);
                }
                request_scan(&mut registry, &mut serial, &event_tx, &scan_tx, kind).await;

                // post-expiry snapshot; peers found by the scan surface on
                // the next query or through the update stream
                let _ = response.send(registry.snapshot(kind));
            }

            RegistryCommand::AllServices { response } => {
                let _ = response.send(registry.all_services());
            }

            RegistryCommand::FullScan => {
                for kind in ServiceKind::RETAINED {
                    publish_sweep(&mut registry, &event_tx, kind);
                    request_scan(&mut registry, &mut serial, &event_tx, &scan_tx, kind).await;
                }
                // serial peripherals have no store to sweep
                request_scan(
                    &mut registry,
                    &mut serial,
                    &event_tx,
                    &scan_tx,
                    ServiceKind::SerialPort,
                )
                .await;
            }

            RegistryCommand::Shutdown => {
                info!("Discovery registry shutting down");
                break;
            }
        }
    }

    info!("Discovery registry stopped");
}

/// Merge one announcement and broadcast the update if membership changed
fn apply_announcement(
    registry: &mut Registry,
    event_tx: &broadcast::Sender<ServiceUpdate>,
    record: DiscoveryRecord,
) {
    if let Some((kind, services)) = registry.announce(record) {
        let _ = event_tx.send(ServiceUpdate { kind, services });
    }
}

/// Sweep one category and broadcast the update if anything expired
fn publish_sweep(
    registry: &mut Registry,
    event_tx: &broadcast::Sender<ServiceUpdate>,
    kind: ServiceKind,
) {
    if let Some(services) = registry.sweep(kind) {
        let _ = event_tx.send(ServiceUpdate { kind, services });
    }
}

/// Fire a scan trigger for one category
///
/// Network categories are refreshed by their transports, which listen on
/// the trigger stream. The serial pseudo-category is handled here: the
/// adapter enumerates attached peripherals and feeds them back through the
/// normal ingestion path. Enumeration is bounded by the probe's own
/// timeouts.
async fn request_scan(
    registry: &mut Registry,
    serial: &mut SerialAdapter,
    event_tx: &broadcast::Sender<ServiceUpdate>,
    scan_tx: &broadcast::Sender<ServiceKind>,
    kind: ServiceKind,
) {
    if kind == ServiceKind::Unknown {
        return;
    }

    debug!("Requesting scan for {}", kind);
    let _ = scan_tx.send(kind);

    if kind == ServiceKind::SerialPort {
        for record in serial.enumerate().await {
            apply_announcement(registry, event_tx, record);
        }
    }
}
