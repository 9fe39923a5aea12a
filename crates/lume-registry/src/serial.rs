//! On-demand serial discovery adapter
//!
//! Serial peripherals are not announced over the network; they are
//! enumerated when a `SerialPort` scan trigger fires. The probe behind the
//! enumeration is constructed on the first trigger with the default
//! Adalight parameters and reused for every trigger after that. It is
//! dropped exactly once, together with the actor that owns it.

use lume_detect::PeripheralProbe;
use lume_record::DiscoveryRecord;
use tracing::debug;

/// Lazily-constructed serial probe
pub enum SerialAdapter {
    /// No trigger seen yet; no probe exists
    Uninitialized,
    /// Probe constructed by the first trigger and reused since
    Ready(PeripheralProbe),
}

impl SerialAdapter {
    /// Create an adapter that has not probed yet
    pub fn new() -> Self {
        SerialAdapter::Uninitialized
    }

    /// Whether the probe has been constructed
    pub fn is_ready(&self) -> bool {
        matches!(self, SerialAdapter::Ready(_))
    }

    /// Enumerate attached peripherals, constructing the probe on first use
    ///
    /// Returns one presence record per port attributed to a known board
    /// family, addressed by port path. Unattributed ports are skipped;
    /// enumeration failure yields an empty set, which is a valid outcome.
    pub async fn enumerate(&mut self) -> Vec<DiscoveryRecord> {
        let probe = self.probe();

        probe
            .enumerate()
            .await
            .into_iter()
            .filter_map(|peripheral| {
                let family = peripheral.family?;
                Some(DiscoveryRecord::new(
                    family.service_kind(),
                    peripheral.path.clone(),
                    0,
                    peripheral.display_name(),
                ))
            })
            .collect()
    }

    fn probe(&mut self) -> &PeripheralProbe {
        if matches!(self, SerialAdapter::Uninitialized) {
            debug!("Constructing serial probe with Adalight defaults");
            *self = SerialAdapter::Ready(PeripheralProbe::new());
        }

        match self {
            SerialAdapter::Ready(probe) => probe,
            SerialAdapter::Uninitialized => unreachable!("probe constructed above"),
        }
    }
}

impl Default for SerialAdapter {
    fn default() -> Self {
        Self::new()
    }
}
