//! Adalight peripheral probing
//!
//! Adalight-compatible firmware prints a short greeting when its serial
//! port opens. The probe enumerates candidate ports, attributes them to a
//! board family by USB IDs, and optionally opens each candidate briefly to
//! wait for that greeting.

use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::time::timeout;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, trace, warn};

use crate::boards::BoardFamily;
use crate::scanner::{PortInfo, PortScanner, ScannerConfig};

/// Greeting emitted by Adalight-compatible firmware after the port opens
pub const ADALIGHT_BANNER: &[u8] = b"Ada";

/// Configuration for probing
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Baud rate for the greeting check
    pub baud_rate: u32,
    /// Delay after opening before reading (boards reset on open)
    pub settle: Duration,
    /// Timeout waiting for the greeting
    pub banner_timeout: Duration,
    /// Whether to open classified ports and wait for the greeting
    pub verify_banner: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            settle: Duration::from_millis(50),
            banner_timeout: Duration::from_millis(500),
            verify_banner: true,
        }
    }
}

/// One peripheral found on the serial bus
#[derive(Debug, Clone)]
pub struct PeripheralDescriptor {
    /// Port path (e.g. /dev/ttyACM0)
    pub path: String,
    /// Board family attributed from USB IDs, if any
    pub family: Option<BoardFamily>,
    /// USB manufacturer string
    pub manufacturer: Option<String>,
    /// USB product string
    pub product: Option<String>,
    /// Whether the Adalight greeting was observed on this port
    pub confirmed: bool,
}

impl PeripheralDescriptor {
    fn from_port(info: &PortInfo, confirmed: bool) -> Self {
        Self {
            path: info.path.clone(),
            family: info.family,
            manufacturer: info.manufacturer.clone(),
            product: info.product.clone(),
            confirmed,
        }
    }

    /// Display name: the USB product string, falling back to the family
    pub fn display_name(&self) -> String {
        if let Some(product) = &self.product {
            return product.clone();
        }
        match self.family {
            Some(family) => family.name().to_string(),
            None => "serial peripheral".to_string(),
        }
    }
}

/// Probe for serial-attached LED strip controllers
pub struct PeripheralProbe {
    scanner: PortScanner,
    config: ProbeConfig,
}

impl PeripheralProbe {
    /// Create a probe with default scanner and probe configuration
    pub fn new() -> Self {
        Self {
            scanner: PortScanner::new(),
            config: ProbeConfig::default(),
        }
    }

    /// Create a probe with custom configuration
    pub fn with_config(scanner: ScannerConfig, config: ProbeConfig) -> Self {
        Self {
            scanner: PortScanner::with_config(scanner),
            config,
        }
    }

    /// Enumerate currently attached peripherals
    ///
    /// Never fails: enumeration errors and unresponsive ports degrade to an
    /// empty or partial result. Only ports attributed to a known board
    /// family are opened for the greeting check; FTDI cables and other
    /// unattributed hardware are reported unopened.
    pub async fn enumerate(&self) -> Vec<PeripheralDescriptor> {
        let ports = match self.scanner.enumerate_ports() {
            Ok(ports) => ports,
            Err(e) => {
                warn!("Serial enumeration failed: {}", e);
                return Vec::new();
            }
        };

        let mut found = Vec::with_capacity(ports.len());
        for port in &ports {
            let confirmed = if port.family.is_some() && self.config.verify_banner {
                self.read_banner(&port.path).await
            } else {
                false
            };
            found.push(PeripheralDescriptor::from_port(port, confirmed));
        }

        debug!(
            "Serial probe finished: {} port(s), {} confirmed",
            found.len(),
            found.iter().filter(|d| d.confirmed).count()
        );

        found
    }

    /// Open a port and wait for the Adalight greeting
    async fn read_banner(&self, path: &str) -> bool {
        let mut stream = match tokio_serial::new(path, self.config.baud_rate)
            .timeout(Duration::from_millis(100))
            .open_native_async()
        {
            Ok(s) => s,
            Err(e) => {
                debug!("Failed to open {}: {}", path, e);
                return false;
            }
        };

        // Boards with a reset-on-open bridge need a moment before talking
        tokio::time::sleep(self.config.settle).await;

        let mut buf = [0u8; 32];
        let mut seen = Vec::new();
        match timeout(self.config.banner_timeout, stream.read(&mut buf)).await {
            Ok(Ok(n)) if n > 0 => {
                seen.extend_from_slice(&buf[..n]);
                trace!("{} greeted with {:02X?}", path, &seen);
                seen.windows(ADALIGHT_BANNER.len())
                    .any(|w| w == ADALIGHT_BANNER)
            }
            Ok(Ok(_)) => {
                trace!("{} closed without greeting", path);
                false
            }
            Ok(Err(e)) => {
                trace!("{} read error: {}", path, e);
                false
            }
            Err(_) => {
                trace!("{} greeting timeout", path);
                false
            }
        }
    }
}

impl Default for PeripheralProbe {
    fn default() -> Self {
        Self::new()
    }
}
