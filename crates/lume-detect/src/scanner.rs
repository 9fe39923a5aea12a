//! Serial port scanner
//!
//! Enumerates serial ports with their USB metadata and attributes each
//! port to a controller board family where the USB IDs allow it.

use serialport::{available_ports, SerialPortType};
use tracing::{debug, info};

use crate::boards::{self, BoardFamily};
use crate::error::DetectError;

/// Information about one enumerated serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port path (e.g. /dev/ttyACM0, COM3)
    pub path: String,
    /// USB Vendor ID (if USB)
    pub vid: Option<u16>,
    /// USB Product ID (if USB)
    pub pid: Option<u16>,
    /// USB serial number (if available)
    pub serial_number: Option<String>,
    /// USB manufacturer string
    pub manufacturer: Option<String>,
    /// USB product string
    pub product: Option<String>,
    /// Board family attributed from the USB IDs, if any
    pub family: Option<BoardFamily>,
}

impl PortInfo {
    fn from_serialport(path: String, port_type: &SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(usb) => Self {
                family: boards::classify(usb.vid, usb.pid),
                path,
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                serial_number: usb.serial_number.clone(),
                manufacturer: usb.manufacturer.clone(),
                product: usb.product.clone(),
            },
            _ => Self {
                path,
                vid: None,
                pid: None,
                serial_number: None,
                manufacturer: None,
                product: None,
                family: None,
            },
        }
    }
}

/// Serial port scanner configuration
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Skip ports whose path matches one of these substrings
    pub skip_patterns: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            skip_patterns: vec![
                // Bluetooth ports on macOS
                "Bluetooth".to_string(),
                // Debug/logging ports
                "debug".to_string(),
            ],
        }
    }
}

/// Serial port scanner
pub struct PortScanner {
    config: ScannerConfig,
}

impl PortScanner {
    /// Create a new scanner with default configuration
    pub fn new() -> Self {
        Self {
            config: ScannerConfig::default(),
        }
    }

    /// Create a scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Enumerate all available serial ports
    pub fn enumerate_ports(&self) -> Result<Vec<PortInfo>, DetectError> {
        let ports = available_ports().map_err(|e| DetectError::EnumerationFailed(e.to_string()))?;

        let result: Vec<_> = ports
            .into_iter()
            .map(|p| PortInfo::from_serialport(p.port_name, &p.port_type))
            .filter(|p| !self.should_skip_port(p))
            .collect();

        if result.is_empty() {
            debug!("No serial ports found");
        } else {
            info!("Found {} serial port(s)", result.len());
            for port in &result {
                let family = port
                    .family
                    .map(|f| f.name())
                    .unwrap_or("unattributed");
                debug!("  {} - {}", port.path, family);
            }
        }

        Ok(result)
    }

    fn should_skip_port(&self, port: &PortInfo) -> bool {
        self.config
            .skip_patterns
            .iter()
            .any(|pattern| port.path.contains(pattern))
    }
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new()
    }
}
