//! Service categories known to the registry

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Category of a discovered network service
///
/// The registry keeps one store of live records per retained category.
/// `SerialPort` is a trigger-only pseudo-category: serial peripherals are
/// enumerated on demand and announced under one of the board-family
/// categories instead. `Unknown` is a sentinel and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ServiceKind {
    /// Companion application instances on the local network
    Session,
    /// Smart-bulb bridges (Hue-compatible)
    BulbBridge,
    /// ESP32-family LED strip controllers
    Esp32Strip,
    /// ESP8266-family LED strip controllers
    Esp8266Strip,
    /// RP2040/Pico-family LED strip controllers
    PicoStrip,
    /// Generic Wi-Fi LED strips (WLED-compatible)
    WifiStrip,
    /// Serial bus scan trigger; never stored
    SerialPort,
    /// Sentinel for unrecognized announcements; never stored
    Unknown,
}

impl ServiceKind {
    /// Categories the registry retains a store for, in declaration order
    ///
    /// `all_services` snapshots concatenate in exactly this order, and a
    /// full scan sweeps and triggers in exactly this order.
    pub const RETAINED: [ServiceKind; 6] = [
        ServiceKind::Session,
        ServiceKind::BulbBridge,
        ServiceKind::Esp32Strip,
        ServiceKind::Esp8266Strip,
        ServiceKind::PicoStrip,
        ServiceKind::WifiStrip,
    ];

    /// Whether the registry keeps a store for this category
    pub fn is_retained(&self) -> bool {
        !matches!(self, ServiceKind::SerialPort | ServiceKind::Unknown)
    }

    /// Human-readable category name for logs and display
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Session => "Lume session",
            ServiceKind::BulbBridge => "bulb bridge",
            ServiceKind::Esp32Strip => "ESP32 strip",
            ServiceKind::Esp8266Strip => "ESP8266 strip",
            ServiceKind::PicoStrip => "Pico strip",
            ServiceKind::WifiStrip => "Wi-Fi strip",
            ServiceKind::SerialPort => "serial port",
            ServiceKind::Unknown => "unknown service",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
