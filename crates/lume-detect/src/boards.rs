//! USB Vendor/Product ID database for known controller boards
//!
//! LED strip controllers show up on the serial bus either through the
//! microcontroller's native USB stack (Espressif, RP2040) or through a
//! discrete USB-to-serial bridge (CH340, CP210x) soldered onto the dev
//! board. Native IDs pin down the board family exactly; bridge chips only
//! tell us "a dev board", which in practice means the ESP8266-era family.

use lume_record::ServiceKind;
use serde::{Deserialize, Serialize};

/// USB Vendor ID / Product ID pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbId {
    pub vid: u16,
    pub pid: u16,
}

impl UsbId {
    pub const fn new(vid: u16, pid: u16) -> Self {
        Self { vid, pid }
    }
}

/// Espressif native USB (ESP32-S2/S3 and later)
pub mod espressif {
    pub const VID: u16 = 0x303A;
}

/// Raspberry Pi RP2040 native USB
pub mod rp2040 {
    use super::UsbId;

    pub const VID: u16 = 0x2E8A;

    /// Pico SDK CDC serial
    pub const PICO_CDC: UsbId = UsbId::new(VID, 0x000A);
    /// MicroPython firmware
    pub const MICROPYTHON: UsbId = UsbId::new(VID, 0x0005);
}

/// WCH CH340/CH341 USB-to-serial bridges
pub mod ch340 {
    pub const VID: u16 = 0x1A86;

    /// All known CH340/341 product IDs
    pub const ALL_PIDS: &[u16] = &[0x7523, 0x5523];
}

/// Silicon Labs CP210x USB-to-serial bridges
pub mod cp210x {
    pub const VID: u16 = 0x10C4;

    /// All known CP210x product IDs
    pub const ALL_PIDS: &[u16] = &[0xEA60, 0xEA70, 0xEA71];
}

/// Board family behind a serial port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardFamily {
    /// ESP32 family with native USB
    Esp32,
    /// ESP8266-era dev boards behind a discrete serial bridge
    Esp8266,
    /// RP2040/Pico family
    Rp2040,
}

impl BoardFamily {
    /// The registry category this family's peers are announced under
    pub fn service_kind(&self) -> ServiceKind {
        match self {
            BoardFamily::Esp32 => ServiceKind::Esp32Strip,
            BoardFamily::Esp8266 => ServiceKind::Esp8266Strip,
            BoardFamily::Rp2040 => ServiceKind::PicoStrip,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            BoardFamily::Esp32 => "ESP32",
            BoardFamily::Esp8266 => "ESP8266",
            BoardFamily::Rp2040 => "RP2040",
        }
    }
}

/// Classify a USB VID/PID pair into a board family
///
/// Returns `None` for ports we cannot attribute to a known controller
/// board (FTDI cables, radios, unknown hardware). Those ports are left
/// alone by the discovery path.
pub fn classify(vid: u16, pid: u16) -> Option<BoardFamily> {
    match vid {
        espressif::VID => Some(BoardFamily::Esp32),
        rp2040::VID => Some(BoardFamily::Rp2040),
        ch340::VID if ch340::ALL_PIDS.contains(&pid) => Some(BoardFamily::Esp8266),
        cp210x::VID if cp210x::ALL_PIDS.contains(&pid) => Some(BoardFamily::Esp8266),
        _ => None,
    }
}
