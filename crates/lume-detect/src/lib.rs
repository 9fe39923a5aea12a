//! Serial Peripheral Detection Library
//!
//! This crate enumerates serial ports and identifies the LED strip
//! controller boards attached to them, by USB vendor/product ID and by an
//! optional Adalight greeting check.
//!
//! # Example
//!
//! ```rust,no_run
//! use lume_detect::PortScanner;
//!
//! let scanner = PortScanner::new();
//! let ports = scanner.enumerate_ports().unwrap();
//!
//! for port in ports {
//!     println!("Found port: {}", port.path);
//! }
//! ```

pub mod boards;
pub mod error;
pub mod probe;
pub mod scanner;

pub use boards::BoardFamily;
pub use error::DetectError;
pub use probe::{PeripheralDescriptor, PeripheralProbe, ProbeConfig};
pub use scanner::{PortInfo, PortScanner, ScannerConfig};
