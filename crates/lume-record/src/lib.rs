//! Discovery record types for the Lume service registry
//!
//! This crate defines the value types shared between discovery transports
//! and the registry: which category a peer belongs to ([`ServiceKind`]) and
//! the liveness record describing one observed peer ([`DiscoveryRecord`]).
//!
//! # Example
//!
//! ```rust
//! use lume_record::{DiscoveryRecord, ServiceKind};
//!
//! let bridge = DiscoveryRecord::new(
//!     ServiceKind::BulbBridge,
//!     "10.0.0.5",
//!     80,
//!     "bridge1",
//! );
//!
//! // Identity is (kind, address, port); host name is metadata only.
//! let renamed = DiscoveryRecord::new(
//!     ServiceKind::BulbBridge,
//!     "10.0.0.5",
//!     80,
//!     "bridge1-renamed",
//! );
//! assert_eq!(bridge, renamed);
//! ```

pub mod kind;
pub mod record;

pub use kind::ServiceKind;
pub use record::{DiscoveryRecord, TTL_MAX};
