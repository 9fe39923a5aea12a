//! Lume Discovery Registry
//!
//! This crate provides the core registry that reconciles peer announcements
//! from independent discovery transports (mDNS listeners, serial probes)
//! into one consistent, queryable view per service category.
//!
//! # Architecture
//!
//! All state lives on a single actor task:
//! - Transports push [`lume_record::DiscoveryRecord`] announcements through
//!   a cloneable [`RegistryHandle`]
//! - The actor merges each announcement into the matching category store
//!   (dedup by identity, TTL renewal, explicit departure)
//! - Membership changes broadcast a [`ServiceUpdate`] carrying the full new
//!   set to every subscriber
//! - Queries sweep stale records first and fire an asynchronous scan
//!   trigger so transports refresh their view
//!
//! # Example
//!
//! ```rust,no_run
//! use lume_record::{DiscoveryRecord, ServiceKind};
//! use lume_registry::{start_registry, RegistryConfig};
//!
//! # async fn demo() -> Result<(), lume_registry::RegistryError> {
//! let registry = start_registry(RegistryConfig::default());
//! let mut updates = registry.subscribe();
//!
//! registry
//!     .announce(DiscoveryRecord::new(
//!         ServiceKind::BulbBridge,
//!         "10.0.0.5",
//!         80,
//!         "bridge1",
//!     ))
//!     .await?;
//!
//! let bridges = registry.services(ServiceKind::BulbBridge).await?;
//! # let _ = (updates.recv().await, bridges);
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod error;
pub mod events;
pub mod handle;
pub mod net;
pub mod registry;
pub mod serial;
pub mod store;

// Re-export actor types
pub use actor::{run_registry_actor, RegistryCommand};

// Re-export the consumer surface
pub use error::RegistryError;
pub use events::ServiceUpdate;
pub use handle::{start_registry, RegistryConfig, RegistryHandle};
pub use registry::Registry;
pub use serial::SerialAdapter;
pub use store::{MergeOutcome, ServiceStore};
