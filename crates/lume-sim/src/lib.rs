//! Simulated Discovery Transport
//!
//! This crate provides a scripted stand-in for a real discovery transport
//! (an mDNS listener, a cloud poller), for exercising the registry without
//! real peers on the network. It honors the exact transport contract:
//! listen for scan triggers, answer with announcements, never respond
//! through the trigger channel itself.
//!
//! # Example
//!
//! ```rust,no_run
//! use lume_record::ServiceKind;
//! use lume_registry::{start_registry, RegistryConfig};
//! use lume_sim::{run_sim_transport, SimPeer, SimTransport};
//!
//! # async fn demo() {
//! let registry = start_registry(RegistryConfig::default());
//!
//! let transport = SimTransport::with_peers(vec![SimPeer::new(
//!     ServiceKind::BulbBridge,
//!     "10.0.0.5",
//!     80,
//!     "bridge1",
//! )]);
//!
//! tokio::spawn(run_sim_transport(registry.clone(), transport));
//! # }
//! ```

pub mod transport;

pub use transport::{run_sim_transport, SimPeer, SimTransport, SimTransportConfig};
