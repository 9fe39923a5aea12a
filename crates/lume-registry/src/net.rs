//! Local interface enumeration for the self-announcement guard
//!
//! Multicast announcements loop back: the host hears its own services.
//! The registry filters those out by comparing announced addresses against
//! the set of addresses bound to local interfaces.

use std::net::IpAddr;

use tracing::warn;

/// Addresses currently bound to local network interfaces
///
/// Enumeration failure degrades to an empty set: the registry then cannot
/// suppress its own echo, which is survivable; discovery keeps working.
pub fn local_interface_addrs() -> Vec<IpAddr> {
    match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces.into_iter().map(|i| i.addr.ip()).collect(),
        Err(e) => {
            warn!("Failed to enumerate local interfaces: {}", e);
            Vec::new()
        }
    }
}
