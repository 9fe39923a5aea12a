//! Change notifications published by the registry
//!
//! Every membership-changing merge or expiry sweep emits one update
//! carrying the category's full new record set. Updates are delivered in
//! mutation order; a consumer that missed earlier updates is made whole by
//! the next one, since each carries the complete current set.

use lume_record::{DiscoveryRecord, ServiceKind};
use serde::{Deserialize, Serialize};

/// The record set for one category changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUpdate {
    /// Category whose membership changed
    pub kind: ServiceKind,
    /// Full current record set for that category, in store order
    pub services: Vec<DiscoveryRecord>,
}
