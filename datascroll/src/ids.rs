//! Surface Identifiers
//!
//! Handles for nodes in the host's surface tree and for registered scroll
//! listeners. The data scroller never owns the nodes it points at; the host
//! resolves these ids when measuring, walking parents, or dispatching scroll
//! events.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Counter for generating unique listener IDs.
static LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies a node on the rendering surface.
///
/// A node is anything the scroller may need to address on the host side:
/// its root element, its content element, or a scrollable container that
/// encloses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new unique node ID.
    pub fn new() -> Self {
        Self(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Identifies one registered scroll listener on a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

impl ListenerId {
    /// Allocate a fresh listener ID.
    pub fn new() -> Self {
        Self(LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}
