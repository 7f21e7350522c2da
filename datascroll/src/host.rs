//! Scroll Host
//!
//! The environment the scroller lives in: a tree of surface nodes, some of
//! which scroll, inside a window that scrolls as a whole. The scroller only
//! talks to it through [`ScrollHost`], which lets it attach and detach a
//! scroll listener and discover scrollable ancestors.
//!
//! [`SimulatedHost`] is a complete in-memory host. It keeps node geometry,
//! window geometry, and the listener registry, and dispatches scroll events
//! when told to scroll.

use std::collections::HashMap;
use std::fmt;

use crate::ids::{ListenerId, NodeId};

/// What a scroll listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// The page as a whole.
    Window,
    /// A specific scrollable container.
    Container(NodeId),
}

/// Geometry observed at the moment a scroll event fires.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top.
    pub scroll_top: f64,
    /// Total scrollable content height.
    pub scroll_height: f64,
    /// Height of the visible area.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub const fn new(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            viewport_height,
        }
    }
}

/// A registered scroll callback.
pub type ScrollListener = Box<dyn FnMut(&ScrollMetrics)>;

/// The scroll-related surface of a rendering host.
pub trait ScrollHost {
    /// Attach a listener to a target. The returned ID detaches it again.
    fn add_scroll_listener(&mut self, target: ScrollTarget, listener: ScrollListener) -> ListenerId;

    /// Detach the listener `id` from `target`.
    ///
    /// Returns `false` if no such listener is attached to that target.
    fn remove_scroll_listener(&mut self, target: ScrollTarget, id: ListenerId) -> bool;

    /// Scrollable ancestors of `node`, nearest first. `node` itself is not
    /// included.
    fn scrollable_parents(&self, node: NodeId) -> Vec<NodeId>;
}

/// Window and document geometry as a browser page reports it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowMetrics {
    pub page_y_offset: f64,
    pub client_height: f64,
    pub body_scroll_height: f64,
    pub body_offset_height: f64,
    pub document_scroll_height: f64,
    pub document_offset_height: f64,
}

impl WindowMetrics {
    /// Document height: the largest of the body and document heights and the
    /// window height.
    pub fn document_height(&self) -> f64 {
        [
            self.body_scroll_height,
            self.body_offset_height,
            self.client_height,
            self.document_scroll_height,
            self.document_offset_height,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.page_y_offset, self.document_height(), self.client_height)
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    parent: Option<NodeId>,
    scrollable: bool,
    scroll_top: f64,
    scroll_height: f64,
    client_height: f64,
}

struct Registration {
    target: ScrollTarget,
    id: ListenerId,
    listener: ScrollListener,
}

/// In-memory scroll host.
#[derive(Default)]
pub struct SimulatedHost {
    nodes: HashMap<NodeId, Node>,
    window: WindowMetrics,
    listeners: Vec<Registration>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain (non-scrolling) node.
    pub fn add_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(
            id,
            Node {
                parent,
                ..Node::default()
            },
        );
        id
    }

    /// Add a scrollable container with the given content and viewport heights.
    pub fn add_scrollable(
        &mut self,
        parent: Option<NodeId>,
        scroll_height: f64,
        client_height: f64,
    ) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(
            id,
            Node {
                parent,
                scrollable: true,
                scroll_top: 0.0,
                scroll_height,
                client_height,
            },
        );
        id
    }

    /// Update a container's content height (e.g. after more items rendered).
    pub fn set_scroll_height(&mut self, node: NodeId, scroll_height: f64) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.scroll_height = scroll_height;
        }
    }

    /// Set both the body and document scroll heights.
    pub fn set_document_height(&mut self, height: f64) {
        self.window.body_scroll_height = height;
        self.window.document_scroll_height = height;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.window.client_height = height;
    }

    /// Current geometry of a target, if it exists.
    pub fn metrics(&self, target: ScrollTarget) -> Option<ScrollMetrics> {
        match target {
            ScrollTarget::Window => Some(self.window.scroll_metrics()),
            ScrollTarget::Container(id) => self.nodes.get(&id).map(|node| {
                ScrollMetrics::new(node.scroll_top, node.scroll_height, node.client_height)
            }),
        }
    }

    /// Scroll a target to `top` and fire its listeners.
    ///
    /// The position is clamped to the scrollable range. Returns how many
    /// listeners were notified.
    pub fn scroll_to(&mut self, target: ScrollTarget, top: f64) -> usize {
        let metrics = match target {
            ScrollTarget::Window => {
                let max = (self.window.document_height() - self.window.client_height).max(0.0);
                self.window.page_y_offset = top.clamp(0.0, max);
                self.window.scroll_metrics()
            }
            ScrollTarget::Container(id) => {
                let Some(node) = self.nodes.get_mut(&id) else {
                    return 0;
                };
                let max = (node.scroll_height - node.client_height).max(0.0);
                node.scroll_top = top.clamp(0.0, max);
                ScrollMetrics::new(node.scroll_top, node.scroll_height, node.client_height)
            }
        };
        self.dispatch(target, &metrics)
    }

    /// Scroll a target all the way down.
    pub fn scroll_to_bottom(&mut self, target: ScrollTarget) -> usize {
        self.scroll_to(target, f64::MAX)
    }

    /// Number of listeners attached to `target`.
    pub fn listener_count(&self, target: ScrollTarget) -> usize {
        self.listeners.iter().filter(|r| r.target == target).count()
    }

    fn dispatch(&mut self, target: ScrollTarget, metrics: &ScrollMetrics) -> usize {
        let mut fired = 0;
        for registration in self.listeners.iter_mut().filter(|r| r.target == target) {
            (registration.listener)(metrics);
            fired += 1;
        }
        fired
    }
}

impl ScrollHost for SimulatedHost {
    fn add_scroll_listener(
        &mut self,
        target: ScrollTarget,
        listener: ScrollListener,
    ) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.push(Registration {
            target,
            id,
            listener,
        });
        id
    }

    fn remove_scroll_listener(&mut self, target: ScrollTarget, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|r| !(r.target == target && r.id == id));
        self.listeners.len() != before
    }

    fn scrollable_parents(&self, node: NodeId) -> Vec<NodeId> {
        let mut parents = Vec::new();
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            let Some(parent) = self.nodes.get(&id) else {
                break;
            };
            if parent.scrollable {
                parents.push(id);
            }
            current = parent.parent;
        }
        parents
    }
}

impl fmt::Debug for SimulatedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedHost")
            .field("nodes", &self.nodes.len())
            .field("window", &self.window)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
