//! Scroll Observer
//!
//! Keeps at most one scroll listener bound to either the page or the nearest
//! scrollable container, and triggers a load whenever the viewport nears the
//! end of the loaded content.

use std::cell::RefCell;
use std::rc::Rc;

use crate::controller::LoadController;
use crate::error::{Result, ScrollerError};
use crate::host::{ScrollHost, ScrollListener, ScrollMetrics, ScrollTarget};
use crate::ids::{ListenerId, NodeId};

/// Whether a scroll position has crossed the load threshold.
///
/// Loads once `scroll_top >= scroll_height * buffer - viewport_height`, i.e.
/// once the bottom of the viewport reaches `buffer` of the scrollable height.
pub fn should_load(metrics: &ScrollMetrics, buffer: f64) -> bool {
    metrics.scroll_top >= threshold(metrics, buffer)
}

/// How far towards the load threshold the viewport has travelled.
///
/// `1.0` or more means a load is due. Content too short to need scrolling
/// reports `f64::INFINITY`.
pub fn fill_ratio(metrics: &ScrollMetrics, buffer: f64) -> f64 {
    let threshold = threshold(metrics, buffer);
    if threshold <= 0.0 {
        return f64::INFINITY;
    }
    metrics.scroll_top / threshold
}

fn threshold(metrics: &ScrollMetrics, buffer: f64) -> f64 {
    metrics.scroll_height * buffer - metrics.viewport_height
}

/// An active listener and the exact target it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollBinding {
    pub target: ScrollTarget,
    pub listener: ListenerId,
}

#[derive(Debug)]
pub struct ScrollObserver {
    buffer: f64,
    binding: Option<ScrollBinding>,
}

impl ScrollObserver {
    pub fn new(buffer: f64) -> Self {
        Self {
            buffer,
            binding: None,
        }
    }

    pub fn binding(&self) -> Option<ScrollBinding> {
        self.binding
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Pick the binding target.
    ///
    /// Inline scrollers attach to the nearest scrollable ancestor of
    /// `content`; anything else attaches to the window. Inline mode without
    /// such an ancestor is an error.
    pub fn resolve_target<H>(host: &H, inline: bool, content: NodeId) -> Result<ScrollTarget>
    where
        H: ScrollHost + ?Sized,
    {
        if !inline {
            return Ok(ScrollTarget::Window);
        }
        host.scrollable_parents(content)
            .first()
            .copied()
            .map(ScrollTarget::Container)
            .ok_or(ScrollerError::NoScrollableAncestor(content))
    }

    /// Attach a listener that loads through `controller` when the threshold
    /// is crossed.
    ///
    /// Any previous binding is released first. The listener only holds a weak
    /// reference; once the controller is gone it ignores scroll events.
    pub fn bind<T, H>(
        &mut self,
        host: &mut H,
        target: ScrollTarget,
        controller: &Rc<RefCell<LoadController<T>>>,
    ) -> ScrollBinding
    where
        T: Clone + 'static,
        H: ScrollHost + ?Sized,
    {
        self.unbind(host);

        let controller = Rc::downgrade(controller);
        let buffer = self.buffer;
        let listener: ScrollListener = Box::new(move |metrics: &ScrollMetrics| {
            let Some(controller) = controller.upgrade() else {
                return;
            };
            tracing::trace!(
                scroll_top = metrics.scroll_top,
                fill = fill_ratio(metrics, buffer),
                "scroll"
            );
            if should_load(metrics, buffer) {
                controller.borrow_mut().load();
            }
        });

        let binding = ScrollBinding {
            target,
            listener: host.add_scroll_listener(target, listener),
        };
        tracing::debug!(scroll_target = ?target, "scroll listener bound");
        self.binding = Some(binding);
        binding
    }

    /// Detach the active listener from the target it was attached to.
    ///
    /// Returns `false` when nothing was bound.
    pub fn unbind<H>(&mut self, host: &mut H) -> bool
    where
        H: ScrollHost + ?Sized,
    {
        let Some(binding) = self.binding.take() else {
            return false;
        };
        let removed = host.remove_scroll_listener(binding.target, binding.listener);
        if !removed {
            tracing::warn!(scroll_target = ?binding.target, "scroll listener was already gone");
        }
        tracing::debug!(scroll_target = ?binding.target, "scroll listener unbound");
        true
    }
}
