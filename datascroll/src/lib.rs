//! Datascroll: incrementally loading list controller.
//!
//! A data scroller shows a list that grows as the user scrolls. It binds to
//! either a resident collection (eager mode, batches are revealed from it) or
//! to a caller-driven fetch (lazy mode, pages are requested through a
//! callback), and watches either the page or its nearest scrollable container
//! to decide when the next batch is due.
//!
//! # Architecture
//!
//! - `source`: normalizes sequences, ordered maps and records into one
//!   ordered sequence.
//! - `controller`: owns the cursor and the render buffer; `load`, `reset`,
//!   `reconfigure`.
//! - `scroll_observer`: keeps at most one scroll listener bound and applies
//!   the load threshold.
//! - `host`: the `ScrollHost` seam to the rendering environment, plus an
//!   in-memory `SimulatedHost`.
//! - `scroller`: the `DataScroller` component tying it all together.
//!
//! # Usage
//!
//! ```ignore
//! use datascroll::{DataScroller, LoadMode, ScrollerOptions, SimulatedHost, Source};
//!
//! let mut host = SimulatedHost::new();
//! let root = host.add_node(None);
//! let content = host.add_node(Some(root));
//!
//! let config = ScrollerOptions::default().rows(10).validate()?;
//! let mut scroller = DataScroller::new(config, root, content);
//! scroller.reconfigure(Some(Source::from(items)), LoadMode::Eager);
//! scroller.mount(&mut host)?;
//! ```

// Collections and ids
pub mod ids;
pub mod source;

// Loading
pub mod controller;
pub mod scroll_observer;

// Environment
pub mod host;

// Component
pub mod config;
pub mod scroller;
pub mod view;

mod error;

pub use config::{ScrollerConfig, ScrollerOptions, DEFAULT_BUFFER};
pub use controller::{LazyLoadCallback, LazyLoadEvent, LoadController, LoadMode, RenderSurface};
pub use error::{Result, ScrollerError};
pub use host::{
    ScrollHost, ScrollListener, ScrollMetrics, ScrollTarget, SimulatedHost, WindowMetrics,
};
pub use ids::{ListenerId, NodeId};
pub use scroll_observer::{fill_ratio, should_load, ScrollBinding, ScrollObserver};
pub use scroller::DataScroller;
pub use source::{normalize, Source};
pub use view::{ItemTemplate, ScrollerView, ViewRow, DEFAULT_EMPTY_MESSAGE};
