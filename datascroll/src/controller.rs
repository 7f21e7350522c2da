//! Load Controller
//!
//! Owns the cursor and the render buffer. Each `load()` either reveals the
//! next batch of a resident sequence (eager mode) or asks the caller to fetch
//! the next page (lazy mode).
//!
//! The controller is shared with the scroll listener through an
//! `Rc<RefCell<_>>`, so the listener always observes the current cursor and
//! batch state no matter how often it is rebound.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::source::Source;

/// How batches are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// The whole dataset is resident; loading reveals more of it.
    #[default]
    Eager,
    /// The caller fetches pages on demand.
    Lazy,
}

impl LoadMode {
    pub fn from_lazy(lazy: bool) -> Self {
        if lazy { LoadMode::Lazy } else { LoadMode::Eager }
    }

    pub fn is_lazy(self) -> bool {
        matches!(self, LoadMode::Lazy)
    }
}

/// Page request handed to the lazy-load callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LazyLoadEvent {
    /// Batch size.
    pub rows: usize,
    /// Offset of the first requested item.
    pub first: usize,
}

/// Callback invoked once per lazy load.
///
/// It runs while the controller is borrowed, so it must not call back into
/// the scroller synchronously. Queue the request (a channel works well) and
/// deliver fetched pages through `reconfigure` afterwards.
pub type LazyLoadCallback = Box<dyn FnMut(LazyLoadEvent)>;

/// Receives the render buffer every time it changes.
pub trait RenderSurface<T> {
    fn publish(&mut self, items: &[T]);
}

impl<T, F> RenderSurface<T> for F
where
    F: FnMut(&[T]),
{
    fn publish(&mut self, items: &[T]) {
        self(items)
    }
}

pub struct LoadController<T> {
    rows: NonZeroUsize,
    mode: LoadMode,
    /// Items released (eager) or rows requested (lazy) so far.
    cursor: usize,
    sequence: Arc<[T]>,
    buffer: Vec<T>,
    on_lazy_load: Option<LazyLoadCallback>,
    surface: Option<Box<dyn RenderSurface<T>>>,
}

impl<T: Clone> LoadController<T> {
    pub fn new(rows: NonZeroUsize, mode: LoadMode) -> Self {
        Self {
            rows,
            mode,
            cursor: 0,
            sequence: Arc::from(Vec::<T>::new()),
            buffer: Vec::new(),
            on_lazy_load: None,
            surface: None,
        }
    }

    pub fn set_on_lazy_load(&mut self, callback: Option<LazyLoadCallback>) {
        self.on_lazy_load = callback;
    }

    pub fn set_surface(&mut self, surface: Option<Box<dyn RenderSurface<T>>>) {
        self.surface = surface;
    }

    pub fn rows(&self) -> usize {
        self.rows.get()
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The render buffer.
    pub fn items(&self) -> &[T] {
        &self.buffer
    }

    /// Load the next batch.
    ///
    /// Lazy: notify the callback (if any) with the current offset, then
    /// advance the cursor by one batch. Nothing is appended here; fetched
    /// pages arrive through [`reconfigure`](Self::reconfigure).
    ///
    /// Eager: append the in-range part of `[cursor, cursor + rows)` and
    /// publish. The cursor advances whenever the sequence is non-empty, even
    /// when the batch is past the end.
    pub fn load(&mut self) {
        let rows = self.rows.get();
        match self.mode {
            LoadMode::Lazy => {
                let event = LazyLoadEvent {
                    rows,
                    first: self.cursor,
                };
                if let Some(callback) = self.on_lazy_load.as_mut() {
                    tracing::debug!(rows, first = event.first, "requesting lazy page");
                    callback(event);
                }
                self.cursor = self.cursor.saturating_add(rows);
            }
            LoadMode::Eager => {
                let len = self.sequence.len();
                let start = self.cursor.min(len);
                let end = self.cursor.saturating_add(rows).min(len);
                self.buffer.extend_from_slice(&self.sequence[start..end]);

                if len != 0 {
                    self.cursor = self.cursor.saturating_add(rows);
                }

                tracing::debug!(
                    released = end - start,
                    buffered = self.buffer.len(),
                    total = len,
                    "loaded batch"
                );
                self.publish();
            }
        }
    }

    /// Restart pagination: empty the buffer, publish it, then load the first
    /// batch again.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.buffer.clear();
        self.publish();
        self.load();
    }

    /// Adopt a new source and mode.
    ///
    /// An absent or empty source leaves everything as it was, mode included.
    /// Eager mode restarts from the first batch. Lazy mode shows the whole
    /// source as-is and keeps the cursor, since the caller grows the source
    /// page by page.
    pub fn reconfigure(&mut self, source: Option<Source<T>>, mode: LoadMode) {
        let Some(source) = source.filter(|source| !source.is_empty()) else {
            tracing::debug!(?mode, "reconfigure without a source; keeping current state");
            return;
        };

        self.sequence = source.normalize();
        self.mode = mode;

        match mode {
            LoadMode::Eager => {
                self.cursor = 0;
                self.buffer.clear();
                self.load();
            }
            LoadMode::Lazy => {
                self.buffer = self.sequence.to_vec();
                self.publish();
            }
        }
    }

    fn publish(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.publish(&self.buffer);
        }
    }
}

impl<T> fmt::Debug for LoadController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadController")
            .field("rows", &self.rows)
            .field("mode", &self.mode)
            .field("cursor", &self.cursor)
            .field("sequence_len", &self.sequence.len())
            .field("buffered", &self.buffer.len())
            .field("has_lazy_load", &self.on_lazy_load.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rows(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn eager(items: Vec<i32>, batch: usize) -> LoadController<i32> {
        let mut controller = LoadController::new(rows(batch), LoadMode::Eager);
        controller.reconfigure(Some(Source::from(items)), LoadMode::Eager);
        controller
    }

    #[test]
    fn eager_batches_until_exhausted() {
        let mut controller = eager(vec![1, 2, 3, 4, 5], 2);
        assert_eq!(controller.items(), &[1, 2]);

        controller.load();
        assert_eq!(controller.items(), &[1, 2, 3, 4]);

        controller.load();
        assert_eq!(controller.items(), &[1, 2, 3, 4, 5]);

        controller.load();
        assert_eq!(controller.items(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn cursor_advances_past_the_end() {
        let mut controller = eager(vec![1, 2, 3], 2);
        controller.load();
        controller.load();
        assert_eq!(controller.cursor(), 6);
        assert_eq!(controller.items(), &[1, 2, 3]);
    }

    #[test]
    fn empty_sequence_does_not_advance() {
        let mut controller = LoadController::<i32>::new(rows(3), LoadMode::Eager);
        controller.load();
        controller.load();
        assert_eq!(controller.cursor(), 0);
        assert!(controller.items().is_empty());
    }

    #[test]
    fn lazy_load_reports_offsets_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut controller = LoadController::<i32>::new(rows(10), LoadMode::Lazy);
        controller.set_on_lazy_load(Some(Box::new(move |event: LazyLoadEvent| {
            sink.borrow_mut().push(event.first);
        })));

        controller.load();
        controller.load();
        controller.load();

        assert_eq!(*seen.borrow(), vec![0, 10, 20]);
        assert_eq!(controller.cursor(), 30);
    }

    #[test]
    fn lazy_load_without_callback_still_advances() {
        let mut controller = LoadController::<i32>::new(rows(4), LoadMode::Lazy);
        controller.load();
        assert_eq!(controller.cursor(), 4);
        assert!(controller.items().is_empty());
    }

    #[test]
    fn lazy_reconfigure_shows_whole_source_and_keeps_cursor() {
        let mut controller = LoadController::new(rows(2), LoadMode::Lazy);
        controller.load();
        controller.reconfigure(Some(Source::from(vec![1, 2, 3])), LoadMode::Lazy);
        assert_eq!(controller.items(), &[1, 2, 3]);
        assert_eq!(controller.cursor(), 2);
    }

    #[test]
    fn absent_or_empty_source_is_a_no_op() {
        let mut controller = eager(vec![1, 2, 3], 2);
        controller.reconfigure(None, LoadMode::Lazy);
        controller.reconfigure(Some(Source::from(Vec::new())), LoadMode::Lazy);
        assert_eq!(controller.mode(), LoadMode::Eager);
        assert_eq!(controller.items(), &[1, 2]);
        assert_eq!(controller.cursor(), 2);
    }

    #[test]
    fn reset_matches_a_single_fresh_load() {
        let mut controller = eager(vec![1, 2, 3, 4, 5], 2);
        controller.load();
        controller.load();
        controller.reset();
        assert_eq!(controller.items(), &[1, 2]);
        assert_eq!(controller.cursor(), 2);
    }

    #[test]
    fn reset_publishes_empty_buffer_before_reloading() {
        let published = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&published);

        let mut controller = eager(vec![1, 2, 3], 2);
        controller.set_surface(Some(Box::new(move |items: &[i32]| {
            sink.borrow_mut().push(items.to_vec());
        })));
        controller.reset();

        assert_eq!(*published.borrow(), vec![vec![], vec![1, 2]]);
    }

    #[test]
    fn mode_switches_never_panic() {
        let mut controller = LoadController::new(rows(2), LoadMode::Lazy);
        controller.reconfigure(Some(Source::from(vec![1, 2, 3])), LoadMode::Eager);
        assert_eq!(controller.items(), &[1, 2]);

        controller.reconfigure(Some(Source::from(vec![4, 5])), LoadMode::Lazy);
        assert_eq!(controller.items(), &[4, 5]);

        controller.reconfigure(Some(Source::from(vec![6])), LoadMode::Eager);
        assert_eq!(controller.items(), &[6]);
        assert_eq!(controller.cursor(), 2);
    }
}
