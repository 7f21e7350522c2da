//! DataScroller
//!
//! Wires the source adapter, load controller and scroll observer into one
//! component with a narrow command interface.
//!
//! # Lifecycle
//!
//! ```ignore
//! let config = ScrollerOptions::default().rows(20).validate()?;
//! let mut scroller = DataScroller::new(config, root, content)
//!     .with_item_template(|car: &Car| car.name.clone());
//!
//! scroller.reconfigure(Some(Source::from(cars)), LoadMode::Eager);
//! scroller.mount(&mut host)?;
//! // ... host dispatches scroll events, batches get appended ...
//! scroller.unmount(&mut host);
//! ```
//!
//! The scroll listener shares the load controller through an
//! `Rc<RefCell<_>>`; the scroller and the listener always see the same
//! cursor and buffer.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::config::ScrollerConfig;
use crate::controller::{LazyLoadEvent, LoadController, LoadMode, RenderSurface};
use crate::error::Result;
use crate::host::ScrollHost;
use crate::ids::NodeId;
use crate::scroll_observer::{ScrollBinding, ScrollObserver};
use crate::source::Source;
use crate::view::{ItemTemplate, ScrollerView};

pub struct DataScroller<T> {
    config: ScrollerConfig,
    controller: Rc<RefCell<LoadController<T>>>,
    observer: ScrollObserver,
    element: NodeId,
    content: NodeId,
    item_template: Option<ItemTemplate<T>>,
    mounted: bool,
}

impl<T: Clone + 'static> DataScroller<T> {
    /// Create a scroller rendered into `element`, with items listed under
    /// `content`.
    pub fn new(config: ScrollerConfig, element: NodeId, content: NodeId) -> Self {
        let controller = LoadController::new(config.rows, config.mode);
        let observer = ScrollObserver::new(config.buffer);
        Self {
            config,
            controller: Rc::new(RefCell::new(controller)),
            observer,
            element,
            content,
            item_template: None,
            mounted: false,
        }
    }

    /// Called with `{ rows, first }` on every lazy load.
    pub fn with_lazy_load(self, callback: impl FnMut(LazyLoadEvent) + 'static) -> Self {
        self.controller
            .borrow_mut()
            .set_on_lazy_load(Some(Box::new(callback)));
        self
    }

    /// Notified with the full buffer whenever it changes.
    pub fn with_surface(self, surface: impl RenderSurface<T> + 'static) -> Self {
        self.controller
            .borrow_mut()
            .set_surface(Some(Box::new(surface)));
        self
    }

    pub fn with_item_template(mut self, template: impl Fn(&T) -> String + 'static) -> Self {
        self.item_template = Some(Box::new(template));
        self
    }

    /// Bind the scroller to its host.
    ///
    /// Issues the initial load unless a reconfiguration already released the
    /// first batch, then binds the scroll listener unless loading is driven
    /// externally. Inline mode requires a scrollable ancestor of the content
    /// node; without one nothing is loaded or bound and an error is returned.
    pub fn mount<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: ScrollHost + ?Sized,
    {
        if self.mounted {
            return Ok(());
        }

        let target = if self.config.loader {
            None
        } else {
            Some(ScrollObserver::resolve_target(
                host,
                self.config.inline,
                self.content,
            )?)
        };

        if self.controller.borrow().cursor() == 0 {
            self.load();
        }

        if let Some(target) = target {
            self.observer.bind(host, target, &self.controller);
        }

        self.mounted = true;
        tracing::debug!(
            element = %self.element,
            inline = self.config.inline,
            "data scroller mounted"
        );
        Ok(())
    }

    /// Release the scroll listener. Must be called before the host tears
    /// down the surface.
    pub fn unmount<H>(&mut self, host: &mut H)
    where
        H: ScrollHost + ?Sized,
    {
        self.observer.unbind(host);
        if self.mounted {
            tracing::debug!(element = %self.element, "data scroller unmounted");
        }
        self.mounted = false;
    }

    /// Load the next batch.
    pub fn load(&mut self) {
        self.controller.borrow_mut().load();
    }

    /// Restart pagination from the first batch.
    pub fn reset(&mut self) {
        self.controller.borrow_mut().reset();
    }

    /// Bind a new source and/or switch modes.
    pub fn reconfigure(&mut self, source: Option<Source<T>>, mode: LoadMode) {
        self.controller.borrow_mut().reconfigure(source, mode);
        self.config.mode = self.controller.borrow().mode();
    }

    /// Toggle externally driven loading.
    ///
    /// Switching it on releases the scroll listener. Switching it off does
    /// not bind again; call [`rearm`](Self::rearm) for that.
    pub fn set_loader<H>(&mut self, host: &mut H, loader: bool)
    where
        H: ScrollHost + ?Sized,
    {
        if self.config.loader == loader {
            return;
        }
        self.config.loader = loader;
        if loader {
            self.observer.unbind(host);
        }
    }

    /// Bind the scroll listener again after leaving externally driven
    /// loading. Does nothing while unmounted, while `loader` is set, or when
    /// already bound.
    pub fn rearm<H>(&mut self, host: &mut H) -> Result<()>
    where
        H: ScrollHost + ?Sized,
    {
        if !self.mounted || self.config.loader || self.observer.is_bound() {
            return Ok(());
        }
        let target = ScrollObserver::resolve_target(host, self.config.inline, self.content)?;
        self.observer.bind(host, target, &self.controller);
        Ok(())
    }

    /// Root surface node.
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Content surface node.
    pub fn content(&self) -> NodeId {
        self.content
    }

    /// The render buffer.
    pub fn items(&self) -> Ref<'_, [T]> {
        Ref::map(self.controller.borrow(), |controller| controller.items())
    }

    pub fn cursor(&self) -> usize {
        self.controller.borrow().cursor()
    }

    pub fn mode(&self) -> LoadMode {
        self.controller.borrow().mode()
    }

    pub fn config(&self) -> &ScrollerConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_bound(&self) -> bool {
        self.observer.is_bound()
    }

    pub fn binding(&self) -> Option<ScrollBinding> {
        self.observer.binding()
    }

    /// Describe what the scroller currently shows.
    ///
    /// Items without a template are rendered with their `Debug` form.
    pub fn view(&self) -> ScrollerView
    where
        T: fmt::Debug,
    {
        let items = self.items();
        match &self.item_template {
            Some(template) => ScrollerView::build(&*items, &self.config, &**template),
            None => ScrollerView::build(&*items, &self.config, &|item: &T| format!("{item:?}")),
        }
    }
}

impl<T> Drop for DataScroller<T> {
    fn drop(&mut self) {
        if self.observer.is_bound() {
            tracing::warn!(
                element = %self.element,
                "data scroller dropped while bound; its listener is now inert"
            );
        }
    }
}

impl<T> fmt::Debug for DataScroller<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataScroller")
            .field("config", &self.config)
            .field("controller", &self.controller)
            .field("observer", &self.observer)
            .field("element", &self.element)
            .field("content", &self.content)
            .field("mounted", &self.mounted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrollerOptions;
    use crate::error::ScrollerError;
    use crate::host::{ScrollTarget, SimulatedHost};

    struct Fixture {
        host: SimulatedHost,
        root: NodeId,
        content: NodeId,
    }

    fn page() -> Fixture {
        let mut host = SimulatedHost::new();
        host.set_viewport_height(200.0);
        host.set_document_height(1000.0);
        let root = host.add_node(None);
        let content = host.add_node(Some(root));
        Fixture { host, root, content }
    }

    fn scroller(fx: &Fixture, options: ScrollerOptions) -> DataScroller<i32> {
        DataScroller::new(options.validate().unwrap(), fx.root, fx.content)
    }

    #[test]
    fn reconfigure_then_mount_loads_first_batch_once() {
        let mut fx = page();
        let mut scroller = scroller(&fx, ScrollerOptions::default().rows(2));
        scroller.reconfigure(Some(Source::from(vec![1, 2, 3, 4, 5])), LoadMode::Eager);
        scroller.mount(&mut fx.host).unwrap();

        assert_eq!(&*scroller.items(), &[1, 2]);
        assert!(scroller.is_bound());
        scroller.unmount(&mut fx.host);
    }

    #[test]
    fn mount_then_reconfigure_loads_first_batch() {
        let mut fx = page();
        let mut scroller = scroller(&fx, ScrollerOptions::default().rows(2));
        scroller.mount(&mut fx.host).unwrap();
        assert!(scroller.items().is_empty());

        scroller.reconfigure(Some(Source::from(vec![1, 2, 3])), LoadMode::Eager);
        assert_eq!(&*scroller.items(), &[1, 2]);
        scroller.unmount(&mut fx.host);
    }

    #[test]
    fn unmount_removes_the_window_listener() {
        let mut fx = page();
        let mut scroller = scroller(&fx, ScrollerOptions::default().rows(2));
        scroller.mount(&mut fx.host).unwrap();
        assert_eq!(fx.host.listener_count(ScrollTarget::Window), 1);

        scroller.unmount(&mut fx.host);
        assert_eq!(fx.host.listener_count(ScrollTarget::Window), 0);
        assert!(!scroller.is_mounted());
    }

    #[test]
    fn mounting_twice_binds_once() {
        let mut fx = page();
        let mut scroller = scroller(&fx, ScrollerOptions::default().rows(2));
        scroller.mount(&mut fx.host).unwrap();
        scroller.mount(&mut fx.host).unwrap();
        assert_eq!(fx.host.listener_count(ScrollTarget::Window), 1);
        scroller.unmount(&mut fx.host);
    }

    #[test]
    fn loader_mode_never_binds() {
        let mut fx = page();
        let mut scroller = scroller(&fx, ScrollerOptions::default().rows(2).loader(true));
        scroller.reconfigure(Some(Source::from(vec![1, 2, 3])), LoadMode::Eager);
        scroller.mount(&mut fx.host).unwrap();

        assert!(!scroller.is_bound());
        fx.host.scroll_to_bottom(ScrollTarget::Window);
        assert_eq!(&*scroller.items(), &[1, 2]);

        scroller.load();
        assert_eq!(&*scroller.items(), &[1, 2, 3]);
    }

    #[test]
    fn entering_loader_mode_unbinds_and_leaving_does_not_rebind() {
        let mut fx = page();
        let mut scroller = scroller(&fx, ScrollerOptions::default().rows(2));
        scroller.mount(&mut fx.host).unwrap();

        scroller.set_loader(&mut fx.host, true);
        assert!(!scroller.is_bound());
        assert_eq!(fx.host.listener_count(ScrollTarget::Window), 0);

        scroller.set_loader(&mut fx.host, false);
        assert!(!scroller.is_bound());

        scroller.rearm(&mut fx.host).unwrap();
        assert!(scroller.is_bound());
        assert_eq!(fx.host.listener_count(ScrollTarget::Window), 1);
        scroller.unmount(&mut fx.host);
    }

    #[test]
    fn inline_without_scrollable_ancestor_fails_to_mount() {
        let mut fx = page();
        let mut scroller = scroller(&fx, ScrollerOptions::default().rows(2).inline(true));
        scroller.reconfigure(Some(Source::from(vec![1, 2, 3])), LoadMode::Eager);

        let err = scroller.mount(&mut fx.host).unwrap_err();
        assert!(matches!(err, ScrollerError::NoScrollableAncestor(id) if id == fx.content));
        assert!(!scroller.is_mounted());
        assert_eq!(fx.host.listener_count(ScrollTarget::Window), 0);
    }

    #[test]
    fn view_uses_template_or_debug() {
        let fx = page();
        let mut plain = scroller(&fx, ScrollerOptions::default().rows(2));
        plain.reconfigure(Some(Source::from(vec![7, 8])), LoadMode::Eager);
        assert_eq!(plain.view().lines(), vec!["7", "8"]);

        let mut templated = scroller(&fx, ScrollerOptions::default().rows(2))
            .with_item_template(|i| format!("item {i}"));
        templated.reconfigure(Some(Source::from(vec![7])), LoadMode::Eager);
        assert_eq!(templated.view().lines(), vec!["item 7"]);
    }
}
