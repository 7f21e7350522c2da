//! Datascroll demo - scrolls a simulated page and logs each batch.
//!
//! Usage: `datascroll-demo [options.json]`
//!
//! The options file uses the same camelCase keys as `ScrollerOptions`
//! (`rows`, `lazy`, `inline`, `buffer`, `loader`, `header`, ...). Set
//! `RUST_LOG=datascroll=debug` to watch binds, loads and lazy requests.

use std::sync::mpsc;

use anyhow::{Context, Result};
use datascroll::{
    DataScroller, LazyLoadEvent, LoadMode, NodeId, ScrollTarget, ScrollerConfig,
    ScrollerOptions, SimulatedHost, Source,
};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Rendered height of one row on the simulated page.
const ROW_HEIGHT: f64 = 40.0;
const VIEWPORT_HEIGHT: f64 = 320.0;
const CATALOG_SIZE: usize = 57;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading options from {path}"))?;
            ScrollerOptions::from_json_str(&json)?
        }
        None => ScrollerOptions::default()
            .rows(10)
            .header("Catalog")
            .footer("End of catalog"),
    };
    let config = options.validate()?;

    tracing::info!(
        rows = config.rows.get(),
        mode = ?config.mode,
        inline = config.inline,
        "starting datascroll demo"
    );

    let loaded = match config.mode {
        LoadMode::Eager => run_eager(config)?,
        LoadMode::Lazy => run_lazy(config)?,
    };

    for line in loaded {
        println!("{line}");
    }
    Ok(())
}

fn catalog() -> Vec<Value> {
    (0..CATALOG_SIZE)
        .map(|i| json!({ "id": i, "name": format!("item-{i:03}") }))
        .collect()
}

fn render_item(item: &Value) -> String {
    match (item.get("id"), item.get("name").and_then(Value::as_str)) {
        (Some(id), Some(name)) => format!("{id:>4}  {name}"),
        _ => item.to_string(),
    }
}

/// Page (or inline container) that grows as rows are rendered.
struct Page {
    host: SimulatedHost,
    target: ScrollTarget,
}

impl Page {
    fn new(inline: bool) -> (Self, NodeId, NodeId) {
        let mut host = SimulatedHost::new();
        host.set_viewport_height(VIEWPORT_HEIGHT);

        let (parent, target) = if inline {
            let panel = host.add_scrollable(None, 0.0, VIEWPORT_HEIGHT);
            (Some(panel), ScrollTarget::Container(panel))
        } else {
            (None, ScrollTarget::Window)
        };
        let root = host.add_node(parent);
        let content = host.add_node(Some(root));
        (Self { host, target }, root, content)
    }

    fn fit(&mut self, rows: usize) {
        let height = rows as f64 * ROW_HEIGHT;
        match self.target {
            ScrollTarget::Window => self.host.set_document_height(height),
            ScrollTarget::Container(panel) => self.host.set_scroll_height(panel, height),
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.host.scroll_to_bottom(self.target);
    }
}

fn run_eager(config: ScrollerConfig) -> Result<Vec<String>> {
    let loader = config.loader;
    let (mut page, root, content) = Page::new(config.inline);
    let mut scroller = DataScroller::new(config, root, content).with_item_template(render_item);

    scroller.reconfigure(Some(Source::from(catalog())), LoadMode::Eager);
    scroller.mount(&mut page.host)?;

    let mut previous = 0;
    loop {
        let shown = scroller.items().len();
        if shown == previous && previous != 0 {
            break;
        }
        tracing::info!(shown, cursor = scroller.cursor(), "batch visible");
        previous = shown;

        page.fit(shown);
        if loader {
            scroller.load();
        } else {
            page.scroll_to_bottom();
        }
    }

    scroller.unmount(&mut page.host);
    Ok(scroller.view().lines())
}

fn run_lazy(config: ScrollerConfig) -> Result<Vec<String>> {
    let loader = config.loader;
    let (mut page, root, content) = Page::new(config.inline);
    let (tx, rx) = mpsc::channel::<LazyLoadEvent>();

    let mut scroller = DataScroller::new(config, root, content)
        .with_item_template(render_item)
        .with_lazy_load(move |event| {
            if tx.send(event).is_err() {
                tracing::warn!(first = event.first, "lazy request dropped");
            }
        });

    let remote = catalog();
    let mut fetched: Vec<Value> = Vec::new();
    scroller.mount(&mut page.host)?;

    loop {
        let requests: Vec<LazyLoadEvent> = rx.try_iter().collect();
        let Some(request) = requests.last().copied() else {
            break;
        };
        if requests.len() > 1 {
            tracing::debug!(skipped = requests.len() - 1, "coalesced overlapping requests");
        }

        let end = (request.first + request.rows).min(remote.len());
        if request.first >= end {
            tracing::info!(first = request.first, "remote exhausted");
            break;
        }
        fetched.extend_from_slice(&remote[request.first..end]);
        tracing::info!(first = request.first, fetched = fetched.len(), "page fetched");

        scroller.reconfigure(Some(Source::from(fetched.clone())), LoadMode::Lazy);
        page.fit(fetched.len());
        if loader {
            scroller.load();
        } else {
            page.scroll_to_bottom();
        }
    }

    scroller.unmount(&mut page.host);
    Ok(scroller.view().lines())
}
