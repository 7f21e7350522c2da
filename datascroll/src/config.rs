//! Scroller options.
//!
//! `ScrollerOptions` is the loose, deserializable form (every field
//! optional, camelCase keys). `validate` turns it into a `ScrollerConfig`
//! whose invariants the rest of the crate relies on.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::controller::LoadMode;
use crate::error::{Result, ScrollerError};

/// Default load threshold: start loading when the viewport reaches 90% of
/// the scrollable height.
pub const DEFAULT_BUFFER: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollerOptions {
    /// Batch size. Must be at least 1.
    pub rows: usize,
    /// Fetch pages through the lazy-load callback instead of slicing a
    /// resident collection.
    pub lazy: bool,
    /// Observe the nearest scrollable container instead of the window.
    pub inline: bool,
    /// Fraction of the scrollable height, in (0, 1], at which to load.
    pub buffer: f64,
    /// Loading is driven externally; never bind a scroll listener.
    pub loader: bool,
    pub header: Option<String>,
    pub footer: Option<String>,
    /// Shown instead of items when nothing is loaded.
    pub empty_message: Option<String>,
    /// Maximum height of the content area (e.g. `"500px"`).
    pub scroll_height: Option<String>,
}

impl Default for ScrollerOptions {
    fn default() -> Self {
        Self {
            rows: 0,
            lazy: false,
            inline: false,
            buffer: DEFAULT_BUFFER,
            loader: false,
            header: None,
            footer: None,
            empty_message: None,
            scroll_height: None,
        }
    }
}

impl ScrollerOptions {
    /// Parse options from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    pub fn buffer(mut self, buffer: f64) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn loader(mut self, loader: bool) -> Self {
        self.loader = loader;
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = Some(message.into());
        self
    }

    /// Maximum height of the content area, as a CSS length.
    pub fn scroll_height(mut self, height: impl Into<String>) -> Self {
        self.scroll_height = Some(height.into());
        self
    }

    /// Check the options and produce a config.
    pub fn validate(self) -> Result<ScrollerConfig> {
        let rows = NonZeroUsize::new(self.rows).ok_or(ScrollerError::InvalidRows(self.rows))?;
        if !(self.buffer > 0.0 && self.buffer <= 1.0) {
            return Err(ScrollerError::InvalidBuffer(self.buffer));
        }

        Ok(ScrollerConfig {
            rows,
            mode: LoadMode::from_lazy(self.lazy),
            inline: self.inline,
            buffer: self.buffer,
            loader: self.loader,
            header: self.header,
            footer: self.footer,
            empty_message: self.empty_message,
            scroll_height: self.scroll_height,
        })
    }
}

/// Validated scroller configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollerConfig {
    pub rows: NonZeroUsize,
    pub mode: LoadMode,
    pub inline: bool,
    pub buffer: f64,
    pub loader: bool,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub empty_message: Option<String>,
    pub scroll_height: Option<String>,
}
