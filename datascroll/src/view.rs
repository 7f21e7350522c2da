//! View assembly.
//!
//! Turns the render buffer into a flat, unstyled description of what the
//! scroller shows: header, one row per item (through the item template) or
//! an empty message, and footer.

use crate::config::ScrollerConfig;

/// Shown when the buffer is empty and no message is configured.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No available options";

/// Renders one item for display.
pub type ItemTemplate<T> = Box<dyn Fn(&T) -> String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRow {
    Item { index: usize, content: String },
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollerView {
    pub header: Option<String>,
    pub rows: Vec<ViewRow>,
    pub footer: Option<String>,
    pub inline: bool,
    pub max_height: Option<String>,
}

impl ScrollerView {
    pub fn build<T>(items: &[T], config: &ScrollerConfig, template: &dyn Fn(&T) -> String) -> Self {
        let rows = if items.is_empty() {
            let message = config
                .empty_message
                .clone()
                .unwrap_or_else(|| DEFAULT_EMPTY_MESSAGE.to_string());
            vec![ViewRow::Empty(message)]
        } else {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| ViewRow::Item {
                    index,
                    content: template(item),
                })
                .collect()
        };

        Self {
            header: config.header.clone(),
            rows,
            footer: config.footer.clone(),
            inline: config.inline,
            max_height: config.scroll_height.clone(),
        }
    }

    /// True when no items are shown (only the empty message).
    pub fn is_empty(&self) -> bool {
        !self.rows.iter().any(|row| matches!(row, ViewRow::Item { .. }))
    }

    pub fn item_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, ViewRow::Item { .. }))
            .count()
    }

    /// Plain-text lines, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.extend(self.header.clone());
        lines.extend(self.rows.iter().map(|row| match row {
            ViewRow::Item { content, .. } => content.clone(),
            ViewRow::Empty(message) => message.clone(),
        }));
        lines.extend(self.footer.clone());
        lines
    }
}
