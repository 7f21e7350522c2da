//! Data scroller error types.

use thiserror::Error;

use crate::ids::NodeId;

#[derive(Debug, Error)]
pub enum ScrollerError {
    #[error("rows must be at least 1, got {0}")]
    InvalidRows(usize),

    #[error("buffer must be in (0, 1], got {0}")]
    InvalidBuffer(f64),

    #[error("inline scrolling requires a scrollable ancestor of {0}")]
    NoScrollableAncestor(NodeId),

    #[error("invalid options: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrollerError>;
