use thiserror::Error;

use crate::page::page_model::NodeId;

/// Errors raised by a page document while querying or mutating elements.
#[derive(Debug, Error)]
pub enum PageError {
    /// No element with this id exists in the document.
    #[error("element {0} not found")]
    ElementNotFound(NodeId),

    /// Element was removed from the document.
    #[error("element {0} is no longer attached to the document")]
    Detached(NodeId),

    /// The page refused a value write.
    #[error("value write rejected on element {node}: {reason}")]
    WriteRejected { node: NodeId, reason: String },

    /// A synthetic event could not be dispatched.
    #[error("dispatching '{event}' on element {node} failed: {reason}")]
    EventFailed {
        event: &'static str,
        node: NodeId,
        reason: String,
    },

    /// A discovery rule carries a pattern that does not compile.
    #[error("invalid discovery pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// Snapshot file could not be read.
    #[error("failed to read page snapshot {path}: {source}")]
    SnapshotRead {
        path: String,
        source: std::io::Error,
    },

    /// Snapshot file is not valid JSON/YAML for a page.
    #[error("failed to parse page snapshot {path}: {reason}")]
    SnapshotParse { path: String, reason: String },
}
