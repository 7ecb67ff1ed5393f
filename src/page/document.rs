use crate::detect::rules::DiscoveryRule;
use crate::page::error::PageError;
use crate::page::page_model::{ElementDescriptor, NodeId, UiEvent};

// ============================================================================
// PageDocument trait: the live page the engine works against
// ============================================================================

/// A page document (main page or one nested frame).
///
/// Implementations own the real element state. All methods take `&self` so
/// several fill invocations can share one document; mutation goes through
/// interior mutability on the implementation side.
pub trait PageDocument: Send + Sync {
    /// Attached `<input>` elements in document order.
    fn input_elements(&self) -> Vec<NodeId>;

    /// Attribute snapshot of one element, `None` if it does not exist.
    fn describe(&self, node: NodeId) -> Option<ElementDescriptor>;

    /// Whether the element is still part of the document.
    fn contains(&self, node: NodeId) -> bool;

    fn focus(&self, node: NodeId) -> Result<(), PageError>;

    fn set_value(&self, node: NodeId, value: &str) -> Result<(), PageError>;

    fn value(&self, node: NodeId) -> Result<String, PageError>;

    fn dispatch(&self, node: NodeId, event: UiEvent) -> Result<(), PageError>;

    /// Number of nested frames embedded in this document.
    fn frame_count(&self) -> usize {
        0
    }

    /// Capability check: the frame's document if it can be read.
    ///
    /// Cross-origin frames return `None`.
    fn frame_document(&self, _index: usize) -> Option<&dyn PageDocument> {
        None
    }

    /// Elements matching one discovery rule, in document order.
    fn query(&self, rule: &DiscoveryRule) -> Result<Vec<NodeId>, PageError> {
        let matcher = rule.compile()?;
        Ok(self
            .input_elements()
            .into_iter()
            .filter(|node| {
                self.describe(*node)
                    .map(|el| matcher.matches(&el))
                    .unwrap_or(false)
            })
            .collect())
    }
}

/// Resolve the document a candidate lives in.
pub fn resolve_frame<'a>(
    root: &'a dyn PageDocument,
    frame: Option<usize>,
) -> Option<&'a dyn PageDocument> {
    match frame {
        None => Some(root),
        Some(index) => root.frame_document(index),
    }
}
