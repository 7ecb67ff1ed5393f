use tokio::time::sleep;
use tracing::{debug, trace};

use crate::detect::candidate::Candidate;
use crate::fill::options::FillTiming;
use crate::page::document::{PageDocument, resolve_frame};
use crate::page::error::PageError;
use crate::page::page_model::{NodeId, UiEvent};

/// Write `value` into the candidate's field and check that the page kept it.
///
/// `root` is the primary document; nested-frame candidates are resolved
/// through it. Never fails outward: any focus, write or read error counts as
/// `false`.
pub async fn fill_candidate(
    root: &dyn PageDocument,
    candidate: &Candidate,
    value: &str,
    timing: &FillTiming,
) -> bool {
    let Some(doc) = resolve_frame(root, candidate.frame) else {
        debug!(frame = ?candidate.frame, "frame no longer readable");
        return false;
    };
    fill_node(doc, candidate.node, value, timing).await
}

/// Fill one node of `doc` directly.
pub async fn fill_node(
    doc: &dyn PageDocument,
    node: NodeId,
    value: &str,
    timing: &FillTiming,
) -> bool {
    let original = match write_value(doc, node, value) {
        Ok(original) => original,
        Err(e) => {
            debug!(node, error = %e, "fill step failed");
            return false;
        }
    };

    dispatch_all(doc, node, &UiEvent::FILL_SEQUENCE);

    // Frameworks that resync on the next tick need a second input event.
    sleep(timing.resync_delay()).await;
    dispatch_all(doc, node, &[UiEvent::Input]);

    sleep(timing.settle_after_resync()).await;

    match doc.value(node) {
        Ok(current) => {
            let has_content = !current.trim().is_empty();
            let changed = current != original;
            trace!(node, has_content, changed, "fill verified");
            has_content || changed
        }
        Err(e) => {
            debug!(node, error = %e, "could not read value back");
            false
        }
    }
}

/// Record the pre-fill value, focus, clear, then write. Returns the pre-fill value.
fn write_value(doc: &dyn PageDocument, node: NodeId, value: &str) -> Result<String, PageError> {
    let original = doc.value(node)?;
    doc.focus(node)?;
    doc.set_value(node, "")?;
    doc.set_value(node, value)?;
    Ok(original)
}

fn dispatch_all(doc: &dyn PageDocument, node: NodeId, events: &[UiEvent]) {
    for event in events {
        if let Err(e) = doc.dispatch(node, *event) {
            trace!(node, event = event.name(), error = %e, "event dispatch failed, continuing");
        }
    }
}
