use serde::{Deserialize, Serialize};

use crate::page::page_model::{ElementDescriptor, FrameOrigin, NodeId};

/// A discovered input judged plausibly email-accepting.
///
/// Rebuilt on every detection pass; never cached across page mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Frame index for nested-frame elements, `None` for the primary document.
    pub frame: Option<usize>,
    pub node: NodeId,
    pub descriptor: ElementDescriptor,
    pub score: i32,
    pub visible: bool,
    pub origin: FrameOrigin,
}

impl Candidate {
    pub fn report(&self) -> CandidateReport {
        CandidateReport {
            tag: self.descriptor.tag.to_uppercase(),
            input_type: self.descriptor.declared_type().to_string(),
            name: self.descriptor.name.clone(),
            id: self.descriptor.id.clone(),
            visible: self.visible,
            score: self.score,
            current_value: self.descriptor.value.clone(),
            origin: self.origin,
        }
    }
}

/// Diagnostic row for one candidate, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateReport {
    pub tag: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: Option<String>,
    pub id: Option<String>,
    pub visible: bool,
    pub score: i32,
    pub current_value: String,
    pub origin: FrameOrigin,
}
