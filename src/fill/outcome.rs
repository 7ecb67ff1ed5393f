use serde::{Deserialize, Serialize};

use crate::detect::candidate::{Candidate, CandidateReport};
use crate::page::page_model::FrameOrigin;

/// Why an invocation ended without filling anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NoCandidatesFound,
    AllCandidatesFailed,
}

/// Result of one fill invocation, handed back to the host controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillAttemptOutcome {
    pub success: bool,

    /// Candidate that took the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<CandidateReport>,

    /// `tag#id.class` locator of the filled field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<FrameOrigin>,

    /// Value read back from the field after filling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Every candidate considered in the last round.
    #[serde(default)]
    pub fields: Vec<CandidateReport>,

    /// Rounds run (wait + attempts).
    pub rounds: u32,

    pub elapsed_ms: u64,
}

impl FillAttemptOutcome {
    pub fn succeeded(filled: &Candidate, actual_value: String, considered: &[Candidate]) -> Self {
        Self {
            success: true,
            candidate: Some(filled.report()),
            selector: Some(filled.descriptor.locator()),
            origin: Some(filled.origin),
            actual_value: Some(actual_value),
            failure: None,
            reason: None,
            fields: considered.iter().map(Candidate::report).collect(),
            rounds: 0,
            elapsed_ms: 0,
        }
    }

    pub fn no_candidates() -> Self {
        Self::failed(FailureKind::NoCandidatesFound, "no candidates found".into(), &[])
    }

    pub fn exhausted(considered: &[Candidate]) -> Self {
        let reason = format!(
            "found {} candidates but none could be filled",
            considered.len()
        );
        Self::failed(FailureKind::AllCandidatesFailed, reason, considered)
    }

    fn failed(kind: FailureKind, reason: String, considered: &[Candidate]) -> Self {
        Self {
            success: false,
            candidate: None,
            selector: None,
            origin: None,
            actual_value: None,
            failure: Some(kind),
            reason: Some(reason),
            fields: considered.iter().map(Candidate::report).collect(),
            rounds: 0,
            elapsed_ms: 0,
        }
    }

    pub fn with_progress(mut self, rounds: u32, elapsed_ms: u64) -> Self {
        self.rounds = rounds;
        self.elapsed_ms = elapsed_ms;
        self
    }
}
