use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::detect::candidate::Candidate;
use crate::detect::discovery::fingerprint;
use crate::fill::orchestrator::FillState;

/// One orchestration state transition, written as a JSONL line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub timestamp_ms: u64,
    pub round: u32,

    pub state: String,
    pub target: String,

    pub candidates: usize,
    pub fingerprint: Option<String>,

    pub selector: Option<String>,
    pub reason: Option<String>,
}

impl TraceEvent {
    pub fn now(round: u32, state: &str, target: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
            round,
            state: state.to_string(),
            target: target.to_string(),
            candidates: 0,
            fingerprint: None,
            selector: None,
            reason: None,
        }
    }

    /// Event for entering `state`, carrying what that state knows: the
    /// candidate set, the filled selector or the failure reason.
    pub fn for_state(round: u32, state: &FillState, target: &str) -> Self {
        let event = Self::now(round, state.name(), target);
        match state {
            FillState::HaveCandidates(c) | FillState::Attempting(c) => {
                event.with_candidates(c, fingerprint(c))
            }
            FillState::Success(o) => match &o.selector {
                Some(selector) => event.with_selector(selector),
                None => event,
            },
            FillState::NoCandidates(o) | FillState::Exhausted(o) => match &o.reason {
                Some(reason) => event.with_reason(reason),
                None => event,
            },
            FillState::WaitingForCandidates => event,
        }
    }

    pub fn with_candidates(mut self, candidates: &[Candidate], fingerprint: String) -> Self {
        self.candidates = candidates.len();
        self.fingerprint = Some(fingerprint);
        self
    }

    pub fn with_selector(mut self, selector: impl ToString) -> Self {
        self.selector = Some(selector.to_string());
        self
    }

    pub fn with_reason(mut self, reason: impl ToString) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}
