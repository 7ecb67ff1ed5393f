use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::detect::candidate::Candidate;
use crate::detect::discovery::{discover, fingerprint};
use crate::fill::executor::fill_candidate;
use crate::fill::options::FillOptions;
use crate::fill::outcome::FillAttemptOutcome;
use crate::page::document::{PageDocument, resolve_frame};
use crate::page::page_model::FrameOrigin;
use crate::trace::logger::TraceLogger;

/// Orchestration states of one fill invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum FillState {
    WaitingForCandidates,
    HaveCandidates(Vec<Candidate>),
    Attempting(Vec<Candidate>),
    Success(FillAttemptOutcome),
    NoCandidates(FillAttemptOutcome),
    Exhausted(FillAttemptOutcome),
}

impl FillState {
    pub fn name(&self) -> &'static str {
        match self {
            FillState::WaitingForCandidates => "waiting_for_candidates",
            FillState::HaveCandidates(_) => "have_candidates",
            FillState::Attempting(_) => "attempting",
            FillState::Success(_) => "success",
            FillState::NoCandidates(_) => "no_candidates",
            FillState::Exhausted(_) => "exhausted",
        }
    }
}

/// Fill the best email-like field on `doc` with `target_value`.
///
/// Never fails: every path ends in a structured outcome.
pub async fn attempt_fill_email(
    doc: &dyn PageDocument,
    target_value: &str,
    options: &FillOptions,
) -> FillAttemptOutcome {
    FillInvocation::new(doc, target_value, options).run().await
}

/// Visible candidates first, each group by descending score. Ties keep
/// document order.
pub fn attempt_order(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    let (visible, hidden): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|c| c.visible);
    visible.into_iter().chain(hidden).collect()
}

/// One end-to-end fill request. Owns all of its state; nothing is shared
/// with other invocations except the live document.
pub struct FillInvocation<'a> {
    doc: &'a dyn PageDocument,
    value: &'a str,
    options: &'a FillOptions,
    tracer: Option<&'a TraceLogger>,
    started: Instant,
    rounds: u32,
}

impl<'a> FillInvocation<'a> {
    pub fn new(doc: &'a dyn PageDocument, value: &'a str, options: &'a FillOptions) -> Self {
        Self {
            doc,
            value,
            options,
            tracer: None,
            started: Instant::now(),
            rounds: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: &'a TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub async fn run(mut self) -> FillAttemptOutcome {
        self.started = Instant::now();
        let mut state = FillState::WaitingForCandidates;

        loop {
            state = match state {
                FillState::WaitingForCandidates => {
                    self.rounds += 1;
                    let found = self.wait_for_candidates().await;
                    if found.is_empty() {
                        FillState::NoCandidates(FillAttemptOutcome::no_candidates())
                    } else {
                        FillState::HaveCandidates(found)
                    }
                }

                FillState::HaveCandidates(found) => FillState::Attempting(attempt_order(found)),

                FillState::Attempting(queue) => match self.attempt(&queue).await {
                    Some(outcome) => FillState::Success(outcome),
                    None if self.rounds <= self.options.max_retries => {
                        // The round after the last retry is the final one and
                        // starts without a pause.
                        if self.rounds < self.options.max_retries {
                            sleep(self.options.retry_delay()).await;
                        }
                        FillState::WaitingForCandidates
                    }
                    None => FillState::Exhausted(FillAttemptOutcome::exhausted(&queue)),
                },

                FillState::Success(outcome)
                | FillState::NoCandidates(outcome)
                | FillState::Exhausted(outcome) => return self.finish(outcome),
            };

            self.trace(&state);
        }
    }

    /// Poll discovery until a visible candidate shows up or the wait budget
    /// runs out. Returns every candidate of the last pass.
    async fn wait_for_candidates(&self) -> Vec<Candidate> {
        let budget = self.options.wait_budget();
        let discovery = self.options.discovery();
        let start = Instant::now();
        let mut last_fingerprint = None;

        loop {
            let found = discover(self.doc, &discovery);

            let current = fingerprint(&found);
            if last_fingerprint.as_ref() != Some(&current) {
                debug!(
                    round = self.rounds,
                    candidates = found.len(),
                    fingerprint = %current,
                    "candidate set changed"
                );
                last_fingerprint = Some(current);
            }

            if found.iter().any(|c| c.visible) {
                return found;
            }
            if start.elapsed() >= budget {
                debug!(
                    round = self.rounds,
                    candidates = found.len(),
                    "wait budget spent without a visible candidate"
                );
                return found;
            }

            sleep(self.options.timing.poll_interval()).await;
        }
    }

    /// Try each candidate in order; first success wins.
    async fn attempt(&self, queue: &[Candidate]) -> Option<FillAttemptOutcome> {
        for candidate in queue {
            let locator = candidate.descriptor.locator();

            if candidate.origin == FrameOrigin::Primary && !self.doc.contains(candidate.node) {
                debug!(selector = %locator, "candidate detached, skipping");
                continue;
            }

            if fill_candidate(self.doc, candidate, self.value, &self.options.timing).await {
                let actual = resolve_frame(self.doc, candidate.frame)
                    .and_then(|doc| doc.value(candidate.node).ok())
                    .unwrap_or_default();
                debug!(selector = %locator, score = candidate.score, "candidate filled");
                return Some(FillAttemptOutcome::succeeded(candidate, actual, queue));
            }

            debug!(selector = %locator, score = candidate.score, "candidate rejected the value");
        }
        None
    }

    fn finish(&self, outcome: FillAttemptOutcome) -> FillAttemptOutcome {
        let elapsed = self.started.elapsed();
        if elapsed > self.options.overall_timeout() {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                timeout_ms = self.options.overall_timeout_ms,
                "fill invocation ran past its advisory timeout"
            );
        }

        let outcome = outcome.with_progress(self.rounds, elapsed.as_millis() as u64);
        match (&outcome.selector, &outcome.reason) {
            (Some(selector), _) => info!(
                selector = %selector,
                rounds = outcome.rounds,
                "email field filled"
            ),
            (None, reason) => warn!(
                reason = reason.as_deref().unwrap_or("unknown"),
                rounds = outcome.rounds,
                candidates = outcome.fields.len(),
                "failed to fill email field"
            ),
        }
        outcome
    }

    fn trace(&self, state: &FillState) {
        if let Some(tracer) = self.tracer {
            tracer.transition(self.rounds, state, self.value);
        }
    }
}
