use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::warn;

use crate::fill::orchestrator::FillState;
use crate::trace::trace::TraceEvent;

/// Append-only JSONL sink for fill state transitions.
///
/// One line per transition. A logger whose file could not be opened drops
/// events, so tracing never changes how a fill behaves.
pub struct TraceLogger {
    sink: Option<Sink>,
}

struct Sink {
    path: PathBuf,
    writer: Mutex<LineWriter<File>>,
}

impl TraceLogger {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Some(Sink {
                path: path.to_path_buf(),
                writer: Mutex::new(LineWriter::new(file)),
            }),
        })
    }

    /// Like [`TraceLogger::open`], but an unopenable file disables tracing.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::open(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "could not open trace file, tracing disabled");
            Self::disabled()
        })
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|s| s.path.as_path())
    }

    /// Record that an invocation entered `state` during `round`.
    pub fn transition(&self, round: u32, state: &FillState, target: &str) {
        if self.is_enabled() {
            self.log(&TraceEvent::for_state(round, state, target));
        }
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to serialize trace event");
                return;
            }
        };

        if let Err(e) = writeln!(sink.writer.lock(), "{}", line) {
            warn!(path = %sink.path.display(), error = %e, "failed to write trace event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logger_has_no_path() {
        let logger = TraceLogger::disabled();
        assert!(!logger.is_enabled());
        assert!(logger.path().is_none());
        logger.transition(1, &FillState::WaitingForCandidates, "a@maildrop.cc");
    }

    #[test]
    fn unopenable_path_disables_tracing() {
        let logger = TraceLogger::new("/nonexistent-dir/trace.jsonl");
        assert!(!logger.is_enabled());
        assert!(TraceLogger::open("/nonexistent-dir/trace.jsonl").is_err());
    }

    #[test]
    fn transitions_append_one_line_each() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let logger = TraceLogger::open(&path).unwrap();
        assert_eq!(logger.path(), Some(path.as_path()));

        logger.transition(1, &FillState::WaitingForCandidates, "a@maildrop.cc");
        logger.transition(2, &FillState::WaitingForCandidates, "a@maildrop.cc");
        drop(logger);

        let reopened = TraceLogger::open(&path).unwrap();
        reopened.transition(3, &FillState::WaitingForCandidates, "a@maildrop.cc");
        drop(reopened);

        let content = std::fs::read_to_string(&path).unwrap();
        let rounds: Vec<u32> = content
            .lines()
            .map(|line| serde_json::from_str::<TraceEvent>(line).unwrap().round)
            .collect();
        assert_eq!(rounds, vec![1, 2, 3], "reopening appends");
    }
}
