//! Finds, scores and fills email-like inputs on rendered pages, with the
//! retry loop needed for pages that render asynchronously.
//!
//! The engine works against [`page::document::PageDocument`]; the
//! [`page::snapshot::SnapshotPage`] implementation backs the CLI and tests.

pub mod cli;
pub mod detect;
pub mod fill;
pub mod leak;
pub mod masking;
pub mod page;
pub mod report;
pub mod trace;

pub use fill::options::FillOptions;
pub use fill::orchestrator::attempt_fill_email;
pub use fill::outcome::FillAttemptOutcome;
