pub mod executor;
pub mod options;
pub mod orchestrator;
pub mod outcome;
