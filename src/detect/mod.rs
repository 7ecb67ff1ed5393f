pub mod candidate;
pub mod classifier;
pub mod discovery;
pub mod rules;
pub mod scoring;
