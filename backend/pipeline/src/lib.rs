//! The intake pipeline: one inbound message in, stored contact records out.

pub mod pipeline;
pub mod report;

pub use pipeline::IntakePipeline;
pub use report::{ExtractionOutcome, IntakeReport, TextSource};
