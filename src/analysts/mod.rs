//! Analyst collaborators: prompt builders and the startup report pipeline.
//!
//! Everything here sits on top of the core — it supplies `(system, user)`
//! prompt pairs per task, declares the dependency edges, and assembles the
//! final report. The core never interprets the content.

pub mod pipeline;
pub mod prompts;

pub use pipeline::{AnalysisMode, StartupAnalyzer};
pub use prompts::PromptPair;
