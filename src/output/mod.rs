//! Output module for emitting harvested records
//!
//! This module handles:
//! - Serializing records as JSON Lines
//! - The sink interface records are written through
//! - Recording run statistics

mod json_lines;
pub mod stats;
mod traits;

pub use json_lines::JsonLinesEmitter;
pub use stats::HarvestStats;
pub use traits::{OutputError, OutputResult, RecordSink};
