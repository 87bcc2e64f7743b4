//! Record sink trait and errors
//!
//! This module defines the interface records are written through, so the
//! harvester does not care whether output goes to stdout, a file or a
//! test buffer.

use crate::record::MusicRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// The record could not be turned into JSON; the run continues
    #[error("Failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The sink rejected the write; the run stops
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OutputError {
    /// Returns true if the run may continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Serialize(_))
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for record sinks
///
/// Records are emitted one at a time, in the order they are produced.
pub trait RecordSink {
    /// Writes one completed record
    fn emit(&mut self, record: &MusicRecord) -> OutputResult<()>;

    /// Flushes any buffered output
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
