//! JSON Lines record output
//!
//! Each record becomes one compact JSON object followed by a newline.

use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::record::MusicRecord;
use std::io::Write;

/// Writes records as JSON Lines to any writer
#[derive(Debug)]
pub struct JsonLinesEmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesEmitter<W> {
    /// Creates an emitter writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesEmitter<std::io::Stdout> {
    /// Creates an emitter writing to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> RecordSink for JsonLinesEmitter<W> {
    fn emit(&mut self, record: &MusicRecord) -> OutputResult<()> {
        // Serialize fully before writing so a failure never leaves half a line
        let line = serde_json::to_string(record).map_err(OutputError::Serialize)?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
