//! JSON output formatting

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

pub struct JsonFormatter;

impl JsonFormatter {
    /// Write `value` as pretty-printed JSON followed by a newline
    pub fn write<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }
}
