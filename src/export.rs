//! JSON-lines emission of the output linkage table.
//!
//! One row per line, ready to be joined downstream against a price or
//! fundamentals source keyed by security id and a date-containment
//! predicate. Emission is a sequential boundary operation; nothing in the
//! pipeline does I/O before this point.

use std::io::Write;

use crate::model::OutputRange;
use crate::Result;

/// Write every output range as one JSON object per line.
pub fn write_json_lines<W: Write>(writer: &mut W, ranges: &[OutputRange]) -> Result<()> {
    for range in ranges {
        serde_json::to_writer(&mut *writer, range)?;
        writeln!(writer)?;
    }
    Ok(())
}
