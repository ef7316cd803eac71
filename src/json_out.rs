use crate::errors::AppError;
use crate::model::Log;
use std::io::Write;

/// Write the activation chain as pretty-printed JSON.
pub fn write_json<W: Write>(log: &Log, mut out: W) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut out, &log.activations)?;
    writeln!(out)?;
    Ok(())
}
