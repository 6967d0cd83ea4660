//! JSON export

use crate::job::Job;
use crate::output::OutputResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `job` (including its result) as pretty-printed JSON
pub fn write_json_report(job: &Job, output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, job)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
