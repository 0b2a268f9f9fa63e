use super::ExportResult;
use crate::model::PageRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every record as one pretty-printed JSON array
pub(super) fn write_json(results: &[PageRecord], path: &Path) -> ExportResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
