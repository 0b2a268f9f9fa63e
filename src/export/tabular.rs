use super::{summary_row, ExportResult, SUMMARY_HEADERS};
use crate::model::PageRecord;
use std::path::Path;

/// Writes one summary row per page
///
/// Nested structures (tables, forms, lists) are not flattened into this
/// format; only scalar columns are written.
pub(super) fn write_csv(results: &[PageRecord], path: &Path) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SUMMARY_HEADERS)?;

    for page in results {
        writer.write_record(summary_row(page))?;
    }

    writer.flush()?;
    Ok(())
}
