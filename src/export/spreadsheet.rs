use super::{summary_row, ExportResult, SUMMARY_HEADERS};
use crate::model::PageRecord;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Summary columns written as numbers rather than text
const NUMERIC_COLUMNS: std::ops::Range<usize> = 2..6;

/// Fixed leading columns of the `Tables` sheet
const TABLE_HEADERS: [&str; 3] = ["Source URL", "Table", "Row"];

/// Longest string a single worksheet cell accepts, in characters
pub const MAX_CELL_CHARS: usize = 32_767;

/// Writes an `Overview` sheet and a `Tables` sheet
///
/// Both sheets are always present, even when there is nothing to put in
/// them beyond the header row.
pub(super) fn write_xlsx(results: &[PageRecord], path: &Path) -> ExportResult<()> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    workbook.push_worksheet(overview_sheet(results, &header)?);
    workbook.push_worksheet(tables_sheet(results, &header)?);

    workbook.save(path)?;
    Ok(())
}

fn overview_sheet(results: &[PageRecord], header: &Format) -> ExportResult<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name("Overview")?;

    for (col, title) in (0u16..).zip(SUMMARY_HEADERS) {
        sheet.write_string_with_format(0, col, title, header)?;
    }

    for (row, page) in (1u32..).zip(results) {
        for (col, (index, value)) in (0u16..).zip(summary_row(page).iter().enumerate()) {
            if NUMERIC_COLUMNS.contains(&index) {
                let number = value.parse::<f64>().unwrap_or_default();
                sheet.write_number(row, col, number)?;
            } else {
                sheet.write_string(row, col, fit_cell(value))?;
            }
        }
    }

    Ok(sheet)
}

/// One spreadsheet row per table row, tagged with the page URL and the
/// table's position on that page
fn tables_sheet(results: &[PageRecord], header: &Format) -> ExportResult<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name("Tables")?;

    let widest = results
        .iter()
        .flat_map(|page| page.tables.iter().map(|table| table.cols))
        .max()
        .unwrap_or(0);

    let fixed = TABLE_HEADERS.len() as u16;
    for (col, title) in (0u16..).zip(TABLE_HEADERS) {
        sheet.write_string_with_format(0, col, title, header)?;
    }
    for (col, n) in (fixed..).zip(1..=widest) {
        sheet.write_string_with_format(0, col, format!("Col {}", n), header)?;
    }

    let mut row = 1u32;
    for page in results {
        for (table_index, table) in (1u32..).zip(&page.tables) {
            for (row_index, cells) in (1u32..).zip(&table.data) {
                sheet.write_string(row, 0, fit_cell(&page.url))?;
                sheet.write_number(row, 1, table_index)?;
                sheet.write_number(row, 2, row_index)?;
                for (col, cell) in (fixed..).zip(cells) {
                    sheet.write_string(row, col, fit_cell(cell))?;
                }
                row += 1;
            }
        }
    }

    Ok(sheet)
}

/// Cuts `value` to the cell limit on a character boundary
fn fit_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            tracing::debug!(
                "Truncating {}-character cell to {} characters",
                value.chars().count(),
                MAX_CELL_CHARS
            );
            &value[..end]
        }
        None => value,
    }
}
