use super::{element_text, selector};
use crate::model::TableRecord;
use scraper::{ElementRef, Html};

/// Upper bound on a single cell's `colspan`, as browsers clamp it
pub const MAX_COLSPAN: usize = 1000;

/// Upper bound on a table's column count; cells past it are truncated
pub const MAX_COLUMNS: usize = 1000;

/// Extracts every `<table>` as a rectangular [`TableRecord`]
///
/// # Shape Rules
///
/// - Rows are the `<tr>` elements owned by the table; rows of nested tables
///   belong to the nested table, which becomes its own record
/// - Cells are the direct `<td>`/`<th>` children of a row; header rows count
///   as ordinary rows
/// - `colspan="n"` repeats the cell text `n` times (clamped to 1..=1000);
///   `rowspan` is not expanded
/// - The column count is the widest row, capped at [`MAX_COLUMNS`]
/// - Shorter rows are padded with empty strings, longer rows truncated
pub(super) fn extract_tables(document: &Html) -> Vec<TableRecord> {
    let Some(table_selector) = selector("table") else {
        return Vec::new();
    };

    document
        .select(&table_selector)
        .map(|table| build_table(&table))
        .collect()
}

fn build_table(table: &ElementRef) -> TableRecord {
    let raw_rows: Vec<Vec<String>> = owned_rows(table).iter().map(row_cells).collect();

    let caption = table
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "caption")
        .map(|caption| element_text(&caption))
        .filter(|text| !text.is_empty());

    let (cols, data) = rectangularize(raw_rows);

    TableRecord {
        rows: data.len(),
        cols,
        caption,
        data,
    }
}

/// Pads or truncates every row to the width of the widest row
fn rectangularize(rows: Vec<Vec<String>>) -> (usize, Vec<Vec<String>>) {
    let cols = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .min(MAX_COLUMNS);

    let data = rows
        .into_iter()
        .map(|mut row| {
            row.resize(cols, String::new());
            row
        })
        .collect();

    (cols, data)
}

/// Collects the `<tr>` elements whose nearest enclosing table is `table`
fn owned_rows<'a>(table: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let Some(tr_selector) = selector("tr") else {
        return Vec::new();
    };

    table
        .select(&tr_selector)
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|ancestor| ancestor.value().name() == "table")
                .map_or(false, |owner| owner.id() == table.id())
        })
        .collect()
}

fn row_cells(row: &ElementRef) -> Vec<String> {
    let mut cells = Vec::new();

    for cell in row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(c.value().name(), "td" | "th"))
    {
        let text = element_text(&cell);
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);

        for _ in 0..span {
            if cells.len() >= MAX_COLUMNS {
                return cells;
            }
            cells.push(text.clone());
        }
    }

    cells
}
