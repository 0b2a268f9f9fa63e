//! Database schema for the SQLite export
//!
//! Existing tables are dropped first so that each export replaces the
//! previous contents of the file.

/// SQL schema for the export database
pub const SCHEMA_SQL: &str = r#"
DROP TABLE IF EXISTS links;
DROP TABLE IF EXISTS tables;
DROP TABLE IF EXISTS pages;

-- One row per page record, in crawl order
CREATE TABLE pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    title TEXT,
    description TEXT,
    word_count INTEGER NOT NULL,
    status TEXT NOT NULL,
    error TEXT,
    fetched_at TEXT NOT NULL
);

CREATE INDEX idx_pages_url ON pages(url);

-- One row per table row; cell_data is a JSON array of strings
CREATE TABLE tables (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES pages(id),
    table_index INTEGER NOT NULL,
    row_index INTEGER NOT NULL,
    cell_data TEXT NOT NULL
);

CREATE INDEX idx_tables_page_id ON tables(page_id);

-- Internal and external links found on each page
CREATE TABLE links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES pages(id),
    url TEXT NOT NULL,
    is_internal INTEGER NOT NULL
);

CREATE INDEX idx_links_page_id ON links(page_id);
"#;

/// Creates (or recreates) the export tables
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
