use super::schema::initialize_schema;
use super::ExportResult;
use crate::model::PageRecord;
use rusqlite::{params, Connection};
use std::path::Path;

/// Writes pages, table rows and links into a SQLite database file
///
/// The schema reset and all inserts run in a single transaction, so a
/// failed export leaves the previous contents of the file untouched.
pub(super) fn write_sqlite(results: &[PageRecord], path: &Path) -> ExportResult<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let tx = conn.transaction()?;
    initialize_schema(&tx)?;
    {
        let mut insert_page = tx.prepare(
            "INSERT INTO pages (url, title, description, word_count, status, error, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        let mut insert_row = tx.prepare(
            "INSERT INTO tables (page_id, table_index, row_index, cell_data)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut insert_link =
            tx.prepare("INSERT INTO links (page_id, url, is_internal) VALUES (?1, ?2, ?3)")?;

        for page in results {
            let page_id = insert_page.insert(params![
                page.url,
                page.title(),
                page.description(),
                page.text.word_count as i64,
                page.status.label(),
                page.status.reason(),
                page.fetched_at.to_rfc3339(),
            ])?;

            for (table_index, table) in page.tables.iter().enumerate() {
                for (row_index, cells) in table.data.iter().enumerate() {
                    insert_row.execute(params![
                        page_id,
                        table_index as i64,
                        row_index as i64,
                        serde_json::to_string(cells)?,
                    ])?;
                }
            }

            for url in &page.links.internal {
                insert_link.execute(params![page_id, url, true])?;
            }
            for url in &page.links.external {
                insert_link.execute(params![page_id, url, false])?;
            }
        }
    }
    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportError;
    use crate::model::TableRecord;
    use tempfile::TempDir;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    fn sample_page() -> PageRecord {
        let mut page = PageRecord::new("https://example.com/");
        page.metadata.insert("title".to_string(), "Home".to_string());
        page.text.word_count = 42;
        page.tables.push(TableRecord {
            rows: 2,
            cols: 2,
            caption: None,
            data: vec![
                vec!["h1".to_string(), "h2".to_string()],
                vec!["a".to_string(), "b".to_string()],
            ],
        });
        page.links.internal.insert("https://example.com/about".to_string());
        page.links.external.insert("https://other.com/".to_string());
        page
    }

    #[test]
    fn test_empty_export_creates_schema() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.db");

        write_sqlite(&[], &path).unwrap();

        let conn = Connection::open(&path).unwrap();
        assert_eq!(count(&conn, "pages"), 0);
        assert_eq!(count(&conn, "tables"), 0);
        assert_eq!(count(&conn, "links"), 0);
    }

    #[test]
    fn test_export_rows() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.db");

        let results = vec![
            sample_page(),
            PageRecord::failed("https://example.com/gone", "HTTP 404"),
        ];
        write_sqlite(&results, &path).unwrap();

        let conn = Connection::open(&path).unwrap();
        assert_eq!(count(&conn, "pages"), 2);
        assert_eq!(count(&conn, "tables"), 2);
        assert_eq!(count(&conn, "links"), 2);

        let (title, words): (Option<String>, i64) = conn
            .query_row(
                "SELECT title, word_count FROM pages WHERE url = ?1",
                ["https://example.com/"],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(title.as_deref(), Some("Home"));
        assert_eq!(words, 42);

        let cells: String = conn
            .query_row(
                "SELECT cell_data FROM tables WHERE row_index = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        let cells: Vec<String> = serde_json::from_str(&cells).unwrap();
        assert_eq!(cells, vec!["a", "b"]);

        let (status, error): (String, Option<String>) = conn
            .query_row(
                "SELECT status, error FROM pages WHERE url = ?1",
                ["https://example.com/gone"],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(status, "failed");
        assert_eq!(error.as_deref(), Some("HTTP 404"));

        let internal: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM links WHERE is_internal = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(internal, 1);
    }

    #[test]
    fn test_export_overwrites_previous_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.db");

        write_sqlite(&[sample_page(), sample_page()], &path).unwrap();
        write_sqlite(&[sample_page()], &path).unwrap();

        let conn = Connection::open(&path).unwrap();
        assert_eq!(count(&conn, "pages"), 1);
    }

    #[test]
    fn test_failed_export_keeps_previous_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.db");

        write_sqlite(&[sample_page()], &path).unwrap();

        // A foreign table pointing at `pages` makes dropping it fail
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE notes (page_id INTEGER REFERENCES pages(id));
                 INSERT INTO notes (page_id) VALUES (1);",
            )
            .unwrap();
        }

        let result = write_sqlite(&[sample_page(), sample_page()], &path);
        assert!(matches!(result, Err(ExportError::Database(_))));

        let conn = Connection::open(&path).unwrap();
        assert_eq!(count(&conn, "pages"), 1);
        assert_eq!(count(&conn, "tables"), 2);
        assert_eq!(count(&conn, "links"), 2);
    }
}
