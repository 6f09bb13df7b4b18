//! Database file abstraction for SQLite.

use std::fs::File;
use std::path::Path;

use tracing::{debug, instrument, trace, warn};

use super::cell::decode_table_leaf_cell;
use super::constants::{DB_HEADER_SIZE, PAGE1_HEADER_OFFSET};
use super::error::{DbError, Result};
use super::header::DatabaseHeader;
use super::page::{PageHeader, read_cell_pointers};
use super::schema::SchemaEntry;
use super::source::ByteSource;

/// What a parse of the schema page reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbInfo {
    pub page_size: u32,
    pub page_count: u32,
    /// Cell count of the schema page.
    pub number_of_tables: u16,
    /// One name per schema cell, in cell pointer order.
    pub table_names: Vec<String>,
    /// The schema cells behind `table_names`, with their types.
    pub schema: Vec<SchemaEntry>,
    pub header: DatabaseHeader,
}

impl DbInfo {
    /// Names of the user tables and views, without indexes, triggers or
    /// internal sqlite_ tables.
    pub fn user_table_names(&self) -> Vec<&str> {
        self.schema
            .iter()
            .filter(|entry| entry.is_user_table())
            .map(|entry| entry.name.as_str())
            .collect()
    }
}

/// A SQLite database read through a [`ByteSource`].
pub struct Database<S = File> {
    source: S,
}

impl Database<File> {
    /// Open a SQLite database file read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<S: ByteSource> Database<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Read the database header from the start of the file.
    pub fn read_header(&mut self) -> Result<DatabaseHeader> {
        let bytes = self.source.read_at(DB_HEADER_SIZE, 0)?;
        DatabaseHeader::parse(&bytes)
    }

    /// Read a page from the database (1-indexed).
    ///
    /// A page cut short by the end of the file comes back short.
    pub fn read_page(&mut self, page_num: u32, page_size: u32) -> Result<Vec<u8>> {
        if page_num == 0 {
            return Err(DbError::Decode("page numbers start at 1".to_string()));
        }
        let page_offset = (page_num as u64 - 1) * page_size as u64;
        trace!(page_num, page_offset, page_size, "reading page");
        Ok(self.source.read_at(page_size as usize, page_offset)?)
    }

    /// Parse the header and schema page and collect the table names.
    ///
    /// # Returns
    ///
    /// Returns the page size, page count, schema cell count and one
    /// [`SchemaEntry`] per cell in cell pointer order, or the first error met
    /// along the way.
    #[instrument(level = "debug", skip_all)]
    pub fn parse(&mut self) -> Result<DbInfo> {
        let header = self.read_header()?;
        if let Err(err) = header.validate() {
            warn!(%err, "database header looks malformed, continuing");
        }
        let page_size = header.page_size();
        debug!(page_size, page_count = header.page_count, "read database header");

        // Page 1 holds both the database header and the schema page header.
        let page = self.read_page(1, page_size)?;
        let page_header = PageHeader::parse(&page, PAGE1_HEADER_OFFSET)?;
        debug!(
            page_type = ?page_header.page_type,
            cell_count = page_header.cell_count,
            "read schema page header"
        );

        let cell_pointers = read_cell_pointers(
            &page,
            PAGE1_HEADER_OFFSET,
            page_header.header_size(),
            page_header.cell_count,
        )?;

        let schema = cell_pointers
            .iter()
            .map(|&pointer| {
                let offset = pointer as usize;
                let cell = page.get(offset..).ok_or(DbError::OutOfBounds {
                    offset,
                    len: 1,
                    available: page.len(),
                })?;
                trace!(offset, "decoding schema cell");
                SchemaEntry::from_row(decode_table_leaf_cell(cell)?)
            })
            .collect::<Result<Vec<_>>>()?;
        let table_names = schema.iter().map(|entry| entry.name.clone()).collect();

        Ok(DbInfo {
            page_size,
            page_count: header.page_count,
            number_of_tables: page_header.cell_count,
            table_names,
            schema,
            header,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db::fixture::{self, Column};
    use std::io::{Cursor, Write};

    fn parse(bytes: Vec<u8>) -> Result<DbInfo> {
        Database::new(Cursor::new(bytes)).parse()
    }

    #[test]
    fn two_single_column_tables() {
        let db = fixture::single_page_db(
            4096,
            1,
            &[
                fixture::table_leaf_cell(1, &[Column::Text("t1")]),
                fixture::table_leaf_cell(2, &[Column::Text("t2")]),
            ],
        );

        let info = parse(db).unwrap();
        assert_eq!(info.page_size, 4096);
        assert_eq!(info.page_count, 1);
        assert_eq!(info.number_of_tables, 2);
        assert_eq!(info.table_names, vec!["t1", "t2"]);
    }

    #[test]
    fn full_schema_rows() {
        let db = fixture::single_page_db(
            512,
            4,
            &[
                fixture::schema_cell(1, "table", "apples", 2, "CREATE TABLE apples (id, name)"),
                fixture::schema_cell(
                    2,
                    "table",
                    "sqlite_sequence",
                    3,
                    "CREATE TABLE sqlite_sequence(name,seq)",
                ),
                fixture::schema_cell(3, "table", "oranges", 4, "CREATE TABLE oranges (id, name)"),
            ],
        );

        let info = parse(db).unwrap();
        assert_eq!(info.page_size, 512);
        assert_eq!(info.page_count, 4);
        assert_eq!(info.number_of_tables, 3);
        assert_eq!(info.table_names, vec!["apples", "sqlite_sequence", "oranges"]);
        assert_eq!(info.user_table_names(), vec!["apples", "oranges"]);
    }

    #[test]
    fn indexes_and_triggers_do_not_repeat_their_table() {
        let db = fixture::single_page_db(
            4096,
            5,
            &[
                fixture::schema_cell(1, "table", "fruit", 2, "CREATE TABLE fruit (name text)"),
                fixture::schema_row(
                    2,
                    "index",
                    "idx_fruit",
                    "fruit",
                    3,
                    "CREATE INDEX idx_fruit on fruit(name)",
                ),
                fixture::schema_cell(3, "table", "apples", 4, "CREATE TABLE apples (id, name)"),
                fixture::schema_row(
                    4,
                    "trigger",
                    "apples_ai",
                    "apples",
                    0,
                    "CREATE TRIGGER apples_ai AFTER INSERT ON apples BEGIN SELECT 1; END",
                ),
                fixture::schema_cell(5, "view", "v", 0, "CREATE VIEW v AS SELECT * FROM fruit"),
            ],
        );

        let info = parse(db).unwrap();
        assert_eq!(info.number_of_tables, 5);
        assert_eq!(
            info.table_names,
            vec!["fruit", "fruit", "apples", "apples", "v"]
        );
        assert_eq!(info.schema[1].kind, "index");
        assert_eq!(info.user_table_names(), vec!["fruit", "apples", "v"]);
    }

    #[test]
    fn empty_schema_page() {
        let info = parse(fixture::single_page_db(4096, 1, &[])).unwrap();
        assert_eq!(info.number_of_tables, 0);
        assert!(info.table_names.is_empty());
    }

    #[test]
    fn malformed_header_fields_are_not_fatal() {
        let mut db = fixture::single_page_db(
            4096,
            1,
            &[fixture::table_leaf_cell(1, &[Column::Text("t1")])],
        );
        db[0] = b'X';
        db[80] = 0xff;

        let info = parse(db).unwrap();
        assert_eq!(info.table_names, vec!["t1"]);
        assert_eq!(info.header.magic[0], b'X');
    }

    #[test]
    fn short_file_is_a_truncated_header() {
        assert!(matches!(
            parse(vec![0u8; 60]),
            Err(DbError::TruncatedHeader { needed: 100, available: 60 })
        ));
    }

    #[test]
    fn header_without_page_is_a_truncated_page() {
        let db = fixture::header_bytes(4096, 1);
        assert!(matches!(parse(db), Err(DbError::TruncatedPage { .. })));
    }

    #[test]
    fn cell_pointer_past_the_page_is_out_of_bounds() {
        let mut db = fixture::single_page_db(
            512,
            1,
            &[
                fixture::table_leaf_cell(1, &[Column::Text("t1")]),
                fixture::table_leaf_cell(2, &[Column::Text("t2")]),
            ],
        );
        // Point the second cell past the end of the page.
        db[110..112].copy_from_slice(&600u16.to_be_bytes());

        assert!(matches!(
            parse(db),
            Err(DbError::OutOfBounds { offset: 600, available: 512, .. })
        ));
    }

    #[test]
    fn pointer_array_longer_than_page_is_out_of_bounds() {
        let mut db = fixture::single_page_db(512, 1, &[]);
        db[103..105].copy_from_slice(&300u16.to_be_bytes());
        assert!(matches!(parse(db), Err(DbError::OutOfBounds { .. })));
    }

    #[test]
    fn read_page_rejects_page_zero() {
        let mut db = Database::new(Cursor::new(vec![0u8; 512]));
        assert!(matches!(db.read_page(0, 512), Err(DbError::Decode(_))));
    }

    #[test]
    fn read_page_addresses_pages_from_one() {
        let bytes: Vec<u8> = (0..4u8).flat_map(|n| [n; 512]).collect();
        let mut db = Database::new(Cursor::new(bytes));
        assert_eq!(db.read_page(3, 512).unwrap(), vec![2u8; 512]);
    }

    #[test]
    fn opens_a_file_on_disk() {
        let bytes = fixture::single_page_db(
            1024,
            1,
            &[fixture::schema_cell(
                1,
                "table",
                "fruit",
                2,
                "CREATE TABLE fruit (name text)",
            )],
        );
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let info = Database::open(file.path()).unwrap().parse().unwrap();
        assert_eq!(info.page_size, 1024);
        assert_eq!(info.table_names, vec!["fruit"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Database::open(dir.path().join("missing.db")),
            Err(DbError::Io(_))
        ));
    }
}
