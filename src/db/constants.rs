//! Constants used throughout the SQLite database parsing.

/// The 16-byte signature every SQLite 3 database starts with.
pub const HEADER_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// Size of the database header (on page 1).
pub const DB_HEADER_SIZE: usize = 100;

/// Page 1 has the database header first, so its page header starts at 100.
pub const PAGE1_HEADER_OFFSET: usize = DB_HEADER_SIZE;

/// Smallest and largest page sizes that fit in the 16-bit field.
pub const PAGE_SIZE_MIN: u32 = 512;
pub const PAGE_SIZE_MAX: u32 = 32768;

/// A stored page size of 1 means 65536.
pub const PAGE_SIZE_SENTINEL: u16 = 1;
pub const PAGE_SIZE_65536: u32 = 65536;

/// B-tree page header sizes.
pub const LEAF_PAGE_HEADER_SIZE: usize = 8;
pub const INTERIOR_PAGE_HEADER_SIZE: usize = 12;

/// Column indices in the sqlite_schema table.
pub const SCHEMA_TYPE_COLUMN: usize = 0;
pub const SCHEMA_TBL_NAME_COLUMN: usize = 2;
