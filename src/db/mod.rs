//! SQLite database file parsing.

mod cell;
mod constants;
mod database;
mod error;
mod header;
mod page;
mod record;
mod schema;
mod source;
mod varint;

#[cfg(test)]
mod fixture;

// Re-export public API
pub use cell::{IndexEntry, decode_index_leaf_cell, decode_table_leaf_cell};
pub use database::{Database, DbInfo};
pub use error::{DbError, Result};
pub use header::{DatabaseHeader, TextEncoding};
pub use page::{PageHeader, PageType, read_cell_pointers};
pub use record::{decode_record, decode_value, get_column_size};
pub use schema::SchemaEntry;
pub use source::ByteSource;
pub use varint::{encode_varint, read_varint};
