//! B-tree leaf cell decoding.
//!
//! A table leaf cell is `payload size (varint) + rowid (varint) + record`.
//! An index leaf cell is `payload size (varint) + record`, where the record
//! holds the indexed value followed by the rowid it points at.

use super::error::{DbError, Result};
use super::record::decode_record;
use super::varint::read_varint;

/// An entry from an index b-tree leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub indexed_value: String,
    pub id: String,
}

/// Decode a table leaf cell into its column values.
///
/// The rowid doubles as the value of any NULL column, which is how SQLite
/// stores an `INTEGER PRIMARY KEY`.
///
/// # Arguments
///
/// * `cell` - The page data starting at the cell
///
/// # Returns
///
/// Returns the column values of the cell's record in order.
pub fn decode_table_leaf_cell(cell: &[u8]) -> Result<Vec<String>> {
    // Read payload size (varint); no overflow pages are followed
    let (_payload_size, bytes_read) = read_varint(cell, 0)?;
    let mut pos = bytes_read;

    // Read rowid (varint)
    let (rowid, bytes_read) = read_varint(cell, pos)?;
    pos += bytes_read;

    decode_record(cell, pos, rowid as i64)
}

/// Decode an index leaf cell into its indexed value and rowid.
pub fn decode_index_leaf_cell(cell: &[u8]) -> Result<IndexEntry> {
    let (_payload_size, bytes_read) = read_varint(cell, 0)?;

    let mut values = decode_record(cell, bytes_read, 0)?.into_iter();
    match (values.next(), values.next()) {
        (Some(indexed_value), Some(id)) => Ok(IndexEntry { indexed_value, id }),
        _ => Err(DbError::Decode(
            "index cell holds fewer than two columns".to_string(),
        )),
    }
}
