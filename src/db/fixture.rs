//! Builders for synthetic database images used by the tests.

use super::constants::{DB_HEADER_SIZE, HEADER_MAGIC};
use super::varint::encode_varint;

pub enum Column<'a> {
    Null,
    Int(i8),
    Text(&'a str),
}

/// A 100-byte header with sane defaults for everything but the page size
/// and page count.
pub fn header_bytes(page_size: u16, page_count: u32) -> Vec<u8> {
    let mut header = vec![0u8; DB_HEADER_SIZE];
    header[..16].copy_from_slice(HEADER_MAGIC);
    header[16..18].copy_from_slice(&page_size.to_be_bytes());
    header[18] = 1;
    header[19] = 1;
    header[21] = 64;
    header[22] = 32;
    header[23] = 32;
    header[28..32].copy_from_slice(&page_count.to_be_bytes());
    header[44..48].copy_from_slice(&4u32.to_be_bytes());
    header[56..60].copy_from_slice(&1u32.to_be_bytes());
    header
}

/// Serialize a record: header size, serial types, then the column bodies.
pub fn record(columns: &[Column]) -> Vec<u8> {
    let mut types = Vec::new();
    let mut body = Vec::new();
    for column in columns {
        match column {
            Column::Null => types.push(0),
            Column::Int(n) => {
                types.push(1);
                body.push(*n as u8);
            }
            Column::Text(s) => {
                types.extend(encode_varint(13 + 2 * s.len() as u64));
                body.extend_from_slice(s.as_bytes());
            }
        }
    }

    // The header size counts its own varint; one byte is enough here.
    let mut out = encode_varint(types.len() as u64 + 1);
    out.extend(types);
    out.extend(body);
    out
}

pub fn table_leaf_cell(rowid: u64, columns: &[Column]) -> Vec<u8> {
    let record = record(columns);
    let mut cell = encode_varint(record.len() as u64);
    cell.extend(encode_varint(rowid));
    cell.extend(record);
    cell
}

pub fn index_leaf_cell(columns: &[Column]) -> Vec<u8> {
    let record = record(columns);
    let mut cell = encode_varint(record.len() as u64);
    cell.extend(record);
    cell
}

/// A row of sqlite_schema: type, name, tbl_name, rootpage, sql.
pub fn schema_row(
    rowid: u64,
    kind: &str,
    name: &str,
    tbl_name: &str,
    rootpage: i8,
    sql: &str,
) -> Vec<u8> {
    table_leaf_cell(
        rowid,
        &[
            Column::Text(kind),
            Column::Text(name),
            Column::Text(tbl_name),
            Column::Int(rootpage),
            Column::Text(sql),
        ],
    )
}

/// A schema row whose name and tbl_name agree, as for tables and views.
pub fn schema_cell(rowid: u64, kind: &str, name: &str, rootpage: i8, sql: &str) -> Vec<u8> {
    schema_row(rowid, kind, name, name, rootpage, sql)
}

/// A one-page database whose schema page is a table leaf holding `cells`.
///
/// Cells are packed from the end of the page backwards, the way SQLite
/// lays them out, and the pointer array lists them in the given order.
pub fn single_page_db(page_size: u16, page_count: u32, cells: &[Vec<u8>]) -> Vec<u8> {
    let mut page = vec![0u8; page_size as usize];
    page[..DB_HEADER_SIZE].copy_from_slice(&header_bytes(page_size, page_count));

    let mut content_start = page.len();
    let mut pointers = Vec::with_capacity(cells.len());
    for cell in cells {
        content_start -= cell.len();
        page[content_start..content_start + cell.len()].copy_from_slice(cell);
        pointers.push(content_start as u16);
    }

    let header = DB_HEADER_SIZE;
    page[header] = 13;
    page[header + 3..header + 5].copy_from_slice(&(cells.len() as u16).to_be_bytes());
    page[header + 5..header + 7].copy_from_slice(&(content_start as u16).to_be_bytes());
    for (i, pointer) in pointers.iter().enumerate() {
        let at = header + 8 + i * 2;
        page[at..at + 2].copy_from_slice(&pointer.to_be_bytes());
    }

    page
}
