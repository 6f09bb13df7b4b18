//! Record parsing utilities for SQLite database format.
//!
//! A record is a header (its own length as a varint, then one serial type
//! per column) followed by the column values packed back to back.

use bytes::Buf;
use std::fmt::Write;

use super::error::{DbError, Result, slice_at};
use super::varint::read_varint;

/// Get the size in bytes of a column value based on its serial type code.
///
/// SQLite uses serial type codes to indicate the type and size of column values.
/// This function returns the number of bytes a value occupies based on its type.
///
/// # Arguments
///
/// * `serial_type` - The serial type code from the record header
///
/// # Returns
///
/// The size in bytes of the column value.
pub fn get_column_size(serial_type: u64) -> usize {
    match serial_type {
        0 => 0, // NULL
        1 => 1, // 8-bit integer
        2 => 2, // 16-bit integer
        3 => 3, // 24-bit integer
        4 => 4, // 32-bit integer
        5 => 6, // 48-bit integer
        6 => 8, // 64-bit integer
        7 => 8, // IEEE 754 float
        8 | 9 => 0, // Integer constants 0 and 1
        10 | 11 => 0, // Reserved
        n if n % 2 == 0 => ((n - 12) / 2) as usize, // BLOB
        n => ((n - 13) / 2) as usize, // Text string
    }
}

/// Decode one column value to its string form.
///
/// Text and blob values take all of `data`; the caller slices it to the
/// column's size. Fixed-width numbers read their leading bytes. Serial types
/// 8 and 9 both yield `"0"`. NULL and the reserved codes yield
/// `row_id_fallback`, which is how an `INTEGER PRIMARY KEY` column stored as
/// NULL reads back as its rowid.
///
/// # Arguments
///
/// * `data` - The column bytes
/// * `serial_type` - The serial type code from the record header
/// * `row_id_fallback` - Value reported for NULL and reserved serial types
///
/// # Returns
///
/// Returns the value as a string, or [`DbError::Decode`] if `data` is
/// shorter than the serial type requires.
pub fn decode_value(data: &[u8], serial_type: u64, row_id_fallback: i64) -> Result<String> {
    let size = get_column_size(serial_type);
    if data.len() < size {
        return Err(DbError::Decode(format!(
            "serial type {serial_type} needs {size} bytes, have {}",
            data.len()
        )));
    }

    let value = match serial_type {
        1..=6 => read_signed(data, size).to_string(),
        7 => (&data[..size]).get_f64().to_string(),
        8 | 9 => "0".to_string(),
        n if n >= 12 && n % 2 == 0 => hex_encode(data),
        n if n >= 13 => String::from_utf8_lossy(data).into_owned(),
        _ => row_id_fallback.to_string(),
    };

    Ok(value)
}

/// Big-endian two's complement integer of `size` bytes, sign-extended.
fn read_signed(data: &[u8], size: usize) -> i64 {
    let raw = (&data[..size]).get_uint(size);
    let shift = 64 - size * 8;
    ((raw << shift) as i64) >> shift
}

/// Decode the record starting at `offset` in `data` into one string per column.
///
/// # Arguments
///
/// * `data` - The buffer containing the record
/// * `offset` - The byte offset of the record header in `data`
/// * `row_id_fallback` - Value reported for NULL columns
///
/// # Returns
///
/// Returns the column values in order. A header whose serial types overrun
/// its declared size is a [`DbError::Decode`]; a column running past `data`
/// is a [`DbError::OutOfBounds`].
pub fn decode_record(data: &[u8], offset: usize, row_id_fallback: i64) -> Result<Vec<String>> {
    let (header_size, bytes_read) = read_varint(data, offset)?;
    let mut pos = offset + bytes_read;

    // Signed so that a serial type running past the declared header shows up.
    let mut remaining = header_size as i64 - bytes_read as i64;
    let mut serial_types = Vec::new();
    while remaining > 0 {
        let (serial_type, bytes_read) = read_varint(data, pos)?;
        serial_types.push(serial_type);
        pos += bytes_read;
        remaining -= bytes_read as i64;
    }

    if remaining < 0 {
        return Err(DbError::Decode(format!(
            "record header at offset {offset} declares {header_size} bytes \
             but its serial types end {} bytes later",
            -remaining
        )));
    }

    let mut values = Vec::with_capacity(serial_types.len());
    for serial_type in serial_types {
        let size = get_column_size(serial_type);
        let column = slice_at(data, pos, size)?;
        values.push(decode_value(column, serial_type, row_id_fallback)?);
        pos += size;
    }

    Ok(values)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
