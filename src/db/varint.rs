//! Variable-length integer (varint) operations for SQLite format.

use super::error::{DbError, Result};

const VARINT_MAX_BYTES: usize = 9;
const VARINT_CONTINUATION_BIT: u8 = 0x80;
const VARINT_DATA_MASK: u8 = 0x7F;

/// Read a varint from a byte slice starting at the given position.
///
/// Varints are a variable-length encoding for integers used by SQLite.
/// They use 1-9 bytes depending on the magnitude of the value. The first
/// eight bytes carry 7 bits each; a ninth byte carries all 8 of its bits.
///
/// The full 64-bit value is returned as-is. Callers that convert it to
/// `i64` or `f64` inherit the usual loss of precision above 2^53.
///
/// # Returns
///
/// Returns a tuple of (value, number of bytes read), or [`DbError::Decode`]
/// if the slice ends before the varint does.
pub fn read_varint(data: &[u8], pos: usize) -> Result<(u64, usize)> {
    let mut value: u64 = 0;

    for i in 0..VARINT_MAX_BYTES {
        let byte = *data.get(pos + i).ok_or_else(|| {
            DbError::Decode(format!(
                "varint at offset {pos} ends after {i} of {} bytes",
                data.len().saturating_sub(pos)
            ))
        })?;

        if i == VARINT_MAX_BYTES - 1 {
            // 9th byte uses all 8 bits
            value = (value << 8) | byte as u64;
            return Ok((value, VARINT_MAX_BYTES));
        }

        value = (value << 7) | (byte & VARINT_DATA_MASK) as u64;
        if byte & VARINT_CONTINUATION_BIT == 0 {
            return Ok((value, i + 1));
        }
    }

    unreachable!("the ninth byte always terminates the varint")
}

/// Encode a value in SQLite's canonical varint form.
pub fn encode_varint(value: u64) -> Vec<u8> {
    if value >> 56 != 0 {
        // Needs the 9-byte form: 8 groups of 7 bits, then a full last byte.
        let mut bytes = Vec::with_capacity(VARINT_MAX_BYTES);
        let high = value >> 8;
        for i in (0..8).rev() {
            bytes.push(((high >> (i * 7)) as u8 & VARINT_DATA_MASK) | VARINT_CONTINUATION_BIT);
        }
        bytes.push(value as u8);
        return bytes;
    }

    let mut groups = Vec::with_capacity(8);
    let mut n = value;
    loop {
        groups.push(n as u8 & VARINT_DATA_MASK);
        n >>= 7;
        if n == 0 {
            break;
        }
    }

    groups.reverse();
    let last = groups.len() - 1;
    for byte in &mut groups[..last] {
        *byte |= VARINT_CONTINUATION_BIT;
    }
    groups
}
