//! Errors raised while decoding a database file.

use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database header truncated: need {needed} bytes, have {available}")]
    TruncatedHeader { needed: usize, available: usize },

    #[error("page truncated: need {needed} bytes, have {available}")]
    TruncatedPage { needed: usize, available: usize },

    #[error("{len} bytes at offset {offset} run past a buffer of {available} bytes")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid database header: {0}")]
    InvalidHeader(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Borrow `len` bytes at `offset`, or fail with [`DbError::OutOfBounds`].
pub fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(DbError::OutOfBounds {
            offset,
            len,
            available: data.len(),
        })
}
