//! Database header parsing for SQLite format.
//!
//! The first 100 bytes of the file. Every multibyte field is big-endian.

use bytes::Buf;

use super::constants::{
    DB_HEADER_SIZE, HEADER_MAGIC, PAGE_SIZE_65536, PAGE_SIZE_MAX, PAGE_SIZE_MIN,
    PAGE_SIZE_SENTINEL,
};
use super::error::{DbError, Result};

/// Text encoding of every string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TryFrom<u32> for TextEncoding {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, u32> {
        match value {
            1 => Ok(Self::Utf8),
            2 => Ok(Self::Utf16Le),
            3 => Ok(Self::Utf16Be),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf8"),
            Self::Utf16Le => write!(f, "utf16le"),
            Self::Utf16Be => write!(f, "utf16be"),
        }
    }
}

/// The 100-byte database file header, field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHeader {
    /// Offset 0, 16 bytes: "SQLite format 3\0".
    pub magic: [u8; 16],
    /// Offset 16, u16: page size as stored; see [`DatabaseHeader::page_size`].
    pub raw_page_size: u16,
    /// Offset 18, u8: 1 for legacy, 2 for WAL.
    pub write_version: u8,
    /// Offset 19, u8: 1 for legacy, 2 for WAL.
    pub read_version: u8,
    /// Offset 20, u8: unused bytes at the end of each page.
    pub reserved_space: u8,
    /// Offset 21, u8: must be 64.
    pub max_payload_fraction: u8,
    /// Offset 22, u8: must be 32.
    pub min_payload_fraction: u8,
    /// Offset 23, u8: must be 32.
    pub leaf_payload_fraction: u8,
    /// Offset 24, u32.
    pub file_change_counter: u32,
    /// Offset 28, u32: size of the database file in pages.
    pub page_count: u32,
    /// Offset 32, u32: page number of the first freelist trunk page.
    pub first_freelist_trunk_page: u32,
    /// Offset 36, u32.
    pub freelist_page_count: u32,
    /// Offset 40, u32.
    pub schema_cookie: u32,
    /// Offset 44, u32: 1 through 4.
    pub schema_format: u32,
    /// Offset 48, u32.
    pub default_cache_size: u32,
    /// Offset 52, u32: non-zero in auto-vacuum mode.
    pub largest_root_page: u32,
    /// Offset 56, u32: 1 UTF-8, 2 UTF-16le, 3 UTF-16be.
    pub text_encoding: u32,
    /// Offset 60, u32.
    pub user_version: u32,
    /// Offset 64, u32.
    pub incremental_vacuum: u32,
    /// Offset 68, u32.
    pub application_id: u32,
    /// Offset 72, 20 bytes: must be zero.
    pub reserved_expansion: [u8; 20],
    /// Offset 92, u32.
    pub version_valid_for: u32,
    /// Offset 96, u32.
    pub sqlite_version_number: u32,
}

impl DatabaseHeader {
    /// Parse the header from the first bytes of the file.
    ///
    /// Fields are extracted as stored; nothing is validated here. Use
    /// [`DatabaseHeader::validate`] for that.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The start of the database file; only the first 100 bytes are read
    ///
    /// # Returns
    ///
    /// Returns the populated header, or [`DbError::TruncatedHeader`] if fewer
    /// than 100 bytes are given.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < DB_HEADER_SIZE {
            return Err(DbError::TruncatedHeader {
                needed: DB_HEADER_SIZE,
                available: bytes.len(),
            });
        }
        let mut buf = &bytes[..DB_HEADER_SIZE];

        let mut magic = [0u8; 16];
        buf.copy_to_slice(&mut magic);
        let raw_page_size = buf.get_u16();
        let write_version = buf.get_u8();
        let read_version = buf.get_u8();
        let reserved_space = buf.get_u8();
        let max_payload_fraction = buf.get_u8();
        let min_payload_fraction = buf.get_u8();
        let leaf_payload_fraction = buf.get_u8();
        let file_change_counter = buf.get_u32();
        let page_count = buf.get_u32();
        let first_freelist_trunk_page = buf.get_u32();
        let freelist_page_count = buf.get_u32();
        let schema_cookie = buf.get_u32();
        let schema_format = buf.get_u32();
        let default_cache_size = buf.get_u32();
        let largest_root_page = buf.get_u32();
        let text_encoding = buf.get_u32();
        let user_version = buf.get_u32();
        let incremental_vacuum = buf.get_u32();
        let application_id = buf.get_u32();
        let mut reserved_expansion = [0u8; 20];
        buf.copy_to_slice(&mut reserved_expansion);
        let version_valid_for = buf.get_u32();
        let sqlite_version_number = buf.get_u32();

        Ok(Self {
            magic,
            raw_page_size,
            write_version,
            read_version,
            reserved_space,
            max_payload_fraction,
            min_payload_fraction,
            leaf_payload_fraction,
            file_change_counter,
            page_count,
            first_freelist_trunk_page,
            freelist_page_count,
            schema_cookie,
            schema_format,
            default_cache_size,
            largest_root_page,
            text_encoding,
            user_version,
            incremental_vacuum,
            application_id,
            reserved_expansion,
            version_valid_for,
            sqlite_version_number,
        })
    }

    /// Page size in bytes, with the stored value 1 meaning 65536.
    pub fn page_size(&self) -> u32 {
        if self.raw_page_size == PAGE_SIZE_SENTINEL {
            PAGE_SIZE_65536
        } else {
            self.raw_page_size as u32
        }
    }

    /// The text encoding, or the raw code if it is not one SQLite defines.
    pub fn text_encoding(&self) -> Result<TextEncoding, u32> {
        TextEncoding::try_from(self.text_encoding)
    }

    /// Check the invariants every well-formed header satisfies.
    ///
    /// # Returns
    ///
    /// Returns [`DbError::InvalidHeader`] if the magic string is wrong, the page
    /// size is not a power of two between 512 and 65536, or the reserved
    /// expansion bytes are not zero.
    pub fn validate(&self) -> Result<()> {
        if &self.magic != HEADER_MAGIC {
            return Err(DbError::InvalidHeader(format!(
                "expected magic {:?}, found {:?}",
                String::from_utf8_lossy(HEADER_MAGIC),
                String::from_utf8_lossy(&self.magic)
            )));
        }

        let page_size = self.page_size();
        let in_range = (PAGE_SIZE_MIN..=PAGE_SIZE_MAX).contains(&page_size);
        if page_size != PAGE_SIZE_65536 && !(page_size.is_power_of_two() && in_range) {
            return Err(DbError::InvalidHeader(format!(
                "page size must be a power of two between 512 and 65536: {}",
                self.raw_page_size
            )));
        }

        if self.reserved_expansion.iter().any(|&b| b != 0) {
            return Err(DbError::InvalidHeader(
                "reserved expansion bytes are not zero".to_string(),
            ));
        }

        Ok(())
    }
}
