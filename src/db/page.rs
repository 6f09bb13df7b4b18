//! B-tree page header and cell pointer array parsing.
//!
//! A b-tree page holds, in order: the 100-byte database header (page 1
//! only), the 8 or 12 byte page header, the cell pointer array, unallocated
//! space, and the cell content area. All multibyte values are big-endian.

use bytes::Buf;

use super::constants::{INTERIOR_PAGE_HEADER_SIZE, LEAF_PAGE_HEADER_SIZE};
use super::error::{DbError, Result, slice_at};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    InteriorIndex = 2,
    InteriorTable = 5,
    LeafIndex = 10,
    LeafTable = 13,
}

impl PageType {
    pub fn is_leaf(self) -> bool {
        matches!(self, PageType::LeafIndex | PageType::LeafTable)
    }

    /// Leaf pages have an 8 byte header, interior pages a 12 byte one.
    pub fn header_size(self) -> usize {
        if self.is_leaf() {
            LEAF_PAGE_HEADER_SIZE
        } else {
            INTERIOR_PAGE_HEADER_SIZE
        }
    }
}

impl TryFrom<u8> for PageType {
    type Error = DbError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            2 => Ok(Self::InteriorIndex),
            5 => Ok(Self::InteriorTable),
            10 => Ok(Self::LeafIndex),
            13 => Ok(Self::LeafTable),
            _ => Err(DbError::Decode(format!("invalid page type: {value}"))),
        }
    }
}

/// B-tree page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub page_type: PageType,
    /// Offset of the first freeblock, 0 if there are none.
    pub first_freeblock: u16,
    pub cell_count: u16,
    /// Start of the cell content area. A stored 0 means 65536.
    pub cell_content_start: u32,
    pub fragmented_free_bytes: u8,
    /// Page number of the right-most child, interior pages only.
    pub right_most_pointer: Option<u32>,
}

impl PageHeader {
    /// Parse the page header found at `offset` in `page`.
    ///
    /// # Arguments
    ///
    /// * `page` - The page data containing the header
    /// * `offset` - Where the header starts (100 on page 1, 0 elsewhere)
    ///
    /// # Returns
    ///
    /// Returns the header, [`DbError::TruncatedPage`] if fewer bytes than the
    /// header size remain, or [`DbError::Decode`] for an unknown page type.
    pub fn parse(page: &[u8], offset: usize) -> Result<Self> {
        let available = page.len().saturating_sub(offset);
        let mut buf = page.get(offset..).unwrap_or_default();
        if buf.is_empty() {
            return Err(DbError::TruncatedPage {
                needed: LEAF_PAGE_HEADER_SIZE,
                available,
            });
        }

        let page_type = PageType::try_from(buf.get_u8())?;
        let needed = page_type.header_size();
        if available < needed {
            return Err(DbError::TruncatedPage { needed, available });
        }

        let first_freeblock = buf.get_u16();
        let cell_count = buf.get_u16();
        let cell_content_start = match buf.get_u16() {
            0 => 65536,
            n => n as u32,
        };
        let fragmented_free_bytes = buf.get_u8();
        let right_most_pointer = (!page_type.is_leaf()).then(|| buf.get_u32());

        Ok(Self {
            page_type,
            first_freeblock,
            cell_count,
            cell_content_start,
            fragmented_free_bytes,
            right_most_pointer,
        })
    }

    pub fn header_size(&self) -> usize {
        self.page_type.header_size()
    }

    /// The right-most child as a 0-based page index.
    ///
    /// Page numbers on disk start at 1; a stored 0 has no index.
    pub fn right_most_page_index(&self) -> Option<u32> {
        self.right_most_pointer?.checked_sub(1)
    }
}

/// Read the cell pointer array that follows a page header.
///
/// # Arguments
///
/// * `page` - The page data containing the cell pointer array
/// * `header_offset` - Where the page header starts
/// * `header_size` - Size of the page header, 8 or 12 bytes
/// * `cell_count` - Number of entries in the array
///
/// # Returns
///
/// Returns the cell offsets, relative to the start of the page, in storage
/// order, or [`DbError::OutOfBounds`] if the page is too short to hold them.
pub fn read_cell_pointers(
    page: &[u8],
    header_offset: usize,
    header_size: usize,
    cell_count: u16,
) -> Result<Vec<u16>> {
    let start = header_offset + header_size;
    let mut array = slice_at(page, start, cell_count as usize * 2)?;

    Ok((0..cell_count).map(|_| array.get_u16()).collect())
}
