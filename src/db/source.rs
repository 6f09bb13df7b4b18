//! Random-access reads from whatever holds the database bytes.

use std::io::{self, Read, Seek, SeekFrom};

/// Anything that can hand out `len` bytes starting at an absolute offset.
///
/// A read that runs into the end of the source returns the bytes that were
/// there; the parsers turn a short buffer into a truncation error.
pub trait ByteSource {
    fn read_at(&mut self, len: usize, offset: u64) -> io::Result<Vec<u8>>;
}

impl<T: Read + Seek> ByteSource for T {
    fn read_at(&mut self, len: usize, offset: u64) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(offset))?;

        let mut bytes = Vec::with_capacity(len);
        self.by_ref().take(len as u64).read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
