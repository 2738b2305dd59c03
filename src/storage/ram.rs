//! RAM-backed storage.
//!
//! Behaves like an erased EEPROM of `N` bytes. Useful on hosts, in tests and
//! as a staging area for flash-emulated EEPROM where [`Storage::commit`] is
//! the point at which the page gets programmed.

use super::error::Error;
use super::{ReadStorage, Storage};

/// Value of a byte that has never been written.
pub const ERASED_BYTE: u8 = 0xFF;

/// Fixed-size in-memory storage.
///
/// Keeps simple counters of write and commit calls so callers can verify
/// whether an operation touched the store at all.
///
/// # Examples
///
/// ```rust
/// use confshell::storage::ram::{RamStorage, ERASED_BYTE};
/// use confshell::storage::ReadStorage;
///
/// let mut store: RamStorage<16> = RamStorage::new();
/// assert_eq!(store.read_byte(3).unwrap(), ERASED_BYTE);
/// assert_eq!(store.write_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct RamStorage<const N: usize> {
    memory: [u8; N],
    writes: usize,
    commits: usize,
}

impl<const N: usize> Default for RamStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamStorage<N> {
    /// Create an erased store.
    pub fn new() -> Self {
        Self {
            memory: [ERASED_BYTE; N],
            writes: 0,
            commits: 0,
        }
    }

    /// Create a store pre-loaded with `image` at offset 0.
    ///
    /// Bytes past the end of `image` read as [`ERASED_BYTE`]; an image longer
    /// than `N` is truncated.
    pub fn from_image(image: &[u8]) -> Self {
        let mut storage = Self::new();
        let len = image.len().min(N);
        storage.memory[..len].copy_from_slice(&image[..len]);
        storage
    }

    /// Raw contents of the store.
    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }

    /// Mutable raw contents, for simulating corruption.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Number of successful `write` calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Number of `commit` calls since creation.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Reset every byte to [`ERASED_BYTE`].
    pub fn erase(&mut self) {
        self.memory.fill(ERASED_BYTE);
    }

    fn bounds(offset: u32, len: usize) -> Result<core::ops::Range<usize>, Error> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(Error::OutOfBounds)?;
        if end > N {
            return Err(Error::OutOfBounds);
        }
        Ok(start..end)
    }
}

impl<const N: usize> ReadStorage for RamStorage<N> {
    type Error = Error;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = Self::bounds(offset, bytes.len())?;
        bytes.copy_from_slice(&self.memory[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Storage for RamStorage<N> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = Self::bounds(offset, bytes.len())?;
        self.memory[range].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.commits += 1;
        Ok(())
    }
}
