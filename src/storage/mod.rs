//! # Storage abstraction for persisted settings
//!
//! This module provides the traits the configuration codec uses to reach
//! non-volatile memory. The codec treats the device as one linear, byte
//! addressable region starting at offset 0 and owns that region exclusively.
//!
//! # Core Traits
//!
//! - [`ReadStorage`]: Read bytes at an offset
//! - [`Storage`]: Read, write and commit
//!
//! Stores that buffer writes in RAM (emulated EEPROM on flash, for example)
//! override [`Storage::commit`] to flush. Stores that write through (real
//! EEPROM, FRAM) can keep the default no-op.
//!
//! # Usage Examples
//!
//! ```rust
//! use confshell::storage::{ReadStorage, Storage};
//! use confshell::storage::ram::RamStorage;
//!
//! let mut eeprom: RamStorage<64> = RamStorage::new();
//! eeprom.write(0, &[0x2A, 0x00, 0x00, 0x00]).unwrap();
//! eeprom.commit().unwrap();
//!
//! let mut word = [0u8; 4];
//! eeprom.read(0, &mut word).unwrap();
//! assert_eq!(u32::from_le_bytes(word), 42);
//! ```

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for storage operations
pub mod error;

/// RAM-backed storage, used on hosts and in tests
pub mod ram;

/// Re-exports of common traits for convenient importing
pub mod prelude {
    pub use super::{ReadStorage, Storage};
}

/// Trait for reading data from storage devices.
///
/// # Examples
///
/// ```rust,no_run
/// use confshell::storage::ReadStorage;
///
/// fn read_word<S: ReadStorage>(storage: &mut S, offset: u32) -> Result<u32, S::Error> {
///     let mut bytes = [0u8; 4];
///     storage.read(offset, &mut bytes)?;
///     Ok(u32::from_le_bytes(bytes))
/// }
/// ```
pub trait ReadStorage {
    /// Associated error type for read operations
    type Error: core::fmt::Debug;

    /// Read data from the storage device.
    ///
    /// Fills `bytes` from `offset` onwards.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if offset + buffer length exceeds device capacity
    /// - `ReadError` if the hardware read fails
    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error>;

    /// Total capacity of the region in bytes.
    fn capacity(&self) -> usize;

    /// Read a single byte.
    fn read_byte(&mut self, offset: u32) -> Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        self.read(offset, &mut byte)?;
        Ok(byte[0])
    }
}

/// Trait for storage devices that support both read and write operations.
pub trait Storage: ReadStorage {
    /// Write data to the storage device.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if offset + data length exceeds device capacity
    /// - `WriteError` if the hardware write fails
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Flush pending writes to the medium.
    ///
    /// The default implementation does nothing, which is correct for
    /// write-through devices.
    fn commit(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<S: ReadStorage + ?Sized> ReadStorage for &mut S {
    type Error = S::Error;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(offset, bytes)
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(offset, bytes)
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        (**self).commit()
    }
}
