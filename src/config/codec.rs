//! Persistence of the registry to a linear byte region.
//!
//! Entries are written back to back starting at offset 0, in registration
//! order. No entry knows its own offset: each one starts where the previous
//! one ended. The layout carries no schema information, so changing the set
//! of entries, their order, or the length of a stored string shifts every
//! later offset and old data will be misread.
//!
//! [`Layout::Versioned`] is an opt-in guard against that: a version byte in
//! front and a CRC-32 of the entry bytes behind. A mismatch on either makes
//! the load fail, which restores defaults.
//!
//! ```text
//! Plain:      | entry 0 | entry 1 | ... | entry n |
//! Versioned:  | ver | entry 0 | ... | entry n | crc32 (LE) |
//! ```

use crc32fast::Hasher;

use super::error::Error;
use super::registry::Registry;
use crate::storage::{ReadStorage, Storage};

/// Byte layout used by [`save`] and [`load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Entries only.
    #[default]
    Plain,
    /// Version byte, entries, CRC-32 trailer.
    Versioned(u8),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Layout {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Layout::Plain => defmt::write!(f, "Plain"),
            Layout::Versioned(version) => defmt::write!(f, "Versioned({=u8})", *version),
        }
    }
}

/// Sequential reader/writer over a storage region.
///
/// Advances by the number of bytes moved on every call. When created with
/// [`Cursor::with_checksum`] it also feeds every byte through a CRC-32.
pub struct Cursor<'s, S: ?Sized> {
    storage: &'s mut S,
    offset: u32,
    hasher: Option<Hasher>,
}

impl<S: ?Sized> core::fmt::Debug for Cursor<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset)
            .field("checksum", &self.hasher.is_some())
            .finish()
    }
}

impl<'s, S: ?Sized> Cursor<'s, S> {
    pub fn new(storage: &'s mut S, offset: u32) -> Self {
        Self {
            storage,
            offset,
            hasher: None,
        }
    }

    /// Cursor that checksums the bytes it moves.
    pub fn with_checksum(storage: &'s mut S, offset: u32) -> Self {
        Self {
            storage,
            offset,
            hasher: Some(Hasher::new()),
        }
    }

    /// Current offset in the region.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Stop checksumming and return the CRC of everything moved so far.
    pub fn take_checksum(&mut self) -> Option<u32> {
        self.hasher.take().map(Hasher::finalize)
    }

    fn advance(&mut self, bytes: &[u8]) {
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(bytes);
        }
        self.offset += bytes.len() as u32;
    }
}

impl<S: ReadStorage + ?Sized> Cursor<'_, S> {
    pub fn read(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        self.storage
            .read(self.offset, bytes)
            .map_err(|_| Error::Storage)?;
        self.advance(bytes);
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let mut byte = [0u8; 1];
        self.read(&mut byte)?;
        Ok(byte[0])
    }
}

impl<S: Storage + ?Sized> Cursor<'_, S> {
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.storage
            .write(self.offset, bytes)
            .map_err(|_| Error::Storage)?;
        self.advance(bytes);
        Ok(())
    }
}

/// Write every entry to `storage` and commit.
///
/// Stops at the first entry that fails to encode. Returns the total number
/// of bytes written, header and trailer included.
pub fn save<S: Storage + ?Sized>(
    registry: &Registry,
    storage: &mut S,
    layout: Layout,
) -> Result<usize, Error> {
    let written = match layout {
        Layout::Plain => {
            let mut cursor = Cursor::new(&mut *storage, 0);
            encode_all(registry, &mut cursor)?
        }
        Layout::Versioned(version) => {
            let mut cursor = Cursor::new(&mut *storage, 0);
            cursor.write(&[version])?;
            cursor.hasher = Some(Hasher::new());
            let body = encode_all(registry, &mut cursor)?;
            let crc = cursor.take_checksum().unwrap_or_default();
            cursor.write(&crc.to_le_bytes())?;
            1 + body + 4
        }
    };
    storage.commit().map_err(|_| Error::Storage)?;
    log_info!("settings saved ({=usize} bytes)", written);
    Ok(written)
}

/// Read every entry from `storage`.
///
/// If anything fails (a corrupted value, a version or checksum mismatch, a
/// storage error) the whole load is abandoned and every entry is reset to
/// its default, so no mix of stale and fresh values survives. The triggering
/// error is still returned. On success returns the number of bytes consumed.
pub fn load<S: ReadStorage + ?Sized>(
    registry: &mut Registry,
    storage: &mut S,
    layout: Layout,
) -> Result<usize, Error> {
    match decode_all(registry, storage, layout) {
        Ok(consumed) => {
            log_info!("settings loaded ({=usize} bytes)", consumed);
            Ok(consumed)
        }
        Err(err) => {
            log_warn!("settings load failed: {}, restoring defaults", err);
            load_default(registry);
            Err(err)
        }
    }
}

/// Reset every entry to its default value.
pub fn load_default(registry: &mut Registry) {
    for entry in registry.iter_mut() {
        entry.reset();
    }
}

fn encode_all<S: Storage + ?Sized>(
    registry: &Registry,
    cursor: &mut Cursor<'_, S>,
) -> Result<usize, Error> {
    let mut written = 0;
    for entry in registry {
        written += entry.encode(cursor)?;
    }
    Ok(written)
}

fn decode_all<S: ReadStorage + ?Sized>(
    registry: &mut Registry,
    storage: &mut S,
    layout: Layout,
) -> Result<usize, Error> {
    let mut cursor = Cursor::new(storage, 0);
    let mut consumed = 0;

    if let Layout::Versioned(version) = layout {
        if cursor.read_u8()? != version {
            return Err(Error::DecodeFailure);
        }
        cursor.hasher = Some(Hasher::new());
        consumed += 1;
    }

    for entry in registry.iter_mut() {
        consumed += entry.decode(&mut cursor)?;
    }

    if let Layout::Versioned(_) = layout {
        let expected = cursor.take_checksum().unwrap_or_default();
        let mut stored = [0u8; 4];
        cursor.read(&mut stored)?;
        if u32::from_le_bytes(stored) != expected {
            return Err(Error::DecodeFailure);
        }
        consumed += 4;
    }

    Ok(consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Entry;
    use crate::storage::ram::RamStorage;

    fn network_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(Entry::string("host", "node", "host name")).unwrap();
        registry.register(Entry::boolean("dhcp", "true", "use dhcp")).unwrap();
        registry.register(Entry::integer("timeout", "30", "seconds")).unwrap();
        registry.register(Entry::address4("ip", "192.168.0.2", "address")).unwrap();
        registry
            .register(Entry::address6("mac", "00:11:22:33:44:55", "hardware address"))
            .unwrap();
        load_default(&mut registry);
        registry
    }

    #[test]
    fn test_save_then_load_restores_values() {
        let mut registry = network_registry();
        registry.lookup_mut("host").unwrap().set("gateway").unwrap();
        registry.lookup_mut("dhcp").unwrap().set("false").unwrap();
        registry.lookup_mut("timeout").unwrap().set("4000000000").unwrap();
        registry.lookup_mut("ip").unwrap().set("10.1.2.3").unwrap();

        let mut storage: RamStorage<64> = RamStorage::new();
        let written = save(&registry, &mut storage, Layout::Plain).unwrap();
        assert_eq!(written, 8 + 1 + 4 + 4 + 6);
        assert_eq!(storage.commit_count(), 1);

        let mut restored = network_registry();
        let consumed = load(&mut restored, &mut storage, Layout::Plain).unwrap();
        assert_eq!(consumed, written);
        for (a, b) in registry.iter().zip(restored.iter()) {
            assert_eq!(a.value(), b.value());
        }
    }

    #[test]
    fn test_offsets_are_sequential() {
        let registry = network_registry();
        let mut storage: RamStorage<32> = RamStorage::new();
        save(&registry, &mut storage, Layout::Plain).unwrap();

        let bytes = storage.as_slice();
        assert_eq!(&bytes[..5], b"node\0");
        assert_eq!(bytes[5], 1);
        assert_eq!(&bytes[6..10], &30u32.to_le_bytes());
        assert_eq!(&bytes[10..14], &[192, 168, 0, 2]);
        assert_eq!(&bytes[14..20], &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    }

    #[test]
    fn test_corrupted_entry_resets_everything() {
        let mut registry = network_registry();
        registry.lookup_mut("host").unwrap().set("edited").unwrap();
        registry.lookup_mut("timeout").unwrap().set("99").unwrap();
        let mut storage: RamStorage<32> = RamStorage::new();
        save(&registry, &mut storage, Layout::Plain).unwrap();

        // boolean sits right after "edited\0"
        storage.as_mut_slice()[7] = 2;

        let mut restored = network_registry();
        restored.lookup_mut("host").unwrap().set("stale").unwrap();
        assert_eq!(
            load(&mut restored, &mut storage, Layout::Plain),
            Err(Error::DecodeFailure)
        );
        for entry in restored.iter() {
            assert_eq!(entry.value(), entry.default_value());
        }
    }

    #[test]
    fn test_save_stops_on_unencodable_entry() {
        let mut registry = Registry::new();
        registry.register(Entry::integer("timeout", "30", "")).unwrap();
        let mut storage: RamStorage<8> = RamStorage::new();
        // never loaded, value is empty
        assert_eq!(
            save(&registry, &mut storage, Layout::Plain),
            Err(Error::InvalidFormat)
        );
        assert_eq!(storage.commit_count(), 0);
    }

    #[test]
    fn test_save_out_of_space() {
        let registry = network_registry();
        let mut storage: RamStorage<8> = RamStorage::new();
        assert_eq!(
            save(&registry, &mut storage, Layout::Plain),
            Err(Error::Storage)
        );
    }

    #[test]
    fn test_versioned_round_trip() {
        let mut registry = network_registry();
        registry.lookup_mut("host").unwrap().set("relay").unwrap();
        registry.lookup_mut("dhcp").unwrap().set("false").unwrap();
        registry.lookup_mut("mac").unwrap().set("02:00:5e:10:00:01").unwrap();
        let mut storage: RamStorage<64> = RamStorage::new();
        let written = save(&registry, &mut storage, Layout::Versioned(3)).unwrap();
        assert_eq!(written, 1 + registry.encoded_len() + 4);
        assert_eq!(storage.as_slice()[0], 3);

        let mut restored = network_registry();
        assert_eq!(
            load(&mut restored, &mut storage, Layout::Versioned(3)),
            Ok(written)
        );
        for (saved, loaded) in registry.iter().zip(restored.iter()) {
            assert_eq!(saved.value(), loaded.value());
        }
        assert_eq!(restored.lookup("dhcp").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_versioned_detects_version_change() {
        let mut registry = network_registry();
        registry.lookup_mut("timeout").unwrap().set("5").unwrap();
        let mut storage: RamStorage<64> = RamStorage::new();
        save(&registry, &mut storage, Layout::Versioned(1)).unwrap();

        assert_eq!(
            load(&mut registry, &mut storage, Layout::Versioned(2)),
            Err(Error::DecodeFailure)
        );
        assert_eq!(registry.lookup("timeout").unwrap().value(), "30");
    }

    #[test]
    fn test_versioned_detects_silent_corruption() {
        let mut registry = network_registry();
        let mut storage: RamStorage<64> = RamStorage::new();
        save(&registry, &mut storage, Layout::Versioned(1)).unwrap();

        // a fixed-width value decodes fine on its own; only the CRC notices
        storage.as_mut_slice()[1 + 5 + 1] ^= 0xFF;

        assert_eq!(
            load(&mut registry, &mut storage, Layout::Versioned(1)),
            Err(Error::DecodeFailure)
        );
    }

    #[test]
    fn test_load_from_erased_storage_falls_back() {
        let mut registry = network_registry();
        let mut storage: RamStorage<128> = RamStorage::new();
        assert!(load(&mut registry, &mut storage, Layout::Plain).is_err());
        assert_eq!(registry.lookup("host").unwrap().value(), "node");
    }
}
