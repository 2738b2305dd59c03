//! Typed settings and their persistence.
//!
//! This module holds everything about *what* the shell configures:
//!
//! - **[`entry`]**: one named, typed value with text and binary forms
//! - **[`registry`]**: the ordered, fixed-capacity set of entries
//! - **[`codec`]**: save/load of the registry to a linear byte region
//!
//! # Usage
//!
//! ```rust
//! use confshell::config::{codec, Entry, Layout, Registry};
//! use confshell::storage::ram::RamStorage;
//!
//! let mut registry = Registry::new();
//! registry.register(Entry::integer("timeout", "30", "seconds")).unwrap();
//! registry.register(Entry::address6("mac", "00:11:22:33:44:55", "hardware address")).unwrap();
//! codec::load_default(&mut registry);
//!
//! let mut eeprom: RamStorage<32> = RamStorage::new();
//! let written = codec::save(&registry, &mut eeprom, Layout::Plain).unwrap();
//! assert_eq!(written, 4 + 6);
//! ```

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Persistence of the registry to storage.
pub mod codec;
/// Typed configuration entries.
pub mod entry;
/// Error types for entries, registry and codec.
pub mod error;
/// Ordered collection of entries.
pub mod registry;

pub use codec::Layout;
pub use entry::{Entry, Kind};
pub use error::Error;
pub use registry::Registry;

/// Maximum number of entries in a [`Registry`].
pub const MAX_ENTRIES: usize = 16;

/// Maximum length in bytes of any entry value.
///
/// Bounds `String` entries, and with them the lookahead when decoding a
/// string whose terminator is missing from storage.
pub const VALUE_CAPACITY: usize = 64;
