//! Ordered, fixed-capacity collection of entries.
//!
//! Registration order is the persistence contract: the codec lays entries
//! out back to back in exactly this order, so inserting, removing or
//! reordering entries invalidates whatever was saved before.

use heapless::Vec;

use super::entry::Entry;
use super::error::Error;
use super::MAX_ENTRIES;

/// All settings known to the shell.
///
/// # Examples
///
/// ```rust
/// use confshell::config::{Entry, Registry};
///
/// let mut registry = Registry::new();
/// registry.register(Entry::integer("timeout", "30", "seconds")).unwrap();
/// registry.register(Entry::boolean("dhcp", "true", "use dhcp")).unwrap();
///
/// assert!(registry.lookup("timeout").is_some());
/// assert!(registry.lookup("Timeout").is_none());
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry, MAX_ENTRIES>,
}

impl Registry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append an entry.
    ///
    /// # Returns
    ///
    /// * `Err(Error::InvalidParameter)` - empty or duplicate name, or a default
    ///   that does not parse as the entry's kind
    /// * `Err(Error::OutOfMemory)` - [`MAX_ENTRIES`] already registered
    pub fn register(&mut self, entry: Entry) -> Result<(), Error> {
        if entry.name().is_empty() || self.lookup(entry.name()).is_some() {
            return Err(Error::InvalidParameter);
        }
        entry
            .parse(entry.default_value())
            .map_err(|_| Error::InvalidParameter)?;
        self.entries.push(entry).map_err(|_| Error::OutOfMemory)
    }

    /// First entry whose name matches exactly.
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.name() == name)
    }

    /// Validate `value` and store it in the entry called `name`.
    ///
    /// # Returns
    ///
    /// * `Err(Error::EntryNotFound)` - no entry has that exact name
    /// * `Err(Error::InvalidFormat)` / `Err(Error::BufferOverflow)` - the value
    ///   was rejected and the entry keeps its previous value
    pub fn assign(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.lookup_mut(name).ok_or(Error::EntryNotFound)?.set(value)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> core::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, Entry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes a save of the current values would occupy.
    pub fn encoded_len(&self) -> usize {
        self.entries.iter().map(Entry::encoded_len).sum()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Entry;
    type IntoIter = core::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VALUE_CAPACITY;

    #[test]
    fn test_register_preserves_order() {
        let mut registry = Registry::new();
        registry.register(Entry::string("host", "dev", "")).unwrap();
        registry.register(Entry::integer("port", "80", "")).unwrap();
        registry.register(Entry::boolean("tls", "false", "")).unwrap();

        let names: Vec<&str, 4> = registry.iter().map(Entry::name).collect();
        assert_eq!(names.as_slice(), &["host", "port", "tls"]);
    }

    #[test]
    fn test_register_rejects_duplicates_and_empty() {
        let mut registry = Registry::new();
        registry.register(Entry::integer("port", "80", "")).unwrap();
        assert_eq!(
            registry.register(Entry::integer("port", "81", "")),
            Err(Error::InvalidParameter)
        );
        assert_eq!(
            registry.register(Entry::integer("", "81", "")),
            Err(Error::InvalidParameter)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_invalid_default() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.register(Entry::address4("ip", "1.2.3", "")),
            Err(Error::InvalidParameter)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_overflow() {
        const NAMES: [&str; MAX_ENTRIES + 1] = [
            "e0", "e1", "e2", "e3", "e4", "e5", "e6", "e7", "e8", "e9", "e10", "e11", "e12",
            "e13", "e14", "e15", "e16",
        ];
        let mut registry = Registry::new();
        for name in &NAMES[..MAX_ENTRIES] {
            registry.register(Entry::integer(name, "0", "")).unwrap();
        }
        assert_eq!(
            registry.register(Entry::integer(NAMES[MAX_ENTRIES], "0", "")),
            Err(Error::OutOfMemory)
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut registry = Registry::new();
        registry.register(Entry::integer("port", "80", "")).unwrap();
        assert!(registry.lookup("port").is_some());
        assert!(registry.lookup("PORT").is_none());
        assert!(registry.lookup("por").is_none());
    }

    #[test]
    fn test_assign_reports_each_failure() {
        let mut registry = Registry::new();
        registry.register(Entry::integer("port", "80", "")).unwrap();
        registry.register(Entry::string("host", "dev", "")).unwrap();

        assert_eq!(registry.assign("port", "8080"), Ok(()));
        assert_eq!(registry.lookup("port").unwrap().value(), "8080");

        assert_eq!(registry.assign("Port", "1"), Err(Error::EntryNotFound));
        assert_eq!(registry.assign("port", "http"), Err(Error::InvalidFormat));

        let long = [b'h'; VALUE_CAPACITY + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(registry.assign("host", long), Err(Error::BufferOverflow));

        assert_eq!(registry.lookup("port").unwrap().value(), "8080");
        assert_eq!(registry.lookup("host").unwrap().value(), "");
    }

    #[test]
    fn test_encoded_len_sums_entries() {
        let mut registry = Registry::new();
        registry.register(Entry::string("host", "abc", "")).unwrap();
        registry.register(Entry::address6("mac", "00:00:00:00:00:00", "")).unwrap();
        for entry in registry.iter_mut() {
            entry.reset();
        }
        assert_eq!(registry.encoded_len(), 4 + 6);
    }
}
