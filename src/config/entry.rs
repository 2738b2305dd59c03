//! Typed configuration entries.
//!
//! An [`Entry`] is one named setting. It always carries its value as text,
//! the same text the operator typed, and knows how to validate that text and
//! how to pack it into (and unpack it from) its slot in non-volatile storage.
//!
//! | Kind       | Text form      | Stored as                          |
//! |------------|----------------|------------------------------------|
//! | `String`   | free text      | raw bytes + one `0` terminator     |
//! | `Boolean`  | `true`/`false` | 1 byte, `1` or `0`                 |
//! | `Integer`  | decimal digits | 4 bytes, little-endian `u32`       |
//! | `Address4` | `d.d.d.d`      | 4 bytes, one per decimal component |
//! | `Address6` | `h:h:h:h:h:h`  | 6 bytes, one per hex component     |
//!
//! # Examples
//!
//! ```rust
//! use confshell::config::Entry;
//!
//! let mut ip = Entry::address4("ip", "192.168.0.10", "device address");
//! ip.reset();
//! assert_eq!(ip.as_address4(), Some([192, 168, 0, 10]));
//!
//! assert!(ip.set("10.0.0").is_err());
//! ip.set("10.0.0.7").unwrap();
//! assert_eq!(ip.value(), "10.0.0.7");
//! ```

use core::fmt::Write;
use heapless::{String, Vec};

use super::codec::Cursor;
use super::error::Error;
use super::VALUE_CAPACITY;
use crate::storage::{ReadStorage, Storage};

/// Terminator written after a string value.
const STRING_TERMINATOR: u8 = 0;

/// The closed set of value kinds an entry can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Free text, stored zero-terminated.
    String,
    /// `true` or `false`.
    Boolean,
    /// Unsigned 32-bit decimal integer.
    Integer,
    /// Dotted-decimal four byte address, e.g. an IPv4 address.
    Address4,
    /// Colon-separated six byte hex address, e.g. a MAC address.
    Address6,
}

impl Kind {
    /// Short type name used in help output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Boolean => "bool",
            Kind::Integer => "u32",
            Kind::Address4 => "addr4",
            Kind::Address6 => "addr6",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Kind {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// One named, typed setting.
///
/// The value is empty until the entry is loaded or reset, and afterwards is
/// always either the default or text that passed [`Entry::parse`].
#[derive(Debug, Clone)]
pub struct Entry {
    name: &'static str,
    default_value: &'static str,
    description: &'static str,
    kind: Kind,
    value: String<VALUE_CAPACITY>,
}

impl Entry {
    /// Create an entry of the given kind with an empty value.
    pub fn new(
        kind: Kind,
        name: &'static str,
        default_value: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            default_value,
            description,
            kind,
            value: String::new(),
        }
    }

    /// Free text entry.
    pub fn string(
        name: &'static str,
        default_value: &'static str,
        description: &'static str,
    ) -> Self {
        Self::new(Kind::String, name, default_value, description)
    }

    /// Boolean entry.
    pub fn boolean(
        name: &'static str,
        default_value: &'static str,
        description: &'static str,
    ) -> Self {
        Self::new(Kind::Boolean, name, default_value, description)
    }

    /// Unsigned integer entry.
    pub fn integer(
        name: &'static str,
        default_value: &'static str,
        description: &'static str,
    ) -> Self {
        Self::new(Kind::Integer, name, default_value, description)
    }

    /// Dotted-decimal address entry.
    pub fn address4(
        name: &'static str,
        default_value: &'static str,
        description: &'static str,
    ) -> Self {
        Self::new(Kind::Address4, name, default_value, description)
    }

    /// Colon-separated hex address entry.
    pub fn address6(
        name: &'static str,
        default_value: &'static str,
        description: &'static str,
    ) -> Self {
        Self::new(Kind::Address6, name, default_value, description)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> &'static str {
        self.default_value
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Current value as text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Check that `text` is a valid value for this entry.
    ///
    /// Purely syntactic; the current value is left alone. Text longer than
    /// [`VALUE_CAPACITY`] is `BufferOverflow`, anything else malformed is
    /// `InvalidFormat`.
    pub fn parse(&self, text: &str) -> Result<(), Error> {
        if text.len() > VALUE_CAPACITY {
            return Err(Error::BufferOverflow);
        }
        let valid = match self.kind {
            Kind::String => !text.bytes().any(|b| b == STRING_TERMINATOR),
            Kind::Boolean => parse_bool(text).is_some(),
            Kind::Integer => parse_u32(text).is_some(),
            Kind::Address4 => parse_address4(text).is_some(),
            Kind::Address6 => parse_address6(text).is_some(),
        };
        if valid { Ok(()) } else { Err(Error::InvalidFormat) }
    }

    /// Validate `text` and store it verbatim.
    pub fn set(&mut self, text: &str) -> Result<(), Error> {
        self.parse(text)?;
        self.value = String::try_from(text).map_err(|_| Error::BufferOverflow)?;
        Ok(())
    }

    /// Restore the default value.
    pub fn reset(&mut self) {
        // Defaults are validated on registration, so this only falls back to
        // empty for an entry that was never registered.
        self.value = String::try_from(self.default_value).unwrap_or_default();
    }

    /// Number of bytes the current value occupies in storage.
    pub fn encoded_len(&self) -> usize {
        match self.kind {
            Kind::String => self.value.len() + 1,
            Kind::Boolean => 1,
            Kind::Integer => 4,
            Kind::Address4 => 4,
            Kind::Address6 => 6,
        }
    }

    /// Write the current value at the cursor.
    ///
    /// Returns the number of bytes written. A value that does not parse
    /// (an entry that was never loaded, for instance) is `InvalidFormat` and
    /// nothing is written.
    pub fn encode<S: Storage + ?Sized>(
        &self,
        cursor: &mut Cursor<'_, S>,
    ) -> Result<usize, Error> {
        match self.kind {
            Kind::String => {
                self.parse(&self.value)?;
                cursor.write(self.value.as_bytes())?;
                cursor.write(&[STRING_TERMINATOR])?;
            }
            Kind::Boolean => {
                let flag = parse_bool(&self.value).ok_or(Error::InvalidFormat)?;
                cursor.write(&[flag as u8])?;
            }
            Kind::Integer => {
                let number = parse_u32(&self.value).ok_or(Error::InvalidFormat)?;
                cursor.write(&number.to_le_bytes())?;
            }
            Kind::Address4 => {
                let octets = parse_address4(&self.value).ok_or(Error::InvalidFormat)?;
                cursor.write(&octets)?;
            }
            Kind::Address6 => {
                let octets = parse_address6(&self.value).ok_or(Error::InvalidFormat)?;
                cursor.write(&octets)?;
            }
        }
        Ok(self.encoded_len())
    }

    /// Read a value from the cursor and make it current.
    ///
    /// Returns the number of bytes consumed. Only `String` (missing
    /// terminator, bad UTF-8) and `Boolean` (byte other than 0/1) can detect
    /// corruption; the fixed-width kinds accept any bytes. The value is left
    /// untouched on failure.
    pub fn decode<S: ReadStorage + ?Sized>(
        &mut self,
        cursor: &mut Cursor<'_, S>,
    ) -> Result<usize, Error> {
        let mut text: String<VALUE_CAPACITY> = String::new();
        let consumed = match self.kind {
            Kind::String => {
                let mut raw: Vec<u8, VALUE_CAPACITY> = Vec::new();
                loop {
                    let byte = cursor.read_u8()?;
                    if byte == STRING_TERMINATOR {
                        break;
                    }
                    raw.push(byte).map_err(|_| Error::DecodeFailure)?;
                }
                let decoded = core::str::from_utf8(&raw).map_err(|_| Error::DecodeFailure)?;
                text.push_str(decoded).map_err(|_| Error::DecodeFailure)?;
                raw.len() + 1
            }
            Kind::Boolean => {
                let rendered = match cursor.read_u8()? {
                    1 => "true",
                    0 => "false",
                    _ => return Err(Error::DecodeFailure),
                };
                text.push_str(rendered).map_err(|_| Error::DecodeFailure)?;
                1
            }
            Kind::Integer => {
                let mut bytes = [0u8; 4];
                cursor.read(&mut bytes)?;
                write!(text, "{}", u32::from_le_bytes(bytes)).map_err(|_| Error::DecodeFailure)?;
                4
            }
            Kind::Address4 => {
                let mut b = [0u8; 4];
                cursor.read(&mut b)?;
                write!(text, "{}.{}.{}.{}", b[0], b[1], b[2], b[3])
                    .map_err(|_| Error::DecodeFailure)?;
                4
            }
            Kind::Address6 => {
                let mut b = [0u8; 6];
                cursor.read(&mut b)?;
                write!(
                    text,
                    "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                    b[0], b[1], b[2], b[3], b[4], b[5]
                )
                .map_err(|_| Error::DecodeFailure)?;
                6
            }
        };
        self.value = text;
        Ok(consumed)
    }

    /// Value of a `String` entry.
    pub fn as_str(&self) -> Option<&str> {
        match self.kind {
            Kind::String => Some(&self.value),
            _ => None,
        }
    }

    /// Value of a `Boolean` entry.
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            Kind::Boolean => parse_bool(&self.value),
            _ => None,
        }
    }

    /// Value of an `Integer` entry.
    pub fn as_u32(&self) -> Option<u32> {
        match self.kind {
            Kind::Integer => parse_u32(&self.value),
            _ => None,
        }
    }

    /// Value of an `Address4` entry.
    pub fn as_address4(&self) -> Option<[u8; 4]> {
        match self.kind {
            Kind::Address4 => parse_address4(&self.value),
            _ => None,
        }
    }

    /// Value of an `Address6` entry.
    pub fn as_address6(&self) -> Option<[u8; 6]> {
        match self.kind {
            Kind::Address6 => parse_address6(&self.value),
            _ => None,
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_u32(text: &str) -> Option<u32> {
    // `str::parse` alone would also take a leading '+'
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_address4(text: &str) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut count = 0;
    for part in text.split('.') {
        if count == octets.len()
            || part.is_empty()
            || part.len() > 3
            || !part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        octets[count] = part.parse().ok()?;
        count += 1;
    }
    (count == octets.len()).then_some(octets)
}

fn parse_address6(text: &str) -> Option<[u8; 6]> {
    let mut octets = [0u8; 6];
    let mut count = 0;
    for part in text.split(':') {
        if count == octets.len()
            || part.is_empty()
            || part.len() > 2
            || !part.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return None;
        }
        octets[count] = u8::from_str_radix(part, 16).ok()?;
        count += 1;
    }
    (count == octets.len()).then_some(octets)
}
