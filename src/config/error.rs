//! Error types for configuration entries, the registry and the codec

/// Errors raised while validating, storing or restoring settings.
///
/// None of these are fatal to the shell: each one is turned into an
/// operator-visible message and the device stays interactive.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A value does not match the entry's text form.
    InvalidFormat,
    /// No entry or command with the requested name.
    EntryNotFound,
    /// Persisted bytes failed an entry's sanity check.
    DecodeFailure,
    /// An input line exceeded the line buffer.
    BufferOverflow,
    /// The platform has no way to perform the request (reboot).
    UnsupportedOperation,
    /// A fixed-capacity table is full.
    OutOfMemory,
    /// A registration argument was rejected (empty or duplicate name).
    InvalidParameter,
    /// The storage back-end reported an error.
    Storage,
    /// The transport reported an error.
    Transport,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidFormat => defmt::write!(f, "InvalidFormat"),
            Error::EntryNotFound => defmt::write!(f, "EntryNotFound"),
            Error::DecodeFailure => defmt::write!(f, "DecodeFailure"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::UnsupportedOperation => defmt::write!(f, "UnsupportedOperation"),
            Error::OutOfMemory => defmt::write!(f, "OutOfMemory"),
            Error::InvalidParameter => defmt::write!(f, "InvalidParameter"),
            Error::Storage => defmt::write!(f, "Storage"),
            Error::Transport => defmt::write!(f, "Transport"),
        }
    }
}
