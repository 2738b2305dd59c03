//! Byte stream between the shell and the operator.
//!
//! Usually a UART. The shell only needs to know whether a byte is waiting,
//! to take one, and to send bytes back; baud rate and framing are the
//! implementor's business.

/// A polled, in-order, lossless byte stream.
///
/// # Examples
///
/// ```rust
/// use confshell::system::transport::Transport;
///
/// struct Loopback {
///     pending: heapless::Deque<u8, 32>,
/// }
///
/// impl Transport for Loopback {
///     type Error = ();
///
///     fn available(&mut self) -> bool {
///         !self.pending.is_empty()
///     }
///
///     fn read_byte(&mut self) -> Result<u8, Self::Error> {
///         self.pending.pop_front().ok_or(())
///     }
///
///     fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
///         for &b in bytes {
///             self.pending.push_back(b).map_err(|_| ())?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Transport {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Whether at least one byte can be read without blocking.
    fn available(&mut self) -> bool;

    /// Take the next received byte.
    ///
    /// Only called after [`available`](Self::available) returned `true`.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Send all of `bytes`.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn available(&mut self) -> bool {
        (**self).available()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        (**self).read_byte()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }
}
