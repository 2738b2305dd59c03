//! Platform services the shell cannot provide itself.

use core::convert::Infallible;

use crate::config::Error;

/// Platform-specific functionality.
///
/// Must be implemented by the target to let the operator restart the
/// device from the shell (typically by arming a short watchdog timeout and
/// spinning until it fires).
pub trait Platform {
    /// Restart the device.
    ///
    /// Never returns on success; the `Ok` type is uninhabited. Platforms
    /// without a restart mechanism return
    /// [`Error::UnsupportedOperation`].
    fn reboot(&mut self) -> Result<Infallible, Error>;
}

/// Platform without a restart mechanism.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReboot;

impl Platform for NoReboot {
    fn reboot(&mut self) -> Result<Infallible, Error> {
        Err(Error::UnsupportedOperation)
    }
}

impl<P: Platform + ?Sized> Platform for &mut P {
    fn reboot(&mut self) -> Result<Infallible, Error> {
        (**self).reboot()
    }
}
