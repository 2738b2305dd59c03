//! Operator-facing side of the crate.
//!
//! This module connects a device's configuration to a human on the other end
//! of a serial line. Everything here is `no_std`, uses fixed-size buffers and
//! never blocks.
//!
//! # Available Utilities
//!
//! - **[`shell`]**: line editor and command interpreter for the settings
//! - **[`transport`]**: byte stream the shell reads from and writes to
//! - **[`platform`]**: device services such as reboot
//!
//! # Usage
//!
//! ```rust,no_run
//! use confshell::config::Entry;
//! use confshell::storage::ram::RamStorage;
//! use confshell::system::platform::NoReboot;
//! use confshell::system::shell::{Shell, ShellResult};
//! # use confshell::system::transport::Transport;
//! # struct Uart;
//! # impl Transport for Uart {
//! #     type Error = ();
//! #     fn available(&mut self) -> bool { false }
//! #     fn read_byte(&mut self) -> Result<u8, ()> { Err(()) }
//! #     fn write(&mut self, _: &[u8]) -> Result<(), ()> { Ok(()) }
//! # }
//!
//! let mut shell = Shell::new(Uart, RamStorage::<256>::new(), NoReboot);
//! shell.add_entry(Entry::boolean("dhcp", "true", "use DHCP"));
//! shell.add_entry(Entry::address4("ip", "192.168.0.10", "static address"));
//!
//! // Register device-specific commands
//! shell.add_command("status", "Show device status", |_, out| {
//!     let _ = out.write_str("Device: Online\r\n");
//!     ShellResult::Ok
//! });
//!
//! shell.begin("gateway").unwrap();
//! loop {
//!     shell.poll().unwrap();
//! }
//! ```

/// Platform services (reboot).
pub mod platform;

/// Interactive configuration shell.
///
/// Provides line editing, privilege modes, typed assignment, persistence
/// commands and extension command dispatch.
pub mod shell;

/// Byte stream abstraction.
pub mod transport;
