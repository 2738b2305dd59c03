//! # confshell - serial configuration shell
//!
//! A small interactive shell that lets an operator inspect and edit a
//! device's typed settings over a character stream (usually a UART), and
//! persist them to non-volatile storage. This library is designed for
//! embedded systems and supports `no_std` environments.
//!
//! ## Features
//!
//! ### Configuration
//! - Typed entries: string, boolean, 32-bit integer, IPv4 and MAC addresses
//! - Values validated on every assignment
//! - Compact binary layout, entries stored back to back
//! - Optional versioned layout with a CRC-32 trailer
//!
//! ### Storage Abstraction
//! - Unified interface over EEPROM, flash or RAM
//! - RAM-backed device for tests and hosts
//!
//! ### Shell
//! - Normal (`>`) and configuration (`#`) modes
//! - `help`, `show`, `conf`, `exit`, `save`, `load`, `load default`, `reboot`
//! - Application commands with built-in help
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! confshell = "0.1.0"
//! ```
//!
//! ### Basic Example
//!
//! ```rust
//! use confshell::config::Entry;
//! use confshell::storage::ram::RamStorage;
//! use confshell::system::platform::NoReboot;
//! use confshell::system::shell::Shell;
//! # use confshell::system::transport::Transport;
//! # struct Uart;
//! # impl Transport for Uart {
//! #     type Error = ();
//! #     fn available(&mut self) -> bool { false }
//! #     fn read_byte(&mut self) -> Result<u8, ()> { Err(()) }
//! #     fn write(&mut self, _: &[u8]) -> Result<(), ()> { Ok(()) }
//! # }
//!
//! let mut shell = Shell::new(Uart, RamStorage::<128>::new(), NoReboot);
//! shell.add_entry(Entry::string("hostname", "node", "device name"));
//! shell.add_entry(Entry::address6("mac", "02:00:00:00:00:01", "hardware address"));
//!
//! shell.execute("conf").unwrap();
//! shell.execute("hostname=sensor-7").unwrap();
//! shell.execute("save").unwrap();
//!
//! assert_eq!(shell.entry("hostname").unwrap().as_str(), Some("sensor-7"));
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux hosts, for tests and simulators
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod log;

/// Typed settings, their registry and their binary encoding.
pub mod config;

/// Storage abstraction layer for various memory and storage devices.
///
/// Provides a unified interface over EEPROM, flash and RAM-based storage.
pub mod storage;

/// Operator-facing shell, transport and platform traits.
pub mod system;
