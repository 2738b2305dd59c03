//! Configuration shell for embedded systems.
//!
//! This module turns a raw character stream into validated edits of the
//! settings in a [`Registry`], and saves/restores those settings through a
//! [`Storage`] device. It is designed for `no_std` targets: every buffer is
//! fixed-size and nothing blocks.
//!
//! # Features
//!
//! - **Line editing**: CR, LF or CRLF end a line; backspace/delete erase
//! - **Privilege modes**: settings can only change in configuration mode
//! - **Typed settings**: values are validated before they are accepted
//! - **Persistence**: `save`, `load` and `load default` over any [`Storage`]
//! - **Extensible**: application commands run when no built-in matches
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Transport     │───▶│  Line Buffer    │───▶│   Dispatch      │
//! │   (poll bytes)  │    │  (echo, erase)  │    │  (first match)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                                 │           │
//!                                                 ▼           ▼
//!                                     ┌─────────────────┐ ┌─────────────────┐
//!                                     │    Registry     │ │     Codec       │
//!                                     │ (parse, assign) │ │  (save, load)   │
//!                                     └─────────────────┘ └─────────────────┘
//! ```
//!
//! # Line Protocol
//!
//! ```text
//! > show                  # list current values (any mode)
//! > help                  # list entries with descriptions and defaults
//! > conf                  # enter configuration mode, prompt becomes '#'
//! # timeout=45            # assign a value
//! # save                  # persist all values
//! # load                  # restore from storage
//! # load default          # restore defaults
//! # exit                  # back to normal mode
//! > reboot                # restart the device (alias: restart)
//! ```
//!
//! # Usage Examples
//!
//! ```rust
//! use confshell::config::Entry;
//! use confshell::storage::ram::RamStorage;
//! use confshell::system::platform::NoReboot;
//! use confshell::system::shell::{Mode, Shell, ShellResult};
//! use confshell::system::transport::Transport;
//!
//! struct Console;
//!
//! impl Transport for Console {
//!     type Error = ();
//!     fn available(&mut self) -> bool { false }
//!     fn read_byte(&mut self) -> Result<u8, Self::Error> { Err(()) }
//!     fn write(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! let storage: RamStorage<256> = RamStorage::new();
//! let mut shell = Shell::new(Console, storage, NoReboot);
//!
//! assert_eq!(shell.add_entry(Entry::integer("timeout", "30", "seconds")), ShellResult::Ok);
//! shell.begin("sensor node").unwrap();
//!
//! shell.execute("conf").unwrap();
//! shell.execute("timeout=45").unwrap();
//! assert_eq!(shell.mode(), Mode::Configuration);
//! assert_eq!(shell.entry("timeout").unwrap().value(), "45");
//!
//! // In the main loop, once per tick:
//! shell.poll().unwrap();
//! ```

use core::fmt::{self, Write as _};
use heapless::Vec;

use super::platform::Platform;
use super::transport::Transport;
use crate::config::{Entry, Error, Layout, Registry, codec};
use crate::storage::Storage;

/// Size of the line buffer.
///
/// One slot is kept free, so the longest accepted line is
/// `LINE_BUFFER_SIZE - 1` bytes. Longer lines are discarded.
pub const LINE_BUFFER_SIZE: usize = 128;

/// Bytes the line buffer holds.
const LINE_CAPACITY: usize = LINE_BUFFER_SIZE - 1;

/// Maximum number of extension commands.
pub const MAX_COMMANDS: usize = 16;

/// Crate version, printed by [`Shell::begin`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ASCII control character constants for input processing
/// ASCII backspace character (0x08).
pub const ASCII_BACKSPACE: u8 = 0x08;
/// ASCII line feed character (0x0A).
pub const ASCII_LF: u8 = 0x0A;
/// ASCII carriage return character (0x0D).
pub const ASCII_CR: u8 = 0x0D;
/// ASCII delete character (0x7F).
pub const ASCII_DEL: u8 = 0x7F;

const NEWLINE: &str = "\r\n";
const ERASE_ECHO: &str = "\x08 \x08";
const MSG_SWITCH_MODE: &str = "please switch conf mode (ex. >conf)\r\n";
const MSG_INVALID_FORMAT: &str = "invalid format\r\n";
const MSG_TOO_LONG: &str = "too long!\r\n";

/// Result type for extension commands and registration.
///
/// # Examples
///
/// ```rust
/// use confshell::config::Registry;
/// use confshell::system::shell::ShellResult;
///
/// fn factory_check(registry: &mut Registry, out: &mut dyn core::fmt::Write) -> ShellResult {
///     match registry.lookup("serial") {
///         Some(entry) if !entry.value().is_empty() => ShellResult::Ok,
///         _ => {
///             let _ = out.write_str("serial number missing\r\n");
///             ShellResult::InvalidParameter
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellResult {
    /// Operation completed successfully.
    Ok,
    /// Invalid parameter was provided to a command or shell operation.
    InvalidParameter,
    /// Insufficient memory to complete the operation.
    OutOfMemory,
    /// Input buffer overflow occurred.
    BufferOverflow,
}

/// Function signature for extension command handlers.
///
/// Handlers get the settings and a writer that goes straight to the
/// transport. They run in either mode, so a handler that edits settings
/// is responsible for its own checks.
pub type CommandFn = fn(registry: &mut Registry, out: &mut dyn fmt::Write) -> ShellResult;

/// An application command invoked by exact name.
#[derive(Debug, Clone)]
pub struct Command {
    /// The command name as typed by the user. Case-sensitive.
    pub name: &'static str,

    /// A brief description shown by `help`.
    pub description: &'static str,

    /// The function that implements the command logic.
    pub handler: CommandFn,
}

/// Interpreter privilege mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Read-only: inspect settings, run commands.
    #[default]
    Normal,
    /// Settings may be assigned, saved and loaded.
    Configuration,
}

impl Mode {
    /// Prompt printed before each line in this mode.
    pub fn prompt(&self) -> &'static str {
        match self {
            Mode::Normal => ">",
            Mode::Configuration => "#",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Mode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Mode::Normal => defmt::write!(f, "Normal"),
            Mode::Configuration => defmt::write!(f, "Configuration"),
        }
    }
}

/// Adapts a [`Transport`] to `core::fmt::Write`.
struct Sink<'t, T: Transport> {
    transport: &'t mut T,
}

impl<T: Transport> fmt::Write for Sink<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.transport.write(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

fn emit<T: Transport>(transport: &mut T, args: fmt::Arguments<'_>) -> Result<(), Error> {
    Sink { transport }
        .write_fmt(args)
        .map_err(|_| Error::Transport)
}

fn emit_str<T: Transport>(transport: &mut T, text: &str) -> Result<(), Error> {
    transport.write(text.as_bytes()).map_err(|_| Error::Transport)
}

/// The configuration shell.
///
/// Owns the transport, the storage device, the platform handle and the
/// registry of settings for the lifetime of the application. Entries and
/// commands are registered once during setup; after that the application
/// calls [`poll`](Self::poll) from its main loop.
#[derive(Debug)]
pub struct Shell<T: Transport, S: Storage, P: Platform> {
    transport: T,
    storage: S,
    platform: P,
    registry: Registry,

    // Line assembly
    line: Vec<u8, LINE_CAPACITY>,
    last_byte: u8,

    mode: Mode,
    commands: Vec<Command, MAX_COMMANDS>,

    // Configuration options
    layout: Layout,
    echo_enabled: bool,
}

impl<T: Transport, S: Storage, P: Platform> Shell<T, S, P> {
    /// Create a shell in normal mode with echo enabled, the plain storage
    /// layout and no entries or commands.
    pub fn new(transport: T, storage: S, platform: P) -> Self {
        Self {
            transport,
            storage,
            platform,
            registry: Registry::new(),
            line: Vec::new(),
            last_byte: 0,
            mode: Mode::Normal,
            commands: Vec::new(),
            layout: Layout::Plain,
            echo_enabled: true,
        }
    }

    /// Enable or disable echoing of typed characters.
    ///
    /// Disable for scripted input where the host does not want its own
    /// bytes back.
    pub fn set_echo(&mut self, enabled: bool) {
        self.echo_enabled = enabled;
    }

    /// Choose the storage layout used by `save` and `load`.
    ///
    /// Defaults to [`Layout::Plain`]. Switching layouts makes previously
    /// saved data unreadable, so pick one before the first `save`.
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Register a setting.
    ///
    /// # Returns
    ///
    /// * [`ShellResult::Ok`] - Entry registered
    /// * [`ShellResult::InvalidParameter`] - Empty or duplicate name, or a
    ///   default value the entry itself rejects
    /// * [`ShellResult::OutOfMemory`] - Registry is full
    /// * [`ShellResult::BufferOverflow`] - `name=` would not fit on a line
    pub fn add_entry(&mut self, entry: Entry) -> ShellResult {
        if entry.name().len() >= LINE_CAPACITY {
            return ShellResult::BufferOverflow;
        }

        match self.registry.register(entry) {
            Ok(()) => ShellResult::Ok,
            Err(Error::OutOfMemory) => ShellResult::OutOfMemory,
            Err(_) => ShellResult::InvalidParameter,
        }
    }

    /// Register an extension command.
    ///
    /// Extension commands are only consulted after every built-in, so a
    /// command named like a built-in can be registered but never runs.
    ///
    /// # Returns
    ///
    /// * [`ShellResult::Ok`] - Command registered
    /// * [`ShellResult::InvalidParameter`] - Empty command name
    /// * [`ShellResult::OutOfMemory`] - [`MAX_COMMANDS`] already registered
    /// * [`ShellResult::BufferOverflow`] - Name longer than a line can hold
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use confshell::storage::ram::RamStorage;
    /// # use confshell::system::platform::NoReboot;
    /// # use confshell::system::shell::{Shell, ShellResult};
    /// # use confshell::system::transport::Transport;
    /// # struct Console;
    /// # impl Transport for Console {
    /// #     type Error = ();
    /// #     fn available(&mut self) -> bool { false }
    /// #     fn read_byte(&mut self) -> Result<u8, ()> { Err(()) }
    /// #     fn write(&mut self, _: &[u8]) -> Result<(), ()> { Ok(()) }
    /// # }
    /// let mut shell = Shell::new(Console, RamStorage::<64>::new(), NoReboot);
    ///
    /// let result = shell.add_command("uptime", "Show uptime", |_, out| {
    ///     let _ = write!(out, "up {} s\r\n", 12345);
    ///     ShellResult::Ok
    /// });
    /// assert_eq!(result, ShellResult::Ok);
    /// ```
    pub fn add_command(
        &mut self,
        name: &'static str,
        description: &'static str,
        handler: CommandFn,
    ) -> ShellResult {
        if name.is_empty() {
            return ShellResult::InvalidParameter;
        }
        if name.len() > LINE_CAPACITY {
            return ShellResult::BufferOverflow;
        }

        let command = Command {
            name,
            description,
            handler,
        };

        match self.commands.push(command) {
            Ok(()) => ShellResult::Ok,
            Err(_) => ShellResult::OutOfMemory,
        }
    }

    /// Restore settings and greet the operator.
    ///
    /// Loads every entry from storage (falling back to defaults if the
    /// stored data is unusable), then prints the banner, the version, the
    /// current settings, the entry help, a command summary and the prompt.
    pub fn begin(&mut self, banner: &str) -> Result<(), Error> {
        self.load()?;

        if !banner.is_empty() {
            emit(&mut self.transport, format_args!("{}\r\n", banner))?;
        }
        emit(&mut self.transport, format_args!("confshell ver.{}\r\n", VERSION))?;
        emit_str(&mut self.transport, "current setting\r\n")?;
        self.show()?;
        emit_str(&mut self.transport, "setting description (and default value)\r\n")?;
        self.describe_entries()?;
        emit_str(&mut self.transport, "commands\r\n")?;
        emit_str(
            &mut self.transport,
            "    help, show, conf, exit, load [default], save, reboot\r\n",
        )?;
        if !self.commands.is_empty() {
            emit_str(&mut self.transport, "    ")?;
            for (i, command) in self.commands.iter().enumerate() {
                if i > 0 {
                    emit_str(&mut self.transport, ", ")?;
                }
                emit_str(&mut self.transport, command.name)?;
            }
            emit_str(&mut self.transport, NEWLINE)?;
        }
        self.prompt()
    }

    /// Process every byte the transport currently has.
    ///
    /// Never waits for input: returns as soon as
    /// [`Transport::available`] reports nothing pending. Call it once per
    /// main loop iteration.
    ///
    /// # Character Handling
    ///
    /// - **CR, LF, CRLF**: One line terminator; the line is executed
    /// - **Backspace/Delete**: Removes the last character with visual feedback
    /// - **Anything else**: Appended to the line buffer and echoed
    ///
    /// A line longer than the buffer is discarded together with whatever
    /// else is pending, and a fresh prompt is printed.
    pub fn poll(&mut self) -> Result<(), Error> {
        while self.transport.available() {
            let byte = self.transport.read_byte().map_err(|_| Error::Transport)?;
            self.input(byte)?;
        }
        Ok(())
    }

    /// Execute one complete line.
    ///
    /// Matching is exact and case-sensitive and the first rule that applies
    /// wins:
    ///
    /// 1. `help`
    /// 2. `reboot` / `restart`
    /// 3. `show`
    /// 4. `conf`
    /// 5. `exit`
    /// 6. `save` (configuration mode)
    /// 7. `load` (configuration mode)
    /// 8. `load default` (configuration mode)
    /// 9. anything with `=`: `name=value` assignment (configuration mode)
    /// 10. empty line: nothing
    /// 11. extension commands, in registration order
    ///
    /// Operator errors (bad value, unknown name, wrong mode) are reported on
    /// the transport and return `Ok`; only transport failures are errors.
    pub fn execute(&mut self, line: &str) -> Result<(), Error> {
        match line {
            "help" => self.help(),
            "reboot" | "restart" => self.reboot(),
            "show" => self.show(),
            "conf" => self.enter_configuration(),
            "exit" => self.exit_configuration(),
            "save" => {
                if self.require_configuration()? {
                    self.save()?;
                }
                Ok(())
            }
            "load" => {
                if self.require_configuration()? {
                    self.load()?;
                }
                Ok(())
            }
            "load default" => {
                if self.require_configuration()? {
                    self.load_default()?;
                }
                Ok(())
            }
            _ if line.contains('=') => {
                if self.require_configuration()? {
                    self.assign(line)?;
                }
                Ok(())
            }
            "" => Ok(()),
            _ => self.run_extension(line),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Look up a setting by exact name.
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.registry.lookup(name)
    }

    /// All settings.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// All settings, for application code that edits them directly.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// The storage device.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The storage device, mutably.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The platform handle.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    fn input(&mut self, byte: u8) -> Result<(), Error> {
        let previous = core::mem::replace(&mut self.last_byte, byte);

        match byte {
            // second half of CRLF
            ASCII_LF if previous == ASCII_CR => Ok(()),
            ASCII_CR | ASCII_LF => {
                if self.echo_enabled {
                    emit_str(&mut self.transport, NEWLINE)?;
                }
                self.complete_line()
            }
            ASCII_BACKSPACE | ASCII_DEL => {
                if self.line.pop().is_some() && self.echo_enabled {
                    emit_str(&mut self.transport, ERASE_ECHO)?;
                }
                Ok(())
            }
            _ => {
                if self.line.push(byte).is_err() {
                    return self.overflow();
                }
                if self.echo_enabled {
                    self.transport.write(&[byte]).map_err(|_| Error::Transport)?;
                }
                Ok(())
            }
        }
    }

    fn complete_line(&mut self) -> Result<(), Error> {
        let line = core::mem::take(&mut self.line);
        match core::str::from_utf8(&line) {
            Ok(text) => self.execute(text)?,
            Err(_) => emit_str(&mut self.transport, "unknown command\r\n")?,
        }
        self.prompt()
    }

    fn overflow(&mut self) -> Result<(), Error> {
        log_warn!("line exceeds {=usize} bytes, discarded", LINE_CAPACITY);
        emit_str(&mut self.transport, NEWLINE)?;
        emit_str(&mut self.transport, MSG_TOO_LONG)?;
        while self.transport.available() {
            self.last_byte = self.transport.read_byte().map_err(|_| Error::Transport)?;
        }
        self.line.clear();
        self.prompt()
    }

    fn prompt(&mut self) -> Result<(), Error> {
        emit_str(&mut self.transport, self.mode.prompt())
    }

    fn require_configuration(&mut self) -> Result<bool, Error> {
        if self.mode == Mode::Configuration {
            return Ok(true);
        }
        emit_str(&mut self.transport, MSG_SWITCH_MODE)?;
        Ok(false)
    }

    fn enter_configuration(&mut self) -> Result<(), Error> {
        if self.mode == Mode::Configuration {
            return emit_str(&mut self.transport, "already conf mode\r\n");
        }
        self.mode = Mode::Configuration;
        log_info!("mode: {}", self.mode);
        emit_str(&mut self.transport, "enter conf mode\r\n")
    }

    fn exit_configuration(&mut self) -> Result<(), Error> {
        if self.mode == Mode::Normal {
            return emit_str(&mut self.transport, "already normal mode\r\n");
        }
        self.mode = Mode::Normal;
        log_info!("mode: {}", self.mode);
        emit_str(&mut self.transport, "enter normal mode\r\n")
    }

    fn help(&mut self) -> Result<(), Error> {
        self.describe_entries()?;
        if self.commands.is_empty() {
            return Ok(());
        }
        emit_str(&mut self.transport, "extension commands\r\n")?;
        for command in &self.commands {
            emit(
                &mut self.transport,
                format_args!("    {}... {}\r\n", command.name, command.description),
            )?;
        }
        Ok(())
    }

    fn describe_entries(&mut self) -> Result<(), Error> {
        for entry in &self.registry {
            emit(
                &mut self.transport,
                format_args!(
                    "    {} [{}]... {}(default {})\r\n",
                    entry.name(),
                    entry.kind().as_str(),
                    entry.description(),
                    entry.default_value()
                ),
            )?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<(), Error> {
        for entry in &self.registry {
            emit(
                &mut self.transport,
                format_args!("    {}={}\r\n", entry.name(), entry.value()),
            )?;
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), Error> {
        emit_str(&mut self.transport, "saving...")?;
        match codec::save(&self.registry, &mut self.storage, self.layout) {
            Ok(_) => emit_str(&mut self.transport, "done.\r\n"),
            Err(err) => {
                log_warn!("save failed: {}", err);
                emit_str(&mut self.transport, "failed.\r\n")
            }
        }
    }

    fn load(&mut self) -> Result<(), Error> {
        emit_str(&mut self.transport, "loading...")?;
        match codec::load(&mut self.registry, &mut self.storage, self.layout) {
            Ok(_) => emit_str(&mut self.transport, "done.\r\n"),
            Err(_) => {
                // the codec has already restored defaults
                emit_str(&mut self.transport, "failed.\r\n")?;
                emit_str(&mut self.transport, "loading(default)...done.\r\n")
            }
        }
    }

    fn load_default(&mut self) -> Result<(), Error> {
        emit_str(&mut self.transport, "loading(default)...")?;
        codec::load_default(&mut self.registry);
        emit_str(&mut self.transport, "done.\r\n")
    }

    fn assign(&mut self, line: &str) -> Result<(), Error> {
        let Some((name, value)) = line.split_once('=') else {
            return Ok(());
        };

        match self.registry.assign(name, value) {
            Ok(()) => {
                log_debug!("{=str} updated", name);
                Ok(())
            }
            Err(Error::EntryNotFound) => emit(
                &mut self.transport,
                format_args!("entry not found:{}\r\n", name),
            ),
            // InvalidFormat, or BufferOverflow for text longer than any value
            Err(_) => emit_str(&mut self.transport, MSG_INVALID_FORMAT),
        }
    }

    fn reboot(&mut self) -> Result<(), Error> {
        emit_str(&mut self.transport, "rebooting...\r\n")?;
        match self.platform.reboot() {
            Ok(never) => match never {},
            Err(Error::UnsupportedOperation) => {
                log_warn!("reboot unavailable on this platform");
                emit_str(
                    &mut self.transport,
                    "reboot failed: not supported on this platform\r\n",
                )
            }
            Err(err) => {
                log_warn!("reboot failed: {}", err);
                emit_str(&mut self.transport, "reboot failed\r\n")
            }
        }
    }

    fn run_extension(&mut self, line: &str) -> Result<(), Error> {
        let Some(command) = self.commands.iter().find(|cmd| cmd.name == line).cloned() else {
            return emit(
                &mut self.transport,
                format_args!("unknown command:{}\r\n", line),
            );
        };

        let mut sink = Sink {
            transport: &mut self.transport,
        };
        let result = (command.handler)(&mut self.registry, &mut sink);
        if result != ShellResult::Ok {
            return emit(
                &mut self.transport,
                format_args!("command failed:{}\r\n", command.name),
            );
        }
        Ok(())
    }
}
