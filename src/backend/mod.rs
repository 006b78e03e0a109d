//! Platform command adapter: reads and writes the system DNS servers by
//! running the OS network configuration tools.

mod extract;
mod netsh;
mod networksetup;
mod nmcli;

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::{debug, warn};

pub use extract::{is_dotted_quad, nameserver_addresses, trailing_token_addresses, whole_line_addresses};
pub use netsh::NetshBackend;
pub use networksetup::NetworkSetupBackend;
pub use nmcli::NmcliBackend;

use crate::error::{Error, Result};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000; // Hide console window

/// One slot of a DNS snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerSlot {
    Address(String),
    NotFound,
    Error,
}

impl ServerSlot {
    pub fn address(&self) -> Option<&str> {
        match self {
            ServerSlot::Address(addr) => Some(addr),
            ServerSlot::NotFound | ServerSlot::Error => None,
        }
    }
}

impl fmt::Display for ServerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerSlot::Address(addr) => f.write_str(addr),
            ServerSlot::NotFound => f.write_str("Not Found"),
            ServerSlot::Error => f.write_str("Error"),
        }
    }
}

/// Primary and secondary servers as last read from the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsSnapshot {
    pub primary: ServerSlot,
    pub secondary: ServerSlot,
}

impl DnsSnapshot {
    /// Takes the first two addresses; missing ones become `NotFound`.
    pub fn from_addresses(addresses: impl IntoIterator<Item = String>) -> Self {
        let mut iter = addresses.into_iter().map(ServerSlot::Address);
        Self {
            primary: iter.next().unwrap_or(ServerSlot::NotFound),
            secondary: iter.next().unwrap_or(ServerSlot::NotFound),
        }
    }

    pub fn pair(primary: &str, secondary: &str) -> Self {
        Self::from_addresses([primary.to_string(), secondary.to_string()])
    }

    pub fn error() -> Self {
        Self {
            primary: ServerSlot::Error,
            secondary: ServerSlot::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.primary == ServerSlot::Error || self.secondary == ServerSlot::Error
    }

    /// Addresses present in the snapshot, in order.
    pub fn addresses(&self) -> Vec<&str> {
        [&self.primary, &self.secondary]
            .into_iter()
            .filter_map(ServerSlot::address)
            .collect()
    }
}

impl fmt::Display for DnsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primary={}, Secondary={}", self.primary, self.secondary)
    }
}

/// A program and its argument vector. Nothing goes through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: &'static str) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Process and privilege access, swapped out in tests.
pub trait Host {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput>;

    fn is_elevated(&self) -> bool;
}

/// The real machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHost;

impl Host for NativeHost {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        let mut command = Command::new(invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let output = command.output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_elevated(&self) -> bool {
        crate::elevation::is_elevated()
    }
}

/// Run `invocation` and turn a spawn error or non-zero exit into an [`Error`].
pub(crate) fn run_checked(host: &dyn Host, invocation: &Invocation) -> Result<CommandOutput> {
    debug!("running {invocation}");
    let output = host.run(invocation).map_err(|source| Error::Spawn {
        command: invocation.to_string(),
        source,
    })?;

    if output.success {
        return Ok(output);
    }

    // netsh reports its errors on stdout
    let text = if output.stderr.trim().is_empty() {
        output.stdout.trim()
    } else {
        output.stderr.trim()
    };
    let status = match output.code {
        Some(code) => format!("exit status {code}"),
        None => "no exit status".to_string(),
    };
    warn!("`{invocation}` failed with {status}");
    Err(Error::CommandFailed {
        command: invocation.to_string(),
        status,
        output: text.to_string(),
    })
}

/// Refuse a write up front when the host lacks root.
pub(crate) fn require_elevated(host: &dyn Host) -> Result<()> {
    if host.is_elevated() {
        Ok(())
    } else {
        warn!("refusing to change DNS without root privileges");
        Err(Error::PermissionDenied)
    }
}

/// Reads and writes DNS servers for one configured interface.
pub trait DnsBackend {
    /// Short label for logs, e.g. `netsh`.
    fn name(&self) -> &'static str;

    /// Current servers. Fewer than two found addresses leave `NotFound` slots.
    fn read_dns(&self) -> Result<DnsSnapshot>;

    /// Replace the interface's servers with `primary` and `secondary`.
    fn write_dns(&self, primary: &str, secondary: &str) -> Result<()>;

    /// Drop static servers and go back to what DHCP hands out.
    fn restore_automatic(&self) -> Result<()>;
}

/// Operating systems with a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    /// The OS this binary was built for. Other unixes use the Linux tools.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else {
            Platform::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Windows => "Windows",
            Platform::Macos => "macOS",
            Platform::Linux => "Linux",
        })
    }
}

/// Inputs every backend needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// Adapter alias, network service or NetworkManager device.
    pub interface: String,
    pub resolv_conf: PathBuf,
}

/// Pick the backend for `platform`. Called once at startup.
pub fn select(
    platform: Platform,
    settings: BackendSettings,
    host: Box<dyn Host>,
) -> Box<dyn DnsBackend> {
    match platform {
        Platform::Windows => Box::new(NetshBackend::new(settings.interface, host)),
        Platform::Macos => Box::new(NetworkSetupBackend::new(settings.interface, host)),
        Platform::Linux => Box::new(NmcliBackend::new(
            settings.interface,
            settings.resolv_conf,
            host,
        )),
    }
}
