//! The interaction controller behind the window.
//!
//! `Switcher` owns everything the window shows: the current snapshot, the
//! snapshot captured before the first change, the log pane and pending
//! notices. The UI only renders it and forwards clicks as [`Action`]s.

use std::collections::VecDeque;

use log::{error, info, warn};

use crate::backend::{DnsBackend, DnsSnapshot};
use crate::catalog::Catalog;
use crate::error::{Error, ErrorKind, Result};

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Apply(String),
    Reset,
    Refresh,
}

/// Whether an action is queued for the next frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    InProgress(Action),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A message that blocks the window until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }

    fn from_error(err: &Error) -> Self {
        match (err.kind(), err) {
            (ErrorKind::PermissionDenied, _) => {
                Self::new(Severity::Warning, "Permission Required", err.to_string())
            }
            (ErrorKind::CommandFailure, Error::CommandFailed { output, .. }) => Self::new(
                Severity::Error,
                "Error",
                format!(
                    "Failed to set DNS: {output}\n\nPlease ensure you run this application as an administrator."
                ),
            ),
            (ErrorKind::Usage, Error::NoInitialSnapshot) => Self::new(
                Severity::Error,
                "Cannot Reset",
                "The app was unable to determine your initial DNS. Please try again or reset manually.",
            ),
            (ErrorKind::Usage, _) => Self::new(Severity::Error, "Error", err.to_string()),
            _ => Self::new(
                Severity::Error,
                "An unexpected error occurred",
                format!("An unexpected error occurred: {err}"),
            ),
        }
    }
}

pub struct Switcher {
    backend: Box<dyn DnsBackend>,
    catalog: Catalog,
    current: DnsSnapshot,
    initial: Option<DnsSnapshot>,
    log: Vec<String>,
    notices: VecDeque<Notice>,
    phase: Phase,
}

impl Switcher {
    /// Builds the controller and reads the servers shown at startup.
    pub fn new(backend: Box<dyn DnsBackend>, catalog: Catalog) -> Self {
        info!("using the {} backend", backend.name());
        let mut switcher = Self {
            backend,
            catalog,
            current: DnsSnapshot::error(),
            initial: None,
            log: Vec::new(),
            notices: VecDeque::new(),
            phase: Phase::Idle,
        };
        switcher.push_log("Ready to change DNS settings.");
        switcher.refresh();
        switcher
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current(&self) -> &DnsSnapshot {
        &self.current
    }

    pub fn initial(&self) -> Option<&DnsSnapshot> {
        self.initial.as_ref()
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The notice to show now, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// Startup warning for a process that could not get root. `message`
    /// is shown as is, so it must name the platform's way to elevate.
    pub fn warn_unprivileged(&mut self, message: &str) {
        self.push_log("Running without administrator privileges. DNS changes will fail.");
        self.notify(Notice::new(Severity::Warning, "Permission Required", message));
    }

    /// Queue `action` unless one is already waiting.
    pub fn request(&mut self, action: Action) {
        if self.phase == Phase::Idle {
            self.phase = Phase::InProgress(action);
        } else {
            warn!("ignoring {action:?}, another action is in progress");
        }
    }

    /// Run the queued action, blocking until its command exits.
    pub fn run_pending(&mut self) -> Option<Result<()>> {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => None,
            Phase::InProgress(action) => Some(self.dispatch(action)),
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Apply(name) => self.apply(&name),
            Action::Reset => self.reset(),
            Action::Refresh => {
                self.refresh();
                Ok(())
            }
        }
    }

    /// Re-read the servers and show them.
    pub fn refresh(&mut self) {
        self.current = self.read_snapshot();
        let line = format!("Current DNS: {}", self.current);
        self.push_log(line);
    }

    /// Switch to provider `name`, remembering the servers in use beforehand
    /// the first time this is called.
    pub fn apply(&mut self, name: &str) -> Result<()> {
        if self.initial.is_none() {
            let snapshot = self.read_snapshot();
            info!("captured initial DNS: {snapshot}");
            self.initial = Some(snapshot);
        }

        let Some(provider) = self.catalog.get(name).cloned() else {
            let err = Error::UnknownProvider(name.to_string());
            self.report(&err);
            return Err(err);
        };
        let (primary, secondary) = provider.get_servers();

        self.push_log(format!(
            "Attempting to set DNS to {}...",
            provider.display_name()
        ));
        match self.backend.write_dns(&primary, &secondary) {
            Ok(()) => {
                self.notify(Notice::new(
                    Severity::Info,
                    "Success",
                    format!(
                        "DNS has been set to {} successfully!",
                        provider.display_name()
                    ),
                ));
                self.refresh();
                Ok(())
            }
            Err(err) => {
                self.report(&err);
                self.push_log("Failed to change DNS. Please ensure you have administrative privileges.");
                Err(err)
            }
        }
    }

    /// Put back the servers captured before the first [`Switcher::apply`].
    pub fn reset(&mut self) -> Result<()> {
        let Some(initial) = self.initial.clone() else {
            self.push_log("No initial DNS recorded. Cannot reset.");
            let err = Error::NoInitialSnapshot;
            self.notify(Notice::from_error(&err));
            return Err(err);
        };
        if initial.is_error() {
            let err = Error::UnreadableInitialSnapshot;
            self.report(&err);
            return Err(err);
        }

        self.push_log("Attempting to reset DNS to default...");
        let result = match initial.addresses().as_slice() {
            [] => self.backend.restore_automatic(),
            [primary] => self.backend.write_dns(primary, primary),
            [primary, secondary, ..] => self.backend.write_dns(primary, secondary),
        };

        match result {
            Ok(()) => {
                self.notify(Notice::new(
                    Severity::Info,
                    "Success",
                    "DNS has been reset to default successfully!",
                ));
                self.refresh();
                Ok(())
            }
            Err(err) => {
                self.report(&err);
                self.push_log("Failed to reset DNS. Please ensure you have administrative privileges.");
                Err(err)
            }
        }
    }

    fn read_snapshot(&mut self) -> DnsSnapshot {
        match self.backend.read_dns() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("reading DNS servers failed: {err}");
                self.push_log(format!("Failed to get current DNS servers: {err}"));
                self.notify(Notice::new(
                    Severity::Error,
                    "Error",
                    format!("Failed to get current DNS servers: {err}"),
                ));
                DnsSnapshot::error()
            }
        }
    }

    fn report(&mut self, err: &Error) {
        error!("{err}");
        self.push_log(format!("Error: {err}"));
        self.notify(Notice::from_error(err));
    }

    fn push_log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.log.push(message);
    }
}
