//! Error types shared by the backends, the elevation helper and the switcher.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A DNS write was attempted without root privileges.
    #[error("This application needs to be run with root privileges (sudo) to change DNS settings.")]
    PermissionDenied,

    /// The external command ran but exited with a non-zero status.
    #[error("`{command}` exited with {status}: {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    /// The external command could not be started at all.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    ResolvConf {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No initial DNS recorded. Cannot reset.")]
    NoInitialSnapshot,

    #[error("The initial DNS servers could not be read, so there is nothing to reset to.")]
    UnreadableInitialSnapshot,

    #[error("unknown DNS provider `{0}`")]
    UnknownProvider(String),

    #[error("invalid provider entry: {0}")]
    InvalidProvider(String),

    #[error("could not relaunch as administrator: {0}")]
    Elevation(String),
}

/// Coarse classification used to pick the dialog shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PermissionDenied,
    CommandFailure,
    UnexpectedFailure,
    Usage,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PermissionDenied => ErrorKind::PermissionDenied,
            Error::CommandFailed { .. } => ErrorKind::CommandFailure,
            Error::Spawn { .. } | Error::ResolvConf { .. } | Error::Elevation(_) => {
                ErrorKind::UnexpectedFailure
            }
            Error::NoInitialSnapshot
            | Error::UnreadableInitialSnapshot
            | Error::UnknownProvider(_)
            | Error::InvalidProvider(_) => ErrorKind::Usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(Error::PermissionDenied.kind(), ErrorKind::PermissionDenied);

        let failed = Error::CommandFailed {
            command: "nmcli device modify eth0".into(),
            status: "exit status: 10".into(),
            output: "Error: Device 'eth0' not found.".into(),
        };
        assert_eq!(failed.kind(), ErrorKind::CommandFailure);
        assert!(failed.to_string().contains("Device 'eth0' not found"));

        let spawn = Error::Spawn {
            command: "netsh".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(spawn.kind(), ErrorKind::UnexpectedFailure);
        assert_eq!(Error::NoInitialSnapshot.kind(), ErrorKind::Usage);
    }
}
