//! Checking for, and on Windows requesting, administrator rights.

use log::{info, warn};

use crate::error::Result;

pub use imp::is_elevated;

/// Outcome of [`ensure_elevated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Already running as administrator / root.
    Elevated,
    /// An elevated copy was started; this process should exit now.
    Relaunched,
    /// Running without rights. DNS writes will fail or be refused.
    Unprivileged,
}

/// Make sure DNS writes can succeed.
///
/// On Windows a non-elevated process asks UAC to start an elevated copy of
/// itself (unless `allow_relaunch` is false). Unix has no such API, so the
/// caller is told to warn the user and carries on unprivileged.
pub fn ensure_elevated(allow_relaunch: bool) -> Result<Elevation> {
    if is_elevated() {
        return Ok(Elevation::Elevated);
    }

    if cfg!(windows) && allow_relaunch {
        info!("not elevated, relaunching with the runas verb");
        imp::relaunch_elevated()?;
        return Ok(Elevation::Relaunched);
    }

    warn!("running without administrator privileges; DNS changes will fail");
    Ok(Elevation::Unprivileged)
}

/// Warning shown to unprivileged users, with how to start this program
/// again with rights on the current platform.
pub fn unprivileged_warning() -> String {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    if cfg!(windows) {
        format!(
            "This application needs administrator rights to change DNS settings. \
             Right-click {program} and choose \"Run as administrator\"."
        )
    } else {
        format!(
            "This application needs to be run with root privileges (sudo) to change DNS settings. \
             Please run it as 'sudo {program} --interface <NAME>' from the terminal."
        )
    }
}

/// Quote one argument so `CommandLineToArgvW` splits it back unchanged.
pub fn quote_windows_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '\n', '\u{b}', '"']) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    // backslashes before the closing quote must be doubled
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    quoted
}

#[cfg(windows)]
mod imp {
    use std::ffi::c_void;
    use std::mem::size_of;

    use log::error;
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::Security::{
        GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation,
    };
    use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
    use windows::core::{HSTRING, PCWSTR, w};

    use super::quote_windows_arg;
    use crate::error::{Error, Result};

    pub fn is_elevated() -> bool {
        match ProcessToken::our_process().and_then(|token| token.is_elevated()) {
            Ok(elevated) => elevated,
            Err(e) => {
                error!("could not query process elevation: {e}");
                false
            }
        }
    }

    pub fn relaunch_elevated() -> Result<()> {
        let exe = std::env::current_exe().map_err(|e| Error::Elevation(e.to_string()))?;
        let params = std::env::args_os()
            .skip(1)
            .map(|arg| quote_windows_arg(&arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");

        let file = HSTRING::from(exe.as_os_str());
        let params = HSTRING::from(params);
        // SAFETY: both strings outlive the call and are NUL-terminated by HSTRING.
        let instance = unsafe {
            ShellExecuteW(
                None,
                w!("runas"),
                PCWSTR(file.as_ptr()),
                PCWSTR(params.as_ptr()),
                PCWSTR::null(),
                SW_SHOWNORMAL,
            )
        };
        // Values up to 32 are error codes, e.g. 5 when the UAC prompt is declined.
        let code = instance.0 as isize;
        if code <= 32 {
            return Err(Error::Elevation(format!("ShellExecuteW returned {code}")));
        }
        Ok(())
    }

    struct ProcessToken {
        inner: HANDLE,
    }

    impl ProcessToken {
        fn our_process() -> windows::core::Result<Self> {
            // SAFETY: `GetCurrentProcess` returns a pseudo-handle which does not need to be closed.
            let our_proc = unsafe { GetCurrentProcess() };
            let mut inner = HANDLE::default();
            // SAFETY: `inner` is a valid out-pointer for the duration of the call.
            unsafe { OpenProcessToken(our_proc, TOKEN_QUERY, &mut inner) }?;
            Ok(Self { inner })
        }

        fn is_elevated(&self) -> windows::core::Result<bool> {
            let mut elevation = TOKEN_ELEVATION::default();
            let mut return_size = 0u32;
            // SAFETY: the buffer is a `TOKEN_ELEVATION`, matching the `TokenElevation` class.
            unsafe {
                GetTokenInformation(
                    self.inner,
                    TokenElevation,
                    Some(&mut elevation as *mut _ as *mut c_void),
                    size_of::<TOKEN_ELEVATION>() as u32,
                    &mut return_size,
                )
            }?;
            Ok(elevation.TokenIsElevated != 0)
        }
    }

    impl Drop for ProcessToken {
        fn drop(&mut self) {
            // SAFETY: `inner` came from `OpenProcessToken` and is closed only here.
            if let Err(e) = unsafe { CloseHandle(self.inner) } {
                error!("CloseHandle failed: {e}");
            }
        }
    }
}

#[cfg(unix)]
mod imp {
    use crate::error::{Error, Result};

    pub fn is_elevated() -> bool {
        nix::unistd::geteuid().is_root()
    }

    pub fn relaunch_elevated() -> Result<()> {
        Err(Error::Elevation("no elevation API on unix, use sudo".into()))
    }
}

#[cfg(not(any(unix, windows)))]
mod imp {
    use crate::error::{Error, Result};

    pub fn is_elevated() -> bool {
        false
    }

    pub fn relaunch_elevated() -> Result<()> {
        Err(Error::Elevation("no elevation API on this platform".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arguments_stay_bare() {
        assert_eq!(quote_windows_arg("--interface"), "--interface");
        assert_eq!(quote_windows_arg(r"C:\Tools\dns.exe"), r"C:\Tools\dns.exe");
    }

    #[test]
    fn arguments_needing_quotes() {
        assert_eq!(quote_windows_arg(""), r#""""#);
        assert_eq!(quote_windows_arg("Wi-Fi 2"), r#""Wi-Fi 2""#);
        assert_eq!(quote_windows_arg(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote_windows_arg(r"C:\my dir\"), r#""C:\my dir\\""#);
        assert_eq!(quote_windows_arg(r#"a\"b"#), r#""a\\\"b""#);
    }

    #[cfg(unix)]
    #[test]
    fn unix_warning_asks_for_sudo() {
        let warning = unprivileged_warning();
        assert!(warning.starts_with("This application needs to be run with root privileges"));
        assert!(warning.contains("'sudo "));
        assert!(!warning.contains("Run as administrator"));
    }

    #[cfg(windows)]
    #[test]
    fn windows_warning_asks_for_administrator() {
        let warning = unprivileged_warning();
        assert!(warning.starts_with("This application needs administrator rights"));
        assert!(warning.contains("Run as administrator"));
        assert!(!warning.contains("sudo"));
    }

    // Make sure it doesn't crash
    #[test]
    fn unprivileged_without_relaunch_never_relaunches() {
        let outcome = ensure_elevated(false).unwrap();
        assert_ne!(outcome, Elevation::Relaunched);
        assert_eq!(outcome == Elevation::Elevated, is_elevated());
    }
}
