//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::backend::{BackendSettings, Platform};
use crate::catalog::{Catalog, DnsProvider};

/// Switch the system DNS resolver to a public provider, or back again.
#[derive(Debug, Parser)]
#[command(name = "dns-switcher", version, about)]
pub struct Cli {
    /// Interface to configure: the adapter alias on Windows, the network
    /// service on macOS (e.g. "Wi-Fi"), the NetworkManager device on Linux.
    #[arg(short, long, env = "DNS_SWITCHER_INTERFACE")]
    pub interface: String,

    /// Override the detected operating system.
    #[arg(long, value_enum, default_value_t = Platform::current())]
    pub platform: Platform,

    /// Resolver file read on Linux.
    #[arg(long, default_value = "/etc/resolv.conf")]
    pub resolv_conf: PathBuf,

    /// Extra provider, NAME=IP[,IP]. Can be repeated.
    #[arg(long = "provider", value_name = "NAME=IP[,IP]")]
    pub providers: Vec<DnsProvider>,

    /// Do not ask Windows to relaunch this program as administrator.
    #[arg(long)]
    pub no_elevate: bool,
}

impl Cli {
    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            interface: self.interface.clone(),
            resolv_conf: self.resolv_conf.clone(),
        }
    }

    /// Shown next to the app name in the title bar.
    pub fn subtitle(&self) -> String {
        format!("{} on {}", self.interface, self.platform)
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::with_custom(self.providers.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn interface_is_required() {
        let from_env = std::env::var_os("DNS_SWITCHER_INTERFACE").is_some();
        if !from_env {
            assert!(Cli::try_parse_from(["dns-switcher"]).is_err());
        }
    }

    #[test]
    fn parses_everything() {
        let cli = Cli::try_parse_from([
            "dns-switcher",
            "-i",
            "Wi-Fi",
            "--platform",
            "macos",
            "--provider",
            "Lab=10.0.0.53",
            "--provider",
            "Quad9=9.9.9.10,149.112.112.10",
            "--no-elevate",
        ])
        .unwrap();

        assert_eq!(cli.platform, Platform::Macos);
        assert!(cli.no_elevate);
        assert_eq!(cli.backend_settings().interface, "Wi-Fi");
        assert_eq!(cli.resolv_conf, PathBuf::from("/etc/resolv.conf"));
        assert_eq!(cli.subtitle(), "Wi-Fi on macOS");

        let catalog = cli.catalog();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("Quad9").unwrap().addresses(), ["9.9.9.10", "149.112.112.10"]);
    }

    #[test]
    fn bad_provider_is_rejected() {
        let result = Cli::try_parse_from(["dns-switcher", "-i", "eth0", "--provider", "Lab=localhost"]);
        assert!(result.is_err());
    }
}
