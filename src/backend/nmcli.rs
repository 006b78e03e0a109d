//! Linux backend: reads the resolver file, writes through NetworkManager.

use std::path::PathBuf;

use log::info;

use super::{
    DnsBackend, DnsSnapshot, Host, Invocation, nameserver_addresses, require_elevated,
    run_checked,
};
use crate::error::{Error, Result};

pub struct NmcliBackend {
    device: String,
    resolv_conf: PathBuf,
    host: Box<dyn Host>,
}

impl NmcliBackend {
    pub fn new(device: String, resolv_conf: PathBuf, host: Box<dyn Host>) -> Self {
        Self {
            device,
            resolv_conf,
            host,
        }
    }

    /// `nmcli device modify` only touches the live connection, not the profile.
    fn modify(&self, servers: &str, ignore_auto_dns: bool) -> Invocation {
        Invocation::new("nmcli")
            .arg("device")
            .arg("modify")
            .arg(self.device.clone())
            .arg("ipv4.dns")
            .arg(servers)
            .arg("ipv4.ignore-auto-dns")
            .arg(if ignore_auto_dns { "yes" } else { "no" })
    }
}

impl DnsBackend for NmcliBackend {
    fn name(&self) -> &'static str {
        "nmcli"
    }

    fn read_dns(&self) -> Result<DnsSnapshot> {
        let contents =
            std::fs::read_to_string(&self.resolv_conf).map_err(|source| Error::ResolvConf {
                path: self.resolv_conf.clone(),
                source,
            })?;
        Ok(DnsSnapshot::from_addresses(nameserver_addresses(&contents)))
    }

    fn write_dns(&self, primary: &str, secondary: &str) -> Result<()> {
        require_elevated(self.host.as_ref())?;
        let servers = if secondary == primary {
            primary.to_string()
        } else {
            format!("{primary},{secondary}")
        };
        run_checked(self.host.as_ref(), &self.modify(&servers, true))?;
        info!(
            "DNS servers {primary} and {secondary} set for '{}'",
            self.device
        );
        Ok(())
    }

    fn restore_automatic(&self) -> Result<()> {
        require_elevated(self.host.as_ref())?;
        run_checked(self.host.as_ref(), &self.modify("", false))?;
        info!("DNS reset to DHCP for '{}'", self.device);
        Ok(())
    }
}
