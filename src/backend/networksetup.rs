//! macOS backend driving `networksetup` against one network service.

use log::info;

use super::{
    DnsBackend, DnsSnapshot, Host, Invocation, require_elevated, run_checked,
    whole_line_addresses,
};
use crate::error::Result;

pub struct NetworkSetupBackend {
    service: String,
    host: Box<dyn Host>,
}

impl NetworkSetupBackend {
    pub fn new(service: String, host: Box<dyn Host>) -> Self {
        Self { service, host }
    }

    fn set_servers<'a>(&self, servers: impl IntoIterator<Item = &'a str>) -> Invocation {
        servers.into_iter().fold(
            Invocation::new("networksetup")
                .arg("-setdnsservers")
                .arg(self.service.clone()),
            |invocation, server| invocation.arg(server),
        )
    }
}

impl DnsBackend for NetworkSetupBackend {
    fn name(&self) -> &'static str {
        "networksetup"
    }

    fn read_dns(&self) -> Result<DnsSnapshot> {
        let invocation = Invocation::new("networksetup")
            .arg("-getdnsservers")
            .arg(self.service.clone());
        let output = run_checked(self.host.as_ref(), &invocation)?;
        Ok(DnsSnapshot::from_addresses(whole_line_addresses(
            &output.stdout,
        )))
    }

    fn write_dns(&self, primary: &str, secondary: &str) -> Result<()> {
        require_elevated(self.host.as_ref())?;
        let servers = if secondary == primary {
            vec![primary]
        } else {
            vec![primary, secondary]
        };
        run_checked(self.host.as_ref(), &self.set_servers(servers))?;
        info!(
            "DNS servers {primary} and {secondary} set for '{}'",
            self.service
        );
        Ok(())
    }

    fn restore_automatic(&self) -> Result<()> {
        require_elevated(self.host.as_ref())?;
        // `empty` is networksetup's keyword for "use DHCP"
        run_checked(self.host.as_ref(), &self.set_servers(["empty"]))?;
        info!("DNS reset to DHCP for '{}'", self.service);
        Ok(())
    }
}
