//! Windows backend driving `netsh interface ipv4`.

use log::info;

use super::{DnsBackend, DnsSnapshot, Host, Invocation, run_checked, trailing_token_addresses};
use crate::error::Result;

pub struct NetshBackend {
    interface: String,
    host: Box<dyn Host>,
}

impl NetshBackend {
    pub fn new(interface: String, host: Box<dyn Host>) -> Self {
        Self { interface, host }
    }

    fn netsh(&self, verb: &str) -> Invocation {
        Invocation::new("netsh")
            .arg("interface")
            .arg("ipv4")
            .arg(verb)
            .arg("dnsservers")
            .arg(format!("name={}", self.interface))
    }

    fn read_invocation(&self) -> Invocation {
        self.netsh("show")
    }

    /// Static primary first, then the secondary appended at index 2.
    /// netsh refuses to add an address already in the list, so a repeated
    /// address is only set once.
    fn write_invocations(&self, primary: &str, secondary: &str) -> Vec<Invocation> {
        let mut invocations = vec![
            self.netsh("set")
                .arg("source=static")
                .arg(format!("address={primary}"))
                .arg("register=primary"),
        ];
        if secondary != primary {
            invocations.push(
                self.netsh("add")
                    .arg(format!("address={secondary}"))
                    .arg("index=2"),
            );
        }
        invocations
    }

    fn automatic_invocation(&self) -> Invocation {
        self.netsh("set").arg("source=dhcp")
    }
}

impl DnsBackend for NetshBackend {
    fn name(&self) -> &'static str {
        "netsh"
    }

    fn read_dns(&self) -> Result<DnsSnapshot> {
        let output = run_checked(self.host.as_ref(), &self.read_invocation())?;
        Ok(DnsSnapshot::from_addresses(trailing_token_addresses(
            &output.stdout,
        )))
    }

    fn write_dns(&self, primary: &str, secondary: &str) -> Result<()> {
        for invocation in self.write_invocations(primary, secondary) {
            run_checked(self.host.as_ref(), &invocation)?;
        }
        info!(
            "DNS servers {primary} and {secondary} set for '{}'",
            self.interface
        );
        Ok(())
    }

    fn restore_automatic(&self) -> Result<()> {
        run_checked(self.host.as_ref(), &self.automatic_invocation())?;
        info!("DNS reset to DHCP for '{}'", self.interface);
        Ok(())
    }
}
