//! Test doubles shared by the integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use dns_switcher::backend::{DnsBackend, DnsSnapshot};
use dns_switcher::error::{Error, Result};

#[derive(Debug)]
pub struct Machine {
    /// What the OS reports as its resolvers right now.
    pub servers: Vec<String>,
    pub writes: Vec<(String, String)>,
    pub restores: usize,
    pub reads: usize,
    pub fail_writes: bool,
}

/// Simulates one interface: writes change what later reads return.
#[derive(Clone)]
pub struct SimulatedBackend {
    pub machine: Rc<RefCell<Machine>>,
}

impl SimulatedBackend {
    pub fn with_servers(servers: &[&str]) -> Self {
        Self {
            machine: Rc::new(RefCell::new(Machine {
                servers: servers.iter().map(|s| s.to_string()).collect(),
                writes: Vec::new(),
                restores: 0,
                reads: 0,
                fail_writes: false,
            })),
        }
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.machine.borrow().writes.clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.machine.borrow_mut().fail_writes = failing;
    }
}

impl DnsBackend for SimulatedBackend {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn read_dns(&self) -> Result<DnsSnapshot> {
        let mut machine = self.machine.borrow_mut();
        machine.reads += 1;
        Ok(DnsSnapshot::from_addresses(machine.servers.clone()))
    }

    fn write_dns(&self, primary: &str, secondary: &str) -> Result<()> {
        let mut machine = self.machine.borrow_mut();
        if machine.fail_writes {
            return Err(Error::CommandFailed {
                command: format!("nmcli device modify eth0 ipv4.dns {primary},{secondary}"),
                status: "exit status 4".into(),
                output: "Error: Connection activation failed.".into(),
            });
        }
        machine.writes.push((primary.to_string(), secondary.to_string()));
        machine.servers = vec![primary.to_string(), secondary.to_string()];
        Ok(())
    }

    fn restore_automatic(&self) -> Result<()> {
        let mut machine = self.machine.borrow_mut();
        machine.restores += 1;
        machine.servers.clear();
        Ok(())
    }
}
