//! Domain types for the public DNS providers offered in the window.

use std::fmt;
use std::str::FromStr;

use crate::backend::is_dotted_quad;
use crate::error::Error;

/// Button color for entries added on the command line.
const CUSTOM_ACCENT: [u8; 3] = [95, 99, 104];

/// A DNS provider with one or two IPv4 servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsProvider {
    name: String,
    primary: String,
    secondary: Option<String>,
    accent: [u8; 3],
}

impl DnsProvider {
    fn builtin(name: &str, primary: &str, secondary: &str, accent: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            primary: primary.to_string(),
            secondary: Some(secondary.to_string()),
            accent,
        }
    }

    /// Create Cloudflare DNS provider.
    pub fn cloudflare() -> Self {
        Self::builtin("Cloudflare", "1.1.1.1", "1.0.0.1", [0, 188, 140])
    }

    /// Create Google DNS provider.
    pub fn google() -> Self {
        Self::builtin("Google", "8.8.8.8", "8.8.4.4", [55, 90, 127])
    }

    /// Create Quad9 DNS provider.
    pub fn quad9() -> Self {
        Self::builtin("Quad9", "9.9.9.9", "149.112.112.112", [52, 152, 219])
    }

    /// Create OpenDNS provider.
    pub fn opendns() -> Self {
        Self::builtin("OpenDNS", "208.67.222.222", "208.67.220.220", [68, 68, 68])
    }

    /// Create AdGuard DNS provider.
    pub fn adguard() -> Self {
        Self::builtin("AdGuard", "94.140.14.14", "94.140.15.15", [243, 156, 18])
    }

    /// Create a user-defined provider. Addresses must already be dotted quads.
    pub fn custom(name: String, primary: String, secondary: Option<String>) -> Self {
        Self {
            name,
            primary,
            secondary,
            accent: CUSTOM_ACCENT,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn accent(&self) -> [u8; 3] {
        self.accent
    }

    /// Addresses as configured, one or two of them.
    pub fn addresses(&self) -> Vec<&str> {
        std::iter::once(self.primary.as_str())
            .chain(self.secondary.as_deref())
            .collect()
    }

    /// Get DNS servers as (primary, secondary).
    ///
    /// A single-address provider repeats its primary in the secondary slot.
    pub fn get_servers(&self) -> (String, String) {
        let secondary = self.secondary.as_ref().unwrap_or(&self.primary);
        (self.primary.clone(), secondary.clone())
    }
}

impl fmt::Display for DnsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.addresses().join(", "))
    }
}

/// Parses `NAME=IP[,IP]`.
impl FromStr for DnsProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| Error::InvalidProvider(format!("`{s}`: {why}"));

        let (name, servers) = s
            .split_once('=')
            .ok_or_else(|| invalid("expected NAME=IP[,IP]"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("name is empty"));
        }

        let addresses: Vec<&str> = servers.split(',').map(str::trim).collect();
        if addresses.len() > 2 {
            return Err(invalid("at most two addresses are allowed"));
        }
        if let Some(bad) = addresses.iter().find(|a| !is_dotted_quad(a)) {
            return Err(invalid(&format!("`{bad}` is not an IPv4 address")));
        }

        Ok(Self::custom(
            name.to_string(),
            addresses[0].to_string(),
            addresses.get(1).map(|a| a.to_string()),
        ))
    }
}

/// Ordered provider table shown in the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    providers: Vec<DnsProvider>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            providers: vec![
                DnsProvider::cloudflare(),
                DnsProvider::google(),
                DnsProvider::quad9(),
                DnsProvider::opendns(),
                DnsProvider::adguard(),
            ],
        }
    }

    /// Built-in table plus user entries. A user entry named like an existing
    /// one takes its place; anything else is appended.
    pub fn with_custom(custom: impl IntoIterator<Item = DnsProvider>) -> Self {
        let mut catalog = Self::builtin();
        for provider in custom {
            match catalog.position(provider.display_name()) {
                Some(i) => catalog.providers[i] = provider,
                None => catalog.providers.push(provider),
            }
        }
        catalog
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.providers
            .iter()
            .position(|p| p.display_name().eq_ignore_ascii_case(name))
    }

    pub fn get(&self, name: &str) -> Option<&DnsProvider> {
        self.position(name).map(|i| &self.providers[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DnsProvider> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_and_servers() {
        let catalog = Catalog::builtin();
        let names: Vec<_> = catalog.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, ["Cloudflare", "Google", "Quad9", "OpenDNS", "AdGuard"]);

        let quad9 = catalog.get("Quad9").unwrap();
        assert_eq!(
            quad9.get_servers(),
            ("9.9.9.9".to_string(), "149.112.112.112".to_string())
        );
    }

    #[test]
    fn every_entry_has_one_or_two_addresses() {
        for provider in Catalog::builtin().iter() {
            let n = provider.addresses().len();
            assert!((1..=2).contains(&n), "{provider}");
        }
    }

    #[test]
    fn single_address_repeats_primary() {
        let provider: DnsProvider = "Home=192.168.1.53".parse().unwrap();
        assert_eq!(provider.addresses(), ["192.168.1.53"]);
        assert_eq!(
            provider.get_servers(),
            ("192.168.1.53".to_string(), "192.168.1.53".to_string())
        );
    }

    #[test]
    fn parse_rejects_malformed_entries() {
        for bad in [
            "NoServers",
            "=1.1.1.1",
            "Lab=",
            "Lab=1.1.1.1,2.2.2.2,3.3.3.3",
            "Lab=dns.example.com",
            "Lab=2606:4700::1111",
            "Lab=-rf",
        ] {
            let err = bad.parse::<DnsProvider>().unwrap_err();
            assert!(matches!(err, Error::InvalidProvider(_)), "{bad}");
        }
    }

    #[test]
    fn custom_entries_replace_or_append() {
        let catalog = Catalog::with_custom([
            "google=8.8.8.8".parse().unwrap(),
            "Lab=10.1.2.3,10.1.2.4".parse().unwrap(),
        ]);
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("Google").unwrap().addresses(), ["8.8.8.8"]);
        assert_eq!(catalog.iter().nth(1).unwrap().display_name(), "google");
        assert_eq!(catalog.iter().last().unwrap().display_name(), "Lab");
        assert!(catalog.get("Nope").is_none());
    }
}
