mod common;

use common::SimulatedBackend;
use dns_switcher::backend::{DnsSnapshot, ServerSlot};
use dns_switcher::catalog::{Catalog, DnsProvider};
use dns_switcher::error::{Error, ErrorKind};
use dns_switcher::switcher::{Action, Phase, Severity, Switcher};

fn pair(primary: &str, secondary: &str) -> (String, String) {
    (primary.to_string(), secondary.to_string())
}

fn switcher(backend: &SimulatedBackend, catalog: Catalog) -> Switcher {
    Switcher::new(Box::new(backend.clone()), catalog)
}

#[test]
fn cloudflare_then_reset_restores_isp_servers() {
    let backend = SimulatedBackend::with_servers(&["10.0.0.1", "10.0.0.2"]);
    let mut s = switcher(&backend, Catalog::builtin());
    assert_eq!(s.current(), &DnsSnapshot::pair("10.0.0.1", "10.0.0.2"));

    s.dispatch(Action::Apply("Cloudflare".into())).unwrap();
    assert_eq!(backend.writes(), [pair("1.1.1.1", "1.0.0.1")]);
    assert_eq!(s.current(), &DnsSnapshot::pair("1.1.1.1", "1.0.0.1"));

    s.dispatch(Action::Reset).unwrap();
    assert_eq!(backend.writes()[1], pair("10.0.0.1", "10.0.0.2"));
    assert_eq!(s.current(), &DnsSnapshot::pair("10.0.0.1", "10.0.0.2"));
}

#[test]
fn reset_uses_snapshot_from_before_the_first_apply() {
    let backend = SimulatedBackend::with_servers(&["192.168.0.1", "192.168.0.2"]);
    let mut s = switcher(&backend, Catalog::builtin());

    for name in ["Google", "Quad9", "OpenDNS", "AdGuard", "Cloudflare"] {
        s.apply(name).unwrap();
    }
    s.reset().unwrap();

    assert_eq!(
        backend.writes().last().unwrap(),
        &pair("192.168.0.1", "192.168.0.2")
    );
    assert_eq!(s.initial(), Some(&DnsSnapshot::pair("192.168.0.1", "192.168.0.2")));
}

#[test]
fn reset_before_any_apply_writes_nothing() {
    let backend = SimulatedBackend::with_servers(&["10.0.0.1", "10.0.0.2"]);
    let mut s = switcher(&backend, Catalog::builtin());

    let err = s.dispatch(Action::Reset).unwrap_err();
    assert!(matches!(err, Error::NoInitialSnapshot));
    assert!(backend.writes().is_empty());
    assert_eq!(backend.machine.borrow().restores, 0);

    let notice = s.notice().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(
        s.log_lines().last().unwrap(),
        "No initial DNS recorded. Cannot reset."
    );
}

#[test]
fn single_address_providers_fill_both_slots() {
    let catalog = Catalog::with_custom([
        "Unbound=10.9.8.7".parse::<DnsProvider>().unwrap(),
        "Router=192.168.1.1".parse::<DnsProvider>().unwrap(),
    ]);
    let backend = SimulatedBackend::with_servers(&[]);
    let mut s = switcher(&backend, catalog.clone());

    let single: Vec<_> = catalog
        .iter()
        .filter(|p| p.addresses().len() == 1)
        .map(|p| p.display_name().to_string())
        .collect();
    assert_eq!(single.len(), 2);

    for name in &single {
        s.apply(name).unwrap();
        let (primary, secondary) = backend.writes().last().unwrap().clone();
        assert_eq!(primary, secondary);
    }
}

#[test]
fn failed_write_leaves_display_unchanged() {
    let backend = SimulatedBackend::with_servers(&["10.0.0.1", "10.0.0.2"]);
    let mut s = switcher(&backend, Catalog::builtin());
    s.apply("Google").unwrap();
    let before = s.current().clone();
    let reads_before = backend.machine.borrow().reads;

    backend.set_failing(true);
    let err = s.apply("Quad9").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CommandFailure);
    assert_eq!(s.current(), &before);
    // no re-read after a failure
    assert_eq!(backend.machine.borrow().reads, reads_before);

    // reset goes through the same failure path
    assert!(s.reset().is_err());
    assert_eq!(s.current(), &before);
}

#[test]
fn dhcp_only_interface_resets_to_automatic() {
    let backend = SimulatedBackend::with_servers(&[]);
    let mut s = switcher(&backend, Catalog::builtin());
    assert_eq!(s.current().primary, ServerSlot::NotFound);

    s.apply("Cloudflare").unwrap();
    s.reset().unwrap();

    assert_eq!(backend.machine.borrow().restores, 1);
    assert_eq!(backend.writes().len(), 1);
    assert_eq!(s.current(), &DnsSnapshot::from_addresses(Vec::new()));
}

#[test]
fn queued_action_runs_once() {
    let backend = SimulatedBackend::with_servers(&["10.0.0.1"]);
    let mut s = switcher(&backend, Catalog::builtin());

    s.request(Action::Apply("AdGuard".into()));
    assert!(matches!(s.phase(), Phase::InProgress(_)));
    assert!(backend.writes().is_empty());

    s.run_pending().unwrap().unwrap();
    assert_eq!(s.phase(), &Phase::Idle);
    assert_eq!(backend.writes(), [pair("94.140.14.14", "94.140.15.15")]);
}
