//! Pulls IPv4 server addresses out of command output.
//!
//! Only strict dotted quads (four groups of one to three ASCII digits) are
//! accepted. Anything else on a line, IPv6 and hostnames included, is
//! dropped without error.

use std::sync::LazyLock;

use regex::Regex;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}(?:\.[0-9]{1,3}){3}$").expect("dotted quad pattern is valid")
});

pub fn is_dotted_quad(s: &str) -> bool {
    DOTTED_QUAD.is_match(s)
}

/// Lines that are nothing but an address (`networksetup -getdnsservers`).
pub fn whole_line_addresses(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| is_dotted_quad(line))
        .map(str::to_string)
        .collect()
}

/// `nameserver <addr>` lines of a resolver file.
pub fn nameserver_addresses(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter(|line| line.starts_with("nameserver"))
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter(|token| is_dotted_quad(token))
        .map(str::to_string)
        .collect()
}

/// Last token of each line (`netsh ... show dnsservers`), where the first
/// server shares its line with a label and the rest are indented alone.
pub fn trailing_token_addresses(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().last())
        .filter(|token| is_dotted_quad(token))
        .map(str::to_string)
        .collect()
}
