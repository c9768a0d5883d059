use regex::Regex;
use std::sync::OnceLock;

fn ip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
        )
        .expect("static pattern compiles")
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern compiles")
    })
}

fn extension_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{3,6}$").expect("static pattern compiles"))
}

/// Dotted-quad IPv4 address.
pub fn is_valid_ip(value: &str) -> bool {
    ip_regex().is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// SIP extension number: 3 to 6 digits.
pub fn is_valid_extension(value: &str) -> bool {
    extension_regex().is_match(value)
}

/// Parse a port and check it lies in `min..=max`.
pub fn parse_port(value: &str, min: u16, max: u16) -> Option<u16> {
    value
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|port| (min..=max).contains(port))
}

/// First three octets of an address, e.g. `"192.168.1"`.
pub fn prefix24(ip: &str) -> String {
    ip.split('.').take(3).collect::<Vec<_>>().join(".")
}

/// Whether two addresses share their first three octets.
pub fn same_prefix24(a: &str, b: &str) -> bool {
    prefix24(a) == prefix24(b)
}
