//! Origin key derivation.

use std::net::IpAddr;

/// Key used when the host is empty.
pub const UNKNOWN_ORIGIN: &str = "unknown.domain";

/// Second-level labels that form a public suffix together with a
/// two-letter country code, e.g. `co.uk` or `com.au`.
const SECOND_LEVEL_SUFFIXES: &[&str] = &["co", "com", "org", "gov", "net", "ac", "edu"];

/// Derive the registrable-domain partition key for a host name.
///
/// `www.example.com` and `example.com` share the key `example.com`;
/// `news.bbc.co.uk` maps to `bbc.co.uk`. IP addresses and `localhost`
/// are their own key.
pub fn origin_key(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return UNKNOWN_ORIGIN.to_string();
    }
    if host == "localhost" || is_ip(&host) {
        return host;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }

    let n = labels.len();
    let keep = if is_country_suffix(labels[n - 2], labels[n - 1]) { 3 } else { 2 };
    labels[n - keep..].join(".")
}

fn is_country_suffix(second: &str, last: &str) -> bool {
    SECOND_LEVEL_SUFFIXES.contains(&second)
        && last.len() == 2
        && last.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_ip(host: &str) -> bool {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<IpAddr>().is_ok()
}
