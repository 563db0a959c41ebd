//! IP range data structures.

use serde::{Deserialize, Serialize};

use super::addr::{pretty_range, u32_to_ip};
use crate::config::MAX_CACHEABLE_SPAN;

/// A registry-allocated (or private) IPv4 address block.
///
/// Addresses are host-order integers of the network-order dotted quad, so
/// `1.2.3.0` is `16909056`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRange {
    pub start_ip: u32,
    pub end_ip: u32,
    pub netname: String,
    pub description: String,
    pub country: String,
}

impl IpRange {
    /// True when `start_ip <= ip <= end_ip`.
    pub fn contains(&self, ip: u32) -> bool {
        self.start_ip <= ip && ip <= self.end_ip
    }

    /// Number of addresses in the range (0 for an inverted range).
    pub fn span(&self) -> u64 {
        if self.start_ip > self.end_ip {
            return 0;
        }
        u64::from(self.end_ip) - u64::from(self.start_ip) + 1
    }

    /// Ranges are cached only when well-formed and narrower than a /8.
    pub fn is_cacheable(&self) -> bool {
        self.start_ip <= self.end_ip && self.span() < MAX_CACHEABLE_SPAN
    }

    /// CIDR or dashed rendering, see [`pretty_range`].
    pub fn pretty(&self) -> String {
        pretty_range(self.start_ip, self.end_ip)
    }

    pub fn start_addr(&self) -> String {
        u32_to_ip(self.start_ip)
    }

    pub fn end_addr(&self) -> String {
        u32_to_ip(self.end_ip)
    }
}

/// Regional Internet Registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rir {
    Ripe,
    Apnic,
    Arin,
    Afrinic,
    Lacnic,
}

impl Rir {
    /// WHOIS server hostname of the registry.
    pub fn whois_server(&self) -> &'static str {
        match self {
            Rir::Ripe => "whois.ripe.net",
            Rir::Apnic => "whois.apnic.net",
            Rir::Arin => "whois.arin.net",
            Rir::Afrinic => "whois.afrinic.net",
            Rir::Lacnic => "whois.lacnic.net",
        }
    }

    /// RDAP base URL; queries are `{base}ip/{ip}`.
    pub fn rdap_url(&self) -> &'static str {
        match self {
            Rir::Ripe => "http://rdap.db.ripe.net/",
            Rir::Apnic => "http://rdap.apnic.net/",
            Rir::Arin => "http://rdap.arin.net/registry/",
            Rir::Afrinic => "http://rdap.afrinic.net/rdap/",
            Rir::Lacnic => "http://rdap.lacnic.net/rdap/",
        }
    }

    /// The line sent to the WHOIS server for `ip` (without the trailing CRLF).
    ///
    /// ARIN's server answers a bare IP with a summary list of every matching
    /// net; `n + ` asks for the single most specific network record instead.
    pub fn whois_query(&self, ip: &str) -> String {
        match self {
            Rir::Arin => format!("n + {}", ip),
            _ => ip.to_string(),
        }
    }

    /// Registry operating the WHOIS server `host`, if it is one of the five.
    ///
    /// Used to pick the query form and dialect after an RDAP referral lands on
    /// a different registry than the first-octet table guessed.
    pub fn from_whois_server(host: &str) -> Option<Rir> {
        let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
        [Rir::Ripe, Rir::Apnic, Rir::Arin, Rir::Afrinic, Rir::Lacnic]
            .into_iter()
            .find(|rir| rir.whois_server() == host)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rir::Ripe => "RIPE",
            Rir::Apnic => "APNIC",
            Rir::Arin => "ARIN",
            Rir::Afrinic => "AFRINIC",
            Rir::Lacnic => "LACNIC",
        }
    }
}

impl std::fmt::Display for Rir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of an RDAP IP network object that the resolver reads.
///
/// Only the WHOIS referral is kept; the range itself always comes from the
/// referred WHOIS record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RdapResponse {
    /// Hostname of the WHOIS server holding the full record
    pub port43: Option<String>,
}
