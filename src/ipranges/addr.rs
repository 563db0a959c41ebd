//! IPv4 address arithmetic: conversions, private ranges, CIDR rendering.

use std::net::Ipv4Addr;

use super::types::IpRange;

pub(crate) const PRIVATE_NETNAME: &str = "Private Network";
pub(crate) const PRIVATE_DESCRIPTION: &str = "Local IP range - Private network address space";

/// (network, prefix length) of the address blocks that never reach a registry
const PRIVATE_BLOCKS: &[(u32, u32)] = &[
    (0x0A00_0000, 8),  // 10.0.0.0/8
    (0xAC10_0000, 12), // 172.16.0.0/12
    (0xC0A8_0000, 16), // 192.168.0.0/16
    (0x7F00_0000, 8),  // 127.0.0.0/8
    (0xA9FE_0000, 16), // 169.254.0.0/16
];

/// Parses a dotted quad into its integer value. Surrounding whitespace is ignored.
pub fn ip_to_u32(ip: &str) -> Option<u32> {
    ip.trim().parse::<Ipv4Addr>().ok().map(u32::from)
}

pub fn u32_to_ip(ip: u32) -> String {
    Ipv4Addr::from(ip).to_string()
}

fn prefix_mask(prefix: u32) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix)
    }
}

/// True for private, loopback and link-local addresses.
pub fn is_private(ip: u32) -> bool {
    PRIVATE_BLOCKS
        .iter()
        .any(|&(network, prefix)| ip & prefix_mask(prefix) == network)
}

/// Synthetic range covering the /16 that contains a private address.
pub fn private_range(ip: u32) -> IpRange {
    let network = ip & 0xFFFF_0000;
    IpRange {
        start_ip: network,
        end_ip: network | 0x0000_FFFF,
        netname: PRIVATE_NETNAME.to_string(),
        description: PRIVATE_DESCRIPTION.to_string(),
        country: String::new(),
    }
}

/// Renders a range as CIDR when it is exactly one prefix, otherwise as
/// `start-end`.
///
/// CIDR applies iff `start ^ end` is a non-empty run of low bits and `start`
/// has none of those bits set. A single address is rendered dashed.
pub fn pretty_range(start: u32, end: u32) -> String {
    if start == end {
        return format!("{}-{}", u32_to_ip(start), u32_to_ip(end));
    }
    let diff = start ^ end;
    let low_bit_run = diff & diff.wrapping_add(1) == 0;
    if start <= end && low_bit_run && start & diff == 0 {
        return format!("{}/{}", u32_to_ip(start), diff.leading_zeros());
    }
    format!("{}-{}", u32_to_ip(start), u32_to_ip(end))
}

/// Converts `a.b.c.d/n` into its first and last address.
///
/// A missing prefix length means `/32`. Registries sometimes abbreviate the
/// network (`200.160/20`); missing trailing octets are zero. Host bits in the
/// address are cleared.
pub fn cidr_to_range(cidr: &str) -> Option<(u32, u32)> {
    let mut parts = cidr.trim().splitn(2, '/');
    let address = parts.next()?.trim();
    let prefix = match parts.next() {
        Some(p) => p.trim().parse::<u32>().ok().filter(|p| *p <= 32)?,
        None => 32,
    };

    let octets: Vec<&str> = address.split('.').collect();
    if octets.is_empty() || octets.len() > 4 {
        return None;
    }
    let mut base = 0u32;
    for i in 0..4 {
        let octet = match octets.get(i) {
            Some(o) => o.parse::<u8>().ok()?,
            None => 0,
        };
        base = (base << 8) | u32::from(octet);
    }

    let mask = prefix_mask(prefix);
    let start = base & mask;
    Some((start, start | !mask))
}
