//! WHOIS text parsing.
//!
//! Registries agree on the `key: value` line format and on little else, so
//! each dialect names its own fields. A record without a usable range field
//! yields `None`; registries omit fields inconsistently and that is not an
//! error.

use regex::Regex;

use super::addr::{cidr_to_range, ip_to_u32};
use super::types::{IpRange, Rir};

/// Field layout of a registry's WHOIS output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhoisDialect {
    /// RIPE, APNIC and AFRINIC: `inetnum: a - b`, repeated `descr:`
    RipeStyle,
    /// `NetRange:`, `NetName:`, `OrgName:` / `CustName:`
    Arin,
    /// `inetnum:` in CIDR notation, `owner:`
    Lacnic,
}

impl From<Rir> for WhoisDialect {
    fn from(rir: Rir) -> Self {
        match rir {
            Rir::Ripe | Rir::Apnic | Rir::Afrinic => WhoisDialect::RipeStyle,
            Rir::Arin => WhoisDialect::Arin,
            Rir::Lacnic => WhoisDialect::Lacnic,
        }
    }
}

fn field_regex(field: &str) -> Regex {
    Regex::new(&format!(r"(?m)^{}:[ \t]*(.+)$", regex::escape(field)))
        .expect("escaped field name is a valid regex")
}

/// All values of `field`, in document order, trimmed, empty values dropped.
fn field_values(text: &str, field: &str) -> Vec<String> {
    field_regex(field)
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// First value of `field`.
fn field(text: &str, field: &str) -> Option<String> {
    field_values(text, field).into_iter().next()
}

/// Parses `start - end`.
fn dashed_range(value: &str) -> Option<(u32, u32)> {
    let (start, end) = value.split_once('-')?;
    Some((ip_to_u32(start)?, ip_to_u32(end)?))
}

/// Parses a WHOIS response in the dialect of `rir`.
pub fn parse_whois(text: &str, rir: Rir) -> Option<IpRange> {
    parse_whois_dialect(text, WhoisDialect::from(rir))
}

/// Parses a WHOIS response in an explicit dialect.
pub fn parse_whois_dialect(text: &str, dialect: WhoisDialect) -> Option<IpRange> {
    let (start_ip, end_ip, netname, description, country) = match dialect {
        WhoisDialect::RipeStyle => {
            let (start, end) = dashed_range(&field(text, "inetnum")?)?;
            (
                start,
                end,
                field(text, "netname"),
                field_values(text, "descr").join(" | "),
                field(text, "country"),
            )
        }
        WhoisDialect::Arin => {
            let (start, end) = dashed_range(&field(text, "NetRange")?)?;
            let description = field(text, "OrgName")
                .or_else(|| field(text, "CustName"))
                .unwrap_or_default();
            (
                start,
                end,
                field(text, "NetName"),
                description,
                field(text, "Country"),
            )
        }
        WhoisDialect::Lacnic => {
            let inetnum = field(text, "inetnum")?;
            let (start, end) = if inetnum.contains('/') || !inetnum.contains('-') {
                cidr_to_range(&inetnum)?
            } else {
                dashed_range(&inetnum)?
            };
            (
                start,
                end,
                field(text, "netname"),
                field(text, "owner").unwrap_or_default(),
                field(text, "country"),
            )
        }
    };

    Some(IpRange {
        start_ip,
        end_ip,
        netname: netname.unwrap_or_default(),
        description,
        country: country.unwrap_or_default().to_uppercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ripe_style_minimal_record() {
        let text = "inetnum: 1.2.3.0 - 1.2.3.255\nnetname: TEST\ndescr: Example\ncountry: US";
        let range = parse_whois(text, Rir::Ripe).unwrap();
        assert_eq!(
            range,
            IpRange {
                start_ip: 16909056,
                end_ip: 16909311,
                netname: "TEST".into(),
                description: "Example".into(),
                country: "US".into(),
            }
        );
    }

    #[test]
    fn test_ripe_style_joins_descr_and_uppercases_country() {
        let text = "\
% This is the RIPE Database query service.
% The objects are in RPSL format.

inetnum:        193.0.0.0 - 193.0.7.255
netname:        RIPE-NCC
descr:          RIPE Network Coordination Centre
descr:          Amsterdam, Netherlands
country:        nl
admin-c:        BRD-RIPE
status:         ASSIGNED PA
";
        let range = parse_whois(text, Rir::Ripe).unwrap();
        assert_eq!(range.start_addr(), "193.0.0.0");
        assert_eq!(range.end_addr(), "193.0.7.255");
        assert_eq!(range.netname, "RIPE-NCC");
        assert_eq!(
            range.description,
            "RIPE Network Coordination Centre | Amsterdam, Netherlands"
        );
        assert_eq!(range.country, "NL");
        assert_eq!(range.pretty(), "193.0.0.0/21");
    }

    #[test]
    fn test_first_match_wins() {
        let text = "inetnum: 1.0.0.0 - 1.0.0.255\nnetname: FIRST\n\ninetnum: 1.0.0.0 - 1.0.255.255\nnetname: SECOND\n";
        let range = parse_whois(text, Rir::Apnic).unwrap();
        assert_eq!(range.netname, "FIRST");
        assert_eq!(range.end_addr(), "1.0.0.255");
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "inetnum: 41.0.0.0 - 41.0.255.255\r\nnetname: AFNET\r\ncountry: za\r\n";
        let range = parse_whois(text, Rir::Afrinic).unwrap();
        assert_eq!(range.end_addr(), "41.0.255.255");
        assert_eq!(range.netname, "AFNET");
        assert_eq!(range.country, "ZA");
    }

    #[test]
    fn test_arin_prefers_org_name() {
        let text = "\
NetRange:       8.8.8.0 - 8.8.8.255
CIDR:           8.8.8.0/24
NetName:        GOGL
CustName:       Should Not Win
OrgName:        Google LLC
Country:        us
";
        let range = parse_whois(text, Rir::Arin).unwrap();
        assert_eq!(range.pretty(), "8.8.8.0/24");
        assert_eq!(range.netname, "GOGL");
        assert_eq!(range.description, "Google LLC");
        assert_eq!(range.country, "US");
    }

    #[test]
    fn test_arin_falls_back_to_cust_name() {
        let text = "NetRange: 12.0.0.0 - 12.0.0.63\nNetName: CUST-NET\nCustName: Some Customer\n";
        let range = parse_whois(text, Rir::Arin).unwrap();
        assert_eq!(range.description, "Some Customer");
        assert_eq!(range.country, "");
    }

    #[test]
    fn test_lacnic_cidr_and_owner() {
        let text = "\
inetnum:     200.160.0.0/20
status:      allocated
owner:       Núcleo de Inf. e Coord. do Ponto BR - NIC.BR
country:     BR
";
        let range = parse_whois(text, Rir::Lacnic).unwrap();
        assert_eq!(range.start_addr(), "200.160.0.0");
        assert_eq!(range.end_addr(), "200.160.15.255");
        assert_eq!(range.description, "Núcleo de Inf. e Coord. do Ponto BR - NIC.BR");
        assert_eq!(range.netname, "");
        assert_eq!(range.country, "BR");
    }

    #[test]
    fn test_lacnic_abbreviated_and_dashed_forms() {
        let abbreviated = parse_whois("inetnum: 200.160/20\n", Rir::Lacnic).unwrap();
        assert_eq!(abbreviated.pretty(), "200.160.0.0/20");

        let dashed = parse_whois("inetnum: 177.0.0.0 - 177.0.0.255\n", Rir::Lacnic).unwrap();
        assert_eq!(dashed.pretty(), "177.0.0.0/24");

        let host = parse_whois("inetnum: 190.1.2.3\n", Rir::Lacnic).unwrap();
        assert_eq!(host.start_ip, host.end_ip);
        assert_eq!(host.pretty(), "190.1.2.3-190.1.2.3");
    }

    #[test]
    fn test_field_names_match_literally() {
        let text = "netXname: WRONG\nnet.name: RIGHT\n";
        assert_eq!(field(text, "net.name").as_deref(), Some("RIGHT"));
    }

    #[test]
    fn test_missing_or_malformed_range_yields_none() {
        assert_eq!(parse_whois("netname: X\ncountry: US\n", Rir::Ripe), None);
        assert_eq!(parse_whois("NetName: X\n", Rir::Arin), None);
        assert_eq!(parse_whois("inetnum: 1.2.3.0 to 1.2.3.255\n", Rir::Ripe), None);
        assert_eq!(parse_whois("inetnum: not/a/cidr\n", Rir::Lacnic), None);
        assert_eq!(parse_whois("", Rir::Lacnic), None);
    }

    #[test]
    fn test_field_must_start_the_line() {
        // "remarks: inetnum: ..." must not be read as an inetnum field
        let text = "remarks: inetnum: 9.9.9.0 - 9.9.9.255\n";
        assert_eq!(parse_whois(text, Rir::Ripe), None);
    }
}
