//! First-octet registry classification.
//!
//! The table is coarse on purpose: it only picks which registry to ask
//! first. RDAP redirects and the WHOIS referral correct any misclassification.

use std::net::Ipv4Addr;

use super::types::Rir;

/// First-octet ranges per registry, consulted in this order; first match wins.
const FIRST_OCTET_TABLE: &[(Rir, &[(u8, u8)])] = &[
    (
        Rir::Ripe,
        &[
            (1, 2),
            (5, 6),
            (37, 37),
            (46, 46),
            (62, 62),
            (77, 95),
            (109, 109),
            (141, 141),
            (151, 151),
            (176, 176),
            (185, 185),
            (188, 188),
            (193, 194),
            (212, 213),
            (217, 217),
        ],
    ),
    (
        Rir::Apnic,
        &[
            (14, 15),
            (27, 27),
            (36, 36),
            (39, 39),
            (42, 43),
            (49, 49),
            (58, 61),
            (101, 101),
            (103, 103),
            (106, 106),
            (110, 126),
            (133, 133),
            (150, 150),
            (153, 153),
            (163, 163),
            (171, 171),
            (175, 175),
            (180, 180),
            (182, 183),
            (202, 203),
            (210, 211),
            (218, 222),
        ],
    ),
    (
        Rir::Arin,
        &[
            (3, 4),
            (7, 35),
            (38, 38),
            (40, 41),
            (44, 45),
            (47, 48),
            (50, 57),
            (63, 76),
            (96, 100),
            (104, 105),
            (107, 108),
            (128, 132),
            (134, 140),
            (142, 149),
            (152, 162),
            (164, 170),
            (172, 174),
            (184, 184),
            (192, 192),
            (198, 199),
            (204, 209),
            (214, 216),
        ],
    ),
    (Rir::Afrinic, &[(102, 102), (154, 154), (196, 197)]),
    (
        Rir::Lacnic,
        &[
            (177, 179),
            (181, 181),
            (186, 187),
            (189, 191),
            (200, 201),
        ],
    ),
];

/// Registry for an address; octets missing from the table fall back to ARIN.
pub fn classify_addr(ip: Ipv4Addr) -> Rir {
    let first = ip.octets()[0];
    FIRST_OCTET_TABLE
        .iter()
        .find(|(_, ranges)| ranges.iter().any(|&(lo, hi)| lo <= first && first <= hi))
        .map(|(rir, _)| *rir)
        .unwrap_or(Rir::Arin)
}

/// Registry for a dotted-quad string, `None` if it is not one.
pub fn classify(ip: &str) -> Option<Rir> {
    ip.trim().parse::<Ipv4Addr>().ok().map(classify_addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_registries() {
        assert_eq!(classify("193.0.6.139"), Some(Rir::Ripe));
        assert_eq!(classify("85.1.2.3"), Some(Rir::Ripe));
        assert_eq!(classify("1.1.1.1"), Some(Rir::Ripe));
        assert_eq!(classify("202.12.29.20"), Some(Rir::Apnic));
        assert_eq!(classify("8.8.8.8"), Some(Rir::Arin));
        assert_eq!(classify("196.216.2.1"), Some(Rir::Afrinic));
        assert_eq!(classify("102.0.0.1"), Some(Rir::Afrinic));
        assert_eq!(classify("200.160.2.3"), Some(Rir::Lacnic));
        assert_eq!(classify("181.1.1.1"), Some(Rir::Lacnic));
    }

    #[test]
    fn test_earlier_lists_win() {
        // 153 appears in both APNIC and ARIN ranges; APNIC is consulted first
        assert_eq!(classify("153.1.1.1"), Some(Rir::Apnic));
        // 154 is in ARIN's 152-162 block, which precedes AFRINIC
        assert_eq!(classify("154.1.1.1"), Some(Rir::Arin));
    }

    #[test]
    fn test_unlisted_octets_fall_back_to_arin() {
        assert_eq!(classify("0.0.0.1"), Some(Rir::Arin));
        assert_eq!(classify("224.0.0.1"), Some(Rir::Arin));
        assert_eq!(classify("255.255.255.255"), Some(Rir::Arin));
    }

    #[test]
    fn test_every_first_octet_classifies() {
        for octet in 0..=255u8 {
            let rir = classify_addr(Ipv4Addr::new(octet, 0, 0, 1));
            assert!(matches!(
                rir,
                Rir::Ripe | Rir::Apnic | Rir::Arin | Rir::Afrinic | Rir::Lacnic
            ));
        }
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(classify("not an ip"), None);
        assert_eq!(classify("1.2.3"), None);
        assert_eq!(classify(""), None);
    }
}
