//! User-facing rendering of search reports, ranges and keys.
//!
//! Every function returns the text to print so the binary stays a thin
//! wrapper and the formats can be tested.

use serde_json::json;

use crate::ipranges::IpRange;
use crate::locate::{ApiKeys, LocationResult, SearchReport};

fn describe(result: &LocationResult) -> String {
    let mut line = format!(
        "{:<15} {:>11.6} {:>11.6}",
        result.module,
        result.latitude.unwrap_or_default(),
        result.longitude.unwrap_or_default()
    );
    if let Some(bssid) = &result.bssid {
        line.push_str(&format!("  bssid={}", bssid));
    }
    if let Some(ssid) = &result.ssid {
        line.push_str(&format!("  ssid={}", ssid));
    }
    if let Some(vendor) = &result.vendor {
        line.push_str(&format!("  ({})", vendor));
    }
    line
}

/// One line per accepted result, then one per failed provider.
pub fn format_report(report: &SearchReport) -> String {
    let mut lines = vec![format!(
        "{} result{} for {} ({} of {} providers answered)",
        report.results.len(),
        if report.results.len() == 1 { "" } else { "s" },
        report.query,
        report.providers_completed,
        report.providers_launched
    )];
    lines.extend(report.results.iter().map(describe));
    for failure in &report.failures {
        lines.push(format!(
            "{:<15} failed: {}",
            failure.module,
            failure.error.as_deref().unwrap_or("unknown error")
        ));
    }
    lines.join("\n")
}

pub fn format_report_json(report: &SearchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn describe_range(range: &IpRange) -> String {
    format!(
        "{}  {}  {}  {}",
        range.pretty(),
        range.netname,
        range.description,
        range.country
    )
}

/// `ip  range  netname  description  country`, or `no range` per address.
pub fn format_resolutions(resolutions: &[(String, Option<IpRange>)]) -> String {
    resolutions
        .iter()
        .map(|(ip, range)| match range {
            Some(range) => format!("{}  {}", ip, describe_range(range)),
            None => format!("{}  no range", ip),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_resolutions_json(resolutions: &[(String, Option<IpRange>)]) -> serde_json::Result<String> {
    let entries: Vec<_> = resolutions
        .iter()
        .map(|(ip, range)| {
            json!({
                "ip": ip,
                "range": range.as_ref().map(|r| r.pretty()),
                "detail": range,
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

pub fn format_ranges(ranges: &[IpRange]) -> String {
    if ranges.is_empty() {
        return "Range cache is empty".to_string();
    }
    ranges.iter().map(describe_range).collect::<Vec<_>>().join("\n")
}

/// Shows the first and last two characters of a key.
fn mask(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(k) if k.chars().count() <= 6 => "*".repeat(k.chars().count()),
        Some(k) => {
            let chars: Vec<char> = k.chars().collect();
            let head: String = chars[..2].iter().collect();
            let tail: String = chars[chars.len() - 2..].iter().collect();
            format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
        }
    }
}

pub fn format_keys(keys: &ApiKeys) -> String {
    [
        ("wigle", keys.wigle()),
        ("google", keys.google()),
        ("combain", keys.combain()),
        ("yandex", keys.yandex()),
    ]
    .iter()
    .map(|(name, key)| format!("{:<8} {}", name, mask(*key)))
    .collect::<Vec<_>>()
    .join("\n")
}
