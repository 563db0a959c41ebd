// ipranges/mod.rs
// IPv4 range resolution: private check, SQLite cache, RDAP + WHOIS

mod addr;
mod client;
mod parse;
mod rir;
mod types;

use std::net::Ipv4Addr;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::error_handling::{DatabaseError, RegistryError};
use crate::storage::RangeCache;

pub use addr::{cidr_to_range, ip_to_u32, is_private, pretty_range, private_range, u32_to_ip};
pub use client::{RegistryLookup, RirClient};
pub use parse::{parse_whois, parse_whois_dialect, WhoisDialect};
pub use rir::{classify, classify_addr};
pub use types::{IpRange, RdapResponse, Rir};

/// Resolves IPv4 addresses to their allocated ranges.
///
/// Order: private check, cache, registry. Registry answers are cached unless
/// they span a /8 or more.
pub struct IpRangeManager<R: RegistryLookup = RirClient> {
    cache: RangeCache,
    registry: R,
}

impl<R: RegistryLookup> IpRangeManager<R> {
    pub fn new(cache: RangeCache, registry: R) -> Self {
        Self { cache, registry }
    }

    pub fn cache(&self) -> &RangeCache {
        &self.cache
    }

    /// Finds the range containing `ip`.
    ///
    /// Returns `Ok(None)` when the input is not a dotted quad or the registries
    /// produced nothing usable. Only cache failures are errors.
    pub async fn resolve(&self, ip: &str) -> Result<Option<IpRange>, DatabaseError> {
        let Some(addr) = ip_to_u32(ip) else {
            warn!("Not an IPv4 address: {:?}", ip);
            return Ok(None);
        };

        if is_private(addr) {
            debug!("{} is a private address", ip);
            return Ok(Some(private_range(addr)));
        }

        if let Some(cached) = self.cache.get(addr).await? {
            debug!("Range cache hit for {}: {}", ip, cached.pretty());
            return Ok(Some(cached));
        }

        let rir = classify_addr(Ipv4Addr::from(addr));
        let ip = u32_to_ip(addr);
        match self.lookup(rir, &ip).await {
            Ok(range) => {
                if range.is_cacheable() {
                    self.cache.put(&range).await?;
                } else {
                    debug!(
                        "Not caching {} for {}: range too broad or inverted",
                        range.pretty(),
                        ip
                    );
                }
                Ok(Some(range))
            }
            Err(e) if e.is_degraded() => {
                warn!("{} answered unusably for {}: {}", rir, ip, e);
                Ok(None)
            }
            Err(e) => {
                info!("Registry lookup for {} via {} failed: {}", ip, rir, e);
                Ok(None)
            }
        }
    }

    /// Resolves several addresses concurrently, keeping input order.
    pub async fn resolve_all(
        &self,
        ips: &[String],
    ) -> Result<Vec<(String, Option<IpRange>)>, DatabaseError> {
        let lookups = ips.iter().map(|ip| async move {
            self.resolve(ip).await.map(|range| (ip.clone(), range))
        });
        join_all(lookups).await.into_iter().collect()
    }

    /// RDAP for the referral, then WHOIS at the referred server.
    async fn lookup(&self, rir: Rir, ip: &str) -> Result<IpRange, RegistryError> {
        let rdap = self.registry.fetch_rdap(rir, ip).await?;
        let server = rdap
            .port43
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RegistryError::NoReferral)?;

        let authority = Rir::from_whois_server(server).unwrap_or(rir);
        if authority != rir {
            debug!("{} referred {} to {}", rir, ip, authority);
        }

        let text = self
            .registry
            .fetch_whois(server, &authority.whois_query(ip))
            .await?;
        parse_whois(&text, authority).ok_or(RegistryError::Unparseable)
    }
}
