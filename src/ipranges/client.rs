//! Registry network access: RDAP over HTTP, WHOIS over raw TCP.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use log::debug;
use reqwest::header::ACCEPT;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::types::{RdapResponse, Rir};
use crate::config::{MAX_WHOIS_RESPONSE_SIZE, RDAP_ACCEPT, WHOIS_PORT};
use crate::error_handling::RegistryError;

/// Network half of range resolution.
///
/// `IpRangeManager` only talks to registries through this trait, so tests can
/// substitute a counting fake.
pub trait RegistryLookup: Send + Sync {
    /// Fetches the RDAP IP network object for `ip` from `rir`.
    fn fetch_rdap<'a>(
        &'a self,
        rir: Rir,
        ip: &'a str,
    ) -> BoxFuture<'a, Result<RdapResponse, RegistryError>>;

    /// Sends `query` to the WHOIS server `server` and returns the full response.
    fn fetch_whois<'a>(
        &'a self,
        server: &'a str,
        query: &'a str,
    ) -> BoxFuture<'a, Result<String, RegistryError>>;
}

/// RDAP + WHOIS client for the five regional registries.
#[derive(Debug, Clone)]
pub struct RirClient {
    http: Arc<reqwest::Client>,
    timeout: Duration,
    whois_port: u16,
    rdap_base: Option<String>,
}

impl RirClient {
    /// Creates a client. `http` should follow redirects (see
    /// [`crate::initialization::init_registry_client`]); `timeout` bounds the
    /// WHOIS connect and the WHOIS read separately.
    pub fn new(http: Arc<reqwest::Client>, timeout: Duration) -> Self {
        Self {
            http,
            timeout,
            whois_port: WHOIS_PORT,
            rdap_base: None,
        }
    }

    /// Uses `port` instead of 43 for WHOIS connections.
    pub fn with_whois_port(mut self, port: u16) -> Self {
        self.whois_port = port;
        self
    }

    /// Sends every RDAP query to `base` instead of the registry's own server.
    pub fn with_rdap_base(mut self, base: impl Into<String>) -> Self {
        self.rdap_base = Some(base.into());
        self
    }

    /// `GET {base}ip/{ip}`. Anything but 200 is an error.
    pub async fn fetch_rdap_at(&self, base: &str, ip: &str) -> Result<RdapResponse, RegistryError> {
        let url = format!("{}ip/{}", base, ip);
        debug!("RDAP query: {}", url);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, RDAP_ACCEPT)
            .send()
            .await
            .map_err(RegistryError::RdapTransport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RegistryError::RdapStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(RegistryError::RdapTransport)?;
        serde_json::from_slice(&body).map_err(RegistryError::RdapDecode)
    }

    /// Raw WHOIS exchange: connect, write `{query}\r\n`, read until EOF.
    ///
    /// Bodies are decoded as lossy UTF-8 and capped at `MAX_WHOIS_RESPONSE_SIZE`.
    pub async fn query_whois(&self, server: &str, query: &str) -> Result<String, RegistryError> {
        let transport = |source: std::io::Error| RegistryError::WhoisTransport {
            server: server.to_string(),
            source,
        };
        let timed_out =
            || transport(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"));

        debug!("WHOIS query to {}:{}: {}", server, self.whois_port, query);

        let mut stream = timeout(self.timeout, TcpStream::connect((server, self.whois_port)))
            .await
            .map_err(|_| timed_out())?
            .map_err(transport)?;

        stream
            .write_all(format!("{}\r\n", query).as_bytes())
            .await
            .map_err(transport)?;

        let mut body = Vec::new();
        let mut limited = (&mut stream).take(MAX_WHOIS_RESPONSE_SIZE as u64);
        timeout(self.timeout, limited.read_to_end(&mut body))
            .await
            .map_err(|_| timed_out())?
            .map_err(transport)?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl RegistryLookup for RirClient {
    fn fetch_rdap<'a>(
        &'a self,
        rir: Rir,
        ip: &'a str,
    ) -> BoxFuture<'a, Result<RdapResponse, RegistryError>> {
        Box::pin(async move {
            let base = self.rdap_base.as_deref().unwrap_or(rir.rdap_url());
            self.fetch_rdap_at(base, ip).await
        })
    }

    fn fetch_whois<'a>(
        &'a self,
        server: &'a str,
        query: &'a str,
    ) -> BoxFuture<'a, Result<String, RegistryError>> {
        Box::pin(self.query_whois(server, query))
    }
}
