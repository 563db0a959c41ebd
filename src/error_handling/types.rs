//! Error type definitions.
//!
//! This module defines the error enums returned by the library and the
//! categories used to count provider outcomes.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Error reading or writing one of the JSON configuration files
/// (API key store, coordinate reject rules).
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single geolocation provider call.
///
/// Never surfaced to the caller of a search as a hard error: the aggregator
/// logs it, counts it, and reports it next to the results.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] ReqwestError),

    /// Response body is not the JSON shape the provider documents.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body is not well-formed XML.
    #[error("XML decode error: {0}")]
    Xml(String),

    /// Apple WLoc payload failed protobuf decoding.
    #[error("protobuf decode error: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// Response decoded but a required field is missing or malformed.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Request URL could not be built from the query.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ProviderError {
    /// Maps the failure onto the counter category used in run statistics.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ProviderError::Http(e) => super::categorize_reqwest_error(e),
            ProviderError::Json(_) | ProviderError::Xml(_) | ProviderError::Protobuf(_) => {
                ErrorType::ResponseDecodeError
            }
            ProviderError::Malformed(_) => ErrorType::MalformedResponseError,
            ProviderError::Url(_) => ErrorType::HttpRequestBuilderError,
        }
    }
}

/// Why a registry lookup produced no range.
///
/// Callers only ever see "no range"; the variants exist so that a registry
/// that answered badly is logged differently from one that was unreachable.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("RDAP request failed: {0}")]
    RdapTransport(#[source] ReqwestError),

    #[error("RDAP returned HTTP {0}")]
    RdapStatus(u16),

    #[error("RDAP response is not valid JSON: {0}")]
    RdapDecode(#[source] serde_json::Error),

    #[error("RDAP response has no port43 referral")]
    NoReferral,

    #[error("WHOIS query to {server} failed: {source}")]
    WhoisTransport {
        server: String,
        #[source]
        source: std::io::Error,
    },

    #[error("WHOIS response has no parseable range")]
    Unparseable,
}

impl RegistryError {
    /// True when the registry answered but the answer was unusable.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            RegistryError::RdapDecode(_) | RegistryError::NoReferral | RegistryError::Unparseable
        )
    }
}

/// Errors returned to the caller of a geolocation search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// BSSID is not six hex octets separated by `:` or `-`.
    #[error("Invalid MAC address format: {0}")]
    InvalidBssid(String),

    /// SSID search with an empty network name.
    #[error("Empty network name")]
    EmptyQuery,

    /// Every provider finished and none produced a valid location.
    #[error("No results found")]
    NoResults,
}

/// Categories of provider failures, used as statistics counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestStatusError,
    HttpRequestTimeoutError,
    HttpRequestRequestError,
    HttpRequestConnectError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    HttpRequestTooManyRequests,
    // Specific HTTP status code errors
    HttpRequestBadRequest,          // 400 Bad Request
    HttpRequestUnauthorized,        // 401 Unauthorized (usually a bad API key)
    HttpRequestForbidden,           // 403 Forbidden
    HttpRequestNotFound,            // 404 Not Found
    HttpRequestInternalServerError, // 500 Internal Server Error
    HttpRequestBadGateway,          // 502 Bad Gateway
    HttpRequestServiceUnavailable,  // 503 Service Unavailable
    HttpRequestGatewayTimeout,      // 504 Gateway Timeout
    // Response shape errors
    ResponseDecodeError,
    MalformedResponseError,
}

/// Non-error outcomes of a provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutcomeType {
    /// Provider returned a location that passed validation
    Found,
    /// Provider answered but had no location for the query
    Empty,
    /// Provider returned a placeholder coordinate that was filtered out
    Rejected,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestStatusError => "HTTP request status error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestTooManyRequests => "Too many requests",
            ErrorType::HttpRequestBadRequest => "Bad Request (400)",
            ErrorType::HttpRequestUnauthorized => "Unauthorized (401)",
            ErrorType::HttpRequestForbidden => "Forbidden (403)",
            ErrorType::HttpRequestNotFound => "Not Found (404)",
            ErrorType::HttpRequestInternalServerError => "Internal Server Error (500)",
            ErrorType::HttpRequestBadGateway => "Bad Gateway (502)",
            ErrorType::HttpRequestServiceUnavailable => "Service Unavailable (503)",
            ErrorType::HttpRequestGatewayTimeout => "Gateway Timeout (504)",
            ErrorType::ResponseDecodeError => "Response decode error",
            ErrorType::MalformedResponseError => "Malformed response",
        }
    }
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::Found => "Location found",
            OutcomeType::Empty => "No location",
            OutcomeType::Rejected => "Placeholder coordinate rejected",
        }
    }
}
