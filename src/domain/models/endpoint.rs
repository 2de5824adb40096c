use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use thiserror::Error;

/// Errors produced while parsing a service endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported endpoint scheme '{0}'. Must be http or https")]
    UnsupportedScheme(String),

    #[error("Endpoint '{0}' has no host")]
    MissingHost(String),
}

/// Address of the remote annotation service.
///
/// Immutable after construction. Paths are appended verbatim to the base
/// (`{base}/ping`, `{base}/semgrex`), so a base that already carries a path
/// prefix keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    base: String,
    url: Url,
}

impl ServiceEndpoint {
    /// Parse an endpoint such as `http://localhost:9000`
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(raw).map_err(|e| EndpointError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none() {
            return Err(EndpointError::MissingHost(raw.to_string()));
        }

        Ok(Self {
            base: raw.trim_end_matches('/').to_string(),
            url,
        })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port, or the scheme's default
    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(80)
    }

    pub fn is_localhost(&self) -> bool {
        self.host() == "localhost"
    }

    /// Base URL without a trailing slash
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Build the URL for a path below the endpoint (`/ping`, `/tregex`, ...)
    pub fn join(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base.clone();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base, path)
        } else {
            format!("{}/{}", self.base, path)
        }
    }
}

impl FromStr for ServiceEndpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_localhost_endpoint() {
        let endpoint = ServiceEndpoint::parse("http://localhost:9000").unwrap();
        assert_eq!(endpoint.scheme(), "http");
        assert_eq!(endpoint.host(), "localhost");
        assert_eq!(endpoint.port(), 9000);
        assert!(endpoint.is_localhost());
    }

    #[test]
    fn test_default_port_from_scheme() {
        let endpoint = ServiceEndpoint::parse("https://nlp.example.org").unwrap();
        assert_eq!(endpoint.port(), 443);
        assert!(!endpoint.is_localhost());
    }

    #[test]
    fn test_join_keeps_prefix() {
        let endpoint = ServiceEndpoint::parse("http://localhost:9000/corenlp/").unwrap();
        assert_eq!(endpoint.join("/ping"), "http://localhost:9000/corenlp/ping");
        assert_eq!(endpoint.join("tregex"), "http://localhost:9000/corenlp/tregex");
        assert_eq!(endpoint.join(""), "http://localhost:9000/corenlp");
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let err = ServiceEndpoint::parse("ftp://localhost:21").unwrap_err();
        assert_eq!(err, EndpointError::UnsupportedScheme("ftp".to_string()));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            ServiceEndpoint::parse("not a url"),
            Err(EndpointError::InvalidUrl { .. })
        ));
    }
}
