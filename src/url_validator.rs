//! URL validation for the completion endpoint.
//!
//! The completion client only talks to endpoints that:
//! - parse as absolute URLs with a host
//! - use HTTPS, or plain HTTP to a loopback host (local model servers)
//!
//! API keys therefore never travel in cleartext over a network.

use std::net::IpAddr;
use url::{Host, Url};

#[derive(Debug, Clone, PartialEq)]
pub enum UrlValidationError {
    /// URL is malformed or cannot be parsed
    InvalidUrl(String),
    /// Scheme other than http/https
    UnsupportedScheme(String),
    /// Plain HTTP to a non-loopback host
    InsecureRemote(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlValidationError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            UrlValidationError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported URL scheme: {}", scheme)
            }
            UrlValidationError::InsecureRemote(host) => {
                write!(f, "Plain HTTP is only allowed for localhost, got: {}", host)
            }
        }
    }
}

impl std::error::Error for UrlValidationError {}

fn is_loopback_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => domain.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(v4) => IpAddr::V4(*v4).is_loopback(),
        Host::Ipv6(v6) => IpAddr::V6(*v6).is_loopback(),
    }
}

/// Validate a completion endpoint base URL.
///
/// # Returns
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlValidationError)` - If validation fails
pub fn validate_endpoint_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str).map_err(|e| UrlValidationError::InvalidUrl(e.to_string()))?;

    let host = url
        .host()
        .ok_or_else(|| UrlValidationError::InvalidUrl("No host in URL".to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" => {
            if !is_loopback_host(&host) {
                return Err(UrlValidationError::InsecureRemote(host.to_string()));
            }
        }
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_accepted() {
        let url = validate_endpoint_url("https://api.openai.com/v1").unwrap();
        assert_eq!(url.host_str(), Some("api.openai.com"));
    }

    #[test]
    fn test_http_loopback_accepted() {
        assert!(validate_endpoint_url("http://localhost:11434").is_ok());
        assert!(validate_endpoint_url("http://127.0.0.1:8080/v1").is_ok());
        assert!(validate_endpoint_url("http://[::1]:11434").is_ok());
    }

    #[test]
    fn test_http_remote_rejected() {
        let result = validate_endpoint_url("http://llm.example.com/v1");
        assert!(matches!(result, Err(UrlValidationError::InsecureRemote(_))));
    }

    #[test]
    fn test_bad_urls_rejected() {
        assert!(matches!(
            validate_endpoint_url("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_endpoint_url("ftp://files.example.com"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }
}
