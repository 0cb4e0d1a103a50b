use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP pointed somewhere other than the local machine.
    #[error("Insecure URL: HTTPS required (except localhost for testing)")]
    Insecure,
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// The URL contains whitespace or control characters.
    #[error("URL contains control characters")]
    ControlCharacters,
}

/// Validates the API base URL.
///
/// HTTPS is required. Plain HTTP is accepted only for loopback hosts
/// (`localhost`, `127.0.0.1`, `::1`) so tests can point the client at a
/// local mock server.
///
/// ```
/// use hnreader::util::validate_base_url;
///
/// assert!(validate_base_url("https://hacker-news.firebaseio.com/v0").is_ok());
/// assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
/// assert!(validate_base_url("http://example.com/v0").is_err());
/// ```
pub fn validate_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;
    let host = url.host_str().ok_or(UrlValidationError::MissingHost)?;

    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback_host(host) => {
            tracing::warn!(base_url = %url, "Using plain HTTP API base URL (loopback only)");
            Ok(url)
        }
        "http" => Err(UrlValidationError::Insecure),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Validates a URL before handing it to the system browser.
///
/// Story URLs come from the API and are passed to `open::that`, which may
/// shell out on some platforms. Only http/https URLs with a host and without
/// embedded control characters or whitespace are allowed through.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    if url_str
        .chars()
        .any(|c| c.is_control() || c.is_whitespace())
    {
        return Err(UrlValidationError::ControlCharacters);
    }

    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if !url.host_str().is_some_and(|h| !h.is_empty()) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

fn is_loopback_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}
