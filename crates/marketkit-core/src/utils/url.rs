//! URL validation and redaction.

use url::Url;

use crate::error::{MarketError, MarketResult};

/// Whether `url` is a well-formed http(s) URL with a host.
pub fn validate_url(url: &str) -> bool {
    parse_url(url).is_ok()
}

/// Parse an http(s) URL with a host.
///
/// Error messages never echo the input, which may embed credentials.
pub fn parse_url(url: &str) -> MarketResult<Url> {
    if url.is_empty() {
        return Err(MarketError::validation("URL cannot be empty"));
    }
    let parsed = Url::parse(url).map_err(|e| MarketError::validation(format!("malformed URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MarketError::validation(format!(
            "unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(MarketError::validation("URL has no host"));
    }
    Ok(parsed)
}

/// Render `url` without userinfo, query or fragment.
pub fn redact_url(url: &Url) -> String {
    let mut clean = url.clone();
    // Both setters only fail for cannot-be-a-base URLs, which carry no userinfo.
    let _ = clean.set_username("");
    let _ = clean.set_password(None);
    clean.set_query(None);
    clean.set_fragment(None);
    clean.to_string()
}
