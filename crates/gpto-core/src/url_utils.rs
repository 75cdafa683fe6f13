use crate::error::{AuditError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// `scheme://` at the very start of the input
static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").expect("invalid scheme regex"));

/// Serialized origin of an already-parsed URL, without a trailing slash.
pub fn origin_of(url: &Url) -> String {
    url.origin()
        .ascii_serialization()
        .trim_end_matches('/')
        .to_string()
}

/// Turn user input into the seed URL of an audit.
///
/// Trims whitespace, defaults the scheme to `https://`, accepts only
/// http/https URLs with a host and strips the fragment.
pub fn normalize_seed_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AuditError::MissingUrl);
    }

    let with_scheme = if SCHEME_PREFIX.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut url = Url::parse(&with_scheme)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AuditError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AuditError::InvalidUrl(format!("{trimmed} has no host")));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Drop the `#fragment` part of a URL.
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Parse `candidate` and keep it only when it belongs to `origin`.
///
/// The returned string has its fragment removed.
pub fn same_origin_url(candidate: &str, origin: &str) -> Option<String> {
    let parsed = Url::parse(candidate).ok()?;
    if origin_of(&parsed) != origin {
        return None;
    }
    Some(strip_fragment(parsed).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_defaults_to_https() {
        let url = normalize_seed_url("  example.com/about  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/about");
    }

    #[test]
    fn seed_without_scheme_may_carry_urls_in_query() {
        let url = normalize_seed_url("example.com/?next=https://other.test").unwrap();
        assert_eq!(url.as_str(), "https://example.com/?next=https://other.test");

        let url = normalize_seed_url("localhost:8080/start").unwrap();
        assert_eq!(url.as_str(), "https://localhost:8080/start");
    }

    #[test]
    fn seed_strips_fragment() {
        let url = normalize_seed_url("http://example.com/page#pricing").unwrap();
        assert_eq!(url.as_str(), "http://example.com/page");
    }

    #[test]
    fn seed_rejects_empty_input() {
        assert!(matches!(normalize_seed_url("   "), Err(AuditError::MissingUrl)));
    }

    #[test]
    fn seed_rejects_other_schemes() {
        for input in ["ftp://example.com", "file:///etc/passwd"] {
            assert!(
                matches!(normalize_seed_url(input), Err(AuditError::UnsupportedScheme(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn seed_rejects_garbage() {
        assert!(normalize_seed_url("https://exa mple.com").is_err());
    }

    #[test]
    fn same_origin_filters_foreign_hosts() {
        let origin = "https://example.com";
        assert_eq!(
            same_origin_url("https://example.com/a#top", origin).as_deref(),
            Some("https://example.com/a")
        );
        assert_eq!(same_origin_url("https://example.com.evil.org/a", origin), None);
        assert_eq!(same_origin_url("http://example.com/a", origin), None);
        assert_eq!(same_origin_url("not a url", origin), None);
    }
}
