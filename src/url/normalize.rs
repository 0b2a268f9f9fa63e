use crate::UrlError;
use url::Url;

/// Schemes that never lead to a fetchable page
const SKIPPED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes a user-supplied seed URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `https://` when no scheme is given
/// 3. Parse; reject if malformed
/// 4. Reject schemes other than HTTP and HTTPS
/// 5. Reject URLs without a host
/// 6. Remove the fragment
///
/// # Examples
///
/// ```
/// use page_harvester::url::normalize_seed;
///
/// let url = normalize_seed("example.com/start").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/start");
/// ```
pub fn normalize_seed(seed: &str) -> Result<Url, UrlError> {
    let trimmed = seed.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(candidate));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Removes the fragment from a URL
///
/// Links differing only by fragment point at the same document, so they
/// share one identity in link sets and in the crawl frontier.
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Resolves a link href to an absolute, fragment-free HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: schemes
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    Some(strip_fragment(absolute))
}
