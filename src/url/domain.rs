use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_harvester::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if two URLs belong to the same site
///
/// Two URLs are on the same site when their hosts match and their explicit
/// ports match. The scheme is ignored, so `http://a.com/` and `https://a.com/`
/// are the same site, while `a.com:8080` and `a.com` are not.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_harvester::url::same_site;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert!(same_site(&base, &Url::parse("http://example.com/about").unwrap()));
/// assert!(!same_site(&base, &Url::parse("https://blog.example.com/").unwrap()));
/// ```
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(ha), Some(hb)) => ha == hb && a.port() == b.port(),
        _ => false,
    }
}
