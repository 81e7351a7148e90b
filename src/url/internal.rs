use url::Url;

/// Extracts the network location (`user:pass@host:port`) of a link
///
/// Returns `None` when the link carries no authority of its own: relative
/// paths, links that fail to parse, and schemes without a host such as
/// `mailto:`. Scheme-relative links (`//host/path`) do carry one.
///
/// # Examples
///
/// ```
/// use rpa_scout::url::authority_of;
///
/// assert_eq!(authority_of("https://example.com/page"), Some("example.com".to_string()));
/// assert_eq!(authority_of("http://example.com:8080/"), Some("example.com:8080".to_string()));
/// assert_eq!(authority_of("//cdn.example.com/lib.js"), Some("cdn.example.com".to_string()));
/// assert_eq!(authority_of("/about"), None);
/// ```
pub fn authority_of(link: &str) -> Option<String> {
    let parsed = if link.starts_with("//") {
        Url::parse(&format!("http:{}", link))
    } else {
        Url::parse(link)
    };

    let url = parsed.ok()?;
    let host = url.host_str()?;

    let mut authority = String::new();
    if !url.username().is_empty() {
        authority.push_str(url.username());
        if let Some(password) = url.password() {
            authority.push(':');
            authority.push_str(password);
        }
        authority.push('@');
    }
    authority.push_str(host);
    if let Some(port) = url.port() {
        authority.push_str(&format!(":{}", port));
    }

    Some(authority)
}

/// Decides whether `link` is a followable link on the same site as `base_url`
///
/// # Rules
///
/// 1. Empty links, `javascript:` pseudo-links and bare fragments (`#top`)
///    are never followable.
/// 2. A link without an authority of its own (relative, or unparseable) is
///    treated as same-site. Malformed input fails open.
/// 3. Otherwise the link's authority must equal the base URL's authority.
///
/// # Examples
///
/// ```
/// use rpa_scout::url::is_internal;
///
/// assert!(is_internal("http://a.com/x", "/y"));
/// assert!(is_internal("http://a.com/x", "http://a.com/x#section"));
/// assert!(!is_internal("http://a.com/x", "http://b.com/y"));
/// assert!(!is_internal("http://a.com/x", "javascript:void(0)"));
/// ```
pub fn is_internal(base_url: &str, link: &str) -> bool {
    let link = link.trim();

    if link.is_empty() || link.starts_with('#') {
        return false;
    }

    if link
        .get(..11)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:"))
    {
        return false;
    }

    match authority_of(link) {
        None => true,
        Some(authority) => authority_of(base_url).as_deref() == Some(authority.as_str()),
    }
}
