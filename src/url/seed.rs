use crate::UrlError;
use url::Url;

/// Parses and validates the seed URL a scan starts from
///
/// # Validation Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed
/// 2. Only `http` and `https` schemes are crawlable
/// 3. The URL must name a host
/// 4. Drop the fragment, which never changes the fetched document
///
/// Nothing else is rewritten: visited URLs are deduplicated by their exact
/// string form, so the seed keeps the spelling the caller gave it.
///
/// # Examples
///
/// ```
/// use rpa_scout::url::parse_seed;
///
/// let url = parse_seed("https://example.com/services#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/services");
///
/// assert!(parse_seed("ftp://example.com/").is_err());
/// ```
pub fn parse_seed(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}
