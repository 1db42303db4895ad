use crate::url::normalize::{ensure_scheme, strip_www};
use crate::url::MAX_URL_LENGTH;
use ::url::Url;

/// Canonicalizes a raw host string into a domain key
///
/// Lowercases the host and strips a leading `www.` label. This is the single
/// place the domain-key rule lives: the error tracker, blacklist, and logger
/// all key their per-domain state by the output of this function, so applying
/// it anywhere else would fragment that state.
///
/// # Examples
///
/// ```
/// use crawl_warden::url::normalize_domain;
///
/// assert_eq!(normalize_domain("WWW.Example.COM"), "example.com");
/// assert_eq!(normalize_domain("blog.example.com"), "blog.example.com");
/// ```
pub fn normalize_domain(host: &str) -> String {
    let lowered = host.to_lowercase();
    strip_www(&lowered).to_string()
}

/// Extracts the canonical domain from a URL
///
/// Missing schemes are assumed `http`, matching [`crate::url::normalize`].
/// Returns an empty string when no host can be found.
///
/// # Examples
///
/// ```
/// use crawl_warden::url::extract_domain;
///
/// assert_eq!(extract_domain("https://www.Example.com/page"), "example.com");
/// assert_eq!(extract_domain("not a url"), "");
/// ```
pub fn extract_domain(url: &str) -> String {
    if url.is_empty() || url.len() > MAX_URL_LENGTH {
        return String::new();
    }
    match Url::parse(&ensure_scheme(url)) {
        Ok(parsed) => parsed
            .host_str()
            .map(normalize_domain)
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

/// Extracts the path portion of a URL by substring scanning
///
/// Returns `/` when the URL has no path after the authority.
pub fn extract_path(url: &str) -> String {
    let scheme_end = match url.find("://") {
        Some(pos) => pos + 3,
        None => return "/".to_string(),
    };
    match url[scheme_end..].find('/') {
        Some(pos) => url[scheme_end + pos..].to_string(),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain_lowercases() {
        assert_eq!(normalize_domain("EXAMPLE.COM"), "example.com");
    }

    #[test]
    fn test_normalize_domain_strips_www() {
        assert_eq!(normalize_domain("www.example.com"), "example.com");
        assert_eq!(normalize_domain("WWW.EXAMPLE.COM"), "example.com");
    }

    #[test]
    fn test_normalize_domain_keeps_subdomains() {
        assert_eq!(normalize_domain("blog.example.com"), "blog.example.com");
        assert_eq!(normalize_domain("www2.example.com"), "www2.example.com");
    }

    #[test]
    fn test_extract_domain_simple() {
        assert_eq!(extract_domain("https://example.com/page"), "example.com");
    }

    #[test]
    fn test_extract_domain_strips_www_and_case() {
        assert_eq!(extract_domain("https://WWW.Example.COM/a"), "example.com");
    }

    #[test]
    fn test_extract_domain_without_scheme() {
        assert_eq!(extract_domain("example.com/page"), "example.com");
    }

    #[test]
    fn test_extract_domain_with_port() {
        assert_eq!(extract_domain("http://example.com:8080/x"), "example.com");
    }

    #[test]
    fn test_extract_domain_invalid() {
        assert_eq!(extract_domain(""), "");
        assert_eq!(extract_domain("http://"), "");
    }

    #[test]
    fn test_extract_domain_matches_normalize_output() {
        // The same key must come out whether the caller normalizes first or not
        let raw = "HTTPS://WWW.Example.com/a/b?x=1";
        let normalized = crate::url::normalize(raw);
        assert_eq!(extract_domain(raw), extract_domain(&normalized));
    }

    #[test]
    fn test_extract_path() {
        assert_eq!(extract_path("http://example.com/a/b?x=1"), "/a/b?x=1");
        assert_eq!(extract_path("http://example.com"), "/");
        assert_eq!(extract_path("example.com/a"), "/");
    }
}
