use crate::url::{MAX_URL_LENGTH, MIN_URL_LENGTH};
// The leading `::` keeps the extern crate distinct from this `url` module
use ::url::Url;

/// Tracking query parameters removed during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "ref",
    "source",
    "campaign_id",
    "ad_id",
];

/// Normalizes a URL into its canonical form for deduplication
///
/// # Normalization Steps
///
/// 1. Assume `http` when the scheme is missing
/// 2. Lowercase the scheme and host
/// 3. Remove a leading `www.` prefix from the host
/// 4. Remove the fragment (everything after `#`)
/// 5. Remove tracking query parameters (fixed set), preserving the order of
///    the parameters that remain
/// 6. Collapse duplicate path slashes and resolve dot segments
/// 7. Remove the trailing slash unless the path is root
///
/// Invalid input never panics or errors: empty input, input longer than
/// [`MAX_URL_LENGTH`], and input the parser rejects all degrade to an empty
/// string.
///
/// # Arguments
///
/// * `raw` - The URL string to normalize
///
/// # Returns
///
/// The canonical URL string, or `""` when the input cannot be canonicalized
///
/// # Examples
///
/// ```
/// use crawl_warden::url::normalize;
///
/// assert_eq!(
///     normalize("HTTP://WWW.Example.com/a//b/?utm_source=x&id=1#frag"),
///     "http://example.com/a/b?id=1"
/// );
/// ```
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() || raw.len() > MAX_URL_LENGTH {
        return String::new();
    }

    let mut url = match Url::parse(&ensure_scheme(raw)) {
        Ok(url) => url,
        Err(_) => return String::new(),
    };

    // A URL without a host is not addressable by the crawler
    let host = match url.host_str() {
        Some(host) => host.to_lowercase(),
        None => return String::new(),
    };
    let host = strip_www(&host);
    if url.set_host(Some(host)).is_err() {
        return String::new();
    }

    let path = normalize_path(url.path());
    url.set_path(&path);

    url.set_fragment(None);

    if let Some(query) = url.query() {
        match filter_tracking_params(query) {
            Some(kept) => url.set_query(Some(&kept)),
            None => url.set_query(None),
        }
    }

    url.to_string()
}

/// Resolves a discovered link against the page it was found on
///
/// Resolution precedence:
///
/// 1. Already absolute (contains a scheme) - normalized directly
/// 2. Protocol-relative (`//host/path`) - inherits the base URL's scheme
/// 3. Absolute path (`/path`) - inherits the base URL's scheme and authority
/// 4. Otherwise relative - appended to the base URL's directory (the substring
///    up to the last `/`, or the base with `/` appended when it has none)
///
/// The result is always run through [`normalize`], so dot segments introduced
/// by `../` links resolve without escaping the base domain.
///
/// # Arguments
///
/// * `base` - The absolute URL of the page the link was found on
/// * `relative` - The raw link value
///
/// # Returns
///
/// The canonical absolute URL, or `""` when resolution is impossible
pub fn resolve_relative(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return String::new();
    }

    // Case 1: already absolute
    if relative.contains("://") {
        return normalize(relative);
    }

    // Case 2: protocol-relative
    if let Some(rest) = relative.strip_prefix("//") {
        let scheme = base.split("://").next().filter(|s| !s.is_empty());
        return match scheme {
            Some(scheme) => normalize(&format!("{}://{}", scheme, rest)),
            None => String::new(),
        };
    }

    let scheme_end = match base.find("://") {
        Some(pos) => pos + 3,
        None => return String::new(),
    };

    // Case 3: absolute path - keep the base's scheme and authority
    if relative.starts_with('/') {
        let authority_end = base[scheme_end..]
            .find('/')
            .map(|pos| scheme_end + pos)
            .unwrap_or(base.len());
        return normalize(&format!("{}{}", &base[..authority_end], relative));
    }

    // Case 4: relative path - resolve against the base's directory
    if base.ends_with('/') {
        return normalize(&format!("{}{}", base, relative));
    }
    match base.rfind('/') {
        Some(last_slash) if last_slash >= scheme_end => {
            normalize(&format!("{}{}", &base[..=last_slash], relative))
        }
        _ => normalize(&format!("{}/{}", base, relative)),
    }
}

/// Checks whether a URL is worth handing to the fetch engine
///
/// True only when the length is within `[MIN_URL_LENGTH, MAX_URL_LENGTH]` and
/// the scheme is `http` or `https`.
pub fn is_valid_url(url: &str) -> bool {
    if url.len() < MIN_URL_LENGTH || url.len() > MAX_URL_LENGTH {
        return false;
    }
    url.starts_with("http://") || url.starts_with("https://")
}

/// Prepends `http://` when the input carries no scheme
pub(crate) fn ensure_scheme(raw: &str) -> String {
    if raw.contains("://") {
        raw.to_string()
    } else if let Some(rest) = raw.strip_prefix("//") {
        format!("http://{}", rest)
    } else {
        format!("http://{}", raw)
    }
}

/// Strips a leading `www.` label from an already-lowercased host
pub(crate) fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Collapses duplicate slashes and strips the trailing slash (root excepted)
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

/// Drops tracking parameters from a raw query string, preserving order
///
/// Returns `None` when nothing survives, so the caller can drop the `?`.
fn filter_tracking_params(query: &str) -> Option<String> {
    let kept: Vec<&str> = query
        .split('&')
        .filter(|param| !param.is_empty())
        .filter(|param| {
            let key = param.split('=').next().unwrap_or(param);
            !TRACKING_PARAMS.contains(&key)
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("&"))
    }
}
