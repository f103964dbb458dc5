use crate::url::scope::{canonical_form, CrawlScope};
use url::{ParseError, Url};

/// Normalizes a discovered href into an in-scope absolute URL
///
/// # Normalization Steps
///
/// 1. Trim the href; drop empty and fragment-only (`#section`) hrefs
/// 2. Absolute `http(s)` hrefs are parsed as-is; any other scheme
///    (`mailto:`, `javascript:`, `data:`, ...) is dropped
/// 3. Protocol-relative hrefs (`//host/path`) take the seed's scheme
/// 4. Hrefs already rooted at `/{library_path}/` resolve against the host root
/// 5. Any other relative href resolves to
///    `{base_url}/{library_path}/{href without leading slashes}`
/// 6. Reject anything outside the crawl scope (host, port, library path,
///    excluded extensions)
/// 7. Serialize as `scheme://host[:port]path[?query][#fragment]`
///
/// Normalizing an already-normalized URL returns it unchanged.
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `scope` - The crawl scope derived from the seed URL
///
/// # Returns
///
/// * `Some(String)` - The canonical URL
/// * `None` - The link is out of scope or not a document link
///
/// # Examples
///
/// ```
/// use hexdex::url::{normalize_link, CrawlScope};
///
/// let scope = CrawlScope::from_seed("https://hexdocs.pm/reactor/readme.html").unwrap();
/// assert_eq!(
///     normalize_link("Reactor.Step.html", &scope).as_deref(),
///     Some("https://hexdocs.pm/reactor/Reactor.Step.html")
/// );
/// assert_eq!(normalize_link("https://elixir-lang.org/", &scope), None);
/// ```
pub fn normalize_link(href: &str, scope: &CrawlScope) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => url,
        Ok(_) => return None,
        Err(ParseError::RelativeUrlWithoutBase) => resolve_relative(href, scope)?,
        Err(_) => return None,
    };

    if !scope.contains(&resolved) {
        return None;
    }

    Some(canonical_form(&resolved, scope.keeps_fragments()))
}

/// Resolves a relative href against the library root of the scope
fn resolve_relative(href: &str, scope: &CrawlScope) -> Option<Url> {
    if href.starts_with("//") {
        return scope.seed().join(href).ok();
    }

    let candidate = if href.starts_with(&scope.library_prefix()) {
        format!("{}{}", scope.base_url(), href)
    } else {
        format!(
            "{}/{}/{}",
            scope.base_url(),
            scope.library_path(),
            href.trim_start_matches('/')
        )
    };

    Url::parse(&candidate).ok()
}
