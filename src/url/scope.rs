use crate::{UrlError, UrlResult};
use url::Url;

/// Extensions skipped when no explicit list is configured
const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[".css", ".js"];

/// The part of a site a crawl is allowed to visit
///
/// Derived from the seed URL: the seed's host (and effective port) plus the
/// first path segment, called the library path. Everything outside
/// `{scheme}://{host}/{library_path}/` is out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    seed: Url,
    host: String,
    port: Option<u16>,
    library_path: String,
    excluded_extensions: Vec<String>,
    keep_fragments: bool,
}

impl CrawlScope {
    /// Builds the scope for a crawl starting at `seed`
    ///
    /// # Errors
    ///
    /// Returns `UrlError::MalformedSeed` when the seed has no usable
    /// scheme, host or first path segment. This is the only fatal crawl error.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexdex::url::CrawlScope;
    ///
    /// let scope = CrawlScope::from_seed("https://hexdocs.pm/reactor/readme.html").unwrap();
    /// assert_eq!(scope.library_path(), "reactor");
    /// assert_eq!(scope.base_url(), "https://hexdocs.pm");
    /// ```
    pub fn from_seed(seed: &str) -> UrlResult<Self> {
        let malformed = |reason: &str| UrlError::MalformedSeed {
            url: seed.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(seed.trim()).map_err(|e| malformed(&e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(malformed("only http and https seeds are supported"));
        }

        let host = url
            .host_str()
            .map(|h| h.to_lowercase())
            .ok_or_else(|| malformed("missing host"))?;

        let library_path = url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .ok_or_else(|| malformed("missing library path segment"))?;

        Ok(Self {
            port: url.port_or_known_default(),
            seed: url,
            host,
            library_path,
            excluded_extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            keep_fragments: true,
        })
    }

    /// Replaces the list of path extensions that are never followed
    pub fn with_excluded_extensions(mut self, extensions: &[String]) -> Self {
        self.excluded_extensions = extensions.iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Controls whether normalized URLs keep their `#fragment`
    pub fn with_fragments(mut self, keep: bool) -> Self {
        self.keep_fragments = keep;
        self
    }

    /// The parsed seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// The canonical string form of the seed URL
    pub fn seed_key(&self) -> String {
        canonical_form(&self.seed, self.keep_fragments)
    }

    /// `scheme://host[:port]` of the seed, without a trailing slash
    pub fn base_url(&self) -> String {
        let mut base = format!("{}://{}", self.seed.scheme(), self.host);
        if let Some(port) = self.seed.port() {
            base.push_str(&format!(":{}", port));
        }
        base
    }

    /// `scheme://host[:port]/{library_path}/`, identifying the crawled
    /// library independent of the seed page
    pub fn key(&self) -> String {
        format!("{}{}", self.base_url(), self.library_prefix())
    }

    /// The lowercase seed host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// First path segment of the seed
    pub fn library_path(&self) -> &str {
        &self.library_path
    }

    /// `/{library_path}/`, the prefix every in-scope path starts with
    pub fn library_prefix(&self) -> String {
        format!("/{}/", self.library_path)
    }

    pub fn keeps_fragments(&self) -> bool {
        self.keep_fragments
    }

    /// Returns true if `url` is on the seed host, under the library path,
    /// and not an excluded static resource
    pub fn contains(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        let same_host = url
            .host_str()
            .map(|h| h.eq_ignore_ascii_case(&self.host))
            .unwrap_or(false);
        if !same_host || url.port_or_known_default() != self.port {
            return false;
        }

        let path = url.path();
        if !path.starts_with(&self.library_prefix()) {
            return false;
        }

        let lowered = path.to_lowercase();
        !self
            .excluded_extensions
            .iter()
            .any(|ext| lowered.ends_with(ext.as_str()))
    }
}

/// Serializes a URL as `scheme://host[:port]path[?query][#fragment]`
///
/// User info is dropped, and empty query or fragment markers are omitted,
/// so the output parses back to the same string.
pub(crate) fn canonical_form(url: &Url, keep_fragment: bool) -> String {
    let mut canonical = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());

    if let Some(port) = url.port() {
        canonical.push_str(&format!(":{}", port));
    }

    canonical.push_str(url.path());

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        canonical.push('?');
        canonical.push_str(query);
    }

    if keep_fragment {
        if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
            canonical.push('#');
            canonical.push_str(fragment);
        }
    }

    canonical
}
