//! Page classification by URL
//!
//! Decides which extractor, if any, applies to a visited page. The seed page
//! is always the application root; other pages are routed by keywords in
//! their normalized URL.

use crate::url::CrawlScope;
use std::fmt;

/// Keywords marking a guide-like page
const GUIDE_KEYWORDS: [&str; 3] = ["guides", "readme", "extras"];

/// The role a page plays in the entity hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    /// The seed page; yields the Application row
    ApplicationRoot,

    /// A module page; yields a Module with its functions
    Module,

    /// A guide, readme or extras page; yields a Guide
    Guide,

    /// Any other in-library page; only its links are harvested
    LinksOnly,
}

impl PageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationRoot => "application_root",
            Self::Module => "module",
            Self::Guide => "guide",
            Self::LinksOnly => "links_only",
        }
    }
}

impl fmt::Display for PageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Routes visited URLs to page roles for one crawl scope
#[derive(Debug, Clone)]
pub struct Classifier {
    seed_key: String,
    library_prefix: String,
}

impl Classifier {
    pub fn new(scope: &CrawlScope) -> Self {
        Self {
            seed_key: scope.seed_key(),
            library_prefix: scope.library_prefix(),
        }
    }

    /// Classifies a normalized URL
    ///
    /// Rules apply in order: the seed is the application root; anything
    /// outside the library path is links-only; `/modules` marks a module
    /// page; `guides`, `readme` or `extras` mark a guide page.
    pub fn classify(&self, url: &str) -> PageRole {
        if url == self.seed_key {
            return PageRole::ApplicationRoot;
        }
        if !url.contains(&self.library_prefix) {
            return PageRole::LinksOnly;
        }
        if url.contains("/modules") {
            return PageRole::Module;
        }
        if GUIDE_KEYWORDS.iter().any(|keyword| url.contains(keyword)) {
            return PageRole::Guide;
        }
        PageRole::LinksOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        let scope = CrawlScope::from_seed("http://example.com/mylib/readme.html").unwrap();
        Classifier::new(&scope)
    }

    #[test]
    fn test_seed_is_root_even_with_guide_keyword() {
        assert_eq!(
            classifier().classify("http://example.com/mylib/readme.html"),
            PageRole::ApplicationRoot
        );
    }

    #[test]
    fn test_module_pages() {
        let c = classifier();
        assert_eq!(
            c.classify("http://example.com/mylib/modules/codec.html"),
            PageRole::Module
        );
        assert_eq!(
            c.classify("http://example.com/mylib/modules.html"),
            PageRole::Module
        );
    }

    #[test]
    fn test_guide_pages() {
        let c = classifier();
        for url in [
            "http://example.com/mylib/guides/start.html",
            "http://example.com/mylib/extras/changelog.html",
            "http://example.com/mylib/readme.html#install",
        ] {
            assert_eq!(c.classify(url), PageRole::Guide, "{}", url);
        }
    }

    #[test]
    fn test_other_pages_are_links_only() {
        let c = classifier();
        assert_eq!(
            c.classify("http://example.com/mylib/api-reference.html"),
            PageRole::LinksOnly
        );
        assert_eq!(
            c.classify("http://example.com/other/modules/x.html"),
            PageRole::LinksOnly
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(PageRole::Module.to_string(), "module");
    }
}
