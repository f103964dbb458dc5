//! Link discovery on fetched pages
//!
//! # Link Extraction Rules
//!
//! **Include:**
//! - `<a href="...">` tags anywhere in the document, resolved against the
//!   crawl scope
//!
//! **Exclude:**
//! - `<a href="..." download>`
//! - Fragment-only, `javascript:`, `mailto:`, `tel:` and data links
//! - Anything the normalizer puts out of scope (other hosts, paths outside
//!   the library, stylesheets and scripts)

use crate::extract::{Page, Scope};
use crate::url::{normalize_link, CrawlScope};
use std::collections::HashSet;

/// Collects the in-scope links of a page as normalized URLs, first
/// occurrence order, without duplicates
pub fn discover_links(page: &Page, scope: &CrawlScope) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in page.root().select_all("a[href]") {
        if anchor.attr("download").is_some() {
            continue;
        }
        let Some(href) = anchor.attr("href") else {
            continue;
        };

        match normalize_link(href, scope) {
            Some(url) => {
                if seen.insert(url.clone()) {
                    links.push(url);
                }
            }
            None => tracing::trace!("Filtered link: {}", href),
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> CrawlScope {
        CrawlScope::from_seed("http://example.com/mylib/readme.html").unwrap()
    }

    #[test]
    fn test_discover_links() {
        let page = Page::parse(
            r##"<html><body>
                <a href="modules/a.html">A</a>
                <a href="/mylib/modules/b.html">B</a>
                <a href="http://example.com/mylib/modules/a.html">A again</a>
                <a href="http://other.com/mylib/x.html">Other host</a>
                <a href="http://example.com/otherlib/x.html">Other lib</a>
                <a href="dist/app.js">Script</a>
                <a href="mailto:me@example.com">Mail</a>
                <a href="#section">Fragment</a>
                <a href="mylib.epub" download>Download</a>
                <a>No href</a>
              </body></html>"##,
        );

        let links = discover_links(&page, &scope());

        assert_eq!(
            links,
            vec![
                "http://example.com/mylib/modules/a.html".to_string(),
                "http://example.com/mylib/modules/b.html".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_links() {
        let page = Page::parse("<html><body><p>nothing</p></body></html>");
        assert!(discover_links(&page, &scope()).is_empty());
    }
}
