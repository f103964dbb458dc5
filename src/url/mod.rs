//! URL handling module for Hexdex
//!
//! This module derives the crawl scope from a seed URL and normalizes
//! discovered links into a comparable absolute form, filtering out anything
//! off-host, outside the library path, or a static resource.

mod normalize;
mod scope;

pub use normalize::normalize_link;
pub use scope::CrawlScope;
