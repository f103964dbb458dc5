//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a bounded timeout
//! - Page classification by URL
//! - Link discovery on fetched pages
//! - The breadth-first frontier with its visit cap
//! - Overall crawl coordination

mod classifier;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use classifier::{Classifier, PageRole};
pub use coordinator::{run_crawl, Coordinator, CrawlSummary};
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchedPage};
pub use frontier::Frontier;
pub use parser::discover_links;

pub use crate::extract::EntityCounts;
