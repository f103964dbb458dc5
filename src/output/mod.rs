//! Output module for reporting on crawls and the stored documentation
//!
//! This module handles:
//! - Printing the summary of a finished crawl
//! - Row-count statistics and the latest run
//! - Exporting the stored entity hierarchy as markdown

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{load_statistics, print_crawl_summary, print_statistics, StoreStatistics};
