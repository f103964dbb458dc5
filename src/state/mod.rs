//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of a whole run (ready, running, done)
//! - `PageOutcome`: how a single visited page ended

mod crawl_state;
mod page_outcome;

pub use crawl_state::CrawlState;
pub use page_outcome::PageOutcome;
