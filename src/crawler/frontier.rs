//! Crawl frontier: pending URLs plus the visited set
//!
//! This module handles:
//! - FIFO ordering of discovered URLs (breadth-first traversal)
//! - At-most-once visits, even over cyclic link graphs
//! - The optional visit cap

use std::collections::{HashSet, VecDeque};

/// Queue of pending URLs with duplicate and cap enforcement
///
/// A URL is accepted by [`enqueue`](Frontier::enqueue) only if it has never
/// been queued or visited, and [`dequeue`](Frontier::dequeue) marks it
/// visited as it hands it out. Once the visited count reaches the cap,
/// `dequeue` yields nothing; URLs still pending are simply never visited.
#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    max_pages: Option<usize>,
}

impl Frontier {
    /// Creates an empty frontier with an optional visit cap
    pub fn new(max_pages: Option<usize>) -> Self {
        Self {
            max_pages,
            ..Default::default()
        }
    }

    /// Adds a URL unless it is already queued or visited
    ///
    /// # Returns
    ///
    /// `true` if the URL was newly queued
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Takes the oldest pending URL and marks it visited
    ///
    /// # Returns
    ///
    /// * `Some(String)` - The next URL to visit
    /// * `None` - The frontier is exhausted or the visit cap is reached
    pub fn dequeue(&mut self) -> Option<String> {
        if self.cap_reached() {
            return None;
        }
        let url = self.pending.pop_front()?;
        self.queued.remove(&url);
        self.visited.insert(url.clone());
        Some(url)
    }

    /// Returns true once the visited count has reached the cap
    pub fn cap_reached(&self) -> bool {
        self.max_pages
            .map(|max| self.visited.len() >= max)
            .unwrap_or(false)
    }

    /// Number of URLs handed out so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs waiting to be visited
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }
}
