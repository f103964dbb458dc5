//! Statistics generation from the documentation database
//!
//! This module provides functionality for extracting and displaying
//! row counts and run information from the storage layer.

use crate::crawler::CrawlSummary;
use crate::storage::{RunRecord, Storage, Table};
use crate::HexdexError;

/// Snapshot of what the database holds
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Row count per entity table, in hierarchy order
    pub table_counts: Vec<(Table, u64)>,

    /// The most recent crawl run, if any
    pub latest_run: Option<RunRecord>,
}

impl StoreStatistics {
    /// Row count of one table
    pub fn count(&self, table: Table) -> u64 {
        self.table_counts
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Rows across every entity table
    pub fn total_rows(&self) -> u64 {
        self.table_counts.iter().map(|(_, count)| count).sum()
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(HexdexError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStatistics, HexdexError> {
    let table_counts = Table::all()
        .into_iter()
        .map(|table| storage.count_rows(table).map(|count| (table, count)))
        .collect::<Result<Vec<_>, _>>()?;

    let latest_run = storage.get_latest_run()?;

    Ok(StoreStatistics {
        table_counts,
        latest_run,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Documentation Store ===\n");

    println!("Rows by Table:");
    for (table, count) in &stats.table_counts {
        println!("  {:<13} {}", table.name(), count);
    }
    println!("  {:<13} {}", "total", stats.total_rows());
    println!();

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  ID: {}", run.id);
            println!("  Seed: {}", run.seed_url);
            println!("  Status: {}", run.status);
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  Pages visited: {}", run.pages_visited);
        }
        None => println!("No crawl runs recorded"),
    }
}

/// Prints the summary of a finished crawl
pub fn print_crawl_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");
    println!("Seed: {}", summary.seed_url);
    if let Some(run_id) = summary.run_id {
        println!("Run ID: {}", run_id);
    }
    println!("State: {}", summary.state);
    println!(
        "Pages visited: {} ({} failed) in {:.1}s",
        summary.pages_visited,
        summary.pages_failed,
        summary.elapsed.as_secs_f64()
    );
    println!();

    println!("Inserted:");
    println!("  applications: {}", summary.counts.applications);
    println!("  modules:      {}", summary.counts.modules);
    println!("  functions:    {}", summary.counts.functions);
    println!("  parameters:   {}", summary.counts.parameters);
    println!("  examples:     {}", summary.counts.examples);
    println!("  guides:       {}", summary.counts.guides);
}
