//! Hexdex main entry point
//!
//! This is the command-line interface for the Hexdex documentation crawler.

use clap::Parser;
use hexdex::config::{compute_config_hash, load_config_with_hash, validate, Config};
use hexdex::crawler::Coordinator;
use hexdex::url::CrawlScope;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Hexdex: a documentation crawler for hexdocs-style sites
///
/// Hexdex walks a library's documentation breadth-first from a seed page,
/// extracts applications, modules, functions, parameters, examples and
/// guides, and stores them in a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "hexdex")]
#[command(version)]
#[command(about = "A documentation crawler for hexdocs-style sites", long_about = None)]
struct Cli {
    /// Seed URL, e.g. https://hexdocs.pm/reactor/readme.html
    #[arg(value_name = "SEED_URL", required_unless_present_any = ["stats", "export_summary"])]
    seed_url: Option<String>,

    /// Path to TOML configuration file (defaults apply without one)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Stop after visiting this many pages
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// SQLite database path, overriding the configuration
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and seed and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Export the stored documentation as markdown and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    (cfg, hash)
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => (Config::default(), compute_config_hash("")),
    };

    // Command-line overrides
    if cli.max_pages.is_some() {
        config.crawler.max_pages = cli.max_pages;
    }
    if let Some(database) = &cli.database {
        config.output.database_path = database.clone();
    }
    validate(&config)?;

    if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        let seed_url = cli.seed_url.as_deref().unwrap_or_default();
        if cli.dry_run {
            handle_dry_run(&config, seed_url)?;
        } else {
            handle_crawl(config, seed_url, config_hash).await?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hexdex=info,warn"),
            1 => EnvFilter::new("hexdex=debug,info"),
            2 => EnvFilter::new("hexdex=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates the seed and shows the crawl scope
fn handle_dry_run(config: &Config, seed_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let scope = CrawlScope::from_seed(seed_url)?;

    println!("=== Hexdex Dry Run ===\n");

    println!("Scope:");
    println!("  Seed: {}", scope.seed_key());
    println!("  Host: {}", scope.host());
    println!("  Library path: {}", scope.library_prefix());

    println!("\nCrawler Configuration:");
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay_ms
    );
    println!(
        "  Excluded extensions: {}",
        config.crawler.excluded_extensions.join(", ")
    );
    println!("  Keep fragments: {}", config.crawler.keep_fragments);
    println!(
        "  Application policy: {:?}",
        config.crawler.application_policy
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", scope.seed_key());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use hexdex::output::{load_statistics, print_statistics};
    use hexdex::storage::SqliteStorage;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: writes the markdown export
fn handle_export_summary(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use hexdex::output::generate_markdown_summary;
    use hexdex::storage::SqliteStorage;

    println!("=== Exporting Documentation Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&storage, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    seed_url: &str,
    config_hash: String,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Database: {}, visit cap: {:?}",
        config.output.database_path,
        config.crawler.max_pages
    );

    let mut coordinator = match Coordinator::new(config, seed_url) {
        Ok(c) => c.with_config_hash(config_hash),
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let summary = coordinator.run().await?;
    hexdex::output::print_crawl_summary(&summary);

    Ok(())
}
