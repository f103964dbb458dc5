//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Deriving the crawl scope from the seed URL
//! - Managing the frontier queue and visit cap
//! - Coordinating fetching, classification, extraction and link discovery
//! - Recording the run in the ledger
//! - Producing the final summary
//!
//! The loop is sequential: one URL is fetched and fully processed before the
//! next is dequeued. Suspension happens only at the fetch and the politeness
//! delay; parsing, extraction and persistence run synchronously between them.

use crate::config::{ApplicationPolicy, Config, CrawlerConfig};
use crate::crawler::classifier::{Classifier, PageRole};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::discover_links;
use crate::extract::{
    extract_application, extract_guide, extract_module, ApplicationExtraction, EntityCounts, Page,
};
use crate::state::{CrawlState, PageOutcome};
use crate::storage::{SqliteStorage, Storage};
use crate::url::CrawlScope;
use crate::HexdexError;
use reqwest::Client;
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

/// Report produced by every completed crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Ledger row of this run, if the ledger could be written
    pub run_id: Option<i64>,

    /// Canonical seed URL
    pub seed_url: String,

    /// Application the run attached its modules and guides to
    pub application_id: Option<i64>,

    /// Pages taken from the frontier, including failed fetches
    pub pages_visited: usize,

    /// Pages whose fetch or persistence failed
    pub pages_failed: usize,

    /// Rows inserted during this run
    pub counts: EntityCounts,

    /// Per-outcome page counts
    pub outcomes: HashMap<PageOutcome, usize>,

    /// Always `Done` for a returned summary
    pub state: CrawlState,

    pub elapsed: Duration,
}

/// Main crawler coordinator structure
///
/// Owns its storage handle for the whole run; the application id is held
/// here and passed explicitly into every module and guide extraction.
pub struct Coordinator<S: Storage> {
    crawler: CrawlerConfig,
    storage: S,
    scope: CrawlScope,
    classifier: Classifier,
    frontier: Frontier,
    client: Client,
    config_hash: String,
    state: CrawlState,
    application: Option<ApplicationExtraction>,
    counts: EntityCounts,
    outcomes: HashMap<PageOutcome, usize>,
}

impl Coordinator<SqliteStorage> {
    /// Creates a coordinator writing to the configured SQLite database
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed_url` - Entry point of the crawl; always the application root
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HexdexError)` - The seed is malformed or storage failed to open
    pub fn new(config: Config, seed_url: &str) -> Result<Self, HexdexError> {
        // The seed is validated before any storage is touched
        CrawlScope::from_seed(seed_url)?;

        let storage_path = Path::new(&config.output.database_path);
        let storage = SqliteStorage::new(storage_path)?;
        Self::with_storage(config, seed_url, storage)
    }
}

impl<S: Storage> Coordinator<S> {
    /// Creates a coordinator over an already opened storage backend
    pub fn with_storage(config: Config, seed_url: &str, storage: S) -> Result<Self, HexdexError> {
        let scope = CrawlScope::from_seed(seed_url)?
            .with_excluded_extensions(&config.crawler.excluded_extensions)
            .with_fragments(config.crawler.keep_fragments);

        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;

        let mut frontier = Frontier::new(config.crawler.max_pages);
        frontier.enqueue(scope.seed_key());

        Ok(Self {
            classifier: Classifier::new(&scope),
            crawler: config.crawler,
            storage,
            scope,
            frontier,
            client,
            config_hash: String::new(),
            state: CrawlState::Ready,
            application: None,
            counts: EntityCounts::default(),
            outcomes: HashMap::new(),
        })
    }

    /// Records the hash of the configuration file in the run ledger
    pub fn with_config_hash(mut self, config_hash: impl Into<String>) -> Self {
        self.config_hash = config_hash.into();
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn scope(&self) -> &CrawlScope {
        &self.scope
    }

    /// Gives the storage back, e.g. to query what the run wrote
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Runs the main crawl loop until the frontier is exhausted or the
    /// visit cap is reached
    ///
    /// Per-page failures are logged and counted; the run always ends in
    /// `Done`. Calling `run` a second time is an invalid transition.
    pub async fn run(&mut self) -> Result<CrawlSummary, HexdexError> {
        self.transition(CrawlState::Running)?;
        let start_time = Instant::now();
        let seed_key = self.scope.seed_key();

        let run_id = match self.storage.create_run(&seed_key, &self.config_hash) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Failed to record crawl run: {}", e);
                None
            }
        };

        tracing::info!(
            "Starting crawl of {} (library: {})",
            seed_key,
            self.scope.library_path()
        );

        while let Some(url) = self.frontier.dequeue() {
            tracing::info!("Scraping: {}", url);
            let outcome = self.visit(&url).await;
            tracing::debug!("{} -> {}", url, outcome);
            *self.outcomes.entry(outcome).or_insert(0) += 1;

            let visited = self.frontier.visited_count();
            if visited % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier",
                    visited,
                    self.frontier.pending_count()
                );
            }
        }

        if self.frontier.cap_reached() && self.frontier.pending_count() > 0 {
            tracing::info!(
                "Visit cap reached; {} discovered pages not visited",
                self.frontier.pending_count()
            );
        }

        let pages_visited = self.frontier.visited_count();
        if let Some(id) = run_id {
            if let Err(e) = self.storage.finish_run(id, pages_visited as u64) {
                tracing::warn!("Failed to close crawl run {}: {}", id, e);
            }
        }

        self.transition(CrawlState::Done)?;

        let pages_failed = self
            .outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_error())
            .map(|(_, count)| count)
            .sum();

        let summary = CrawlSummary {
            run_id,
            seed_url: seed_key,
            application_id: self.application.as_ref().map(|a| a.application_id),
            pages_visited,
            pages_failed,
            counts: self.counts,
            outcomes: self.outcomes.clone(),
            state: self.state,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawling completed. Visited {} pages ({} failed) in {:?}",
            summary.pages_visited,
            summary.pages_failed,
            summary.elapsed
        );

        Ok(summary)
    }

    fn transition(&mut self, to: CrawlState) -> Result<(), HexdexError> {
        if !self.state.can_transition_to(to) {
            return Err(HexdexError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    /// Fetches one URL, then waits out the politeness delay
    async fn visit(&mut self, url: &str) -> PageOutcome {
        let fetched = fetch_page(&self.client, url).await;

        if self.crawler.politeness_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.crawler.politeness_delay_ms)).await;
        }

        match fetched {
            Ok(page) => self.process_body(url, &page.body),
            Err(e) => {
                tracing::error!("Error accessing the URL {}: {}", url, e);
                PageOutcome::FetchFailed
            }
        }
    }

    /// Classifies, extracts and harvests links from a fetched body
    fn process_body(&mut self, url: &str, body: &str) -> PageOutcome {
        let page = Page::parse(body);
        let role = self.classifier.classify(url);
        tracing::debug!("Classified {} as {}", url, role);

        let outcome = self.extract(&page, url, role);

        let links = discover_links(&page, &self.scope);
        let queued = links
            .into_iter()
            .filter(|link| self.frontier.enqueue(link.as_str()))
            .count();
        tracing::debug!("Queued {} new links from {}", queued, url);

        outcome
    }

    fn extract(&mut self, page: &Page, url: &str, role: PageRole) -> PageOutcome {
        let policy = self.crawler.application_policy;

        if role == PageRole::ApplicationRoot {
            let scope = self.scope.key();
            return match extract_application(page.root(), &mut self.storage, policy, &scope) {
                Ok(application) => {
                    let outcome = if application.inserted {
                        self.counts.applications += 1;
                        PageOutcome::Extracted
                    } else {
                        PageOutcome::AlreadyStored
                    };
                    self.application = Some(application);
                    outcome
                }
                Err(e) => {
                    tracing::error!("Failed to store application from {}: {}", url, e);
                    PageOutcome::PersistFailed
                }
            };
        }

        if role == PageRole::LinksOnly {
            return PageOutcome::LinksOnly;
        }

        let Some((application_id, app_name)) = self
            .application
            .as_ref()
            .map(|a| (a.application_id, a.name.clone()))
        else {
            tracing::debug!("No application for {} page {}; links only", role, url);
            return PageOutcome::LinksOnly;
        };

        if policy == ApplicationPolicy::Reuse {
            let existing = match role {
                PageRole::Module => self.storage.find_module_by_url(application_id, url),
                _ => self.storage.find_guide_by_url(application_id, url),
            };
            match existing {
                Ok(Some(id)) => {
                    tracing::debug!("{} already stored as {} {}", url, role, id);
                    return PageOutcome::AlreadyStored;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Failed to look up {}: {}", url, e);
                    return PageOutcome::PersistFailed;
                }
            }
        }

        match role {
            PageRole::Module => {
                match extract_module(page.root(), url, application_id, &app_name, &mut self.storage)
                {
                    Ok(counts) => {
                        self.counts += counts;
                        PageOutcome::Extracted
                    }
                    Err(e) => {
                        tracing::error!("Failed to store module from {}: {}", url, e);
                        PageOutcome::PersistFailed
                    }
                }
            }
            _ => match extract_guide(page.root(), url, application_id, &mut self.storage) {
                Ok(_) => {
                    self.counts.guides += 1;
                    PageOutcome::Extracted
                }
                Err(e) => {
                    tracing::error!("Failed to store guide from {}: {}", url, e);
                    PageOutcome::PersistFailed
                }
            },
        }
    }
}

/// Crawls a documentation site into the configured database
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed_url` - Entry point; its first path segment scopes the crawl
/// * `max_pages` - Visit cap, overriding the configured one when set
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The crawl reached `Done`
/// * `Err(HexdexError)` - The seed URL is malformed or storage failed to open
pub async fn run_crawl(
    mut config: Config,
    seed_url: &str,
    max_pages: Option<usize>,
) -> Result<CrawlSummary, HexdexError> {
    if max_pages.is_some() {
        config.crawler.max_pages = max_pages;
    }
    let mut coordinator = Coordinator::new(config, seed_url)?;
    coordinator.run().await
}
