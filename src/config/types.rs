use serde::Deserialize;

/// Main configuration structure for Hexdex
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages visited in one run (unbounded when absent)
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,

    /// Timeout applied to every page fetch (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Pause after each fetch (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Path suffixes that are never followed
    #[serde(rename = "excluded-extensions")]
    pub excluded_extensions: Vec<String>,

    /// Whether `#fragment` parts are kept in normalized URLs
    #[serde(rename = "keep-fragments")]
    pub keep_fragments: bool,

    /// What to do when the seed's application is already stored
    #[serde(rename = "application-policy")]
    pub application_policy: ApplicationPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            request_timeout_secs: 10,
            politeness_delay_ms: 500,
            excluded_extensions: vec![".css".to_string(), ".js".to_string()],
            keep_fragments: true,
            application_policy: ApplicationPolicy::default(),
        }
    }
}

/// Policy for re-crawling an application that already exists in the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationPolicy {
    /// Attach to the row stored for this (name, version) and crawl scope, and
    /// skip already stored pages
    #[default]
    Reuse,
    /// Always insert a fresh application hierarchy
    Append,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "hexdex".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+contact)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown export file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "hexdocs.db".to_string(),
            summary_path: "summary.md".to_string(),
        }
    }
}
