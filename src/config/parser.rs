use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use hexdex::config::load_config;
///
/// let config = load_config(Path::new("hexdex.toml")).unwrap();
/// println!("Database: {}", config.output.database_path);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of configuration text
///
/// Recorded with each crawl run so runs made under different settings can be
/// told apart.
pub fn compute_config_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Loads a configuration and returns both the config and its hash
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, String))` - Successfully loaded configuration and its hash
/// * `Err(ConfigError)` - Failed to load or parse the configuration
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, compute_config_hash(&content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApplicationPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-pages = 50
request-timeout-secs = 5
politeness-delay-ms = 250
excluded-extensions = [".css", ".js", ".map"]
keep-fragments = false
application-policy = "append"

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[output]
database-path = "./test.db"
summary-path = "./summary.md"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, Some(50));
        assert_eq!(config.crawler.request_timeout_secs, 5);
        assert_eq!(config.crawler.politeness_delay_ms, 250);
        assert_eq!(config.crawler.excluded_extensions.len(), 3);
        assert!(!config.crawler.keep_fragments);
        assert_eq!(
            config.crawler.application_policy,
            ApplicationPolicy::Append
        );
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.output.database_path, "./test.db");
    }

    #[test]
    fn test_sample_config_parses() {
        let config = parse_config(include_str!("../../hexdex.toml")).unwrap();
        assert_eq!(config.crawler.max_pages, None);
        assert_eq!(config.output.database_path, "hexdocs.db");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[crawler]\nmax-pages = 3\n").unwrap();

        assert_eq!(config.crawler.max_pages, Some(3));
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert_eq!(config.crawler.politeness_delay_ms, 500);
        assert!(config.crawler.keep_fragments);
        assert_eq!(config.crawler.application_policy, ApplicationPolicy::Reuse);
        assert_eq!(config.output.database_path, "hexdocs.db");
        assert_eq!(config.user_agent.crawler_name, "hexdex");
    }

    #[test]
    fn test_empty_file_is_default_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.max_pages, None);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/hexdex.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let result = parse_config("[crawler]\napplication-policy = \"merge\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nrequest-timeout-secs = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_config_hash() {
        let hash1 = compute_config_hash("test content");
        let hash2 = compute_config_hash("test content");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, compute_config_hash("other content"));
    }

    #[test]
    fn test_load_with_hash_matches_content_hash() {
        let content = "[output]\ndatabase-path = \"docs.db\"\n";
        let file = create_temp_config(content);

        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.output.database_path, "docs.db");
        assert_eq!(hash, compute_config_hash(content));
    }
}
