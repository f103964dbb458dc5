//! Configuration module for Hexdex
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the defaults of a
//! polite single-threaded crawl.
//!
//! # Example
//!
//! ```no_run
//! use hexdex::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hexdex.toml")).unwrap();
//! println!("Visit cap: {:?}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{ApplicationPolicy, Config, CrawlerConfig, OutputConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
