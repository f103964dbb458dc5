//! Storage module for persisting extracted documentation
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Parent-before-child inserts of the entity hierarchy
//! - Savepoint-scoped units of work for one module hierarchy
//! - Read queries used by the API layer, statistics and export
//! - The run ledger

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::CrawlState;
use crate::HexdexError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(HexdexError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, HexdexError> {
    SqliteStorage::new(path)
}

// ===== Insert payloads =====

/// Fields of an application row before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Fields of a module row before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModule {
    pub name: String,
    pub url: String,
    pub description: String,
}

/// Fields of a function row before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFunction {
    pub name: String,
    pub arity: u32,
    pub return_type: String,
    pub summary: String,
    pub description: String,
}

/// Fields of a parameter row before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParameter {
    pub name: String,
    pub param_type: String,
    pub default_value: String,
    pub description: String,
}

/// Fields of an example row before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExample {
    pub code: String,
    pub description: String,
}

/// Fields of a guide row before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuide {
    pub title: String,
    pub url: String,
    pub content: String,
}

// ===== Stored rows =====

/// Represents an application in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRecord {
    pub id: i64,
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Represents a module in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub id: i64,
    pub application_id: i64,
    pub name: String,
    pub url: String,
    pub description: String,
}

/// Represents a function in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    pub id: i64,
    pub module_id: i64,
    pub name: String,
    pub arity: u32,
    pub return_type: String,
    pub summary: String,
    pub description: String,
}

/// Represents a function parameter in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    pub id: i64,
    pub function_id: i64,
    pub name: String,
    pub param_type: String,
    pub default_value: String,
    pub description: String,
}

/// Represents a code example in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRecord {
    pub id: i64,
    pub function_id: i64,
    pub code: String,
    pub description: String,
}

/// Represents a guide page in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideRecord {
    pub id: i64,
    pub application_id: i64,
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub seed_url: String,
    pub config_hash: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub status: CrawlState,
    pub pages_visited: u64,
}

/// The entity tables, for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Applications,
    Modules,
    Functions,
    Parameters,
    Examples,
    Guides,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::Modules => "modules",
            Self::Functions => "functions",
            Self::Parameters => "parameters",
            Self::Examples => "examples",
            Self::Guides => "guides",
        }
    }

    pub fn all() -> [Table; 6] {
        [
            Self::Applications,
            Self::Modules,
            Self::Functions,
            Self::Parameters,
            Self::Examples,
            Self::Guides,
        ]
    }
}
