//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{
    ApplicationRecord, ExampleRecord, FunctionRecord, GuideRecord, ModuleRecord, NewApplication,
    NewExample, NewFunction, NewGuide, NewModule, NewParameter, ParameterRecord, RunRecord, Table,
};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Missing required field {field} for {entity}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("No unit of work is open")]
    NoOpenUnit,

    #[error("A unit of work is already open")]
    UnitAlreadyOpen,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Every insert takes its parent identifier explicitly and returns the
/// generated identifier of the new row, so children are always written after
/// their parent and never read a parent id from shared state.
pub trait Storage {
    // ===== Units of Work =====

    /// Opens a unit of work; inserts until the matching commit or rollback
    /// become visible together or not at all
    fn begin_unit(&mut self) -> StorageResult<()>;

    /// Makes every insert since `begin_unit` durable
    fn commit_unit(&mut self) -> StorageResult<()>;

    /// Discards every insert since `begin_unit`
    fn rollback_unit(&mut self) -> StorageResult<()>;

    // ===== Run Ledger =====

    /// Creates a new crawl run in the running state
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, seed_url: &str, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as done with its visited page count
    fn finish_run(&mut self, run_id: i64, pages_visited: u64) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Inserts =====

    /// Inserts an application and returns its ID
    fn insert_application(&mut self, application: &NewApplication) -> StorageResult<i64>;

    /// Inserts a module owned by `application_id` and returns its ID
    fn insert_module(&mut self, application_id: i64, module: &NewModule) -> StorageResult<i64>;

    /// Inserts a function owned by `module_id` and returns its ID
    fn insert_function(&mut self, module_id: i64, function: &NewFunction) -> StorageResult<i64>;

    /// Inserts a parameter owned by `function_id` and returns its ID
    fn insert_parameter(
        &mut self,
        function_id: i64,
        parameter: &NewParameter,
    ) -> StorageResult<i64>;

    /// Inserts an example owned by `function_id` and returns its ID
    fn insert_example(&mut self, function_id: i64, example: &NewExample) -> StorageResult<i64>;

    /// Inserts a guide owned by `application_id` and returns its ID
    fn insert_guide(&mut self, application_id: i64, guide: &NewGuide) -> StorageResult<i64>;

    /// Records the crawl scope an application was harvested from
    fn record_application_scope(&mut self, application_id: i64, scope: &str)
        -> StorageResult<()>;

    // ===== Lookups =====

    /// Finds the oldest application with this name and version harvested
    /// from `scope`
    fn find_application(
        &self,
        name: &str,
        version: &str,
        scope: &str,
    ) -> StorageResult<Option<i64>>;

    /// Finds a module of `application_id` stored under `url`
    fn find_module_by_url(&self, application_id: i64, url: &str) -> StorageResult<Option<i64>>;

    /// Finds a guide of `application_id` stored under `url`
    fn find_guide_by_url(&self, application_id: i64, url: &str) -> StorageResult<Option<i64>>;

    // ===== Reads =====

    /// Lists all applications, oldest first
    fn list_applications(&self) -> StorageResult<Vec<ApplicationRecord>>;

    /// Gets an application by ID
    fn get_application(&self, application_id: i64) -> StorageResult<Option<ApplicationRecord>>;

    /// Lists the modules of an application
    fn list_modules(&self, application_id: i64) -> StorageResult<Vec<ModuleRecord>>;

    /// Gets a module by ID
    fn get_module(&self, module_id: i64) -> StorageResult<Option<ModuleRecord>>;

    /// Lists the functions of a module
    fn list_functions(&self, module_id: i64) -> StorageResult<Vec<FunctionRecord>>;

    /// Lists the parameters of a function
    fn list_parameters(&self, function_id: i64) -> StorageResult<Vec<ParameterRecord>>;

    /// Lists the examples of a function
    fn list_examples(&self, function_id: i64) -> StorageResult<Vec<ExampleRecord>>;

    /// Lists the guides of an application
    fn list_guides(&self, application_id: i64) -> StorageResult<Vec<GuideRecord>>;

    // ===== Statistics =====

    /// Counts the rows of an entity table
    fn count_rows(&self, table: Table) -> StorageResult<u64>;
}
