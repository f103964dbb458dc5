//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::CrawlState;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{
    ApplicationRecord, ExampleRecord, FunctionRecord, GuideRecord, ModuleRecord, NewApplication,
    NewExample, NewFunction, NewGuide, NewModule, NewParameter, ParameterRecord, RunRecord, Table,
};
use crate::HexdexError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const UNIT_SAVEPOINT: &str = "hexdex_unit";

/// SQLite storage backend
///
/// One instance wraps one connection; a crawl run owns its storage for the
/// whole run, so concurrent runs never share a connection or an open unit.
pub struct SqliteStorage {
    conn: Connection,
    unit_open: bool,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HexdexError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HexdexError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            unit_open: false,
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, HexdexError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            unit_open: false,
        })
    }
}

/// Rejects an insert whose required text field is blank
fn require(entity: &'static str, field: &'static str, value: &str) -> StorageResult<()> {
    if value.trim().is_empty() {
        return Err(StorageError::MissingField { entity, field });
    }
    Ok(())
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        seed_url: row.get(1)?,
        config_hash: row.get(2)?,
        started_at: row.get(3)?,
        finished_at: row.get(4)?,
        status: CrawlState::from_db_string(&row.get::<_, String>(5)?)
            .unwrap_or(CrawlState::Running),
        pages_visited: row.get::<_, i64>(6)? as u64,
    })
}

fn application_from_row(row: &Row<'_>) -> rusqlite::Result<ApplicationRecord> {
    Ok(ApplicationRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        version: row.get(2)?,
        description: row.get(3)?,
    })
}

fn module_from_row(row: &Row<'_>) -> rusqlite::Result<ModuleRecord> {
    Ok(ModuleRecord {
        id: row.get(0)?,
        application_id: row.get(1)?,
        name: row.get(2)?,
        url: row.get(3)?,
        description: row.get(4)?,
    })
}

const RUN_COLUMNS: &str =
    "id, seed_url, config_hash, started_at, finished_at, status, pages_visited";

impl Storage for SqliteStorage {
    // ===== Units of Work =====

    fn begin_unit(&mut self) -> StorageResult<()> {
        if self.unit_open {
            return Err(StorageError::UnitAlreadyOpen);
        }
        self.conn
            .execute_batch(&format!("SAVEPOINT {}", UNIT_SAVEPOINT))?;
        self.unit_open = true;
        Ok(())
    }

    fn commit_unit(&mut self) -> StorageResult<()> {
        if !self.unit_open {
            return Err(StorageError::NoOpenUnit);
        }
        self.conn
            .execute_batch(&format!("RELEASE {}", UNIT_SAVEPOINT))?;
        self.unit_open = false;
        Ok(())
    }

    fn rollback_unit(&mut self) -> StorageResult<()> {
        if !self.unit_open {
            return Err(StorageError::NoOpenUnit);
        }
        self.conn.execute_batch(&format!(
            "ROLLBACK TO {0}; RELEASE {0}",
            UNIT_SAVEPOINT
        ))?;
        self.unit_open = false;
        Ok(())
    }

    // ===== Run Ledger =====

    fn create_run(&mut self, seed_url: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (seed_url, config_hash, started_at, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                seed_url,
                config_hash,
                now,
                CrawlState::Running.to_db_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(&mut self, run_id: i64, pages_visited: u64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages_visited = ?3 WHERE id = ?4",
            params![
                CrawlState::Done.to_db_string(),
                now,
                pages_visited as i64,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    // ===== Inserts =====

    fn insert_application(&mut self, application: &NewApplication) -> StorageResult<i64> {
        require("application", "name", &application.name)?;
        require("application", "version", &application.version)?;

        self.conn.execute(
            "INSERT INTO applications (name, version, description) VALUES (?1, ?2, ?3)",
            params![
                application.name,
                application.version,
                application.description
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_module(&mut self, application_id: i64, module: &NewModule) -> StorageResult<i64> {
        require("module", "name", &module.name)?;
        require("module", "url", &module.url)?;

        self.conn.execute(
            "INSERT INTO modules (application_id, name, url, description) VALUES (?1, ?2, ?3, ?4)",
            params![application_id, module.name, module.url, module.description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_function(&mut self, module_id: i64, function: &NewFunction) -> StorageResult<i64> {
        require("function", "name", &function.name)?;

        self.conn.execute(
            "INSERT INTO functions (module_id, name, arity, return_type, summary, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                module_id,
                function.name,
                function.arity,
                function.return_type,
                function.summary,
                function.description
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_parameter(
        &mut self,
        function_id: i64,
        parameter: &NewParameter,
    ) -> StorageResult<i64> {
        require("parameter", "name", &parameter.name)?;

        self.conn.execute(
            "INSERT INTO parameters (function_id, name, type, default_value, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                function_id,
                parameter.name,
                parameter.param_type,
                parameter.default_value,
                parameter.description
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_example(&mut self, function_id: i64, example: &NewExample) -> StorageResult<i64> {
        require("example", "code", &example.code)?;

        self.conn.execute(
            "INSERT INTO examples (function_id, code, description) VALUES (?1, ?2, ?3)",
            params![function_id, example.code, example.description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_guide(&mut self, application_id: i64, guide: &NewGuide) -> StorageResult<i64> {
        require("guide", "title", &guide.title)?;
        require("guide", "url", &guide.url)?;

        self.conn.execute(
            "INSERT INTO guides (application_id, title, url, content) VALUES (?1, ?2, ?3, ?4)",
            params![application_id, guide.title, guide.url, guide.content],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn record_application_scope(
        &mut self,
        application_id: i64,
        scope: &str,
    ) -> StorageResult<()> {
        require("application scope", "scope", scope)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO application_scopes (application_id, scope) VALUES (?1, ?2)",
            params![application_id, scope],
        )?;
        Ok(())
    }

    // ===== Lookups =====

    fn find_application(
        &self,
        name: &str,
        version: &str,
        scope: &str,
    ) -> StorageResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT a.id FROM applications a
                 JOIN application_scopes s ON s.application_id = a.id
                 WHERE a.name = ?1 AND a.version = ?2 AND s.scope = ?3
                 ORDER BY a.id LIMIT 1",
                params![name, version, scope],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn find_module_by_url(&self, application_id: i64, url: &str) -> StorageResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM modules WHERE application_id = ?1 AND url = ?2 LIMIT 1",
                params![application_id, url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn find_guide_by_url(&self, application_id: i64, url: &str) -> StorageResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM guides WHERE application_id = ?1 AND url = ?2 LIMIT 1",
                params![application_id, url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    // ===== Reads =====

    fn list_applications(&self) -> StorageResult<Vec<ApplicationRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, version, description FROM applications ORDER BY id")?;

        let applications = stmt
            .query_map([], application_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(applications)
    }

    fn get_application(&self, application_id: i64) -> StorageResult<Option<ApplicationRecord>> {
        let application = self
            .conn
            .query_row(
                "SELECT id, name, version, description FROM applications WHERE id = ?1",
                params![application_id],
                application_from_row,
            )
            .optional()?;
        Ok(application)
    }

    fn list_modules(&self, application_id: i64) -> StorageResult<Vec<ModuleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, application_id, name, url, description FROM modules
             WHERE application_id = ?1 ORDER BY id",
        )?;

        let modules = stmt
            .query_map(params![application_id], module_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(modules)
    }

    fn get_module(&self, module_id: i64) -> StorageResult<Option<ModuleRecord>> {
        let module = self
            .conn
            .query_row(
                "SELECT id, application_id, name, url, description FROM modules WHERE id = ?1",
                params![module_id],
                module_from_row,
            )
            .optional()?;
        Ok(module)
    }

    fn list_functions(&self, module_id: i64) -> StorageResult<Vec<FunctionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, module_id, name, arity, return_type, summary, description
             FROM functions WHERE module_id = ?1 ORDER BY id",
        )?;

        let functions = stmt
            .query_map(params![module_id], |row| {
                Ok(FunctionRecord {
                    id: row.get(0)?,
                    module_id: row.get(1)?,
                    name: row.get(2)?,
                    arity: row.get(3)?,
                    return_type: row.get(4)?,
                    summary: row.get(5)?,
                    description: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(functions)
    }

    fn list_parameters(&self, function_id: i64) -> StorageResult<Vec<ParameterRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, function_id, name, type, default_value, description
             FROM parameters WHERE function_id = ?1 ORDER BY id",
        )?;

        let parameters = stmt
            .query_map(params![function_id], |row| {
                Ok(ParameterRecord {
                    id: row.get(0)?,
                    function_id: row.get(1)?,
                    name: row.get(2)?,
                    param_type: row.get(3)?,
                    default_value: row.get(4)?,
                    description: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(parameters)
    }

    fn list_examples(&self, function_id: i64) -> StorageResult<Vec<ExampleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, function_id, code, description FROM examples
             WHERE function_id = ?1 ORDER BY id",
        )?;

        let examples = stmt
            .query_map(params![function_id], |row| {
                Ok(ExampleRecord {
                    id: row.get(0)?,
                    function_id: row.get(1)?,
                    code: row.get(2)?,
                    description: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(examples)
    }

    fn list_guides(&self, application_id: i64) -> StorageResult<Vec<GuideRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, application_id, title, url, content FROM guides
             WHERE application_id = ?1 ORDER BY id",
        )?;

        let guides = stmt
            .query_map(params![application_id], |row| {
                Ok(GuideRecord {
                    id: row.get(0)?,
                    application_id: row.get(1)?,
                    title: row.get(2)?,
                    url: row.get(3)?,
                    content: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(guides)
    }

    // ===== Statistics =====

    fn count_rows(&self, table: Table) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
