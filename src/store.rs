//! Task persistence.
//!
//! [`TaskRepository`] is the narrow surface the board talks to. [`SqliteStore`]
//! backs it with a single SQLite file: every call opens its own connection,
//! runs one autocommitted statement and drops the connection on return, so no
//! handle outlives the operation that acquired it.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::Result;
use crate::task::{Task, TaskId, TaskStatus};

const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task TEXT NOT NULL,
    status TEXT NOT NULL
)";
const INSERT_TASK: &str = "INSERT INTO tasks (task, status) VALUES (?1, ?2)";
const SELECT_BY_STATUS: &str = "SELECT id, task FROM tasks WHERE status = ?1 ORDER BY id ASC";
const COMPLETE_TASK: &str = "UPDATE tasks SET status = ?1 WHERE id = ?2";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const DELETE_BY_STATUS: &str = "DELETE FROM tasks WHERE status = ?1";

/// CRUD operations over persisted tasks.
///
/// Mutations that target a missing id or an empty bucket are no-ops and report
/// zero affected rows rather than failing.
pub trait TaskRepository {
    /// Creates the backing table if needed. Safe to call on every startup.
    fn initialize(&self) -> Result<()>;

    /// Inserts a task and returns its assigned id. Does not validate `text`.
    fn add_task(&self, text: &str, status: TaskStatus) -> Result<TaskId>;

    /// All tasks in `status`, oldest first.
    fn get_tasks(&self, status: TaskStatus) -> Result<Vec<Task>>;

    fn complete_task(&self, id: TaskId) -> Result<usize>;

    fn delete_task(&self, id: TaskId) -> Result<usize>;

    fn delete_all_by_status(&self, status: TaskStatus) -> Result<usize>;
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }
}

impl TaskRepository for SqliteStore {
    fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = self.connect()?;
        conn.execute(SCHEMA_TASKS, [])?;
        debug!(path = %self.path.display(), "task table ready");
        Ok(())
    }

    fn add_task(&self, text: &str, status: TaskStatus) -> Result<TaskId> {
        let conn = self.connect()?;
        conn.execute(INSERT_TASK, params![text, status])?;
        let id = conn.last_insert_rowid();
        debug!(id, %status, "inserted task");
        Ok(id)
    }

    fn get_tasks(&self, status: TaskStatus) -> Result<Vec<Task>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_BY_STATUS)?;
        let rows = stmt.query_map(params![status], |row| {
            Ok(Task {
                id: row.get(0)?,
                text: row.get(1)?,
                status,
            })
        })?;

        let mut tasks = Vec::new();
        for task in rows {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    fn complete_task(&self, id: TaskId) -> Result<usize> {
        let conn = self.connect()?;
        let affected = conn.execute(COMPLETE_TASK, params![TaskStatus::Done, id])?;
        debug!(id, affected, "completed task");
        Ok(affected)
    }

    fn delete_task(&self, id: TaskId) -> Result<usize> {
        let conn = self.connect()?;
        let affected = conn.execute(DELETE_TASK, params![id])?;
        debug!(id, affected, "deleted task");
        Ok(affected)
    }

    fn delete_all_by_status(&self, status: TaskStatus) -> Result<usize> {
        let conn = self.connect()?;
        let affected = conn.execute(DELETE_BY_STATUS, params![status])?;
        debug!(%status, affected, "cleared bucket");
        Ok(affected)
    }
}
