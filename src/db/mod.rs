use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::path::Path;
use thiserror::Error;

use crate::models::{Credentials, Task, User};

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("username already taken: {0}")]
    UsernameTaken(String),
    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl DbError {
    fn query(context: &'static str) -> impl FnOnce(rusqlite::Error) -> DbError {
        move |source| DbError::Query { context, source }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: path.display().to_string(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(DbError::query("failed to set pragmas"))?;

        Ok(Database { conn })
    }

    /// Open a private in-memory database. Contents vanish on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        Ok(Database { conn })
    }

    /// Create the `tasks` and `users` tables if they do not exist yet.
    pub fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS tasks (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                title     TEXT NOT NULL CHECK (title <> ''),
                completed INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS users (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            );
            ",
            )
            .map_err(DbError::query("migration failed"))
    }

    // -- Tasks --

    pub fn insert_task(&self, title: &str) -> Result<Task> {
        self.conn
            .execute("INSERT INTO tasks (title) VALUES (?1)", params![title])
            .map_err(DbError::query("failed to insert task"))?;

        Ok(Task {
            id: self.conn.last_insert_rowid(),
            title: title.to_string(),
            completed: false,
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.conn
            .query_row(
                "SELECT id, title, completed FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()
            .map_err(DbError::query("query error"))
    }

    /// All tasks in insertion order.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, completed FROM tasks ORDER BY id ASC")
            .map_err(DbError::query("query error"))?;

        let rows = stmt
            .query_map([], row_to_task)
            .map_err(DbError::query("query error"))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(DbError::query("row error"))?);
        }
        Ok(tasks)
    }

    pub fn task_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .map_err(DbError::query("query error"))
    }

    /// Mark a task completed. Returns `false` if no task has that id.
    pub fn complete_task(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("UPDATE tasks SET completed = 1 WHERE id = ?1", params![id])
            .map_err(DbError::query("update failed"))?;
        Ok(changed > 0)
    }

    /// Delete a task. Returns `false` if no task has that id.
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(DbError::query("delete failed"))?;
        Ok(changed > 0)
    }

    // -- Users --

    /// Insert a new user. Uniqueness of the username is left to the UNIQUE
    /// constraint so concurrent registrations cannot both succeed.
    pub fn insert_user(&self, creds: &Credentials) -> Result<User> {
        let inserted = self.conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![creds.username, creds.password],
        );

        match inserted {
            Ok(_) => Ok(User {
                id: self.conn.last_insert_rowid(),
                username: creds.username.clone(),
                password: creds.password.clone(),
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(DbError::UsernameTaken(creds.username.clone()))
            }
            Err(e) => Err(DbError::query("failed to insert user")(e)),
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, password FROM users WHERE username = ?1",
                params![username],
                row_to_user,
            )
            .optional()
            .map_err(DbError::query("query error"))
    }

    /// Find the user whose username and password both match exactly.
    pub fn verify_credentials(&self, creds: &Credentials) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, password FROM users WHERE username = ?1 AND password = ?2",
                params![creds.username, creds.password],
                row_to_user,
            )
            .optional()
            .map_err(DbError::query("query error"))
    }
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
    })
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}
