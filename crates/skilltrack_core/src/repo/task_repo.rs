//! Task repository contracts and SQLite implementation.

use crate::model::task::{Task, TaskDraft, TaskId};
use crate::model::RecordKind;
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_uuid, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    created_at
FROM tasks";

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, draft: &TaskDraft) -> RepoResult<Task>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> RepoResult<Task>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, draft: &TaskDraft) -> RepoResult<Task> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO tasks (id, title, description, completed)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                draft.title.as_str(),
                draft.description.as_str(),
                bool_to_int(draft.completed),
            ],
        )?;
        self.get_task(id)?.ok_or(RepoError::NotFound {
            kind: RecordKind::Task,
            id,
        })
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn update_task(&self, id: TaskId, draft: &TaskDraft) -> RepoResult<Task> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?2,
                description = ?3,
                completed = ?4
             WHERE id = ?1;",
            params![
                id.to_string(),
                draft.title.as_str(),
                draft.description.as_str(),
                bool_to_int(draft.completed),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Task,
                id,
            });
        }
        self.get_task(id)?.ok_or(RepoError::NotFound {
            kind: RecordKind::Task,
            id,
        })
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Task,
                id,
            });
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    Ok(Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: parse_bool(row.get("completed")?, "tasks.completed")?,
        created_at: row.get("created_at")?,
    })
}
