use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use taskboard_core::{ServiceError, now_utc};
use taskboard_sql::{Row, SqlStore, Value};

use crate::model::{DATE_FORMAT, NewTask, Task, TaskFilter, TaskSort};

/// SQL schema for the tasks table. One column per Task field.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT,
    due_date    TEXT,
    completed   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
";

const COLUMNS: &str = "id, title, description, due_date, completed, created_at";

/// Persistent storage for tasks, backed by SqlStore (SQLite).
///
/// The controller never touches SQL directly; every route goes through
/// this interface. Validation lives here so no caller can bypass it.
/// Each mutating call is a single statement, committed atomically by
/// SQLite before the method returns.
pub struct TaskStore {
    db: Arc<dyn SqlStore>,
}

impl TaskStore {
    /// Create a new TaskStore and initialise the schema.
    pub fn new(db: Arc<dyn SqlStore>) -> Result<Self, ServiceError> {
        db.exec_batch(SCHEMA)
            .map_err(|e| ServiceError::Storage(format!("tasks schema init: {e}")))?;
        Ok(Self { db })
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a new task and return the full record with its assigned id.
    pub fn create(&self, new: &NewTask) -> Result<Task, ServiceError> {
        new.validate()?;
        let created_at = now_utc();

        let id = self
            .db
            .insert(
                "INSERT INTO tasks (title, description, due_date, completed, created_at) \
                 VALUES (?1, ?2, ?3, 0, ?4)",
                &[
                    Value::Text(new.title.clone()),
                    opt_text(new.description.as_deref()),
                    opt_date(new.due_date),
                    Value::Text(created_at.to_rfc3339()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(Task {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            due_date: new.due_date,
            completed: false,
            created_at,
        })
    }

    /// Get a task by id.
    pub fn get(&self, id: i64) -> Result<Task, ServiceError> {
        let rows = self
            .db
            .query(
                &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
                &[Value::Integer(id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("task {id} not found")))?;

        row_to_task(row)
    }

    /// Overwrite title, description and due date of an existing task.
    /// `completed` and `created_at` are untouched.
    pub fn update(&self, id: i64, new: &NewTask) -> Result<Task, ServiceError> {
        new.validate()?;

        let affected = self
            .db
            .exec(
                "UPDATE tasks SET title = ?1, description = ?2, due_date = ?3 WHERE id = ?4",
                &[
                    Value::Text(new.title.clone()),
                    opt_text(new.description.as_deref()),
                    opt_date(new.due_date),
                    Value::Integer(id),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("task {id} not found")));
        }
        self.get(id)
    }

    /// Flip the completed flag. A single atomic UPDATE, so a concurrent
    /// double-submit simply flips twice.
    pub fn toggle(&self, id: i64) -> Result<Task, ServiceError> {
        let affected = self
            .db
            .exec(
                "UPDATE tasks SET completed = 1 - completed WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("task {id} not found")));
        }
        self.get(id)
    }

    /// Delete a task by id. Deleting an already-absent id is NotFound.
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let affected = self
            .db
            .exec("DELETE FROM tasks WHERE id = ?1", &[Value::Integer(id)])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("task {id} not found")));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // List
    // -----------------------------------------------------------------------

    /// List tasks, filtered by completion state and sorted ascending.
    /// Materialized fresh on every call.
    pub fn list(&self, filter: TaskFilter, sort: TaskSort) -> Result<Vec<Task>, ServiceError> {
        let where_sql = match filter {
            TaskFilter::All => "",
            TaskFilter::Pending => "WHERE completed = 0",
            TaskFilter::Completed => "WHERE completed = 1",
        };
        // due_date IS NULL sorts tasks without a due date last.
        let order_sql = match sort {
            TaskSort::Date => "ORDER BY due_date IS NULL, due_date",
            TaskSort::Title => "ORDER BY title",
            TaskSort::Created => "ORDER BY created_at",
        };

        let rows = self
            .db
            .query(
                &format!("SELECT {COLUMNS} FROM tasks {where_sql} {order_sql}"),
                &[],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        rows.iter().map(row_to_task).collect()
    }
}

fn opt_text(s: Option<&str>) -> Value {
    match s {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}

fn opt_date(d: Option<NaiveDate>) -> Value {
    match d {
        Some(d) => Value::Text(d.format(DATE_FORMAT).to_string()),
        None => Value::Null,
    }
}

/// Decode a Task from its row. A malformed stored value is a Storage
/// error: it means the table was written by something else.
fn row_to_task(row: &Row) -> Result<Task, ServiceError> {
    let id = row
        .get_i64("id")
        .ok_or_else(|| ServiceError::Storage("missing id column".into()))?;
    let title = row
        .get_str("title")
        .ok_or_else(|| ServiceError::Storage("missing title column".into()))?
        .to_string();
    let description = row.get_str("description").map(str::to_string);
    let due_date = match row.get_str("due_date") {
        Some(s) => Some(
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map_err(|e| ServiceError::Storage(format!("bad due_date '{s}': {e}")))?,
        ),
        None => None,
    };
    let completed = row
        .get_bool("completed")
        .ok_or_else(|| ServiceError::Storage("missing completed column".into()))?;
    let created_at = row
        .get_str("created_at")
        .ok_or_else(|| ServiceError::Storage("missing created_at column".into()))?;
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| ServiceError::Storage(format!("bad created_at '{created_at}': {e}")))?
        .with_timezone(&Utc);

    Ok(Task {
        id,
        title,
        description,
        due_date,
        completed,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_sql::SqliteStore;

    fn test_store() -> TaskStore {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        TaskStore::new(db).unwrap()
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: None,
            due_date: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_and_get_roundtrip() {
        let store = test_store();
        let created = store
            .create(&NewTask {
                title: "Buy milk".into(),
                description: Some("2%".into()),
                due_date: Some(date(2024, 1, 1)),
            })
            .unwrap();

        assert_eq!(created.id, 1);
        assert!(!created.completed);
        assert_eq!(store.get(created.id).unwrap(), created);
    }

    #[test]
    fn create_empty_title_stores_nothing() {
        let store = test_store();
        let err = store.create(&new_task("")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = store.create(&new_task("   ")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert!(store.list(TaskFilter::All, TaskSort::Created).unwrap().is_empty());
    }

    #[test]
    fn create_overlong_title_rejected() {
        let store = test_store();
        let err = store.create(&new_task(&"x".repeat(101))).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn toggle_is_own_inverse() {
        let store = test_store();
        let task = store.create(&new_task("t")).unwrap();

        let toggled = store.toggle(task.id).unwrap();
        assert!(toggled.completed);

        let back = store.toggle(task.id).unwrap();
        assert!(!back.completed);
        assert_eq!(back, task);
    }

    #[test]
    fn update_overwrites_fields_only() {
        let store = test_store();
        let task = store.create(&new_task("before")).unwrap();
        store.toggle(task.id).unwrap();

        let updated = store
            .update(
                task.id,
                &NewTask {
                    title: "after".into(),
                    description: Some("note".into()),
                    due_date: Some(date(2025, 6, 1)),
                },
            )
            .unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.description.as_deref(), Some("note"));
        assert_eq!(updated.due_date, Some(date(2025, 6, 1)));
        // completed and created_at survive the edit
        assert!(updated.completed);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn update_validation_and_missing() {
        let store = test_store();
        let task = store.create(&new_task("t")).unwrap();

        let err = store.update(task.id, &new_task("")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(store.get(task.id).unwrap().title, "t");

        let err = store.update(999, &new_task("ok")).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let store = test_store();
        let task = store.create(&new_task("t")).unwrap();

        store.delete(task.id).unwrap();
        assert!(matches!(store.get(task.id), Err(ServiceError::NotFound(_))));
        // repeated delete of an absent id also surfaces NotFound
        assert!(matches!(store.delete(task.id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn toggle_missing_is_not_found() {
        let store = test_store();
        assert!(matches!(store.toggle(42), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn filter_partitions_are_disjoint_and_exhaustive() {
        let store = test_store();
        for title in ["a", "b", "c", "d"] {
            store.create(&new_task(title)).unwrap();
        }
        store.toggle(2).unwrap();
        store.toggle(4).unwrap();

        let all = store.list(TaskFilter::All, TaskSort::Created).unwrap();
        let pending = store.list(TaskFilter::Pending, TaskSort::Created).unwrap();
        let completed = store.list(TaskFilter::Completed, TaskSort::Created).unwrap();

        assert_eq!(all.len(), 4);
        assert!(pending.iter().all(|t| !t.completed));
        assert!(completed.iter().all(|t| t.completed));
        assert_eq!(pending.len() + completed.len(), all.len());

        let mut ids: Vec<i64> = pending.iter().chain(&completed).map(|t| t.id).collect();
        ids.sort();
        assert_eq!(ids, all.iter().map(|t| t.id).collect::<Vec<_>>());
    }

    #[test]
    fn sort_by_title_and_date() {
        let store = test_store();
        store
            .create(&NewTask {
                title: "banana".into(),
                description: None,
                due_date: Some(date(2024, 5, 1)),
            })
            .unwrap();
        store
            .create(&NewTask {
                title: "apple".into(),
                description: None,
                due_date: None,
            })
            .unwrap();
        store
            .create(&NewTask {
                title: "cherry".into(),
                description: None,
                due_date: Some(date(2024, 1, 1)),
            })
            .unwrap();

        let by_title = store.list(TaskFilter::All, TaskSort::Title).unwrap();
        let titles: Vec<&str> = by_title.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["apple", "banana", "cherry"]);

        // by date: earliest first, no due date last
        let by_date = store.list(TaskFilter::All, TaskSort::Date).unwrap();
        let titles: Vec<&str> = by_date.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["cherry", "banana", "apple"]);

        let by_created = store.list(TaskFilter::All, TaskSort::Created).unwrap();
        let titles: Vec<&str> = by_created.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["banana", "apple", "cherry"]);
    }

    #[test]
    fn buy_milk_scenario() {
        let store = test_store();

        let task = store
            .create(&NewTask {
                title: "Buy milk".into(),
                description: Some("2%".into()),
                due_date: Some(date(2024, 1, 1)),
            })
            .unwrap();
        assert_eq!(task.id, 1);
        assert!(!task.completed);

        let toggled = store.toggle(1).unwrap();
        assert!(toggled.completed);

        let completed = store.list(TaskFilter::Completed, TaskSort::Created).unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, 1);

        store.delete(1).unwrap();
        assert!(matches!(store.get(1), Err(ServiceError::NotFound(_))));
    }
}
