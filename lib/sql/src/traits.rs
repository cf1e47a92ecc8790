use crate::error::SqlError;

/// A dynamically-typed SQL parameter or column value.
///
/// Only the types the schema actually uses: NULL, INTEGER, TEXT.
/// Booleans are stored as INTEGER 0/1, dates as ISO text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

/// A row returned from a SQL query — column name to value.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    /// Get a column value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get a text column value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get an integer column value by name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Get an INTEGER 0/1 column as a bool.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get_i64(name).map(|i| i != 0)
    }
}

/// SqlStore provides a SQL execution interface backed by an embedded
/// database. Handed around as `Arc<dyn SqlStore>` — never a global.
pub trait SqlStore: Send + Sync {
    /// Execute a query and return rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SqlError>;

    /// Execute a statement (UPDATE/DELETE) and return the affected row count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SqlError>;

    /// Execute an INSERT and return the assigned rowid.
    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SqlError>;

    /// Execute several statements at once (schema initialisation).
    fn exec_batch(&self, sql: &str) -> Result<(), SqlError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        Row {
            columns: vec![
                ("id".to_string(), Value::Integer(3)),
                ("title".to_string(), Value::Text("hello".to_string())),
                ("completed".to_string(), Value::Integer(1)),
                ("due_date".to_string(), Value::Null),
            ],
        }
    }

    #[test]
    fn row_accessors() {
        let row = sample_row();
        assert_eq!(row.get_i64("id"), Some(3));
        assert_eq!(row.get_str("title"), Some("hello"));
        assert_eq!(row.get_bool("completed"), Some(true));
        assert_eq!(row.get("due_date"), Some(&Value::Null));
        assert_eq!(row.get_str("due_date"), None);
        assert_eq!(row.get_i64("missing"), None);
    }
}
