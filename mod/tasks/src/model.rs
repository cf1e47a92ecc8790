use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use taskboard_core::ServiceError;

/// Date format used by forms and the due_date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Task — the core data model, maps 1:1 to SQL columns
// ---------------------------------------------------------------------------

/// A single to-do item.
///
/// All fields map directly to columns of the `tasks` table. `id` is the
/// SQLite rowid, assigned on insert and stable for the record's lifetime.
/// `created_at` is set once at creation and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,

    pub title: String,

    /// Optional free-form description. Empty form input becomes None.
    pub description: Option<String>,

    /// Serialized as `"YYYY-MM-DD"`, null when absent.
    pub due_date: Option<NaiveDate>,

    pub completed: bool,

    /// Serialized as RFC 3339.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// NewTask — validated input for create/update
// ---------------------------------------------------------------------------

/// User-supplied task fields, before the store assigns identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    /// Check the title constraint: required, non-empty, bounded length.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.title.trim().is_empty() {
            return Err(ServiceError::Validation("Title is required.".into()));
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err(ServiceError::Validation(format!(
                "Title must be at most {TITLE_MAX_CHARS} characters."
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TaskFilter / TaskSort — list query enums
// ---------------------------------------------------------------------------

/// Completion filter for the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Parse a query-string value. Unrecognized values fall back to All.
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }
}

/// Sort order for the list view. Always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSort {
    /// By due date, tasks without one last.
    Date,
    /// Lexicographic by title.
    Title,
    /// By creation time.
    #[default]
    Created,
}

impl TaskSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Created => "created",
        }
    }

    /// Parse a query-string value. Unrecognized values fall back to Created.
    pub fn parse(s: &str) -> Self {
        match s {
            "date" => Self::Date,
            "title" => Self::Title,
            _ => Self::Created,
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: Option<String>,

    #[serde(default)]
    pub sort: Option<String>,

    /// Flash code carried over a redirect (e.g. `created`).
    #[serde(default)]
    pub notice: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> TaskFilter {
        TaskFilter::parse(self.filter.as_deref().unwrap_or(""))
    }

    pub fn sort(&self) -> TaskSort {
        TaskSort::parse(self.sort.as_deref().unwrap_or(""))
    }
}

/// Query parameters for pages that only carry a flash code.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    #[serde(default)]
    pub notice: Option<String>,
}

/// Body of the create/edit HTML forms.
///
/// All fields arrive as strings; `to_new_task` does the interpretation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// ISO `YYYY-MM-DD`, or empty.
    #[serde(default)]
    pub due_date: String,
}

impl TaskForm {
    /// Interpret the raw form input.
    ///
    /// Title is trimmed. An empty description becomes None. An absent or
    /// unparsable due date becomes None rather than an error.
    pub fn to_new_task(&self) -> NewTask {
        let description = match self.description.trim() {
            "" => None,
            s => Some(s.to_string()),
        };
        let due_date = NaiveDate::parse_from_str(self.due_date.trim(), DATE_FORMAT).ok();
        NewTask {
            title: self.title.trim().to_string(),
            description,
            due_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
