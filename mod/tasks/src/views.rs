//! View descriptors and their HTML rendering.
//!
//! The controller's only output is a descriptor (ListView, FormView,
//! DetailView, ErrorView). Rendering is presentation-only: tests assert
//! on descriptors and status codes, not on markup.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

use crate::model::{DATE_FORMAT, Task, TaskFilter, TaskForm, TaskSort};

// ---------------------------------------------------------------------------
// Flash
// ---------------------------------------------------------------------------

/// Flash severity, mirrored into a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Danger => "danger",
        }
    }
}

/// A one-shot user-visible message, carried as an explicit field on the
/// view descriptor. Redirects pass a `notice` code in the query string;
/// the next page resolves it here. No session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flash {
    pub message: String,
    pub severity: Severity,
}

impl Flash {
    /// Resolve a redirect notice code. Unknown codes are ignored.
    pub fn from_notice(code: &str) -> Option<Flash> {
        let (message, severity) = match code {
            "created" => ("Task created.", Severity::Success),
            "updated" => ("Task updated.", Severity::Success),
            "deleted" => ("Task deleted.", Severity::Success),
            "toggled" => ("Task status updated.", Severity::Info),
            _ => return None,
        };
        Some(Flash {
            message: message.to_string(),
            severity,
        })
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Data for the task list page.
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub sort: TaskSort,
    pub total: usize,
    pub pending_count: usize,
    pub completed_count: usize,
    pub flash: Option<Flash>,
}

impl ListView {
    /// Partition the listed sequence into counts. The counts reflect
    /// exactly what the store returned for the active filter.
    pub fn new(
        tasks: Vec<Task>,
        filter: TaskFilter,
        sort: TaskSort,
        flash: Option<Flash>,
    ) -> Self {
        let total = tasks.len();
        let completed_count = tasks.iter().filter(|t| t.completed).count();
        Self {
            tasks,
            filter,
            sort,
            total,
            pending_count: total - completed_count,
            completed_count,
            flash,
        }
    }
}

/// Data for the create/edit form page. Submitted values are echoed back
/// verbatim on a validation failure so the user's input is not lost.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub heading: &'static str,
    /// Form POST target.
    pub action: String,
    pub title: String,
    pub description: String,
    /// ISO `YYYY-MM-DD`, or empty.
    pub due_date: String,
    pub error: Option<String>,
}

impl FormView {
    /// Empty form for `GET /tasks/new`.
    pub fn blank() -> Self {
        Self {
            heading: "New Task",
            action: "/tasks/new".to_string(),
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            error: None,
        }
    }

    /// Pre-filled form for `GET /tasks/{id}/edit`.
    pub fn for_task(task: &Task) -> Self {
        Self {
            heading: "Edit Task",
            action: format!("/tasks/{}/edit", task.id),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            error: None,
        }
    }

    /// Re-render after a validation failure, echoing the submitted form.
    pub fn retry(heading: &'static str, action: String, form: &TaskForm, error: String) -> Self {
        Self {
            heading,
            action,
            title: form.title.clone(),
            description: form.description.clone(),
            due_date: form.due_date.clone(),
            error: Some(error),
        }
    }
}

/// Data for the task detail page.
#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub task: Task,
    pub flash: Option<Flash>,
}

/// A dedicated error page (404 / 500).
#[derive(Debug, Clone)]
pub struct ErrorView {
    pub status: StatusCode,
    pub heading: &'static str,
    pub message: String,
}

impl ErrorView {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            heading: "Page Not Found",
            message: message.into(),
        }
    }

    /// Generic 500 page. The real error goes to the log, not the user.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            heading: "Internal Server Error",
            message: "Something went wrong. Please try again.".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Minimal HTML escaping for text interpolated into markup.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} | Taskboard</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    ))
}

fn flash_html(flash: &Option<Flash>) -> String {
    match flash {
        Some(f) => format!(
            "<p class=\"flash flash-{}\">{}</p>\n",
            f.severity.as_str(),
            escape(&f.message)
        ),
        None => String::new(),
    }
}

fn due_date_html(task: &Task) -> String {
    task.due_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "no due date".to_string())
}

impl IntoResponse for ListView {
    fn into_response(self) -> Response {
        let mut body = String::new();
        body.push_str("<h1>Tasks</h1>\n");
        body.push_str(&flash_html(&self.flash));
        body.push_str(&format!(
            "<p>{} tasks, {} pending, {} completed</p>\n",
            self.total, self.pending_count, self.completed_count
        ));

        body.push_str("<nav>\nFilter:\n");
        for filter in [TaskFilter::All, TaskFilter::Pending, TaskFilter::Completed] {
            let marker = if filter == self.filter { " (current)" } else { "" };
            body.push_str(&format!(
                "<a href=\"/tasks?filter={f}&amp;sort={s}\">{f}</a>{marker}\n",
                f = filter.as_str(),
                s = self.sort.as_str(),
            ));
        }
        body.push_str("| Sort:\n");
        for sort in [TaskSort::Created, TaskSort::Date, TaskSort::Title] {
            let marker = if sort == self.sort { " (current)" } else { "" };
            body.push_str(&format!(
                "<a href=\"/tasks?filter={f}&amp;sort={s}\">{s}</a>{marker}\n",
                f = self.filter.as_str(),
                s = sort.as_str(),
            ));
        }
        body.push_str("</nav>\n");

        body.push_str("<ul class=\"tasks\">\n");
        for task in &self.tasks {
            let state = if task.completed { "completed" } else { "pending" };
            body.push_str(&format!(
                "<li class=\"task task-{state}\">\n\
                 <a href=\"/tasks/{id}\">{title}</a> [{state}] ({due})\n\
                 <form method=\"post\" action=\"/tasks/{id}/toggle\"><button>Toggle</button></form>\n\
                 <a href=\"/tasks/{id}/edit\">Edit</a>\n\
                 <form method=\"post\" action=\"/tasks/{id}/delete\"><button>Delete</button></form>\n\
                 </li>\n",
                id = task.id,
                title = escape(&task.title),
                due = due_date_html(task),
            ));
        }
        body.push_str("</ul>\n<p><a href=\"/tasks/new\">New Task</a></p>\n");

        page("Tasks", &body).into_response()
    }
}

impl IntoResponse for FormView {
    fn into_response(self) -> Response {
        let mut body = format!("<h1>{}</h1>\n", self.heading);
        if let Some(error) = &self.error {
            body.push_str(&format!(
                "<p class=\"flash flash-danger\">{}</p>\n",
                escape(error)
            ));
        }
        body.push_str(&format!(
            "<form method=\"post\" action=\"{action}\">\n\
             <label>Title <input name=\"title\" value=\"{title}\" maxlength=\"100\"></label>\n\
             <label>Description <textarea name=\"description\">{description}</textarea></label>\n\
             <label>Due date <input name=\"due_date\" type=\"date\" value=\"{due}\"></label>\n\
             <button type=\"submit\">Save</button>\n\
             </form>\n\
             <p><a href=\"/tasks\">Back to list</a></p>\n",
            action = escape(&self.action),
            title = escape(&self.title),
            description = escape(&self.description),
            due = escape(&self.due_date),
        ));

        page(self.heading, &body).into_response()
    }
}

impl IntoResponse for DetailView {
    fn into_response(self) -> Response {
        let task = &self.task;
        let state = if task.completed { "completed" } else { "pending" };
        let mut body = String::new();
        body.push_str(&flash_html(&self.flash));
        body.push_str(&format!(
            "<h1>{title}</h1>\n\
             <p>Status: {state}</p>\n\
             <p>Due: {due}</p>\n\
             <p>Created: {created}</p>\n\
             <p>{description}</p>\n\
             <form method=\"post\" action=\"/tasks/{id}/toggle\"><button>Toggle</button></form>\n\
             <p><a href=\"/tasks/{id}/edit\">Edit</a> <a href=\"/tasks\">Back to list</a></p>\n",
            title = escape(&task.title),
            due = due_date_html(task),
            created = task.created_at.to_rfc3339(),
            description = escape(task.description.as_deref().unwrap_or("")),
            id = task.id,
        ));

        page(&task.title, &body).into_response()
    }
}

impl IntoResponse for ErrorView {
    fn into_response(self) -> Response {
        let body = format!(
            "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/tasks\">Back to list</a></p>\n",
            self.heading,
            escape(&self.message)
        );
        (self.status, page(self.heading, &body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.into(),
            description: None,
            due_date: None,
            completed,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn flash_codes() {
        assert_eq!(
            Flash::from_notice("created"),
            Some(Flash {
                message: "Task created.".into(),
                severity: Severity::Success
            })
        );
        assert_eq!(Flash::from_notice("toggled").unwrap().severity, Severity::Info);
        assert_eq!(Flash::from_notice("bogus"), None);
        assert_eq!(Flash::from_notice(""), None);
    }

    #[test]
    fn list_view_partitions() {
        let view = ListView::new(
            vec![task(1, "a", false), task(2, "b", true), task(3, "c", false)],
            TaskFilter::All,
            TaskSort::Created,
            None,
        );
        assert_eq!(view.total, 3);
        assert_eq!(view.pending_count, 2);
        assert_eq!(view.completed_count, 1);
    }

    #[test]
    fn form_view_prefill_and_retry() {
        let mut t = task(7, "Buy milk", false);
        t.due_date = NaiveDate::from_ymd_opt(2024, 1, 1);

        let view = FormView::for_task(&t);
        assert_eq!(view.action, "/tasks/7/edit");
        assert_eq!(view.title, "Buy milk");
        assert_eq!(view.due_date, "2024-01-01");
        assert!(view.error.is_none());

        // retry keeps the garbage the user typed
        let form = TaskForm {
            title: "".into(),
            description: "half-typed".into(),
            due_date: "not-a-date".into(),
        };
        let view = FormView::retry("New Task", "/tasks/new".into(), &form, "Title is required.".into());
        assert_eq!(view.due_date, "not-a-date");
        assert_eq!(view.error.as_deref(), Some("Title is required."));
    }

    #[test]
    fn escape_html() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn error_view_status() {
        let resp = ErrorView::not_found("task 9 not found").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ErrorView::internal().into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn escaped_title_in_markup() {
        let view = ListView::new(
            vec![task(1, "<script>", false)],
            TaskFilter::All,
            TaskSort::Created,
            None,
        );
        let resp = view.into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
