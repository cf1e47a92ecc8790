pub mod api;
pub mod model;
pub mod pages;
pub mod store;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use taskboard_core::{Module, ServiceError};
use taskboard_sql::SqlStore;

use store::TaskStore;

/// The Tasks module — server-rendered task tracking plus a JSON read
/// endpoint. Owns the TaskStore; routes are plain functions over it.
pub struct TasksModule {
    store: Arc<TaskStore>,
}

impl TasksModule {
    /// Create the module and initialise the tasks schema.
    pub fn new(db: Arc<dyn SqlStore>) -> Result<Self, ServiceError> {
        Ok(Self {
            store: Arc::new(TaskStore::new(db)?),
        })
    }

    /// Direct store access, mainly for tests and tooling.
    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }
}

impl Module for TasksModule {
    fn name(&self) -> &str {
        "tasks"
    }

    /// Routes:
    /// - `GET  /`                    — redirect to the list
    /// - `GET  /tasks`               — list view (filter/sort/notice)
    /// - `GET/POST /tasks/new`       — create form / submit
    /// - `GET  /tasks/{id}`          — detail view
    /// - `GET/POST /tasks/{id}/edit` — edit form / submit
    /// - `POST /tasks/{id}/delete`   — delete, redirect to list
    /// - `POST /tasks/{id}/toggle`   — toggle completed, redirect to list
    /// - `GET  /api/tasks`           — JSON array of all tasks
    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(pages::index))
            .route("/tasks", get(pages::list))
            .route("/tasks/new", get(pages::create_form).post(pages::create_submit))
            .route("/tasks/{id}", get(pages::detail))
            .route("/tasks/{id}/edit", get(pages::edit_form).post(pages::edit_submit))
            .route("/tasks/{id}/delete", post(pages::delete))
            .route("/tasks/{id}/toggle", post(pages::toggle))
            .route("/api/tasks", get(api::list_tasks))
            .with_state(Arc::clone(&self.store))
    }
}
