//! GET /api/tasks — the JSON read endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use taskboard_core::ServiceError;

use crate::model::{TaskFilter, TaskSort};
use crate::store::TaskStore;

/// Every task, unfiltered, in creation order. Dates are ISO-8601
/// strings; `due_date` is null when absent.
pub async fn list_tasks(
    State(store): State<Arc<TaskStore>>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let tasks = store.list(TaskFilter::All, TaskSort::Created)?;
    Ok(Json(serde_json::json!({ "tasks": tasks })))
}
