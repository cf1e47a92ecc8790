//! HTML page handlers for the task routes.
//!
//! Each handler maps request data plus store state to a response:
//! a view descriptor, a redirect, or a rendered error page.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::error;

use taskboard_core::ServiceError;

use crate::model::{ListQuery, NoticeQuery, TaskForm};
use crate::store::TaskStore;
use crate::views::{DetailView, ErrorView, Flash, FormView, ListView};

type Store = Arc<TaskStore>;

/// Map a store error onto a rendered error page. Validation never
/// reaches here; callers handle it by re-showing the form.
fn error_page(err: ServiceError) -> Response {
    match err.status_code() {
        StatusCode::NOT_FOUND => ErrorView::not_found(err.to_string()).into_response(),
        _ => {
            error!("request failed: {err}");
            ErrorView::internal().into_response()
        }
    }
}

fn flash_from(notice: &Option<String>) -> Option<Flash> {
    notice.as_deref().and_then(Flash::from_notice)
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub async fn index() -> Redirect {
    Redirect::to("/tasks")
}

// ---------------------------------------------------------------------------
// GET /tasks
// ---------------------------------------------------------------------------

pub async fn list(State(store): State<Store>, Query(query): Query<ListQuery>) -> Response {
    let filter = query.filter();
    let sort = query.sort();
    match store.list(filter, sort) {
        Ok(tasks) => ListView::new(tasks, filter, sort, flash_from(&query.notice)).into_response(),
        Err(e) => error_page(e),
    }
}

// ---------------------------------------------------------------------------
// GET/POST /tasks/new
// ---------------------------------------------------------------------------

pub async fn create_form() -> FormView {
    FormView::blank()
}

pub async fn create_submit(State(store): State<Store>, Form(form): Form<TaskForm>) -> Response {
    match store.create(&form.to_new_task()) {
        Ok(_) => Redirect::to("/tasks?notice=created").into_response(),
        Err(ServiceError::Validation(message)) => {
            FormView::retry("New Task", "/tasks/new".to_string(), &form, message).into_response()
        }
        Err(e) => error_page(e),
    }
}

// ---------------------------------------------------------------------------
// GET /tasks/{id}
// ---------------------------------------------------------------------------

pub async fn detail(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Query(query): Query<NoticeQuery>,
) -> Response {
    match store.get(id) {
        Ok(task) => DetailView {
            task,
            flash: flash_from(&query.notice),
        }
        .into_response(),
        Err(e) => error_page(e),
    }
}

// ---------------------------------------------------------------------------
// GET/POST /tasks/{id}/edit
// ---------------------------------------------------------------------------

pub async fn edit_form(State(store): State<Store>, Path(id): Path<i64>) -> Response {
    match store.get(id) {
        Ok(task) => FormView::for_task(&task).into_response(),
        Err(e) => error_page(e),
    }
}

pub async fn edit_submit(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> Response {
    // Existence first: an edit of a missing task is a 404 even when the
    // submitted form is also invalid.
    if let Err(e) = store.get(id) {
        return error_page(e);
    }
    match store.update(id, &form.to_new_task()) {
        Ok(task) => Redirect::to(&format!("/tasks/{}?notice=updated", task.id)).into_response(),
        Err(ServiceError::Validation(message)) => {
            FormView::retry("Edit Task", format!("/tasks/{id}/edit"), &form, message)
                .into_response()
        }
        Err(e) => error_page(e),
    }
}

// ---------------------------------------------------------------------------
// POST /tasks/{id}/delete
// ---------------------------------------------------------------------------

pub async fn delete(State(store): State<Store>, Path(id): Path<i64>) -> Response {
    match store.delete(id) {
        Ok(()) => Redirect::to("/tasks?notice=deleted").into_response(),
        Err(e) => error_page(e),
    }
}

// ---------------------------------------------------------------------------
// POST /tasks/{id}/toggle
// ---------------------------------------------------------------------------

pub async fn toggle(State(store): State<Store>, Path(id): Path<i64>) -> Response {
    match store.toggle(id) {
        Ok(_) => Redirect::to("/tasks?notice=toggled").into_response(),
        Err(e) => error_page(e),
    }
}
