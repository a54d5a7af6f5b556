use lambda_http::{http::StatusCode, Body, Error, Response};
use taskboard_atoms::tasks::TaskStore;
use taskboard_shared::responses::{alert_and_redirect, html_response, redirect};

use crate::pages::{self, LIST_PATH};

/// GET /alltask
pub async fn list_page(tasks: &dyn TaskStore) -> Result<Response<Body>, Error> {
    match tasks.list_tasks().await {
        Ok(rows) => html_response(StatusCode::OK, pages::task_list(&rows, None)),
        Err(e) => {
            tracing::error!("Failed to list tasks: {}", e);
            html_response(
                StatusCode::OK,
                pages::task_list(&[], Some("Could not load tasks")),
            )
        }
    }
}

/// POST /alltask/{id}/delete
///
/// The listing is only re-rendered once the store has confirmed the delete.
pub async fn delete_task(tasks: &dyn TaskStore, task_id: &str) -> Result<Response<Body>, Error> {
    match tasks.delete_task(task_id).await {
        Ok(()) => {
            tracing::info!("Deleted task {}", task_id);
            redirect(LIST_PATH)
        }
        Err(e) => {
            tracing::error!("Failed to delete task {}: {}", task_id, e);
            alert_and_redirect("Delete failed", LIST_PATH)
        }
    }
}
