use lambda_http::{http::StatusCode, Body, Error, Response};
use taskboard_atoms::media::ImageStore;
use taskboard_atoms::tasks::TaskStore;
use taskboard_shared::responses::{alert_and_redirect, html_response};

use crate::form::parse_task_form;
use crate::pages::{self, edit_path, LIST_PATH};
use crate::submit::{self, SubmitError, MISSING_FIELDS_MESSAGE};

/// GET /updatetask/{id}
pub async fn update_page(tasks: &dyn TaskStore, task_id: &str) -> Result<Response<Body>, Error> {
    match tasks.get_task(task_id).await {
        Ok(Some(task)) => html_response(StatusCode::OK, pages::update_form(&task)),
        Ok(None) => {
            tracing::warn!("Task {} not found", task_id);
            alert_and_redirect("Task not found", LIST_PATH)
        }
        Err(e) => {
            tracing::error!("Failed to load task {}: {}", task_id, e);
            alert_and_redirect("Could not load the task", LIST_PATH)
        }
    }
}

/// POST /updatetask/{id} (multipart form)
pub async fn update_submit(
    tasks: &dyn TaskStore,
    images: &dyn ImageStore,
    task_id: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let form_path = edit_path(task_id);

    let submission = match parse_task_form(content_type, body).await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!("Rejected update form for task {}: {}", task_id, e);
            return alert_and_redirect("Could not read the submitted form", &form_path);
        }
    };

    if submission.validate().is_err() {
        return html_response(
            StatusCode::OK,
            pages::update_form_retry(task_id, &submission, MISSING_FIELDS_MESSAGE),
        );
    }

    match submit::update_task(tasks, images, task_id, submission).await {
        Ok(task) => {
            tracing::info!("Updated task {}", task.id);
            alert_and_redirect("Task updated", LIST_PATH)
        }
        Err(SubmitError::Store(e)) if e.is_not_found() => {
            tracing::warn!("Task {} vanished before update", task_id);
            alert_and_redirect("Task not found", LIST_PATH)
        }
        Err(SubmitError::Upload(e)) => {
            tracing::error!("Image upload failed for task {}: {}", task_id, e);
            alert_and_redirect("Image upload failed", &form_path)
        }
        Err(e) => {
            tracing::error!("Failed to update task {}: {}", task_id, e);
            alert_and_redirect("Update failed, please try again", &form_path)
        }
    }
}
