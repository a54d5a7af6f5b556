use lambda_http::{http::StatusCode, Body, Error, Response};
use taskboard_atoms::media::ImageStore;
use taskboard_atoms::tasks::TaskStore;
use taskboard_shared::responses::{alert_and_redirect, html_response};

use crate::form::parse_task_form;
use crate::pages::{self, ADD_PATH, LIST_PATH};
use crate::submit::{self, SubmitError, MISSING_FIELDS_MESSAGE};

/// GET /addtask
pub fn add_page() -> Result<Response<Body>, Error> {
    html_response(StatusCode::OK, pages::add_form())
}

/// POST /addtask (multipart form)
pub async fn add_submit(
    tasks: &dyn TaskStore,
    images: &dyn ImageStore,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let submission = match parse_task_form(content_type, body).await {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!("Rejected add form: {}", e);
            return alert_and_redirect("Could not read the submitted form", ADD_PATH);
        }
    };

    if submission.validate().is_err() {
        return html_response(
            StatusCode::OK,
            pages::add_form_retry(&submission, MISSING_FIELDS_MESSAGE),
        );
    }

    match submit::create_task(tasks, images, submission).await {
        Ok(task) => {
            tracing::info!("Created task {}", task.id);
            alert_and_redirect("Task saved", LIST_PATH)
        }
        Err(SubmitError::Upload(e)) => {
            tracing::error!("Image upload failed for new task: {}", e);
            alert_and_redirect("Image upload failed", ADD_PATH)
        }
        Err(e) => {
            tracing::error!("Failed to create task: {}", e);
            alert_and_redirect("Saving failed, please try again", ADD_PATH)
        }
    }
}
