use taskboard_atoms::media::{ImageStore, ImageUpload};
use taskboard_atoms::tasks::{NewTask, Task, TaskPatch, TaskStore};
use taskboard_atoms::StoreError;
use thiserror::Error;

/// Alert shown when a form arrives without a title or detail
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in both the title and the detail";

/// What to do with a task's image on submit
#[derive(Debug)]
pub enum ImageChange {
    /// Keep whatever the store currently holds
    Keep,
    /// Upload a new file and point the task at it
    Upload(ImageUpload),
    /// Set the URL directly (JSON API); `None` clears it
    Replace(Option<String>),
}

/// A create or update request, from the HTML form or the JSON API
#[derive(Debug)]
pub struct TaskSubmission {
    pub title: String,
    pub detail: String,
    pub is_completed: bool,
    pub image: ImageChange,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Title and detail are required")]
    MissingFields,

    #[error("Image upload failed: {0}")]
    Upload(StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskSubmission {
    /// Title and detail must be non-blank. Checked before any store call.
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.title.trim().is_empty() || self.detail.trim().is_empty() {
            return Err(SubmitError::MissingFields);
        }
        Ok(())
    }
}

async fn resolve_image_url(
    images: &dyn ImageStore,
    change: ImageChange,
    current: Option<String>,
) -> Result<Option<String>, SubmitError> {
    match change {
        ImageChange::Keep => Ok(current),
        ImageChange::Upload(upload) => {
            let stored = images.upload(upload).await.map_err(SubmitError::Upload)?;
            tracing::info!("Stored image {} at {}", stored.object_name, stored.url);
            Ok(Some(stored.url))
        }
        ImageChange::Replace(url) => Ok(url),
    }
}

/// Validate, upload the image if one was chosen, then create the task
pub async fn create_task(
    tasks: &dyn TaskStore,
    images: &dyn ImageStore,
    submission: TaskSubmission,
) -> Result<Task, SubmitError> {
    submission.validate()?;

    let image_url = resolve_image_url(images, submission.image, None).await?;

    let task = tasks
        .create_task(NewTask {
            title: submission.title,
            detail: submission.detail,
            is_completed: submission.is_completed,
            image_url,
        })
        .await?;
    Ok(task)
}

/// Validate, upload the image if one was chosen, then patch the task.
/// Without a new image the stored URL is carried over unchanged.
/// Any failure stops the remaining steps; an image uploaded before a
/// failed patch stays in the bucket.
pub async fn update_task(
    tasks: &dyn TaskStore,
    images: &dyn ImageStore,
    task_id: &str,
    submission: TaskSubmission,
) -> Result<Task, SubmitError> {
    submission.validate()?;

    let current = tasks
        .get_task(task_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(task_id.to_string()))?;

    let image_url = resolve_image_url(images, submission.image, current.image_url).await?;

    let task = tasks
        .update_task(
            task_id,
            TaskPatch {
                title: submission.title,
                detail: submission.detail,
                image_url,
                is_completed: submission.is_completed,
            },
        )
        .await?;
    Ok(task)
}
