use bytes::Bytes;
use std::convert::Infallible;
use taskboard_atoms::media::ImageUpload;
use thiserror::Error;

use crate::submit::{ImageChange, TaskSubmission};

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Expected a multipart/form-data body")]
    NotMultipart,

    #[error("Malformed form body: {0}")]
    Multipart(#[from] multer::Error),
}

fn is_checked(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "on")
}

/// Decode the add/update task form. A file input left empty arrives as a
/// part with an empty filename and no content; that means "no new image".
pub async fn parse_task_form(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<TaskSubmission, FormError> {
    let boundary = content_type
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or(FormError::NotMultipart)?;

    let data = Bytes::copy_from_slice(body);
    let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(data) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut submission = TaskSubmission {
        title: String::new(),
        detail: String::new(),
        is_completed: false,
        image: ImageChange::Keep,
    };

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => submission.title = field.text().await?,
            "detail" => submission.detail = field.text().await?,
            "is_completed" => submission.is_completed = is_checked(&field.text().await?),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(|m| m.to_string());
                let bytes = field.bytes().await?;

                if !file_name.trim().is_empty() && !bytes.is_empty() {
                    submission.image = ImageChange::Upload(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => tracing::debug!("Ignoring form field '{}'", other),
        }
    }

    Ok(submission)
}
