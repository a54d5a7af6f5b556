use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::{Deserialize, Deserializer};
use taskboard_atoms::media::ImageStore;
use taskboard_atoms::tasks::{NewTask, TaskStore};
use taskboard_shared::responses::{json_error, json_response, no_content};

use crate::submit::{self, ImageChange, SubmitError, TaskSubmission};

#[derive(Debug, Deserialize)]
pub struct UpdateTaskPayload {
    pub title: String,
    pub detail: String,
    pub is_completed: bool,
    /// Absent keeps the stored URL; `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn submit_error_response(e: SubmitError) -> Result<Response<Body>, Error> {
    match e {
        SubmitError::MissingFields => json_error(StatusCode::BAD_REQUEST, &e.to_string()),
        SubmitError::Store(ref store) if store.is_not_found() => {
            json_error(StatusCode::NOT_FOUND, &e.to_string())
        }
        e => {
            tracing::error!("Task submission failed: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// GET /api/tasks
pub async fn list_tasks(tasks: &dyn TaskStore) -> Result<Response<Body>, Error> {
    match tasks.list_tasks().await {
        Ok(rows) => json_response(StatusCode::OK, &rows),
        Err(e) => {
            tracing::error!("Failed to list tasks: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// GET /api/tasks/{id}
pub async fn get_task(tasks: &dyn TaskStore, task_id: &str) -> Result<Response<Body>, Error> {
    match tasks.get_task(task_id).await {
        Ok(Some(task)) => json_response(StatusCode::OK, &task),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Task not found"),
        Err(e) => {
            tracing::error!("Failed to get task {}: {}", task_id, e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// POST /api/tasks
pub async fn create_task(
    tasks: &dyn TaskStore,
    images: &dyn ImageStore,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: NewTask = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &format!("Invalid request body: {}", e)),
    };

    let submission = TaskSubmission {
        title: payload.title,
        detail: payload.detail,
        is_completed: payload.is_completed,
        image: ImageChange::Replace(payload.image_url),
    };

    match submit::create_task(tasks, images, submission).await {
        Ok(task) => json_response(StatusCode::CREATED, &task),
        Err(e) => submit_error_response(e),
    }
}

/// PATCH /api/tasks/{id}
pub async fn update_task(
    tasks: &dyn TaskStore,
    images: &dyn ImageStore,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateTaskPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &format!("Invalid request body: {}", e)),
    };

    let submission = TaskSubmission {
        title: payload.title,
        detail: payload.detail,
        is_completed: payload.is_completed,
        image: match payload.image_url {
            Some(url) => ImageChange::Replace(url),
            None => ImageChange::Keep,
        },
    };

    match submit::update_task(tasks, images, task_id, submission).await {
        Ok(task) => json_response(StatusCode::OK, &task),
        Err(e) => submit_error_response(e),
    }
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(tasks: &dyn TaskStore, task_id: &str) -> Result<Response<Body>, Error> {
    match tasks.delete_task(task_id).await {
        Ok(()) => no_content(),
        Err(e) => {
            tracing::error!("Failed to delete task {}: {}", task_id, e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use taskboard_atoms::memory::{MemoryImageStore, MemoryTaskStore};

    fn json(resp: &Response<Body>) -> Value {
        serde_json::from_slice(resp.body()).unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let store = MemoryTaskStore::new();
        let images = MemoryImageStore::new("https://images.example.com");

        let created = create_task(&store, &images, br#"{"title":"Read","detail":"Chapter 3"}"#)
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let id = json(&created)["id"].as_str().unwrap().to_string();

        let fetched = get_task(&store, &id).await.unwrap();

        assert_eq!(fetched.status(), StatusCode::OK);
        let body = json(&fetched);
        assert_eq!(body["title"], "Read");
        assert_eq!(body["is_completed"], false);
        assert_eq!(body["image_url"], Value::Null);
        assert_eq!(body["update_at"], Value::Null);
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let store = MemoryTaskStore::new();
        let images = MemoryImageStore::new("https://images.example.com");

        let resp = create_task(&store, &images, br#"{"title":" ","detail":"x"}"#)
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let store = MemoryTaskStore::new();
        let images = MemoryImageStore::new("https://images.example.com");

        let resp = update_task(&store, &images, "t", b"{not json").await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_without_image_url_keeps_it() {
        let store = MemoryTaskStore::new();
        let images = MemoryImageStore::new("https://images.example.com");
        let task = store
            .create_task(NewTask {
                title: "a".to_string(),
                detail: "b".to_string(),
                is_completed: false,
                image_url: Some("https://images.example.com/1_a.png".to_string()),
            })
            .await
            .unwrap();

        let resp = update_task(
            &store,
            &images,
            &task.id,
            br#"{"title":"a2","detail":"b2","is_completed":true}"#,
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json(&resp)["image_url"], "https://images.example.com/1_a.png");

        let cleared = update_task(
            &store,
            &images,
            &task.id,
            br#"{"title":"a2","detail":"b2","is_completed":true,"image_url":null}"#,
        )
        .await
        .unwrap();

        assert_eq!(json(&cleared)["image_url"], Value::Null);
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let store = MemoryTaskStore::new();
        let images = MemoryImageStore::new("https://images.example.com");

        let get = get_task(&store, "missing").await.unwrap();
        let patch = update_task(&store, &images, "missing", br#"{"title":"a","detail":"b","is_completed":false}"#)
            .await
            .unwrap();

        assert_eq!(get.status(), StatusCode::NOT_FOUND);
        assert_eq!(patch.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let store = MemoryTaskStore::new();

        let resp = delete_task(&store, "whatever").await.unwrap();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn store_failure_is_internal_error_with_message() {
        let store = MemoryTaskStore::new();
        let images = MemoryImageStore::new("https://images.example.com");
        store.set_failing(true);

        let listed = list_tasks(&store).await.unwrap();
        let created = create_task(&store, &images, br#"{"title":"a","detail":"b"}"#)
            .await
            .unwrap();
        let deleted = delete_task(&store, "t").await.unwrap();

        for resp in [&listed, &created, &deleted] {
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(json(resp)["error"].as_str().unwrap().contains("memory store unavailable"));
        }
    }
}
