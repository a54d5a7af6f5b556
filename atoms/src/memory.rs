//! In-process task and image stores. Used for local runs
//! (`TASKBOARD_BACKEND=memory`) and by the test suites.
//!
//! `seed`, `calls` and the `set_failing*` switches are test support: the
//! runtime wiring in `AppState` never calls them.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::media::{object_name_for, public_url, ImageStore, ImageUpload, StoredImage};
use crate::tasks::model::{normalize_image_url, sort_newest_first};
use crate::tasks::{NewTask, Task, TaskPatch, TaskStore};

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    failing_updates: AtomicBool,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test support: insert a task as-is, bypassing id and timestamp assignment
    pub async fn seed(&self, task: Task) {
        self.tasks.write().await.insert(task.id.clone(), task);
    }

    /// Test support: number of store operations performed so far (seeding excluded)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Test support: make every following operation fail with a database error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Test support: fail only `update_task`; every other operation still succeeds
    pub fn set_failing_updates(&self, failing: bool) {
        self.failing_updates.store(failing, Ordering::SeqCst);
    }

    fn enter(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database("memory store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.enter()?;
        let mut tasks: Vec<Task> = self.tasks.read().await.values().cloned().collect();
        sort_newest_first(&mut tasks);
        Ok(tasks)
    }

    async fn get_task(&self, task_id: &str) -> StoreResult<Option<Task>> {
        self.enter()?;
        Ok(self.tasks.read().await.get(task_id).cloned())
    }

    async fn create_task(&self, payload: NewTask) -> StoreResult<Task> {
        self.enter()?;
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: payload.title,
            detail: payload.detail,
            image_url: normalize_image_url(payload.image_url),
            is_completed: payload.is_completed,
            create_at: Some(Utc::now()),
            update_at: None,
        };
        self.tasks.write().await.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update_task(&self, task_id: &str, patch: TaskPatch) -> StoreResult<Task> {
        self.enter()?;
        if self.failing_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Database("memory store rejected the update".to_string()));
        }
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::NotFound(task_id.to_string()))?;

        task.title = patch.title;
        task.detail = patch.detail;
        task.image_url = normalize_image_url(patch.image_url);
        task.is_completed = patch.is_completed;
        task.update_at = Some(Utc::now());
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: &str) -> StoreResult<()> {
        self.enter()?;
        self.tasks.write().await.remove(task_id);
        Ok(())
    }
}

/// A stored object: content type and bytes
pub type MemoryObject = (Option<String>, Vec<u8>);

pub struct MemoryImageStore {
    base_url: String,
    objects: RwLock<HashMap<String, MemoryObject>>,
    failing: AtomicBool,
}

impl MemoryImageStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub async fn object(&self, object_name: &str) -> Option<MemoryObject> {
        self.objects.read().await.get(object_name).cloned()
    }

    pub async fn object_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Test support: make every following upload fail with a storage error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(&self, upload: ImageUpload) -> StoreResult<StoredImage> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("memory bucket unavailable".to_string()));
        }

        let object_name = object_name_for(Utc::now().timestamp_millis(), &upload.file_name);
        let mut objects = self.objects.write().await;
        if objects.contains_key(&object_name) {
            return Err(StoreError::Storage(format!("object already exists: {}", object_name)));
        }
        objects.insert(object_name.clone(), (upload.content_type, upload.bytes));

        let url = public_url("memory", "local", Some(&self.base_url), &object_name);
        Ok(StoredImage { object_name, url })
    }
}
