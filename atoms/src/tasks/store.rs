use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{NewTask, Task, TaskPatch};
use super::service;
use crate::error::StoreResult;

/// Persistence for task records
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;
    async fn get_task(&self, task_id: &str) -> StoreResult<Option<Task>>;
    async fn create_task(&self, payload: NewTask) -> StoreResult<Task>;
    async fn update_task(&self, task_id: &str, patch: TaskPatch) -> StoreResult<Task>;
    async fn delete_task(&self, task_id: &str) -> StoreResult<()>;
}

/// DynamoDB-backed task store
#[derive(Clone)]
pub struct DynamoTaskStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoTaskStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl TaskStore for DynamoTaskStore {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        service::load_tasks(&self.client, &self.table_name).await
    }

    async fn get_task(&self, task_id: &str) -> StoreResult<Option<Task>> {
        service::get_task(&self.client, &self.table_name, task_id).await
    }

    async fn create_task(&self, payload: NewTask) -> StoreResult<Task> {
        service::create_task(&self.client, &self.table_name, payload).await
    }

    async fn update_task(&self, task_id: &str, patch: TaskPatch) -> StoreResult<Task> {
        service::update_task(&self.client, &self.table_name, task_id, patch).await
    }

    async fn delete_task(&self, task_id: &str) -> StoreResult<()> {
        service::delete_task(&self.client, &self.table_name, task_id).await
    }
}
