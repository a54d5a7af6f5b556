use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::model::{normalize_image_url, sort_newest_first, NewTask, Task, TaskPatch};
use crate::error::{StoreError, StoreResult};

/// Partition key shared by every task item
pub const TASK_PK: &str = "TASK";
const TASK_SK_PREFIX: &str = "TASK#";

fn task_sk(task_id: &str) -> String {
    format!("{}{}", TASK_SK_PREFIX, task_id)
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).map(|s| s.to_string())
}

fn timestamp_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Option<DateTime<Utc>> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

fn optional_string(value: Option<&String>) -> AttributeValue {
    match value {
        Some(s) => AttributeValue::S(s.clone()),
        None => AttributeValue::Null(true),
    }
}

/// Map a stored item to a Task. Missing or mistyped attributes fall back to
/// empty strings, `false` and `None`.
pub fn task_from_item(task_id: &str, item: &HashMap<String, AttributeValue>) -> Task {
    Task {
        id: task_id.to_string(),
        title: string_attr(item, "title").unwrap_or_default(),
        detail: string_attr(item, "detail").unwrap_or_default(),
        image_url: normalize_image_url(string_attr(item, "image_url")),
        is_completed: item
            .get("is_completed")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        create_at: timestamp_attr(item, "create_at"),
        update_at: timestamp_attr(item, "update_at"),
    }
}

/// Load every task in the table, following pagination to the end
pub async fn load_tasks(client: &DynamoClient, table_name: &str) -> StoreResult<Vec<Task>> {
    let mut tasks = Vec::new();
    let mut start_key: Option<HashMap<String, AttributeValue>> = None;

    loop {
        let result = client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(TASK_PK.to_string()))
            .expression_attribute_values(":sk_prefix", AttributeValue::S(TASK_SK_PREFIX.to_string()))
            .set_exclusive_start_key(start_key.take())
            .send()
            .await
            .map_err(|e| StoreError::Database(format!("DynamoDB query error: {}", DisplayErrorContext(&e))))?;

        for item in result.items() {
            if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
                if let Some(task_id) = sk.strip_prefix(TASK_SK_PREFIX) {
                    tasks.push(task_from_item(task_id, item));
                }
            }
        }

        match result.last_evaluated_key() {
            Some(key) if !key.is_empty() => start_key = Some(key.clone()),
            _ => break,
        }
    }

    sort_newest_first(&mut tasks);
    Ok(tasks)
}

/// Get a specific task; `Ok(None)` when no such item exists
pub async fn get_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> StoreResult<Option<Task>> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(task_sk(task_id)))
        .send()
        .await
        .map_err(|e| StoreError::Database(format!("DynamoDB get_item error: {}", DisplayErrorContext(&e))))?;

    Ok(result.item().map(|item| task_from_item(task_id, item)))
}

/// Create a new task. The id and `create_at` are assigned here.
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    payload: NewTask,
) -> StoreResult<Task> {
    let task_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    let image_url = normalize_image_url(payload.image_url);

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(TASK_PK.to_string()))
        .item("SK", AttributeValue::S(task_sk(&task_id)))
        .item("title", AttributeValue::S(payload.title.clone()))
        .item("detail", AttributeValue::S(payload.detail.clone()))
        .item("image_url", optional_string(image_url.as_ref()))
        .item("is_completed", AttributeValue::Bool(payload.is_completed))
        .item("create_at", AttributeValue::S(now.to_rfc3339()))
        .item("update_at", AttributeValue::Null(true))
        .send()
        .await
        .map_err(|e| StoreError::Database(format!("DynamoDB put_item error: {}", DisplayErrorContext(&e))))?;

    Ok(Task {
        id: task_id,
        title: payload.title,
        detail: payload.detail,
        image_url,
        is_completed: payload.is_completed,
        create_at: Some(now),
        update_at: None,
    })
}

/// Overwrite the editable fields of an existing task and stamp `update_at`.
/// Never creates an item: a missing task is `StoreError::NotFound`.
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    patch: TaskPatch,
) -> StoreResult<Task> {
    let now = Utc::now();
    let image_url = normalize_image_url(patch.image_url);

    let result = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(task_sk(task_id)))
        .condition_expression("attribute_exists(SK)")
        .update_expression(
            "SET #title = :title, #detail = :detail, #image_url = :image_url, \
             #is_completed = :is_completed, #update_at = :update_at",
        )
        .expression_attribute_names("#title", "title")
        .expression_attribute_names("#detail", "detail")
        .expression_attribute_names("#image_url", "image_url")
        .expression_attribute_names("#is_completed", "is_completed")
        .expression_attribute_names("#update_at", "update_at")
        .expression_attribute_values(":title", AttributeValue::S(patch.title))
        .expression_attribute_values(":detail", AttributeValue::S(patch.detail))
        .expression_attribute_values(":image_url", optional_string(image_url.as_ref()))
        .expression_attribute_values(":is_completed", AttributeValue::Bool(patch.is_completed))
        .expression_attribute_values(":update_at", AttributeValue::S(now.to_rfc3339()))
        .return_values(ReturnValue::AllNew)
        .send()
        .await
        .map_err(|e| {
            let service_error = e.into_service_error();
            if service_error.is_conditional_check_failed_exception() {
                StoreError::NotFound(task_id.to_string())
            } else {
                StoreError::Database(format!(
                    "DynamoDB update_item error: {}",
                    DisplayErrorContext(&service_error)
                ))
            }
        })?;

    match result.attributes() {
        Some(item) => Ok(task_from_item(task_id, item)),
        None => get_task(client, table_name, task_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(task_id.to_string())),
    }
}

/// Delete a task. Deleting an id that does not exist succeeds.
pub async fn delete_task(client: &DynamoClient, table_name: &str, task_id: &str) -> StoreResult<()> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(task_sk(task_id)))
        .send()
        .await
        .map_err(|e| StoreError::Database(format!("DynamoDB delete_item error: {}", DisplayErrorContext(&e))))?;

    Ok(())
}
