use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::Client as S3Client;
use std::sync::Arc;
use taskboard_atoms::media::{ImageStore, S3ImageStore};
use taskboard_atoms::memory::{MemoryImageStore, MemoryTaskStore};
use taskboard_atoms::tasks::{DynamoTaskStore, TaskStore};

use crate::config::{Backend, Config};

/// Shared across invocations of a warm Lambda
pub struct AppState {
    pub config: Config,
    pub tasks: Arc<dyn TaskStore>,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Wire the stores selected by `config.backend`. AWS clients read
    /// credentials from the default provider chain.
    pub async fn from_config(config: Config) -> Self {
        match config.backend {
            Backend::Aws => {
                let sdk_config = aws_config::load_from_env().await;
                let dynamo_client = DynamoClient::new(&sdk_config);
                let s3_client = S3Client::new(&sdk_config);

                tracing::info!(
                    "Using DynamoDB table '{}' and S3 bucket '{}'",
                    config.table_name,
                    config.bucket_name
                );

                let tasks = Arc::new(DynamoTaskStore::new(dynamo_client, config.table_name.clone()));
                let images = Arc::new(S3ImageStore::new(
                    s3_client,
                    config.bucket_name.clone(),
                    config.region.clone(),
                    config.public_base_url.clone(),
                ));
                Self::with_stores(config, tasks, images)
            }
            Backend::Memory => {
                tracing::warn!("Using in-memory stores; data is lost when the process exits");

                let tasks = Arc::new(MemoryTaskStore::new());
                let images = Arc::new(MemoryImageStore::new(config.memory_image_base_url()));
                Self::with_stores(config, tasks, images)
            }
        }
    }

    pub fn with_stores(
        config: Config,
        tasks: Arc<dyn TaskStore>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            config,
            tasks,
            images,
        }
    }
}
