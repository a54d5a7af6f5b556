use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;

use super::model::{ImageUpload, StoredImage};
use super::service;
use crate::error::StoreResult;

/// Object storage for task images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the upload under `{timestamp}_{filename}` and return its public URL
    async fn upload(&self, upload: ImageUpload) -> StoreResult<StoredImage>;
}

/// S3-backed image store
#[derive(Clone)]
pub struct S3ImageStore {
    client: S3Client,
    bucket_name: String,
    region: String,
    public_base_url: Option<String>,
}

impl S3ImageStore {
    pub fn new(
        client: S3Client,
        bucket_name: impl Into<String>,
        region: impl Into<String>,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            client,
            bucket_name: bucket_name.into(),
            region: region.into(),
            public_base_url,
        }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn upload(&self, upload: ImageUpload) -> StoreResult<StoredImage> {
        let object_name =
            service::object_name_for(chrono::Utc::now().timestamp_millis(), &upload.file_name);

        service::upload_object(
            &self.client,
            &self.bucket_name,
            &object_name,
            upload.content_type.as_deref(),
            upload.bytes,
        )
        .await?;

        let url = service::public_url(
            &self.bucket_name,
            &self.region,
            self.public_base_url.as_deref(),
            &object_name,
        );

        Ok(StoredImage { object_name, url })
    }
}
