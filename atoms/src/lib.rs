//! Task and image domain: models, DynamoDB/S3 services and the storage
//! traits the rest of the workspace is written against.

pub mod error;
pub mod media;
pub mod memory;
pub mod tasks;

pub use error::{StoreError, StoreResult};
