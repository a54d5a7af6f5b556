// Re-export model types and service functions
pub mod model;
pub mod service;
pub mod store;

pub use model::{ImageUpload, StoredImage};
pub use service::{object_name_for, public_url};
pub use store::{ImageStore, S3ImageStore};
