// Re-export model types and service functions
pub mod model;
pub mod service;
pub mod store;

pub use model::{NewTask, Task, TaskPatch};
pub use store::{DynamoTaskStore, TaskStore};
