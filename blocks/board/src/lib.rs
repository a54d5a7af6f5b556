//! The task board: HTML pages, form handling and JSON endpoints composed
//! from the task and image atoms.

pub mod api;
pub mod creating;
pub mod editing;
pub mod form;
pub mod listing;
pub mod pages;
pub mod submit;

pub use submit::{ImageChange, SubmitError, TaskSubmission};
