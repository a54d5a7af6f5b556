use serde::Serialize;

/// An image file chosen in a task form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename as sent by the browser
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// An object written to the image bucket
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub object_name: String,
    pub url: String,
}
