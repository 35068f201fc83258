use super::project::DecodedProject;

/// An image received in a multipart submission, held in memory until the
/// handler decides to store it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub field_name: String,
    pub original_filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// A decoded create/update request body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub data: DecodedProject,
    pub grid_image: Option<UploadedImage>,
    pub list_image: Option<UploadedImage>,
}

impl ProjectForm {
    pub fn without_images(data: DecodedProject) -> Self {
        Self { data, grid_image: None, list_image: None }
    }
}

/// Body size bounds for create/update requests, registered as app data.
///
/// `part_bytes` caps any single part (or a whole JSON body); `request_bytes`
/// caps the sum of every part in one multipart submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadLimit {
    pub part_bytes: usize,
    pub request_bytes: usize,
}

impl UploadLimit {
    pub fn new(part_bytes: usize, request_bytes: usize) -> Self {
        Self {
            part_bytes,
            request_bytes: request_bytes.max(part_bytes),
        }
    }
}

impl Default for UploadLimit {
    fn default() -> Self {
        UploadLimit::new(10 * 1024 * 1024, 30 * 1024 * 1024)
    }
}
