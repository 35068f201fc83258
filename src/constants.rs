use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Multipart field carrying the grid-view image.
pub const GRID_IMAGE_FIELD: &str = "gridImage";

/// Multipart field carrying the list-view image.
pub const LIST_IMAGE_FIELD: &str = "listImage";

/// Multipart field carrying the JSON-encoded project object.
pub const PROJECT_DATA_FIELD: &str = "projectData";
