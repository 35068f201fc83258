pub mod project;
pub mod upload;
