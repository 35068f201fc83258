pub mod extractors;
pub mod project;
