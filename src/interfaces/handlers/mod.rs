pub mod projects;
pub mod secrets;
pub mod system;
