pub mod db;
pub mod secrets;
pub mod storage;
pub mod utils;
