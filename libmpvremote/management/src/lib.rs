pub mod collection;
pub mod database;
pub mod db_error;
pub mod file_browser;
pub mod media_status;
pub mod paths;
