mod files;
mod messages;
mod status;

pub use files::{clear_files, delete_file, download_file, list_files, upload_file};
pub use messages::{clear_messages, create_message, delete_message, list_messages};
pub use status::health;
