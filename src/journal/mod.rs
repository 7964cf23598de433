mod directory;
mod logger;

pub use directory::{FOLDER_NAME, ResourceDirectory};
pub use logger::RowLogger;
