//! Generated-image buffer: the images of one session and their exports.
pub mod archive;
pub mod export;
pub mod image;
pub mod manager;

pub use self::export::{export_to_dir, ExportOptions, ExportedFile, PRINT_FILE_NAME};
pub use self::image::GeneratedImage;
pub use self::manager::{ImageBuffer, PrintSelection, ARCHIVE_FILE_NAME};
