//! Writing a buffer's exports to a directory.
use std::path::{Path, PathBuf};

use crate::buffer::manager::{ImageBuffer, PrintSelection, ARCHIVE_FILE_NAME};
use crate::error::ExportError;

pub const PRINT_FILE_NAME: &str = "print.html";

/// Which files go next to the `image_<n>.png` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub zip: bool,
    pub print: bool,
    pub auto_print: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions { zip: false, print: false, auto_print: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Write every image as `image_<n>.png` into `dir`, creating it if needed,
/// plus `images.zip` and `print.html` when asked. Files come back in the
/// order they were written.
pub async fn export_to_dir(
    buffer: &ImageBuffer,
    dir: &Path,
    options: ExportOptions,
) -> Result<Vec<ExportedFile>, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let mut written = Vec::new();
    for index in 0..buffer.len() {
        let png = buffer.export_single(index)?;
        written.push(save(&dir.join(ImageBuffer::file_name(index)), &png).await?);
    }
    if options.zip {
        let zip = buffer.export_all()?;
        written.push(save(&dir.join(ARCHIVE_FILE_NAME), &zip).await?);
    }
    if options.print {
        let html = buffer
            .render_printable(&PrintSelection::All)?
            .auto_print(options.auto_print)
            .render();
        written.push(save(&dir.join(PRINT_FILE_NAME), html.as_bytes()).await?);
    }
    tracing::info!(dir = %dir.display(), files = written.len(), "exports written");
    Ok(written)
}

async fn save(path: &Path, bytes: &[u8]) -> Result<ExportedFile, ExportError> {
    tokio::fs::write(path, bytes).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved");
    Ok(ExportedFile { path: path.to_path_buf(), bytes: bytes.len() })
}
