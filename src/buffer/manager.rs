//! Ordered, per-session collection of generated images.
//!
//! Index `i` is always the i-th successful generation since the buffer was
//! created or last cleared. Indices are 0-based; exported file names are
//! 1-based (`image_1.png` is index 0).
use crate::buffer::archive;
use crate::buffer::image::GeneratedImage;
use crate::error::ExportError;
use crate::print::PrintDocument;

pub const PLACEHOLDER_SIZE: u32 = 1024;
pub const ARCHIVE_FILE_NAME: &str = "images.zip";

/// Which images go into a print document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintSelection {
    All,
    Indices(Vec<usize>),
}

#[derive(Debug, Default)]
pub struct ImageBuffer {
    images: Vec<GeneratedImage>,
}

impl ImageBuffer {
    pub fn new() -> Self {
        ImageBuffer { images: Vec::new() }
    }

    /// A buffer preloaded with a red and a blue square.
    pub fn with_placeholders() -> Self {
        let mut buffer = ImageBuffer::new();
        buffer.append(GeneratedImage::solid(PLACEHOLDER_SIZE, [255, 0, 0]));
        buffer.append(GeneratedImage::solid(PLACEHOLDER_SIZE, [0, 0, 255]));
        buffer
    }

    pub fn append(&mut self, image: GeneratedImage) {
        self.images.push(image);
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GeneratedImage> {
        self.images.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedImage> {
        self.images.iter()
    }

    /// Export name for the image at 0-based `index`.
    pub fn file_name(index: usize) -> String {
        format!("image_{}.png", index + 1)
    }

    fn checked(&self, index: usize) -> Result<&GeneratedImage, ExportError> {
        self.images.get(index).ok_or(ExportError::IndexOutOfRange {
            index,
            len: self.images.len(),
        })
    }

    /// PNG bytes of one image.
    pub fn export_single(&self, index: usize) -> Result<Vec<u8>, ExportError> {
        let png = self.checked(index)?.to_png()?;
        tracing::debug!(index, bytes = png.len(), "exported image");
        Ok(png)
    }

    /// Every image as PNG, packed into one zip in buffer order.
    pub fn export_all(&self) -> Result<Vec<u8>, ExportError> {
        let encoded = self
            .images
            .iter()
            .enumerate()
            .map(|(i, img)| img.to_png().map(|png| (ImageBuffer::file_name(i), png)))
            .collect::<Result<Vec<_>, _>>()?;
        let zip = archive::pack(encoded.iter().map(|(name, png)| (name.clone(), png.as_slice())))?;
        tracing::debug!(entries = encoded.len(), bytes = zip.len(), "exported archive");
        Ok(zip)
    }

    pub fn render_printable(&self, selection: &PrintSelection) -> Result<PrintDocument, ExportError> {
        let indices: Vec<usize> = match selection {
            PrintSelection::All => (0..self.images.len()).collect(),
            PrintSelection::Indices(list) => list.clone(),
        };
        let payloads = indices
            .into_iter()
            .map(|i| -> Result<String, ExportError> { Ok(self.checked(i)?.to_base64_png()?) })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PrintDocument::new(payloads))
    }
}
