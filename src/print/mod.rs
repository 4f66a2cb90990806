//! Print-ready rendering of buffer images.
pub mod document;

pub use document::PrintDocument;
