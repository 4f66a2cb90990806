//! Coloring Book Generator library
//!
//! Modules:
//! - `api`: Axum HTTP handlers, per-session state and router setup.
//! - `generation`: Prompt validation and the image generation client.
//! - `buffer`: Per-session image buffer with PNG, zip and print exports.
//! - `print`: HTML print documents with inline images.
//! - `config`: Env-driven configuration loader.
//! - `error`: Error taxonomy and `AppResult` alias.
//!
//! Re-exports are provided for common types: `Config`, `ImageClient`,
//! `Prompt`, `ImageBuffer` and `GeneratedImage`.
pub mod api;
pub mod buffer;
pub mod config;
pub mod error;
pub mod generation;
pub mod print;

pub use buffer::{GeneratedImage, ImageBuffer, PrintSelection};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use generation::{ImageClient, Prompt};
