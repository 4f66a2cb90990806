pub mod batch;
pub mod client;
pub mod prompt;

pub use batch::{generate_batch, BatchOutcome};
pub use client::ImageClient;
pub use prompt::Prompt;
