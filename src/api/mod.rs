//! HTTP API: sessions, generation, previews, prints and downloads.
pub mod handlers;
pub mod routes;
pub mod session;

pub use routes::{router, AppState};
pub use session::{Session, SessionStore};
