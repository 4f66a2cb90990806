//! Per-session ownership of image buffers.
//!
//! Each session owns exactly one `ImageBuffer`. Sessions never share images
//! and are dropped, with their images, when removed explicitly or after
//! staying idle longer than the store's idle TTL.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::buffer::ImageBuffer;
use crate::error::{AppError, AppResult};
use crate::generation::{ImageClient, Prompt};

/// Result of one successful generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generated {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub image_count: usize,
}

#[derive(Debug)]
pub struct Session {
    buffer: RwLock<ImageBuffer>,
    // Held for the whole of a generation; at most one in flight per session.
    generation: Mutex<()>,
    last_seen: std::sync::Mutex<Instant>,
}

impl Session {
    pub fn new(buffer: ImageBuffer) -> Self {
        Session {
            buffer: RwLock::new(buffer),
            generation: Mutex::new(()),
            last_seen: std::sync::Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        if let Ok(mut seen) = self.last_seen.lock() {
            *seen = Instant::now();
        }
    }

    /// Idle sessions with no generation in flight.
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        let idle = match self.last_seen.lock() {
            Ok(seen) => now.saturating_duration_since(*seen),
            Err(_) => return false,
        };
        idle >= ttl && self.generation.try_lock().is_ok()
    }

    pub async fn buffer(&self) -> RwLockReadGuard<'_, ImageBuffer> {
        self.buffer.read().await
    }

    pub async fn clear(&self) {
        self.buffer.write().await.clear();
    }

    /// Validate `input`, generate an image and append it.
    ///
    /// The buffer is only locked for the append, so reads keep working while
    /// the provider is busy. On any error the buffer is left as it was.
    pub async fn generate(&self, client: &ImageClient, input: &str) -> AppResult<Generated> {
        let prompt = Prompt::parse(input)?;
        let _in_flight = self.generation.try_lock().map_err(|_| AppError::GenerationInProgress)?;

        let image = client.generate(&prompt).await?;
        let (width, height) = (image.width(), image.height());

        let mut buffer = self.buffer.write().await;
        buffer.append(image);
        Ok(Generated { index: buffer.len() - 1, width, height, image_count: buffer.len() })
    }
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    preload_placeholders: bool,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(preload_placeholders: bool, idle_ttl: Duration) -> Self {
        SessionStore { sessions: RwLock::new(HashMap::new()), preload_placeholders, idle_ttl }
    }

    pub async fn create(&self) -> (Uuid, Arc<Session>) {
        let buffer = if self.preload_placeholders { ImageBuffer::with_placeholders() } else { ImageBuffer::new() };
        let id = Uuid::new_v4();
        let session = Arc::new(Session::new(buffer));
        self.sessions.write().await.insert(id, session.clone());
        tracing::info!(session = %id, "session created");
        (id, session)
    }

    /// Look up a session and mark it as active.
    pub async fn get(&self, id: Uuid) -> AppResult<Arc<Session>> {
        let session = self.sessions.read().await.get(&id).cloned().ok_or(AppError::SessionNotFound(id))?;
        session.touch();
        Ok(session)
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                tracing::info!(session = %id, "session ended");
                Ok(())
            }
            None => Err(AppError::SessionNotFound(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session idle for at least the TTL. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let expired = session.is_expired(now, self.idle_ttl);
            if expired {
                tracing::info!(session = %id, "session expired");
            }
            !expired
        });
        before - sessions.len()
    }

    /// Run `evict_idle` every `period` until the store is dropped by all owners.
    pub fn spawn_idle_eviction(store: Arc<SessionStore>, period: Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(&store);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let Some(live) = store.upgrade() else { break };
                let evicted = live.evict_idle().await;
                if evicted > 0 {
                    let remaining = live.len().await;
                    tracing::debug!(evicted, remaining, "idle sessions evicted");
                }
            }
        })
    }
}
