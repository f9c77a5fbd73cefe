//! Session state.
//!
//! Every browser gets its own [`Session`], keyed by the UUID in its session
//! cookie. A session owns the uploaded dataset and the message from its last
//! failed upload; nothing else is kept between requests.
//!
//! ```text
//! ┌──────────────────────────── AppState ─────────────────────────────┐
//! │  config: Arc<ServerConfig>                                        │
//! │  sessions: Arc<SessionStore>                                      │
//! │    RwLock<HashMap<Uuid, Session>>                                 │
//! │      ├─ dataset: DatasetState   (Arc<LoadedDataset>, read-only)   │
//! │      ├─ upload_error: Option<String>                              │
//! │      └─ last_seen: Instant                                        │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Locks are held only to copy a [`SessionSnapshot`] out or to swap a value
//! in. Loading and rendering happen outside the lock.

use order_insights::{DatasetState, LoadedDataset};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ServerConfig;

#[derive(Debug, Clone)]
pub struct Session {
    pub dataset: DatasetState,
    pub upload_error: Option<String>,
    pub last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            dataset: DatasetState::Absent,
            upload_error: None,
            last_seen: Instant::now(),
        }
    }
}

/// What a request needs from its session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: Uuid,
    /// True when the request carried no usable session cookie.
    pub is_new: bool,
    pub dataset: DatasetState,
    pub upload_error: Option<String>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `id`, or start a fresh session when it is missing or expired.
    /// Marks the session as seen.
    pub fn checkout(&self, id: Option<Uuid>) -> SessionSnapshot {
        let mut sessions = self.sessions.write();

        if let Some(id) = id
            && let Some(session) = sessions.get_mut(&id)
        {
            session.last_seen = Instant::now();
            return SessionSnapshot {
                id,
                is_new: false,
                dataset: session.dataset.clone(),
                upload_error: session.upload_error.clone(),
            };
        }

        let id = Uuid::new_v4();
        sessions.insert(id, Session::new());
        debug!("Started session {}", id);
        SessionSnapshot {
            id,
            is_new: true,
            dataset: DatasetState::Absent,
            upload_error: None,
        }
    }

    /// Look up an existing session without starting one. Marks it as seen.
    pub fn get(&self, id: Option<Uuid>) -> Option<SessionSnapshot> {
        let id = id?;
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(&id)?;
        session.last_seen = Instant::now();
        Some(SessionSnapshot {
            id,
            is_new: false,
            dataset: session.dataset.clone(),
            upload_error: session.upload_error.clone(),
        })
    }

    /// Replace the session's dataset after a successful upload.
    pub fn set_dataset(&self, id: Uuid, dataset: LoadedDataset) {
        let mut sessions = self.sessions.write();
        let session = sessions.entry(id).or_insert_with(Session::new);
        session.dataset = DatasetState::from(dataset);
        session.upload_error = None;
        session.last_seen = Instant::now();
    }

    /// Record a failed upload. The previous dataset is dropped.
    pub fn set_upload_error(&self, id: Uuid, message: String) {
        let mut sessions = self.sessions.write();
        let session = sessions.entry(id).or_insert_with(Session::new);
        session.dataset = DatasetState::Absent;
        session.upload_error = Some(message);
        session.last_seen = Instant::now();
    }

    /// Drop the dataset and any upload error.
    pub fn clear(&self, id: Uuid) {
        if let Some(session) = self.sessions.write().get_mut(&id) {
            session.dataset = DatasetState::Absent;
            session.upload_error = None;
            session.last_seen = Instant::now();
        }
    }

    /// Remove sessions not seen within `ttl`. Returns how many were removed.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_seen) < ttl);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Periodically evict idle sessions until the runtime shuts down.
pub fn spawn_session_sweeper(sessions: Arc<SessionStore>, ttl: Duration, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle(ttl);
            if evicted > 0 {
                info!("Evicted {} idle session(s), {} active", evicted, sessions.len());
            }
        }
    })
}
