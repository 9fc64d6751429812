//! In-memory session store with background expiry.
//!
//! All sessions live in one `RwLock`-protected map. The write lock is held
//! only for the duration of a single map or history mutation, never across
//! an `.await` on anything else, so sessions do not block each other in any
//! meaningful way.
//!
//! ## Expiry
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `ttl` | 24h | Idle time after which a session is evicted |
//! | `sweep_interval` | 1h | How often the sweeper runs |
//! | `history_limit` | 30 | Entries kept per session |
//!
//! The sweeper is started by [`InMemorySessionStore::start`] and stopped by
//! [`InMemorySessionStore::shutdown`]. It takes the same write lock as
//! foreground mutations, so an eviction can never interleave with an append.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::{
    ChatMessage, Role, Session, DEFAULT_HISTORY_LIMIT, DEFAULT_SESSION_TTL_HOURS,
};
use crate::ports::{SessionStore, TurnGuard};

/// Configuration for [`InMemorySessionStore`].
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Maximum history entries kept per session.
    pub history_limit: usize,
    /// Inactivity period after which a session is evicted.
    pub ttl: chrono::Duration,
    /// How often the background sweeper runs.
    pub sweep_interval: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            ttl: chrono::Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            sweep_interval: Duration::from_secs(3600),
        }
    }
}

impl SessionStoreConfig {
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

#[derive(Debug)]
struct StoreState {
    config: SessionStoreConfig,
    sessions: RwLock<HashMap<SessionId, Session>>,
    turn_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl StoreState {
    async fn sweep_expired(&self, now: Timestamp) -> usize {
        let evicted: Vec<SessionId> = {
            let mut sessions = self.sessions.write().await;
            let expired: Vec<SessionId> = sessions
                .values()
                .filter(|s| s.is_expired(now, self.config.ttl))
                .map(|s| s.id().clone())
                .collect();
            for id in &expired {
                sessions.remove(id);
            }
            expired
        };

        self.prune_turn_locks().await;
        if !evicted.is_empty() {
            tracing::info!(evicted = evicted.len(), "Evicted expired sessions");
        }

        evicted.len()
    }

    /// Drops idle turn locks of ids that have no live session.
    ///
    /// A lock whose `Arc` is shared has a holder or a waiter and is kept.
    async fn prune_turn_locks(&self) {
        let mut locks = self.turn_locks.lock().await;
        let sessions = self.sessions.read().await;
        let before = locks.len();
        locks.retain(|id, lock| Arc::strong_count(lock) > 1 || sessions.contains_key(id));
        let pruned = before - locks.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned idle turn locks");
        }
    }

    async fn run_sweeper(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);
        // The first tick fires immediately; nothing can be stale yet.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::debug!("Session sweeper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_expired(Timestamp::now()).await;
                }
            }
        }
    }
}

#[derive(Debug)]
struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Process-local [`SessionStore`].
#[derive(Debug)]
pub struct InMemorySessionStore {
    state: Arc<StoreState>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl InMemorySessionStore {
    /// Creates a store without a background sweeper.
    ///
    /// Expiry then only happens through explicit [`Self::sweep_expired`] calls.
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            state: Arc::new(StoreState {
                config,
                sessions: RwLock::new(HashMap::new()),
                turn_locks: Mutex::new(HashMap::new()),
            }),
            sweeper: Mutex::new(None),
        }
    }

    /// Creates a store and spawns its sweeper on the current runtime.
    pub fn start(config: SessionStoreConfig) -> Self {
        let mut store = Self::new(config);
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(Arc::clone(&store.state).run_sweeper(rx));
        tracing::info!(
            interval_secs = store.state.config.sweep_interval.as_secs(),
            ttl_hours = store.state.config.ttl.num_hours(),
            "Session sweeper started"
        );
        *store.sweeper.get_mut() = Some(Sweeper {
            shutdown: tx,
            handle,
        });
        store
    }

    pub fn config(&self) -> &SessionStoreConfig {
        &self.state.config
    }

    /// Runs one sweep pass, evicting sessions idle for longer than the TTL
    /// at `now`. Returns the number of evicted sessions.
    pub async fn sweep_expired(&self, now: Timestamp) -> usize {
        self.state.sweep_expired(now).await
    }

    /// Stops the sweeper and waits for it to exit. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        let sweeper = self.sweeper.lock().await.take();
        if let Some(sweeper) = sweeper {
            // The receiver only disappears if the task already ended.
            let _ = sweeper.shutdown.send(true);
            if let Err(e) = sweeper.handle.await {
                tracing::warn!(error = %e, "Session sweeper task failed");
            }
        }
    }

    /// Inserts a fully formed session, replacing any existing one.
    pub async fn insert(&self, session: Session) {
        self.state
            .sessions
            .write()
            .await
            .insert(session.id().clone(), session);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> SessionId {
        let id = SessionId::generate();
        self.state
            .sessions
            .write()
            .await
            .insert(id.clone(), Session::new(id.clone()));
        tracing::info!(session_id = %id, "Session created");
        id
    }

    async fn get(&self, id: &SessionId) -> Option<Session> {
        self.state.sessions.read().await.get(id).cloned()
    }

    async fn add_message(&self, id: &SessionId, role: Role, content: String) {
        let limit = self.state.config.history_limit;
        let mut sessions = self.state.sessions.write().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id.clone()))
            .append_message(role, content, limit);
    }

    async fn get_history(&self, id: &SessionId) -> Vec<ChatMessage> {
        self.state
            .sessions
            .read()
            .await
            .get(id)
            .map(|s| s.history().to_vec())
            .unwrap_or_default()
    }

    async fn get_flow_value(&self, id: &SessionId, key: &str) -> String {
        self.state
            .sessions
            .read()
            .await
            .get(id)
            .and_then(|s| s.flow_value(key))
            .map(str::to_string)
            .unwrap_or_default()
    }

    async fn set_flow_value(&self, id: &SessionId, key: &str, value: String) {
        let mut sessions = self.state.sessions.write().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id.clone()))
            .set_flow_value(key, value);
    }

    async fn clear(&self, id: &SessionId) {
        if let Some(session) = self.state.sessions.write().await.get_mut(id) {
            session.clear_history();
        }
    }

    async fn delete(&self, id: &SessionId) {
        let removed = self.state.sessions.write().await.remove(id).is_some();
        {
            let mut locks = self.state.turn_locks.lock().await;
            // A turn in flight keeps its lock; the sweep collects it later.
            if locks.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
                locks.remove(id);
            }
        }
        if removed {
            tracing::info!(session_id = %id, "Session deleted");
        }
    }

    async fn count(&self) -> usize {
        self.state.sessions.read().await.len()
    }

    async fn lock_turn(&self, id: &SessionId) -> TurnGuard {
        let lock = {
            let mut locks = self.state.turn_locks.lock().await;
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        lock.lock_owned().await
    }
}
