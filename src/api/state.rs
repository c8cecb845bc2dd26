use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::RwLock, task::JoinHandle, time::MissedTickBehavior};
use uuid::Uuid;

use crate::models::Session;
use crate::services::{AvailabilityTable, MovieCatalog};

/// Idle time after which a session is dropped unless configured otherwise
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
    /// Loaded once at startup, read-only afterwards
    pub availability: Arc<AvailabilityTable>,
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(catalog: Arc<dyn MovieCatalog>, availability: Arc<AvailabilityTable>) -> Self {
        Self {
            catalog,
            availability,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Drops every session idle for longer than the TTL, returning how many
    pub async fn prune_expired_sessions(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.session_ttl));
        let pruned = before - sessions.len();

        if pruned > 0 {
            tracing::debug!(pruned, remaining = sessions.len(), "Expired sessions pruned");
        }
        pruned
    }

    /// Prunes expired sessions in the background every `every`
    pub fn spawn_session_reaper(&self, every: Duration) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                state.prune_expired_sessions().await;
            }
        })
    }
}
