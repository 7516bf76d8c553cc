//! Streamable HTTP sessions, created by `initialize`.
//!
//! Sessions end on `DELETE` or after sitting idle for the store's timeout.
//! Expired entries are swept whenever the store is accessed.

use argocd_mcp_core::constants;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Session {
    pub protocol_version: String,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl Session {
    fn is_expired(&self, idle_timeout: Duration) -> bool {
        self.last_activity.elapsed() >= idle_timeout
    }
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(Duration::from_secs(constants::SESSION_IDLE_TIMEOUT_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Open a session and return its id.
    pub fn create(&self, protocol_version: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        if let Ok(mut sessions) = self.sessions.lock() {
            sweep_expired(&mut sessions, self.idle_timeout);
            let now = Instant::now();
            sessions.insert(
                id.clone(),
                Session {
                    protocol_version: protocol_version.to_string(),
                    created_at: now,
                    last_activity: now,
                },
            );
        }
        info!(session_id = %id, protocol_version, "MCP session created");
        id
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        let sessions = self.sessions.lock().ok()?;
        sessions
            .get(id)
            .filter(|session| !session.is_expired(self.idle_timeout))
            .cloned()
    }

    /// Record activity on a session. Returns `false` if it is unknown or expired.
    pub fn touch(&self, id: &str) -> bool {
        let Ok(mut sessions) = self.sessions.lock() else {
            return false;
        };
        sweep_expired(&mut sessions, self.idle_timeout);
        match sessions.get_mut(id) {
            Some(session) => {
                session.last_activity = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Terminate a session. Returns `false` if it did not exist.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self
            .sessions
            .lock()
            .ok()
            .and_then(|mut sessions| {
                sweep_expired(&mut sessions, self.idle_timeout);
                sessions.remove(id)
            });
        match removed {
            Some(session) => {
                info!(
                    session_id = %id,
                    age_secs = session.created_at.elapsed().as_secs(),
                    "MCP session terminated"
                );
                true
            }
            None => false,
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .map(|mut sessions| {
                sweep_expired(&mut sessions, self.idle_timeout);
                sessions.len()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep_expired(sessions: &mut HashMap<String, Session>, idle_timeout: Duration) {
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_expired(idle_timeout));
    let expired = before - sessions.len();
    if expired > 0 {
        debug!(expired, "Expired idle MCP sessions");
    }
}
