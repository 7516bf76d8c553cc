//! In-flight request tracking for `notifications/cancelled`.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Connection scope (stdio or an HTTP session id) and request id.
type RequestKey = (String, String);
type Registry = Mutex<HashMap<RequestKey, (u64, CancellationToken)>>;

/// Cancellation tokens of requests currently being handled.
///
/// Request ids are only unique within one connection, so every entry is
/// keyed by the scope it arrived on as well.
#[derive(Default)]
pub struct InFlightRequests {
    tokens: Arc<Registry>,
    next_generation: AtomicU64,
}

impl InFlightRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a request until the returned guard is dropped.
    ///
    /// The registered token is a child of `parent`, so cancelling the
    /// transport-level token also cancels the request.
    pub fn register(&self, scope: &str, id: &Value, parent: &CancellationToken) -> InFlightGuard {
        let key = key_for(scope, id);
        let token = parent.child_token();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut tokens) = self.tokens.lock() {
            tokens.insert(key.clone(), (generation, token.clone()));
        }
        debug!(scope, request_id = %key.1, "Registered in-flight request");
        InFlightGuard {
            tokens: Arc::clone(&self.tokens),
            key,
            generation,
            token,
        }
    }

    /// Cancel the request with `id` in `scope`. Returns `false` if it is not in flight there.
    pub fn cancel(&self, scope: &str, id: &Value) -> bool {
        let key = key_for(scope, id);
        let token = self
            .tokens
            .lock()
            .ok()
            .and_then(|tokens| tokens.get(&key).map(|(_, token)| token.clone()));
        match token {
            Some(token) => {
                token.cancel();
                debug!(scope, request_id = %key.1, "Cancelled in-flight request");
                true
            }
            None => {
                debug!(scope, request_id = %key.1, "No in-flight request to cancel");
                false
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.tokens.lock().map(|tokens| tokens.len()).unwrap_or(0)
    }
}

/// Removes its request from the registry on drop.
pub struct InFlightGuard {
    tokens: Arc<Registry>,
    key: RequestKey,
    generation: u64,
    token: CancellationToken,
}

impl InFlightGuard {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut tokens) = self.tokens.lock() {
            // a reused id may have replaced this entry
            if tokens
                .get(&self.key)
                .is_some_and(|(generation, _)| *generation == self.generation)
            {
                tokens.remove(&self.key);
            }
        }
    }
}

/// Request ids are strings or numbers; `1` and `"1"` are different ids.
fn key_for(scope: &str, id: &Value) -> RequestKey {
    (scope.to_string(), id.to_string())
}
