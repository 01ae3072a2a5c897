use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::constants;
use crate::session::Session;

struct StoredSession {
    session: Session,
    touched: Instant,
}

/// Web sessions keyed by id. Idle sessions expire after `ttl`, and the
/// least recently touched one is dropped once `capacity` is reached.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(*constants::SESSION_TTL_SECS),
            *constants::MAX_SESSIONS,
        )
    }
}

impl SessionStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Store a new session, making room first. Returns its id.
    pub async fn insert(&self, session: Session) -> Uuid {
        let id = session.id;
        let now = Instant::now();
        let mut sessions = self.inner.write().await;

        let before = sessions.len();
        sessions.retain(|_, stored| now.duration_since(stored.touched) < self.ttl);
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "Expired idle sessions");
        }

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, stored)| stored.touched)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    debug!(session = %oldest, "Evicted least recently used session");
                }
                None => break,
            }
        }

        sessions.insert(id, StoredSession { session, touched: now });
        id
    }

    /// Run `f` on a live session and mark it as touched.
    /// Expired or unknown ids yield `None`.
    pub async fn with_session<T>(&self, id: &Uuid, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let expired = now.duration_since(sessions.get(id)?.touched) >= self.ttl;
        if expired {
            sessions.remove(id);
            debug!(session = %id, "Session expired");
            return None;
        }
        let stored = sessions.get_mut(id)?;
        stored.touched = now;
        Some(f(&mut stored.session))
    }

    /// Copy of a session's current state, without touching it.
    pub async fn snapshot(&self, id: &Uuid) -> Option<Session> {
        self.inner.read().await.get(id).map(|stored| stored.session.clone())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;

    #[tokio::test]
    async fn test_insert_and_touch() {
        let store = SessionStore::new(Duration::from_secs(60), 10);
        let id = store.insert(Session::new()).await;
        assert_eq!(store.len().await, 1);

        let accepted = store.with_session(&id, |s| s.submit_dilemma("I feel lost")).await;
        assert_eq!(accepted, Some(true));
        assert_eq!(store.snapshot(&id).await.unwrap().phase(), Phase::Preparing);
        assert!(store.with_session(&Uuid::new_v4(), |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_touched() {
        let store = SessionStore::new(Duration::from_secs(60), 3);
        let first = store.insert(Session::new()).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = store.insert(Session::new()).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let third = store.insert(Session::new()).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        // Touching the first keeps it; the second becomes the oldest.
        store.with_session(&first, |_| ()).await.unwrap();
        let fourth = store.insert(Session::new()).await;

        assert_eq!(store.len().await, 3);
        assert!(store.snapshot(&second).await.is_none());
        for id in [first, third, fourth] {
            assert!(store.snapshot(&id).await.is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::new(Duration::from_secs(60), 100);
        let idle = store.insert(Session::new()).await;
        let active = store.insert(Session::new()).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        store.with_session(&active, |_| ()).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        assert!(store.with_session(&idle, |_| ()).await.is_none());
        assert!(store.with_session(&active, |_| ()).await.is_some());

        tokio::time::advance(Duration::from_secs(61)).await;
        store.insert(Session::new()).await;
        assert_eq!(store.len().await, 1);
    }
}
