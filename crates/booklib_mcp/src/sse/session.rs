//! Open SSE sessions keyed by id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::info;
use tokio::sync::mpsc;
use uuid::Uuid;

type Outbox = mpsc::UnboundedSender<String>;

/// Shared map of session id to the sender feeding that session's stream.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, Outbox>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session and returns its id with the receiving half.
    pub fn open(&self) -> (String, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4().simple().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().insert(id.clone(), tx);
        info!("event=sse_session module=mcp status=opened session_id={id}");
        (id, rx)
    }

    pub fn sender(&self, id: &str) -> Option<Outbox> {
        self.lock().get(id).cloned()
    }

    pub fn close(&self, id: &str) {
        if self.lock().remove(id).is_some() {
            info!("event=sse_session module=mcp status=closed session_id={id}");
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // No code path panics while holding the lock; recover the map if one ever does.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Outbox>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes its session from the registry when the event stream is dropped.
pub(crate) struct SessionGuard {
    id: String,
    sessions: SessionRegistry,
}

impl SessionGuard {
    pub(crate) fn new(id: String, sessions: SessionRegistry) -> Self {
        Self { id, sessions }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.close(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionGuard, SessionRegistry};

    #[test]
    fn open_session_is_addressable_until_closed() {
        let sessions = SessionRegistry::new();
        let (id, mut rx) = sessions.open();
        assert_eq!(id.len(), 32);

        sessions.sender(&id).unwrap().send("hello".into()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), "hello");

        sessions.close(&id);
        assert!(sessions.sender(&id).is_none());
        assert!(sessions.is_empty());
    }

    #[test]
    fn guard_drop_closes_session() {
        let sessions = SessionRegistry::new();
        let (id, _rx) = sessions.open();
        let guard = SessionGuard::new(id.clone(), sessions.clone());
        assert_eq!(sessions.len(), 1);

        drop(guard);
        assert!(sessions.sender(&id).is_none());
    }
}
