use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::idle::IdleConfig;
use crate::session::terminator::{SessionSubject, SessionTerminator};
use crate::session::watcher::{spawn_idle_watcher, IdleCommand, IdleHandle, IdleStatus};
use crate::session::SessionError;

/// Idle watchers keyed by session id.
///
/// Watchers that ended on sign-out are evicted on the next `start`, `len`,
/// or lookup of that id; the lookup still reports the final status once.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<IdleHandle>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start(
        &self,
        user_id: String,
        config: IdleConfig,
        terminator: Arc<dyn SessionTerminator>,
    ) -> (SessionSubject, IdleStatus) {
        let subject = SessionSubject {
            session_id: Uuid::new_v4(),
            user_id,
        };
        let handle = spawn_idle_watcher(config, subject.clone(), terminator);
        let status = handle.latest();
        let mut sessions = self.sessions.write().await;
        prune_finished(&mut sessions);
        sessions.insert(subject.session_id, Arc::new(handle));
        drop(sessions);
        info!(session_id = %subject.session_id, "Idle session started");
        (subject, status)
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<IdleHandle>, SessionError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))?;
        if handle.is_finished() {
            self.sessions.write().await.remove(&id);
            debug!(session_id = %id, "Evicted finished idle session");
        }
        Ok(handle)
    }

    /// Looks up the session and applies `command` outside the lock.
    pub async fn send(&self, id: Uuid, command: IdleCommand) -> Result<IdleStatus, SessionError> {
        let handle = self.get(id).await?;
        handle.send(command).await
    }

    /// Tears the session down. Its timers stop and no sign-out is issued.
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(SessionError::NotFound(id))?;
        // A request still holding a clone keeps the task alive until it lets go.
        if let Ok(handle) = Arc::try_unwrap(handle) {
            handle.shutdown().await;
        }
        info!(session_id = %id, "Idle session closed");
        Ok(())
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        prune_finished(&mut sessions);
        sessions.len()
    }
}

fn prune_finished(sessions: &mut HashMap<Uuid, Arc<IdleHandle>>) {
    let before = sessions.len();
    sessions.retain(|_, handle| !handle.is_finished());
    let evicted = before - sessions.len();
    if evicted > 0 {
        debug!("Evicted {evicted} finished idle sessions");
    }
}
