//! Inactivity sign-out: the idle clock, its per-session watcher task, and
//! the sink that performs the forced sign-out.

pub mod handlers;
pub mod idle;
pub mod registry;
pub mod terminator;
pub mod watcher;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),

    #[error("Session {0} has already ended")]
    Finished(Uuid),
}
