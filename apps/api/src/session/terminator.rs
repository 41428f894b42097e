//! Force sign-out sink.
//!
//! The idle watcher only ever *attempts* sign-out; session teardown belongs
//! to the auth provider. `AppState` carries an `Arc<dyn SessionTerminator>`
//! chosen at startup from config.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TerminatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth provider rejected sign-out (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Who is being signed out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSubject {
    pub session_id: Uuid,
    pub user_id: String,
}

#[async_trait]
pub trait SessionTerminator: Send + Sync {
    async fn sign_out(&self, subject: &SessionSubject) -> Result<(), TerminatorError>;
}

/// Default when no auth endpoint is configured: record the sign-out only.
pub struct LoggingTerminator;

#[async_trait]
impl SessionTerminator for LoggingTerminator {
    async fn sign_out(&self, subject: &SessionSubject) -> Result<(), TerminatorError> {
        info!(
            session_id = %subject.session_id,
            user_id = %subject.user_id,
            "Session signed out after inactivity"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignOutRequest<'a> {
    session_id: Uuid,
    user_id: &'a str,
    reason: &'static str,
}

/// POSTs a sign-out request to the auth provider. Not retried.
#[derive(Clone)]
pub struct HttpTerminator {
    client: Client,
    url: String,
}

impl HttpTerminator {
    pub fn new(url: String) -> Result<Self, TerminatorError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl SessionTerminator for HttpTerminator {
    async fn sign_out(&self, subject: &SessionSubject) -> Result<(), TerminatorError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SignOutRequest {
                session_id: subject.session_id,
                user_id: &subject.user_id,
                reason: "idle_timeout",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TerminatorError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        info!(session_id = %subject.session_id, "Auth provider accepted sign-out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_terminator_succeeds() {
        let subject = SessionSubject {
            session_id: Uuid::new_v4(),
            user_id: "user-1".into(),
        };
        assert!(LoggingTerminator.sign_out(&subject).await.is_ok());
    }

    #[test]
    fn test_sign_out_request_shape() {
        let id = Uuid::nil();
        let body = serde_json::to_value(SignOutRequest {
            session_id: id,
            user_id: "u",
            reason: "idle_timeout",
        })
        .unwrap();
        assert_eq!(body["sessionId"], id.to_string());
        assert_eq!(body["userId"], "u");
        assert_eq!(body["reason"], "idle_timeout");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let terminator = HttpTerminator::new("http://127.0.0.1:9/signout".into()).unwrap();
        let subject = SessionSubject {
            session_id: Uuid::new_v4(),
            user_id: "user-1".into(),
        };
        assert!(terminator.sign_out(&subject).await.is_err());
    }
}
